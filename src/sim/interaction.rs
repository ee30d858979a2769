use eframe::egui::{Pos2, Vec2};

use super::body::Body;
use super::params::PhysicsParams;

/// Hover payload shown next to the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub ticker: String,
    pub name: String,
    pub price: f64,
    pub change_percent: f64,
    pub screen_pos: Pos2,
}

impl Tooltip {
    fn for_body(body: &Body, screen_pos: Pos2) -> Self {
        let record = body.record();
        Self {
            ticker: record.id.clone(),
            name: record.display_name.clone(),
            price: record.price,
            change_percent: record.change_percent,
            screen_pos,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct DragSession {
    body: usize,
    offset: Vec2,
    prev_pointer: Pos2,
    prev_time_ms: f64,
    /// Pointer velocity in px/ms between the two most recent samples.
    last_velocity: Vec2,
}

#[derive(Clone, Copy, Debug, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Default)]
pub(super) struct InteractionController {
    state: DragState,
}

impl InteractionController {
    pub(super) fn captured(&self) -> Option<usize> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session.body),
        }
    }

    pub(super) fn pointer_down(
        &mut self,
        bodies: &[Body],
        index: usize,
        pointer: Pos2,
        time_ms: f64,
    ) -> bool {
        let Some(body) = bodies.get(index) else {
            return false;
        };

        self.state = DragState::Dragging(DragSession {
            body: index,
            offset: pointer.to_vec2() - body.position,
            prev_pointer: pointer,
            prev_time_ms: time_ms,
            last_velocity: Vec2::ZERO,
        });
        log::debug!("captured bubble {}", body.id);
        true
    }

    /// Moves the captured body with the pointer and records the latest
    /// pointer velocity. Returns the hovered body, if any.
    pub(super) fn pointer_move(
        &mut self,
        bodies: &mut [Body],
        pointer: Pos2,
        time_ms: f64,
    ) -> Option<usize> {
        let hovered = hovered_body(bodies, pointer);

        if let DragState::Dragging(session) = &mut self.state
            && let Some(body) = bodies.get_mut(session.body)
        {
            body.position = pointer.to_vec2() - session.offset;

            let dt = time_ms - session.prev_time_ms;
            if dt > 0.0 {
                session.last_velocity = (pointer - session.prev_pointer) / dt as f32;
            }

            session.prev_pointer = pointer;
            session.prev_time_ms = time_ms;
        }

        hovered
    }

    /// Ends a drag, throwing the body with the last pointer velocity.
    pub(super) fn release(&mut self, bodies: &mut [Body], params: &PhysicsParams) -> Option<usize> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };

        let body = bodies.get_mut(session.body)?;
        body.velocity = params.limit_velocity(session.last_velocity * params.release_multiplier);
        log::debug!(
            "released bubble {} at ({:.2}, {:.2})",
            body.id,
            body.velocity.x,
            body.velocity.y
        );
        Some(session.body)
    }

    pub(super) fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}

/// First body, in collection order, whose circle contains `pointer`.
pub(super) fn hovered_body(bodies: &[Body], pointer: Pos2) -> Option<usize> {
    bodies.iter().position(|body| body.contains(pointer))
}

pub(super) fn tooltip_at(bodies: &[Body], index: usize, screen_pos: Pos2) -> Option<Tooltip> {
    bodies
        .get(index)
        .map(|body| Tooltip::for_body(body, screen_pos))
}
