use std::sync::Arc;

use eframe::egui::Pos2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::market::InstrumentRecord;

use super::body::Body;
use super::factory::spawn_bodies;
use super::interaction::{InteractionController, Tooltip, tooltip_at};
use super::params::PhysicsParams;
use super::render_sync::{BubbleVisual, VisualBindings, sync_visuals, topmost_body_at};
use super::scheduler::{FrameLoop, FrameTicket};
use super::step::step_bodies;
use super::Viewport;

/// Everything the host needs to run the bubbles: the body collection plus
/// the drag controller, frame loop and visual bindings that act on it.
/// `H` is the host's handle type for an on-screen bubble.
pub struct BubbleScene<H> {
    params: PhysicsParams,
    viewport: Viewport,
    records: Vec<Arc<InstrumentRecord>>,
    bodies: Vec<Body>,
    spawn_pending: bool,
    controller: InteractionController,
    frame_loop: FrameLoop,
    next_ticket: Option<FrameTicket>,
    bindings: VisualBindings<H>,
    tooltip: Option<Tooltip>,
    rng: StdRng,
}

impl<H: Copy> BubbleScene<H> {
    pub fn new(params: PhysicsParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            params,
            viewport: Viewport::new(0.0, 0.0),
            records: Vec::new(),
            bodies: Vec::new(),
            spawn_pending: false,
            controller: InteractionController::default(),
            frame_loop: FrameLoop::default(),
            next_ticket: None,
            bindings: VisualBindings::default(),
            tooltip: None,
            rng,
        }
    }

    /// Replaces the record set. The previous collection is torn down first and
    /// every body is created fresh, even for ids present in both sets.
    pub fn load(&mut self, records: &[InstrumentRecord]) {
        self.teardown();
        self.records = records.iter().cloned().map(Arc::new).collect();
        self.spawn_pending = true;
        self.try_spawn();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }

        self.viewport = viewport;
        if self.spawn_pending {
            self.try_spawn();
        }
    }

    fn try_spawn(&mut self) {
        let Some(bodies) = spawn_bodies(self.viewport, &self.records, &self.params, &mut self.rng)
        else {
            log::debug!(
                "deferring {} bubbles until the viewport has a size",
                self.records.len()
            );
            return;
        };

        log::info!(
            "spawned {} bubbles in {:.0}x{:.0}",
            bodies.len(),
            self.viewport.width,
            self.viewport.height
        );
        self.bodies = bodies;
        self.spawn_pending = false;
        self.frame_loop.start();
        self.next_ticket = self.frame_loop.schedule();
    }

    /// Stops the loop, releases visuals and drag state, then drops the bodies.
    pub fn teardown(&mut self) {
        self.frame_loop.stop();
        self.next_ticket = None;
        self.bindings.clear();
        self.controller.reset();
        self.tooltip = None;
        self.bodies.clear();
        self.records.clear();
        self.spawn_pending = false;
    }

    /// Runs the scheduled tick, if any, and schedules the next one. Returns
    /// whether the host should request another refresh.
    pub fn frame(&mut self) -> bool {
        // A collapsed viewport would pin every body to its corner; hold the tick.
        if !self.viewport.is_usable() {
            return self.next_ticket.is_some();
        }

        if let Some(ticket) = self.next_ticket.take()
            && self.frame_loop.run(ticket)
        {
            step_bodies(
                &mut self.bodies,
                self.viewport,
                self.controller.captured(),
                &self.params,
            );
            self.next_ticket = self.frame_loop.schedule();
        }

        self.next_ticket.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn ticks(&self) -> u64 {
        self.frame_loop.completed_ticks()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn captured(&self) -> Option<usize> {
        self.controller.captured()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Associates a host handle with the body `id`; unknown ids are refused.
    pub fn bind_visual(&mut self, id: &str, handle: H) -> bool {
        if !self.bodies.iter().any(|body| body.id == id) {
            return false;
        }

        self.bindings.bind(id, handle);
        true
    }

    pub fn bound_visuals(&self) -> usize {
        self.bindings.len()
    }

    /// Current visuals of every bound body, in paint order.
    pub fn visuals(&self) -> Vec<(usize, H, BubbleVisual)> {
        sync_visuals(&self.bodies, self.controller.captured(), &self.bindings)
    }

    pub fn pointer_down(&mut self, pointer: Pos2, time_ms: f64) -> bool {
        let Some(index) = topmost_body_at(&self.bodies, self.controller.captured(), pointer) else {
            return false;
        };

        self.controller
            .pointer_down(&self.bodies, index, pointer, time_ms)
    }

    /// `pointer` is viewport-local; `screen_pos` is where a tooltip would go.
    pub fn pointer_move(&mut self, pointer: Pos2, screen_pos: Pos2, time_ms: f64) {
        let hovered = self
            .controller
            .pointer_move(&mut self.bodies, pointer, time_ms);
        self.tooltip = hovered.and_then(|index| tooltip_at(&self.bodies, index, screen_pos));
    }

    pub fn pointer_up(&mut self) {
        self.controller.release(&mut self.bodies, &self.params);
    }

    pub fn pointer_leave(&mut self) {
        self.controller.release(&mut self.bodies, &self.params);
        self.tooltip = None;
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, pos2};

    use super::*;

    fn records(ids: &[&str]) -> Vec<InstrumentRecord> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| InstrumentRecord::new(id, id, 10.0 + index as f64, 1.0))
            .collect()
    }

    fn scene() -> BubbleScene<u32> {
        let mut scene = BubbleScene::new(PhysicsParams::default(), Some(5));
        scene.resize(Viewport::new(1200.0, 800.0));
        scene
    }

    #[test]
    fn load_spawns_one_body_per_record_and_starts_loop() {
        let mut scene = scene();
        scene.load(&records(&["A", "B", "C"]));

        assert_eq!(scene.bodies().len(), 3);
        assert!(scene.is_running());
        assert!(scene.frame());
        assert_eq!(scene.ticks(), 1);
    }

    #[test]
    fn reload_rebuilds_everything() {
        let mut scene = scene();
        scene.load(&records(&["A", "B", "C", "D", "E"]));
        for _ in 0..30 {
            scene.frame();
        }
        scene.bind_visual("A", 1);
        let before = scene.bodies()[0].position;

        scene.load(&records(&["A", "C", "E"]));

        let ids = scene.bodies().iter().map(|body| body.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["A", "C", "E"]);
        assert_ne!(scene.bodies()[0].position, before);
        assert_eq!(scene.bound_visuals(), 0);
        assert!(scene.bodies().iter().all(|body| body.pulse == 0.0));
    }

    #[test]
    fn load_waits_for_a_usable_viewport() {
        let mut scene = BubbleScene::<u32>::new(PhysicsParams::default(), Some(1));
        scene.load(&records(&["A", "B"]));

        assert!(scene.is_empty());
        assert!(!scene.frame());

        scene.resize(Viewport::new(640.0, 480.0));
        assert_eq!(scene.bodies().len(), 2);
        assert!(scene.frame());
    }

    #[test]
    fn resize_does_not_respawn() {
        let mut scene = scene();
        scene.load(&records(&["A"]));
        let position = scene.bodies()[0].position;

        scene.resize(Viewport::new(1400.0, 900.0));

        assert_eq!(scene.bodies()[0].position, position);
    }

    #[test]
    fn collapsed_viewport_holds_the_layout() {
        let mut scene = BubbleScene::<u32>::new(PhysicsParams::default(), Some(3));
        scene.resize(Viewport::new(800.0, 600.0));
        scene.load(&records(&["A", "B"]));
        let before = scene
            .bodies()
            .iter()
            .map(|body| body.position)
            .collect::<Vec<_>>();

        scene.resize(Viewport::new(0.0, 0.0));
        assert!(scene.frame());

        let after = scene
            .bodies()
            .iter()
            .map(|body| body.position)
            .collect::<Vec<_>>();
        assert_eq!(after, before);
        assert_eq!(scene.ticks(), 0);

        scene.resize(Viewport::new(800.0, 600.0));
        assert!(scene.frame());
        assert_eq!(scene.ticks(), 1);
    }

    #[test]
    fn visuals_cover_bound_bodies_only() {
        let mut scene = scene();
        scene.load(&records(&["A", "B"]));

        assert!(!scene.bind_visual("Z", 9));
        assert!(scene.bind_visual("B", 4));

        let visuals = scene.visuals();
        assert_eq!(visuals.len(), 1);
        assert_eq!(visuals[0].0, 1);
        assert_eq!(visuals[0].1, 4);
    }

    #[test]
    fn drag_and_throw_through_scene() {
        let mut scene = scene();
        scene.load(&records(&["A"]));
        let start = scene.bodies()[0].position.to_pos2();

        assert!(scene.pointer_down(start, 0.0));
        assert_eq!(scene.captured(), Some(0));

        scene.pointer_move(start + Vec2::new(2.0, 0.0), pos2(0.0, 0.0), 20.0);
        scene.frame();
        assert_eq!(scene.bodies()[0].velocity, Vec2::ZERO);
        assert!(scene.tooltip().is_some());

        scene.pointer_up();
        assert_eq!(scene.captured(), None);
        assert!((scene.bodies()[0].velocity.x - 4.0).abs() < 1e-4);
        assert_eq!(scene.bodies()[0].velocity.y, 0.0);
    }

    #[test]
    fn pointer_down_on_empty_space_is_ignored() {
        let mut scene = scene();
        scene.load(&records(&["A"]));
        let far = scene.bodies()[0].position.to_pos2() + Vec2::new(500.0, 500.0);

        assert!(!scene.pointer_down(far, 0.0));
        assert_eq!(scene.captured(), None);
    }

    #[test]
    fn pointer_leave_releases_and_hides_tooltip() {
        let mut scene = scene();
        scene.load(&records(&["A"]));
        let start = scene.bodies()[0].position.to_pos2();
        scene.pointer_down(start, 0.0);
        scene.pointer_move(start, start, 10.0);

        scene.pointer_leave();

        assert_eq!(scene.captured(), None);
        assert!(scene.tooltip().is_none());
    }

    #[test]
    fn teardown_stops_and_releases() {
        let mut scene = scene();
        scene.load(&records(&["A", "B"]));
        scene.bind_visual("A", 1);
        let start = scene.bodies()[0].position.to_pos2();
        scene.pointer_down(start, 0.0);

        scene.teardown();

        assert!(!scene.is_running());
        assert!(!scene.frame());
        assert!(scene.is_empty());
        assert_eq!(scene.bound_visuals(), 0);
        assert_eq!(scene.captured(), None);
    }
}
