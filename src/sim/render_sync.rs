use std::collections::HashMap;

use eframe::egui::{Color32, Pos2, Vec2, vec2};

use super::body::Body;

const PULSE_VISIBLE_THRESHOLD: f32 = 0.01;
const PULSE_SCALE: f32 = 0.15;

pub const GAIN_COLOR: Color32 = Color32::from_rgb(74, 222, 128);
pub const LOSS_COLOR: Color32 = Color32::from_rgb(248, 113, 113);

/// Paint layer of a bubble; higher z-index is drawn on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stacking {
    Resting,
    Pulsing,
    Captured,
}

impl Stacking {
    pub fn z_index(self) -> u8 {
        match self {
            Self::Resting => 10,
            Self::Pulsing => 20,
            Self::Captured => 50,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Color32,
    pub blur: f32,
    pub shadow_alpha: f32,
    pub border_alpha: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleVisual {
    /// Offset of the bubble's top-left corner inside the viewport.
    pub translate: Vec2,
    pub radius: f32,
    pub scale: f32,
    pub gain: bool,
    pub glow: Option<Glow>,
    pub stacking: Stacking,
}

impl BubbleVisual {
    /// Scaling is about the centre, so the centre ignores `scale`.
    pub fn center(&self) -> Pos2 {
        (self.translate + vec2(self.radius, self.radius)).to_pos2()
    }

    pub fn scaled_radius(&self) -> f32 {
        self.radius * self.scale
    }

    /// Hit test against the bubble as painted, pulse scaling included.
    pub fn contains(&self, point: Pos2) -> bool {
        let reach = self.scaled_radius();
        (point - self.center()).length_sq() < reach * reach
    }

    pub fn palette(&self) -> Color32 {
        if self.gain { GAIN_COLOR } else { LOSS_COLOR }
    }
}

pub(super) fn visual_for(body: &Body, is_captured: bool) -> BubbleVisual {
    let radius = body.radius();
    let gain = body.record().is_gain();
    let pulsing = body.pulse > PULSE_VISIBLE_THRESHOLD;
    let palette = if gain { GAIN_COLOR } else { LOSS_COLOR };

    let glow = pulsing.then(|| Glow {
        color: palette,
        blur: 20.0 + body.pulse * 30.0,
        shadow_alpha: 0.4 + body.pulse * 0.4,
        border_alpha: 0.5 + body.pulse * 0.5,
    });

    let stacking = if is_captured {
        Stacking::Captured
    } else if pulsing {
        Stacking::Pulsing
    } else {
        Stacking::Resting
    };

    BubbleVisual {
        translate: body.position - vec2(radius, radius),
        radius,
        scale: if pulsing { 1.0 + body.pulse * PULSE_SCALE } else { 1.0 },
        gain,
        glow,
        stacking,
    }
}

/// Body indices in paint order: stable by stacking, so equal layers keep
/// collection order.
pub(super) fn draw_order(bodies: &[Body], captured: Option<usize>) -> Vec<usize> {
    let mut order = (0..bodies.len()).collect::<Vec<_>>();
    order.sort_by_key(|&index| {
        visual_for(&bodies[index], captured == Some(index))
            .stacking
            .z_index()
    });
    order
}

/// The body painted on top at `point`, i.e. the one a click lands on.
pub(super) fn topmost_body_at(bodies: &[Body], captured: Option<usize>, point: Pos2) -> Option<usize> {
    draw_order(bodies, captured)
        .into_iter()
        .rev()
        .find(|&index| visual_for(&bodies[index], captured == Some(index)).contains(point))
}

/// Non-owning association between body ids and host-side visual handles.
#[derive(Debug)]
pub(super) struct VisualBindings<H> {
    handles: HashMap<String, H>,
}

impl<H> Default for VisualBindings<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H: Copy> VisualBindings<H> {
    pub(super) fn bind(&mut self, id: &str, handle: H) {
        self.handles.insert(id.to_owned(), handle);
    }

    pub(super) fn handle(&self, id: &str) -> Option<H> {
        self.handles.get(id).copied()
    }

    pub(super) fn len(&self) -> usize {
        self.handles.len()
    }

    pub(super) fn clear(&mut self) {
        self.handles.clear();
    }
}

/// Visuals for bound bodies only, in paint order.
pub(super) fn sync_visuals<H: Copy>(
    bodies: &[Body],
    captured: Option<usize>,
    bindings: &VisualBindings<H>,
) -> Vec<(usize, H, BubbleVisual)> {
    draw_order(bodies, captured)
        .into_iter()
        .filter_map(|index| {
            let body = &bodies[index];
            let handle = bindings.handle(&body.id)?;
            Some((index, handle, visual_for(body, captured == Some(index))))
        })
        .collect()
}
