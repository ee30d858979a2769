//! Headless bubble simulation: bodies, the per-frame step, drag interaction,
//! render synchronisation and the frame loop. Nothing in here touches a
//! window; the egui shell in `crate::app` drives it.

mod body;
mod factory;
mod interaction;
mod params;
mod render_sync;
mod scene;
mod scheduler;
mod step;

pub use interaction::Tooltip;
pub use params::PhysicsParams;
pub use render_sync::Stacking;
pub use scene::BubbleScene;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// False until the host has laid the canvas out with a real size.
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
