use std::sync::Arc;

use eframe::egui::{Pos2, Vec2};

use crate::market::InstrumentRecord;

use super::params::PhysicsParams;

/// One simulated bubble. `radius` and `mass` are fixed at creation, so they
/// are only reachable through accessors.
#[derive(Clone, Debug)]
pub struct Body {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pulse: f32,
    radius: f32,
    mass: f32,
    record: Arc<InstrumentRecord>,
}

impl Body {
    pub(super) fn with_radius(
        record: Arc<InstrumentRecord>,
        position: Vec2,
        velocity: Vec2,
        radius: f32,
    ) -> Self {
        Self {
            id: record.id.clone(),
            position,
            velocity,
            pulse: 0.0,
            radius,
            mass: radius,
            record,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn record(&self) -> &InstrumentRecord {
        &self.record
    }

    pub fn contains(&self, point: Pos2) -> bool {
        (point.to_vec2() - self.position).length_sq() < self.radius * self.radius
    }
}

/// `base + ln(price + 10) * scale`. The logarithm argument is floored at 1
/// and non-finite prices count as 0, so the radius never drops below `base`.
pub(super) fn radius_for_price(price: f64, params: &PhysicsParams) -> f32 {
    let price = if price.is_finite() { price } else { 0.0 };
    let scaled = (price + 10.0).max(1.0).ln() as f32;
    params.radius_base + scaled * params.radius_log_scale
}
