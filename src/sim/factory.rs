use std::sync::Arc;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::market::InstrumentRecord;

use super::body::{Body, radius_for_price};
use super::params::PhysicsParams;
use super::Viewport;

/// Builds one fresh body per record, in record order. Returns `None` while
/// the viewport has no usable size, so no NaN positions are produced.
///
/// Positions are drawn from `[r, W - r] x [r, H - r]`. A viewport narrower
/// than `2r` is not special-cased: the body may start partly outside and is
/// pulled back by the first wall pass.
pub(super) fn spawn_bodies<R: Rng + ?Sized>(
    viewport: Viewport,
    records: &[Arc<InstrumentRecord>],
    params: &PhysicsParams,
    rng: &mut R,
) -> Option<Vec<Body>> {
    if !viewport.is_usable() {
        return None;
    }

    let bodies = records
        .iter()
        .map(|record| {
            let radius = radius_for_price(record.price, params);
            let position = vec2(
                rng.random::<f32>() * (viewport.width - radius * 2.0) + radius,
                rng.random::<f32>() * (viewport.height - radius * 2.0) + radius,
            );
            let velocity = random_velocity(rng, params.spawn_speed);
            Body::with_radius(Arc::clone(record), position, velocity, radius)
        })
        .collect();

    Some(bodies)
}

fn random_velocity<R: Rng + ?Sized>(rng: &mut R, spread: f32) -> Vec2 {
    vec2(
        (rng.random::<f32>() - 0.5) * spread,
        (rng.random::<f32>() - 0.5) * spread,
    )
}
