use eframe::egui::Vec2;

use super::Viewport;
use super::body::Body;
use super::params::PhysicsParams;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Contact {
    Apart,
    /// Centres coincide; no normal exists, so the pair is left for a later frame.
    Coincident,
    Separating,
    Resolved { impact_speed: f32 },
}

/// Advances every body by one frame. Bodies are visited in collection order;
/// each one is integrated, limited, decayed and bounced off the walls before
/// it is tested against every body after it.
pub(super) fn step_bodies(
    bodies: &mut [Body],
    viewport: Viewport,
    captured: Option<usize>,
    params: &PhysicsParams,
) {
    let count = bodies.len();

    for index in 0..count {
        let is_captured = captured == Some(index);
        advance_body(&mut bodies[index], is_captured, viewport, params);

        for other in (index + 1)..count {
            let (head, tail) = bodies.split_at_mut(other);
            resolve_pair(
                &mut head[index],
                &mut tail[0],
                is_captured,
                captured == Some(other),
                params,
            );
        }
    }

    // Impulses from later pairs can push an already visited body past the limit.
    for (index, body) in bodies.iter_mut().enumerate() {
        if captured != Some(index) {
            body.velocity = params.limit_velocity(body.velocity);
        }
    }
}

fn advance_body(body: &mut Body, is_captured: bool, viewport: Viewport, params: &PhysicsParams) {
    if is_captured {
        body.velocity = Vec2::ZERO;
    } else {
        body.position += body.velocity;
        body.velocity = params.limit_velocity(body.velocity);
    }

    if body.pulse > 0.0 {
        body.pulse = (body.pulse - params.pulse_decay).max(0.0);
    }

    bounce_off_walls(body, viewport, params);
}

fn bounce_off_walls(body: &mut Body, viewport: Viewport, params: &PhysicsParams) {
    let radius = body.radius();
    let threshold = params.wall_impact_threshold;

    if body.position.x - radius < 0.0 {
        body.position.x = radius;
        if body.velocity.x.abs() > threshold {
            body.pulse = 1.0;
        }
        body.velocity.x = -body.velocity.x;
    }
    if body.position.x + radius > viewport.width {
        body.position.x = viewport.width - radius;
        if body.velocity.x.abs() > threshold {
            body.pulse = 1.0;
        }
        body.velocity.x = -body.velocity.x;
    }
    if body.position.y - radius < 0.0 {
        body.position.y = radius;
        if body.velocity.y.abs() > threshold {
            body.pulse = 1.0;
        }
        body.velocity.y = -body.velocity.y;
    }
    if body.position.y + radius > viewport.height {
        body.position.y = viewport.height - radius;
        if body.velocity.y.abs() > threshold {
            body.pulse = 1.0;
        }
        body.velocity.y = -body.velocity.y;
    }
}

/// Overlap correction followed by an impulse exchange along the contact
/// normal (from `a` towards `b`). Captured bodies are neither pushed nor
/// accelerated.
pub(super) fn resolve_pair(
    a: &mut Body,
    b: &mut Body,
    a_captured: bool,
    b_captured: bool,
    params: &PhysicsParams,
) -> Contact {
    let delta = b.position - a.position;
    let distance_sq = delta.length_sq();
    let min_distance = a.radius() + b.radius();

    if distance_sq >= min_distance * min_distance {
        return Contact::Apart;
    }
    if distance_sq <= 0.0 {
        return Contact::Coincident;
    }

    let distance = distance_sq.sqrt();
    let normal = delta / distance;

    let separation = normal * ((min_distance - distance + params.collision_slack) * 0.5);
    if !a_captured {
        a.position -= separation;
    }
    if !b_captured {
        b.position += separation;
    }

    let vel_along_normal = (b.velocity - a.velocity).dot(normal);
    if vel_along_normal > 0.0 {
        return Contact::Separating;
    }

    let impact_speed = vel_along_normal.abs();
    if impact_speed > params.body_impact_threshold {
        let intensity = (impact_speed * params.impact_pulse_scale).min(1.0);
        a.pulse = a.pulse.max(intensity);
        b.pulse = b.pulse.max(intensity);
    }

    let impulse = -(1.0 + params.restitution) * vel_along_normal
        / (1.0 / a.mass() + 1.0 / b.mass());
    let impulse = normal * impulse;

    if !a_captured {
        a.velocity -= impulse / a.mass();
    }
    if !b_captured {
        b.velocity += impulse / b.mass();
    }

    Contact::Resolved { impact_speed }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eframe::egui::vec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::market::InstrumentRecord;

    const EPS: f32 = 1e-3;

    fn body(id: &str, position: Vec2, velocity: Vec2, radius: f32) -> Body {
        let record = Arc::new(InstrumentRecord::new(id, id, 10.0, 0.0));
        Body::with_radius(record, position, velocity, radius)
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn free_body_integrates_then_clamps() {
        let mut bodies = [body("A", vec2(400.0, 300.0), vec2(10.0, -7.0), 20.0)];
        step_bodies(&mut bodies, viewport(), None, &PhysicsParams::default());

        assert!((bodies[0].position - vec2(410.0, 293.0)).length() < EPS);
        assert_eq!(bodies[0].velocity, vec2(4.0, -4.0));
    }

    #[test]
    fn captured_body_is_frozen() {
        let mut bodies = [
            body("A", vec2(300.0, 300.0), vec2(3.0, 1.0), 30.0),
            body("B", vec2(340.0, 300.0), vec2(-3.0, 0.0), 30.0),
        ];
        step_bodies(&mut bodies, viewport(), Some(0), &PhysicsParams::default());

        assert_eq!(bodies[0].velocity, Vec2::ZERO);
        assert_eq!(bodies[0].position, vec2(300.0, 300.0));
        assert!(bodies[1].position.x > 340.0);
    }

    #[test]
    fn left_wall_repositions_flips_and_pulses() {
        let mut bodies = [body("A", vec2(5.0, 300.0), vec2(-3.0, 0.0), 20.0)];
        step_bodies(&mut bodies, viewport(), None, &PhysicsParams::default());

        assert!((bodies[0].position.x - bodies[0].radius()).abs() < EPS);
        assert_eq!(bodies[0].velocity.x, 3.0);
        assert_eq!(bodies[0].pulse, 1.0);
    }

    #[test]
    fn gentle_wall_touch_flips_without_pulse() {
        let mut bodies = [body("A", vec2(781.0, 300.0), vec2(1.5, 0.0), 20.0)];
        step_bodies(&mut bodies, viewport(), None, &PhysicsParams::default());

        assert!((bodies[0].position.x + bodies[0].radius() - 800.0).abs() < EPS);
        assert_eq!(bodies[0].velocity.x, -1.5);
        assert_eq!(bodies[0].pulse, 0.0);
    }

    #[test]
    fn floor_and_ceiling_bounce() {
        let mut bodies = [
            body("A", vec2(100.0, 598.0), vec2(0.0, 2.5), 10.0),
            body("B", vec2(500.0, 2.0), vec2(0.0, -1.0), 10.0),
        ];
        step_bodies(&mut bodies, viewport(), None, &PhysicsParams::default());

        assert!((bodies[0].position.y - 590.0).abs() < EPS);
        assert_eq!(bodies[0].velocity.y, -2.5);
        assert_eq!(bodies[0].pulse, 1.0);
        assert!((bodies[1].position.y - 10.0).abs() < EPS);
        assert_eq!(bodies[1].velocity.y, 1.0);
    }

    #[test]
    fn pulse_decays_and_floors_at_zero() {
        let mut bodies = [
            body("A", vec2(200.0, 200.0), Vec2::ZERO, 20.0),
            body("B", vec2(600.0, 400.0), Vec2::ZERO, 20.0),
        ];
        bodies[0].pulse = 0.5;
        bodies[1].pulse = 0.03;
        step_bodies(&mut bodies, viewport(), None, &PhysicsParams::default());

        assert!((bodies[0].pulse - 0.45).abs() < 1e-6);
        assert_eq!(bodies[1].pulse, 0.0);
    }

    #[test]
    fn equal_masses_swap_velocities_head_on() {
        let params = PhysicsParams::default();
        let mut a = body("A", vec2(200.0, 300.0), vec2(2.0, 0.0), 40.0);
        let mut b = body("B", vec2(279.0, 300.0), vec2(-2.0, 0.0), 40.0);

        let contact = resolve_pair(&mut a, &mut b, false, false, &params);

        assert_eq!(contact, Contact::Resolved { impact_speed: 4.0 });
        assert!((a.velocity - vec2(-2.0, 0.0)).length() < EPS);
        assert!((b.velocity - vec2(2.0, 0.0)).length() < EPS);
        assert!((a.pulse - 0.6).abs() < 1e-5);
        assert!((b.pulse - 0.6).abs() < 1e-5);
    }

    #[test]
    fn hard_impact_saturates_pulse() {
        let params = PhysicsParams::default();
        let mut a = body("A", vec2(200.0, 300.0), vec2(4.0, 0.0), 40.0);
        let mut b = body("B", vec2(279.0, 300.0), vec2(-4.0, 0.0), 40.0);

        let contact = resolve_pair(&mut a, &mut b, false, false, &params);

        assert_eq!(contact, Contact::Resolved { impact_speed: 8.0 });
        assert_eq!(a.pulse, 1.0);
        assert_eq!(b.pulse, 1.0);
    }

    #[test]
    fn gentle_impact_does_not_pulse() {
        let params = PhysicsParams::default();
        let mut a = body("A", vec2(200.0, 300.0), vec2(0.4, 0.0), 40.0);
        let mut b = body("B", vec2(279.0, 300.0), vec2(-0.4, 0.0), 40.0);

        let contact = resolve_pair(&mut a, &mut b, false, false, &params);

        assert!(matches!(contact, Contact::Resolved { impact_speed } if (impact_speed - 0.8).abs() < 1e-5));
        assert_eq!(a.pulse, 0.0);
        assert_eq!(b.pulse, 0.0);
        assert!((a.velocity - vec2(-0.4, 0.0)).length() < EPS);
    }

    #[test]
    fn head_on_collision_inside_a_step() {
        let mut bodies = [
            body("A", vec2(200.0, 300.0), vec2(2.0, 0.0), 40.0),
            body("B", vec2(279.5, 300.0), vec2(-2.0, 0.0), 40.0),
        ];
        step_bodies(&mut bodies, viewport(), None, &PhysicsParams::default());

        assert!((bodies[0].velocity - vec2(-2.0, 0.0)).length() < EPS);
        assert!((bodies[1].velocity - vec2(2.0, 0.0)).length() < EPS);
        assert!(bodies[0].pulse > 0.0 && bodies[1].pulse > 0.0);
    }

    #[test]
    fn momentum_is_conserved_for_unequal_masses() {
        let params = PhysicsParams::default();
        let mut a = body("A", vec2(100.0, 100.0), vec2(1.5, 0.7), 35.0);
        let mut b = body("B", vec2(150.0, 130.0), vec2(-2.5, -1.2), 60.0);

        let before = a.velocity * a.mass() + b.velocity * b.mass();
        let contact = resolve_pair(&mut a, &mut b, false, false, &params);
        let after = a.velocity * a.mass() + b.velocity * b.mass();

        assert!(matches!(contact, Contact::Resolved { .. }));
        assert!((before - after).length() < 1e-2, "{before:?} vs {after:?}");
    }

    #[test]
    fn resting_overlap_separates_without_impulse() {
        let mut bodies = [
            body("A", vec2(300.0, 300.0), Vec2::ZERO, 30.0),
            body("B", vec2(350.0, 300.0), Vec2::ZERO, 30.0),
        ];
        step_bodies(&mut bodies, viewport(), None, &PhysicsParams::default());

        assert!((bodies[0].position.x - 294.9995).abs() < EPS);
        assert!((bodies[1].position.x - 355.0005).abs() < EPS);
        assert_eq!(bodies[0].velocity, Vec2::ZERO);
        assert_eq!(bodies[1].velocity, Vec2::ZERO);
        assert_eq!(bodies[0].pulse, 0.0);
    }

    #[test]
    fn separating_overlap_keeps_velocities() {
        let params = PhysicsParams::default();
        let mut a = body("A", vec2(300.0, 300.0), vec2(-1.0, 0.0), 30.0);
        let mut b = body("B", vec2(350.0, 300.0), vec2(1.0, 0.0), 30.0);

        let contact = resolve_pair(&mut a, &mut b, false, false, &params);

        assert_eq!(contact, Contact::Separating);
        assert_eq!(a.velocity, vec2(-1.0, 0.0));
        assert_eq!(b.velocity, vec2(1.0, 0.0));
        assert!(b.position.x - a.position.x > 50.0);
    }

    #[test]
    fn coincident_centres_are_skipped() {
        let params = PhysicsParams::default();
        let mut a = body("A", vec2(300.0, 300.0), vec2(1.0, 0.0), 30.0);
        let mut b = body("B", vec2(300.0, 300.0), vec2(-1.0, 0.0), 30.0);

        let contact = resolve_pair(&mut a, &mut b, false, false, &params);

        assert_eq!(contact, Contact::Coincident);
        assert_eq!(a.position, vec2(300.0, 300.0));
        assert_eq!(b.velocity, vec2(-1.0, 0.0));
    }

    #[test]
    fn captured_body_is_not_pushed_by_contact() {
        let params = PhysicsParams::default();
        let mut a = body("A", vec2(300.0, 300.0), Vec2::ZERO, 30.0);
        let mut b = body("B", vec2(340.0, 300.0), vec2(-3.0, 0.0), 30.0);

        resolve_pair(&mut a, &mut b, true, false, &params);

        assert_eq!(a.position, vec2(300.0, 300.0));
        assert_eq!(a.velocity, Vec2::ZERO);
        assert!(b.position.x > 340.0);
        assert!(b.velocity.x.abs() < EPS);
    }

    #[test]
    fn long_run_keeps_invariants() {
        let params = PhysicsParams::default();
        let viewport = viewport();
        let mut rng = StdRng::seed_from_u64(11);
        let mut bodies = (0..30)
            .map(|index| {
                let radius = rng.random_range(30.0..70.0);
                let position = vec2(
                    rng.random_range(radius..viewport.width - radius),
                    rng.random_range(radius..viewport.height - radius),
                );
                let velocity = vec2(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0));
                body(&format!("T{index}"), position, velocity, radius)
            })
            .collect::<Vec<_>>();
        let radii = bodies.iter().map(Body::radius).collect::<Vec<_>>();

        for frame in 0..600 {
            let captured = (frame % 200 < 50).then_some(3);
            step_bodies(&mut bodies, viewport, captured, &params);

            for (index, body) in bodies.iter().enumerate() {
                assert_eq!(body.radius(), radii[index]);
                assert_eq!(body.mass(), body.radius());
                assert!((0.0..=1.0).contains(&body.pulse));
                assert!(body.position.x.is_finite() && body.position.y.is_finite());
                if captured == Some(index) {
                    assert_eq!(body.velocity, Vec2::ZERO);
                } else {
                    assert!(body.velocity.x.abs() <= 4.0 && body.velocity.y.abs() <= 4.0);
                }
            }
        }
    }
}
