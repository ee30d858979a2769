use eframe::egui::{Vec2, vec2};

/// Presentation-tuned constants of the bubble physics. Units are pixels and
/// frames; none of these are physical quantities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsParams {
    pub radius_base: f32,
    pub radius_log_scale: f32,
    pub spawn_speed: f32,
    pub velocity_limit: f32,
    pub collision_slack: f32,
    pub restitution: f32,
    pub pulse_decay: f32,
    pub wall_impact_threshold: f32,
    pub body_impact_threshold: f32,
    pub impact_pulse_scale: f32,
    pub release_multiplier: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            radius_base: 30.0,
            radius_log_scale: 8.0,
            spawn_speed: 4.0,
            velocity_limit: 4.0,
            collision_slack: 0.001,
            restitution: 1.0,
            pulse_decay: 0.05,
            wall_impact_threshold: 2.0,
            body_impact_threshold: 1.0,
            impact_pulse_scale: 0.15,
            release_multiplier: 40.0,
        }
    }
}

impl PhysicsParams {
    pub(super) fn limit_velocity(&self, velocity: Vec2) -> Vec2 {
        let limit = self.velocity_limit;
        vec2(velocity.x.clamp(-limit, limit), velocity.y.clamp(-limit, limit))
    }
}
