#[cfg(feature = "std")]
use rand::Rng;

use crate::vector::Vector2;

/// Anything with a position and a velocity that an agent can pursue or evade.
pub trait Kinematic {
    fn position(&self) -> Vector2;
    fn velocity(&self) -> Vector2;
}

/// A moving point that is not itself steered, e.g. a cursor or a prey marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingTarget {
    pub position: Vector2,
    pub velocity: Vector2,
}

impl MovingTarget {
    pub fn new(position: Vector2, velocity: Vector2) -> Self {
        Self { position, velocity }
    }
}

impl Kinematic for MovingTarget {
    fn position(&self) -> Vector2 {
        self.position
    }

    fn velocity(&self) -> Vector2 {
        self.velocity
    }
}

/// Tunables read by the steering behaviors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    /// Distance at which `arrive` starts to slow down.
    pub arrival_radius: f32,
    /// Ticks a pursued target's velocity is extrapolated forward.
    pub prediction_factor: f32,
    pub wander_radius: f32,
    /// Distance of the wander circle ahead of the agent.
    pub wander_distance: f32,
    /// Largest change of the wander angle per tick, in radians.
    pub wander_theta_change: f32,
    pub desired_separation: f32,
    /// Neighbor radius for alignment and cohesion.
    pub vicinity: f32,
    pub path_look_ahead: f32,
    /// How far past the nearest path point the agent aims.
    pub path_target_offset: f32,
    /// Margin kept from the world edges by `boundaries`.
    pub wall_offset: f32,
    pub obstacle_look_ahead: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            arrival_radius: 100.0,
            prediction_factor: 15.0,
            wander_radius: 25.0,
            wander_distance: 60.0,
            wander_theta_change: 0.2,
            desired_separation: 24.0,
            vicinity: 80.0,
            path_look_ahead: 25.0,
            path_target_offset: 10.0,
            wall_offset: 50.0,
            obstacle_look_ahead: 25.0,
        }
    }
}

/// A single steered entity.
///
/// `acceleration` accumulates the forces applied during one tick and is reset
/// by [`Agent::update`].
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    pub max_speed: f32,
    pub max_force: f32,
    /// When set, forces are divided by the mass before accumulating.
    pub mass: Option<f32>,
    pub params: SteeringParams,
    /// Wander angle relative to the current heading.
    pub wander_theta: f32,
}

impl Agent {
    pub fn new(position: Vector2, max_speed: f32, max_force: f32) -> Self {
        Self {
            position,
            velocity: Vector2::zero(),
            acceleration: Vector2::zero(),
            max_speed,
            max_force,
            mass: None,
            params: SteeringParams::default(),
            wander_theta: 0.0,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vector2) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_params(mut self, params: SteeringParams) -> Self {
        self.params = params;
        self
    }

    /// Agent at a uniformly random position inside `width x height` with a
    /// random velocity of at most `max_speed` per axis. A non-positive or
    /// non-finite extent or speed collapses that range to zero.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(
        width: f32,
        height: f32,
        max_speed: f32,
        max_force: f32,
        rng: &mut R,
    ) -> Self {
        let position = Vector2::new(sample_below(rng, width), sample_below(rng, height));
        let speed = if max_speed.is_finite() {
            crate::math::abs(max_speed)
        } else {
            0.0
        };
        let velocity = Vector2::new(
            rng.gen_range(-speed..=speed),
            rng.gen_range(-speed..=speed),
        );
        Self::new(position, max_speed, max_force).with_velocity(velocity)
    }

    pub fn apply_force(&mut self, force: Vector2) {
        if !force.is_finite() {
            log::warn!("dropping non-finite force ({}, {})", force.x, force.y);
            return;
        }
        match self.mass {
            Some(mass) if mass > 0.0 && mass.is_finite() => self.acceleration += force / mass,
            _ => self.acceleration += force,
        }
    }

    pub fn update(&mut self) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(self.max_speed);
        self.position += self.velocity;
        self.acceleration = Vector2::zero();
    }

    /// Teleports to the opposite edge once the agent is `margin` past it.
    pub fn wrap_edges(&mut self, width: f32, height: f32, margin: f32) {
        if self.position.x < -margin {
            self.position.x = width + margin;
        } else if self.position.x > width + margin {
            self.position.x = -margin;
        }

        if self.position.y < -margin {
            self.position.y = height + margin;
        } else if self.position.y > height + margin {
            self.position.y = -margin;
        }
    }

    pub fn contain_within_bounds(&mut self, width: f32, height: f32, margin: f32) {
        // Bounce off edges by reversing velocity component
        if self.position.x < margin {
            self.position.x = margin;
            self.velocity.x = crate::math::abs(self.velocity.x);
        } else if self.position.x > width - margin {
            self.position.x = width - margin;
            self.velocity.x = -crate::math::abs(self.velocity.x);
        }

        if self.position.y < margin {
            self.position.y = margin;
            self.velocity.y = crate::math::abs(self.velocity.y);
        } else if self.position.y > height - margin {
            self.position.y = height - margin;
            self.velocity.y = -crate::math::abs(self.velocity.y);
        }
    }
}

#[cfg(feature = "std")]
fn sample_below<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    if extent.is_finite() && extent > 0.0 {
        rng.gen_range(0.0..extent)
    } else {
        0.0
    }
}

impl Kinematic for Agent {
    fn position(&self) -> Vector2 {
        self.position
    }

    fn velocity(&self) -> Vector2 {
        self.velocity
    }
}

/// What happens to an agent that leaves the world after integrating.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Edges {
    #[default]
    Open,
    Wrap {
        width: f32,
        height: f32,
        margin: f32,
    },
    Bounce {
        width: f32,
        height: f32,
        margin: f32,
    },
}

impl Edges {
    pub fn apply(&self, agent: &mut Agent) {
        match *self {
            Edges::Open => {}
            Edges::Wrap {
                width,
                height,
                margin,
            } => agent.wrap_edges(width, height, margin),
            Edges::Bounce {
                width,
                height,
                margin,
            } => agent.contain_within_bounds(width, height, margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_creation() {
        let agent = Agent::new(Vector2::new(10.0, 20.0), 4.0, 0.1)
            .with_velocity(Vector2::new(1.0, 1.0));

        assert_eq!(agent.position, Vector2::new(10.0, 20.0));
        assert_eq!(agent.velocity, Vector2::new(1.0, 1.0));
        assert_eq!(agent.acceleration, Vector2::zero());
        assert_eq!(agent.mass, None);
    }

    #[test]
    fn test_update_integrates_and_resets() {
        let mut agent = Agent::new(Vector2::zero(), 5.0, 1.0);
        agent.apply_force(Vector2::new(10.0, 0.0));
        agent.update();

        assert_eq!(agent.velocity.x, 5.0);
        assert_eq!(agent.position.x, 5.0);
        assert_eq!(agent.acceleration, Vector2::zero());
    }

    #[test]
    fn test_forces_sum_in_any_order() {
        let forces = [
            Vector2::new(0.5, -0.25),
            Vector2::new(-0.125, 1.0),
            Vector2::new(2.0, 0.75),
        ];
        let mut forward = Agent::new(Vector2::zero(), 10.0, 1.0);
        let mut backward = forward.clone();
        for f in forces {
            forward.apply_force(f);
        }
        for f in forces.iter().rev() {
            backward.apply_force(*f);
        }
        forward.update();
        backward.update();
        assert_eq!(forward.position, backward.position);
    }

    #[test]
    fn test_mass_divides_force() {
        let mut agent = Agent::new(Vector2::zero(), 10.0, 1.0).with_mass(4.0);
        agent.apply_force(Vector2::new(2.0, 0.0));
        assert_eq!(agent.acceleration, Vector2::new(0.5, 0.0));
    }

    #[test]
    fn test_non_finite_force_is_dropped() {
        let mut agent = Agent::new(Vector2::zero(), 10.0, 1.0);
        agent.apply_force(Vector2::new(f32::NAN, 1.0));
        agent.apply_force(Vector2::new(f32::INFINITY, 0.0));
        agent.update();
        assert!(agent.position.is_finite());
        assert_eq!(agent.position, Vector2::zero());
    }

    #[test]
    fn test_wrap_edges() {
        let mut agent = Agent::new(Vector2::new(-6.0, 306.0), 3.0, 0.1);
        agent.wrap_edges(600.0, 300.0, 5.0);
        assert_eq!(agent.position, Vector2::new(605.0, -5.0));
    }

    #[test]
    fn test_bounce_reverses_velocity() {
        let mut agent =
            Agent::new(Vector2::new(2.0, 50.0), 3.0, 0.1).with_velocity(Vector2::new(-1.0, 0.5));
        Edges::Bounce {
            width: 100.0,
            height: 100.0,
            margin: 10.0,
        }
        .apply(&mut agent);
        assert_eq!(agent.position.x, 10.0);
        assert_eq!(agent.velocity.x, 1.0);
        assert_eq!(agent.velocity.y, 0.5);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_random_agent_inside_world() {
        use rand::{rngs::StdRng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let agent = Agent::random(200.0, 100.0, 2.0, 0.1, &mut rng);
            assert!(agent.position.x >= 0.0 && agent.position.x < 200.0);
            assert!(agent.position.y >= 0.0 && agent.position.y < 100.0);
            assert!(agent.velocity.x.abs() <= 2.0);
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_random_agent_tolerates_bad_ranges() {
        use rand::{rngs::StdRng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(8);

        let agent = Agent::random(100.0, 100.0, -2.0, 0.1, &mut rng);
        assert!(agent.velocity.x.abs() <= 2.0 && agent.velocity.y.abs() <= 2.0);

        let agent = Agent::random(0.0, f32::NAN, f32::NAN, 0.1, &mut rng);
        assert_eq!(agent.position, Vector2::zero());
        assert_eq!(agent.velocity, Vector2::zero());
    }
}
