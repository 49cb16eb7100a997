//! Steering behaviors.
//!
//! Every behavior follows the same recipe: work out a desired velocity, then
//! return `desired - velocity` clamped to `max_force`. Behaviors only read the
//! agent (wander also advances its angle) and never apply the force; the host
//! weights, sums and applies them before calling [`Agent::update`].

#[cfg(feature = "std")]
use rand::Rng;

use crate::agent::{Agent, Kinematic};
use crate::flow_field::FlowField;
use crate::flock::FlockConfig;
use crate::path::Path;
use crate::vector::Vector2;

/// Lower bound on neighbor distance before inverting it.
pub(crate) const SMALL_THRESHOLD: f32 = 0.0001;

/// A circular region agents steer around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vector2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(center: Vector2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: Vector2) -> bool {
        self.center.distance(&point) <= self.radius
    }
}

impl Agent {
    fn steer(&self, desired: Vector2) -> Vector2 {
        (desired - self.velocity).limit(self.max_force)
    }

    pub fn seek(&self, target: Vector2) -> Vector2 {
        self.steer((target - self.position).set_magnitude(self.max_speed))
    }

    /// Desired speed used by [`Agent::arrive`] at `distance` from the target:
    /// linear from 0 up to `max_speed` at the arrival radius.
    pub fn arrival_speed(&self, distance: f32) -> f32 {
        let radius = self.params.arrival_radius;
        if radius <= 0.0 || distance >= radius {
            self.max_speed
        } else {
            self.max_speed * distance.max(0.0) / radius
        }
    }

    pub fn arrive(&self, target: Vector2) -> Vector2 {
        let offset = target - self.position;
        let speed = self.arrival_speed(offset.magnitude());
        self.steer(offset.set_magnitude(speed))
    }

    pub fn flee(&self, target: Vector2) -> Vector2 {
        -self.seek(target)
    }

    /// Where `target` will be after `prediction_factor` ticks at its current
    /// velocity.
    pub fn predict<K: Kinematic + ?Sized>(&self, target: &K) -> Vector2 {
        target.position() + target.velocity() * self.params.prediction_factor
    }

    pub fn pursue<K: Kinematic + ?Sized>(&self, target: &K) -> Vector2 {
        self.seek(self.predict(target))
    }

    pub fn evade<K: Kinematic + ?Sized>(&self, target: &K) -> Vector2 {
        -self.pursue(target)
    }

    /// The point on the wander circle currently being sought.
    pub fn wander_target(&self) -> Vector2 {
        let center = self.position + self.velocity.normalize() * self.params.wander_distance;
        let angle = self.wander_theta + self.velocity.heading();
        center + Vector2::from_angle(angle) * self.params.wander_radius
    }

    /// Advances the wander angle by `jitter * wander_theta_change` and seeks
    /// the new wander target. `jitter` is clamped to `[-1, 1]`.
    pub fn wander_with_jitter(&mut self, jitter: f32) -> Vector2 {
        let jitter = if jitter.is_finite() {
            jitter.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.wander_theta += jitter * self.params.wander_theta_change;
        self.seek(self.wander_target())
    }

    #[cfg(feature = "std")]
    pub fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vector2 {
        self.wander_with_jitter(rng.gen_range(-1.0..=1.0))
    }

    /// Position `path_look_ahead` units ahead along the current velocity.
    pub fn predicted_position(&self) -> Vector2 {
        self.position + self.velocity.set_magnitude(self.params.path_look_ahead)
    }

    /// Steers back toward `path` when the predicted position has drifted
    /// further than the path radius; zero otherwise.
    pub fn follow_path(&self, path: &Path) -> Vector2 {
        match path.project(self.predicted_position(), self.params.path_target_offset) {
            Some(projection) if projection.distance > path.radius() => {
                self.seek(projection.target)
            }
            _ => Vector2::zero(),
        }
    }

    pub fn follow_flow(&self, field: &FlowField) -> Vector2 {
        self.steer(field.lookup(self.position).set_magnitude(self.max_speed))
    }

    /// Pushes back inside `width x height` once the agent is within
    /// `wall_offset` of an edge, keeping the velocity along the other axis.
    pub fn boundaries(&self, width: f32, height: f32) -> Vector2 {
        let offset = self.params.wall_offset;
        let mut desired = self.velocity;
        let mut outside = false;

        if self.position.x < offset {
            desired.x = self.max_speed;
            outside = true;
        } else if self.position.x > width - offset {
            desired.x = -self.max_speed;
            outside = true;
        }

        if self.position.y < offset {
            desired.y = self.max_speed;
            outside = true;
        } else if self.position.y > height - offset {
            desired.y = -self.max_speed;
            outside = true;
        }

        if outside {
            self.steer(desired.set_magnitude(self.max_speed))
        } else {
            Vector2::zero()
        }
    }

    /// Steers away from the nearest obstacle that the agent is inside of or
    /// about to enter.
    pub fn avoid_obstacles(&self, obstacles: &[Obstacle]) -> Vector2 {
        let ahead = self.position + self.velocity.set_magnitude(self.params.obstacle_look_ahead);
        let threat = obstacles
            .iter()
            .filter(|o| o.contains(ahead) || o.contains(self.position))
            .min_by(|a, b| {
                let da = a.center.distance(&self.position) - a.radius;
                let db = b.center.distance(&self.position) - b.radius;
                da.total_cmp(&db)
            });

        match threat {
            Some(obstacle) => self.steer((ahead - obstacle.center).set_magnitude(self.max_speed)),
            None => Vector2::zero(),
        }
    }

    /// Other agents in `roster` with their distance. `self` is skipped by
    /// identity, so it must be passed as an element of `roster` to be excluded.
    fn peers<'a>(&'a self, roster: &'a [Agent]) -> impl Iterator<Item = (&'a Agent, f32)> + 'a {
        roster
            .iter()
            .filter(move |other| !core::ptr::eq(*other, self))
            .map(move |other| (other, self.position.distance(&other.position)))
    }

    pub fn separate(&self, roster: &[Agent]) -> Vector2 {
        let radius = self.params.desired_separation;
        let mut sum = Vector2::zero();
        let mut count = 0;

        for (other, distance) in self.peers(roster).filter(|(_, d)| *d < radius) {
            let away = self.position - other.position;
            sum += away.set_magnitude(1.0 / distance.max(SMALL_THRESHOLD));
            count += 1;
        }

        if count == 0 {
            return Vector2::zero();
        }
        sum = sum / count as f32;
        if sum.magnitude() > 0.0 {
            self.steer(sum.set_magnitude(self.max_speed))
        } else {
            Vector2::zero()
        }
    }

    pub fn align(&self, roster: &[Agent]) -> Vector2 {
        let radius = self.params.vicinity;
        let mut sum = Vector2::zero();
        let mut count = 0;

        for (other, _) in self.peers(roster).filter(|(_, d)| *d <= radius) {
            sum += other.velocity;
            count += 1;
        }

        if count == 0 {
            Vector2::zero()
        } else {
            self.steer((sum / count as f32).set_magnitude(self.max_speed))
        }
    }

    pub fn cohere(&self, roster: &[Agent]) -> Vector2 {
        let radius = self.params.vicinity;
        let mut sum = Vector2::zero();
        let mut count = 0;

        for (other, _) in self.peers(roster).filter(|(_, d)| *d <= radius) {
            sum += other.position;
            count += 1;
        }

        if count == 0 {
            Vector2::zero()
        } else {
            self.seek(sum / count as f32)
        }
    }

    /// Weighted separation, alignment and cohesion against `roster`.
    pub fn flock(&self, roster: &[Agent], config: &FlockConfig) -> Vector2 {
        self.separate(roster) * config.separation_weight
            + self.align(roster) * config.alignment_weight
            + self.cohere(roster) * config.cohesion_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MovingTarget;

    const EPS: f32 = 0.0001;

    fn agent_at(x: f32, y: f32) -> Agent {
        Agent::new(Vector2::new(x, y), 8.0, 0.2)
    }

    #[test]
    fn test_seek_force_is_clamped() {
        let agent = agent_at(0.0, 0.0).with_velocity(Vector2::new(-3.0, 1.0));
        let force = agent.seek(Vector2::new(500.0, -40.0));
        assert!(force.magnitude() <= agent.max_force + EPS);
        assert!(force.x > 0.0);
    }

    #[test]
    fn test_seek_without_clamp_is_desired_minus_velocity() {
        let agent = Agent::new(Vector2::zero(), 4.0, 100.0).with_velocity(Vector2::new(1.0, 0.0));
        assert_eq!(agent.seek(Vector2::new(0.0, 10.0)), Vector2::new(-1.0, 4.0));
    }

    #[test]
    fn test_seek_own_position_does_not_produce_nan() {
        let agent = agent_at(5.0, 5.0).with_velocity(Vector2::new(0.1, 0.0));
        let force = agent.seek(Vector2::new(5.0, 5.0));
        assert!(force.is_finite());
        assert_eq!(force, Vector2::new(-0.1, 0.0));
    }

    #[test]
    fn test_arrival_speed_ramps_linearly() {
        let agent = agent_at(0.0, 0.0);
        assert_eq!(agent.arrival_speed(0.0), 0.0);
        assert_eq!(agent.arrival_speed(50.0), 4.0);
        assert_eq!(agent.arrival_speed(100.0), 8.0);
        assert_eq!(agent.arrival_speed(250.0), 8.0);

        let mut previous = 0.0;
        for step in 0..=120 {
            let speed = agent.arrival_speed(step as f32);
            assert!(speed >= previous);
            previous = speed;
        }
    }

    #[test]
    fn test_arrive_slows_inside_radius() {
        let agent = Agent::new(Vector2::zero(), 8.0, 100.0);
        let near = agent.arrive(Vector2::new(50.0, 0.0));
        assert!((near.x - 4.0).abs() < EPS);
        let far = agent.arrive(Vector2::new(500.0, 0.0));
        assert!((far.x - 8.0).abs() < EPS);
        assert_eq!(agent.arrive(Vector2::zero()), Vector2::zero());
    }

    #[test]
    fn test_flee_is_negated_seek() {
        let agent = agent_at(10.0, 10.0).with_velocity(Vector2::new(1.0, -2.0));
        let target = Vector2::new(40.0, -7.0);
        assert_eq!(agent.flee(target), agent.seek(target) * -1.0);
    }

    #[test]
    fn test_pursue_seeks_predicted_position() {
        let agent = agent_at(0.0, 0.0);
        let target = MovingTarget::new(Vector2::new(100.0, 0.0), Vector2::new(0.0, 2.0));
        assert_eq!(agent.predict(&target), Vector2::new(100.0, 30.0));
        assert_eq!(agent.pursue(&target), agent.seek(Vector2::new(100.0, 30.0)));
        assert_eq!(agent.evade(&target), agent.pursue(&target) * -1.0);
    }

    #[test]
    fn test_pursue_another_agent() {
        let hunter = agent_at(0.0, 0.0);
        let prey = agent_at(50.0, 50.0).with_velocity(Vector2::new(1.0, 0.0));
        assert_eq!(hunter.pursue(&prey), hunter.seek(Vector2::new(65.0, 50.0)));
    }

    #[test]
    fn test_wander_step_is_bounded() {
        let mut agent = agent_at(100.0, 100.0).with_velocity(Vector2::new(1.0, 0.0));
        let change = agent.params.wander_theta_change;
        for jitter in [1.0, -1.0, 0.3, 7.5, -42.0, f32::NAN] {
            let before = agent.wander_theta;
            let force = agent.wander_with_jitter(jitter);
            assert!((agent.wander_theta - before).abs() <= change + EPS);
            assert!(force.magnitude() <= agent.max_force + EPS);
        }
    }

    #[test]
    fn test_wander_target_sits_on_circle_ahead() {
        let agent = agent_at(0.0, 0.0).with_velocity(Vector2::new(2.0, 0.0));
        let target = agent.wander_target();
        // theta = 0: straight ahead on the far side of the circle
        assert!((target.x - 85.0).abs() < EPS);
        assert!(target.y.abs() < EPS);
    }

    #[test]
    fn test_follow_path_inside_radius_is_zero() {
        let mut path = Path::new(16.0);
        path.add_point(0.0, 100.0).add_point(400.0, 100.0);
        let agent = agent_at(50.0, 105.0).with_velocity(Vector2::new(3.0, 0.0));
        assert_eq!(agent.follow_path(&path), Vector2::zero());
    }

    #[test]
    fn test_follow_path_steers_back() {
        let mut path = Path::new(16.0);
        path.add_point(0.0, 100.0).add_point(400.0, 100.0);
        let agent = agent_at(50.0, 160.0).with_velocity(Vector2::new(3.0, 0.0));
        let force = agent.follow_path(&path);
        assert!(force.y < 0.0);
        assert!(force.magnitude() <= agent.max_force + EPS);
    }

    #[test]
    fn test_separation_pushes_apart() {
        let mut params = crate::agent::SteeringParams::default();
        params.desired_separation = 40.0;
        let roster = [
            agent_at(0.0, 0.0).with_params(params),
            agent_at(10.0, 0.0).with_params(params),
        ];

        let a = roster[0].separate(&roster);
        let b = roster[1].separate(&roster);
        assert!(a.x < 0.0 && a.y.abs() < EPS);
        assert!(b.x > 0.0 && b.y.abs() < EPS);
    }

    #[test]
    fn test_separation_without_neighbors_is_zero() {
        let roster = [agent_at(0.0, 0.0), agent_at(500.0, 0.0)];
        assert_eq!(roster[0].separate(&roster), Vector2::zero());
        assert_eq!(roster[0].separate(&roster[..1]), Vector2::zero());
    }

    #[test]
    fn test_self_excluded_by_identity_not_distance() {
        // A copy of the agent at the same spot is a neighbor; the agent itself is not.
        let agent = agent_at(0.0, 0.0).with_velocity(Vector2::new(1.0, 0.0));
        let roster = [agent.clone(), agent.clone()];
        let force = roster[0].align(&roster);
        assert!(force.is_finite());
        assert!(force.x > 0.0);

        let alone = [agent];
        assert_eq!(alone[0].align(&alone), Vector2::zero());
        assert_eq!(alone[0].cohere(&alone), Vector2::zero());
    }

    #[test]
    fn test_coincident_neighbors_stay_finite() {
        let roster = [agent_at(3.0, 3.0), agent_at(3.0, 3.0)];
        assert!(roster[0].separate(&roster).is_finite());
    }

    #[test]
    fn test_align_matches_neighbor_heading() {
        let roster = [
            agent_at(0.0, 0.0),
            agent_at(10.0, 0.0).with_velocity(Vector2::new(0.0, 2.0)),
        ];
        let force = roster[0].align(&roster);
        assert!(force.y > 0.0);
        assert!(force.x.abs() < EPS);
    }

    #[test]
    fn test_cohere_seeks_centroid() {
        let roster = [agent_at(0.0, 0.0), agent_at(20.0, 0.0), agent_at(20.0, 20.0)];
        assert_eq!(roster[0].cohere(&roster), roster[0].seek(Vector2::new(20.0, 10.0)));
    }

    #[test]
    fn test_boundaries() {
        let agent = agent_at(300.0, 150.0).with_velocity(Vector2::new(1.0, 0.0));
        assert_eq!(agent.boundaries(600.0, 300.0), Vector2::zero());

        let near_left = agent_at(10.0, 150.0).with_velocity(Vector2::new(-1.0, 0.0));
        assert!(near_left.boundaries(600.0, 300.0).x > 0.0);
    }

    #[test]
    fn test_follow_flow() {
        let field = FlowField::uniform(100.0, 100.0, 10.0, Vector2::new(0.0, 7.0)).unwrap();
        let agent = Agent::new(Vector2::new(50.0, 50.0), 3.0, 10.0);
        assert_eq!(agent.follow_flow(&field), Vector2::new(0.0, 3.0));
    }

    #[test]
    fn test_avoid_obstacles() {
        let agent = Agent::new(Vector2::new(0.0, 0.0), 3.0, 10.0).with_velocity(Vector2::new(3.0, 0.0));
        let blocking = [Obstacle::new(Vector2::new(30.0, 5.0), 10.0)];
        let force = agent.avoid_obstacles(&blocking);
        assert!(force.y < 0.0);

        let clear = [Obstacle::new(Vector2::new(0.0, 200.0), 10.0)];
        assert_eq!(agent.avoid_obstacles(&clear), Vector2::zero());
    }

    #[test]
    fn test_flock_weights_components() {
        let roster = [agent_at(0.0, 0.0), agent_at(10.0, 0.0)];
        let config = FlockConfig {
            separation_weight: 2.0,
            alignment_weight: 0.0,
            cohesion_weight: 0.0,
            ..FlockConfig::default()
        };
        assert_eq!(roster[0].flock(&roster, &config), roster[0].separate(&roster) * 2.0);
    }
}
