use std::path::Path as FsPath;

use anyhow::{ensure, Context, Result};
use vehicle_core::{Edges, FlockConfig, Path, Rectangle, SteeringParams, Vector2};
use vehicle_shared::{
    EdgeSettings, FlockSettings, PathSettings, Position, Scenario, SteeringSettings,
};

/// Reads and validates a JSON scenario file.
pub fn load(path: &FsPath) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    let scenario = Scenario::from_json(&json)
        .with_context(|| format!("Failed to parse scenario {}", path.display()))?;
    validate(&scenario).with_context(|| format!("Invalid scenario {}", path.display()))?;
    Ok(scenario)
}

/// Rejects settings that the core cannot run with.
pub fn validate(scenario: &Scenario) -> Result<()> {
    world(scenario)?;
    let steering = &scenario.steering;
    ensure!(
        steering.max_speed.is_finite() && steering.max_speed > 0.0,
        "Invalid max_speed {}: must be finite and positive",
        steering.max_speed
    );
    ensure!(
        steering.max_force.is_finite() && steering.max_force >= 0.0,
        "Invalid max_force {}: must be finite and not negative",
        steering.max_force
    );
    if let Some(mass) = steering.mass {
        ensure!(
            mass.is_finite() && mass > 0.0,
            "Invalid mass {}: must be finite and positive",
            mass
        );
    }
    Ok(())
}

/// The world rectangle, anchored at the origin.
pub fn world(scenario: &Scenario) -> Result<Rectangle> {
    let (hw, hh) = (scenario.width / 2.0, scenario.height / 2.0);
    Rectangle::new(hw, hh, hw, hh)
        .with_context(|| format!("Invalid world size {} x {}", scenario.width, scenario.height))
}

pub fn to_vector(position: Position) -> Vector2 {
    Vector2::new(position.x, position.y)
}

pub fn steering_params(settings: &SteeringSettings) -> SteeringParams {
    SteeringParams {
        arrival_radius: settings.arrival_radius,
        prediction_factor: settings.prediction_factor,
        wander_radius: settings.wander_radius,
        wander_distance: settings.wander_distance,
        wander_theta_change: settings.wander_theta_change,
        desired_separation: settings.desired_separation,
        vicinity: settings.vicinity,
        path_look_ahead: settings.path_look_ahead,
        path_target_offset: settings.path_target_offset,
        wall_offset: settings.wall_offset,
        obstacle_look_ahead: settings.obstacle_look_ahead,
    }
}

pub fn flock_config(settings: &FlockSettings) -> FlockConfig {
    FlockConfig {
        separation_weight: settings.separation_weight,
        alignment_weight: settings.alignment_weight,
        cohesion_weight: settings.cohesion_weight,
        seek_weight: settings.seek_weight,
    }
}

pub fn edges(scenario: &Scenario) -> Edges {
    let (width, height) = (scenario.width, scenario.height);
    match scenario.edges {
        EdgeSettings::Open => Edges::Open,
        EdgeSettings::Wrap { margin } => Edges::Wrap {
            width,
            height,
            margin,
        },
        EdgeSettings::Bounce { margin } => Edges::Bounce {
            width,
            height,
            margin,
        },
    }
}

pub fn build_path(settings: &PathSettings) -> Path {
    let mut path = Path::new(settings.radius);
    if settings.closed {
        path = path.closed();
    }
    for waypoint in &settings.waypoints {
        match &waypoint.label {
            Some(label) => path.add_labeled_point(waypoint.x, waypoint.y, label.as_str()),
            None => path.add_point(waypoint.x, waypoint.y),
        };
    }
    path
}
