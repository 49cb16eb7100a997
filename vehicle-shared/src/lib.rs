#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// A 2D position in world coordinates (y grows downward)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Per-agent limits and behavior tunables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SteeringSettings {
    pub max_speed: f32,
    pub max_force: f32,
    /// Divide applied forces by this mass when set
    pub mass: Option<f32>,
    pub arrival_radius: f32,
    pub prediction_factor: f32,
    pub wander_radius: f32,
    pub wander_distance: f32,
    pub wander_theta_change: f32,
    pub desired_separation: f32,
    pub vicinity: f32,
    pub path_look_ahead: f32,
    pub path_target_offset: f32,
    pub wall_offset: f32,
    pub obstacle_look_ahead: f32,
}

impl Default for SteeringSettings {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            max_force: 0.2,
            mass: None,
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

/// Weights used when combining behaviors into one force
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub seek_weight: f32,
    pub path_weight: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            seek_weight: 1.0,
            path_weight: 1.0,
        }
    }
}

/// What happens at the edges of the world
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EdgeSettings {
    Open,
    Wrap {
        #[serde(default)]
        margin: f32,
    },
    Bounce {
        #[serde(default)]
        margin: f32,
    },
}

impl Default for EdgeSettings {
    fn default() -> Self {
        EdgeSettings::Wrap { margin: 0.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaypointSettings {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathSettings {
    pub radius: f32,
    pub closed: bool,
    pub waypoints: Vec<WaypointSettings>,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            radius: 16.0,
            closed: false,
            waypoints: Vec::new(),
        }
    }
}

/// Everything a host needs to set up and run a simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scenario {
    pub width: f32,
    pub height: f32,
    pub agent_count: usize,
    pub seed: u64,
    pub ticks: u32,
    pub steering: SteeringSettings,
    pub flock: FlockSettings,
    pub edges: EdgeSettings,
    /// Seek (arriving) toward this point when set
    pub target: Option<Position>,
    /// Follow this path when set
    pub path: Option<PathSettings>,
    pub quadtree_capacity: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 360.0,
            agent_count: 40,
            seed: 0,
            ticks: 300,
            steering: SteeringSettings::default(),
            flock: FlockSettings::default(),
            edges: EdgeSettings::default(),
            target: None,
            path: None,
            quadtree_capacity: 4,
        }
    }
}

#[cfg(feature = "std")]
impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// State of one agent at the end of a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub position: Position,
    /// Radians from the positive x-axis
    pub heading: f32,
    pub speed: f32,
}

/// Summary produced after running a scenario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub ticks: u32,
    pub seed: u64,
    pub centroid: Position,
    pub mean_speed: f32,
    pub quadtree_nodes: usize,
    pub quadtree_depth: u32,
    /// Final positions that fell outside the world and were not indexed
    pub unindexed: usize,
    pub agents: Vec<AgentSnapshot>,
}
