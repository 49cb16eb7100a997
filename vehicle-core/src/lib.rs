//! Spatial indexing and steering kernels for autonomous agents.
//!
//! The crate has two independent halves:
//!
//! - [`QuadTree`], a region quadtree over [`Point`]s bounded by a
//!   [`Rectangle`], for neighborhood queries and visualizing space division;
//! - [`Agent`] and its steering behaviors (seek, arrive, pursue, wander,
//!   path and flow following, separation, alignment, cohesion), coordinated
//!   in groups by [`Flock`] or the allocation-free [`FixedFlock`].
//!
//! Everything produces plain numbers; drawing is left to the host.
//!
//! Builds without `std` (with `alloc`) when the default `std` feature is
//! disabled. The `parallel` feature computes flock forces with rayon.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod agent;
pub mod error;
pub mod flock;
pub mod flow_field;
mod math;
pub mod path;
pub mod quadtree;
pub mod steering;
pub mod vector;

pub use agent::{Agent, Edges, Kinematic, MovingTarget, SteeringParams};
pub use error::GeometryError;
pub use flock::{FixedFlock, Flock, FlockConfig};
pub use flow_field::FlowField;
pub use path::{Path, PathProjection, Segment, Waypoint};
pub use quadtree::{Point, QuadTree, Rectangle};
pub use steering::Obstacle;
pub use vector::Vector2;
