//! Headless host for the steering kernels: loads a scenario, runs a flock
//! for a number of ticks and reports where the agents ended up.

pub mod runner;
pub mod scenario;

pub use runner::run;
pub use scenario::load;
