//! Observation synthesis pipeline.

mod degrade;

pub use degrade::{Config, Pipeline};
