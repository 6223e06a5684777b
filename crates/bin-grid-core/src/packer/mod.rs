//! Grid occupancy and the greedy placement engine that drives it.

pub mod engine;
pub mod occupancy;

pub use engine::{Candidate, GridPacker, Outcome, select_candidate};
pub use occupancy::{Checkpoint, Conflict, OccupancyGrid};
