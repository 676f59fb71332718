//! Vision
//!
//! Full shadowcast field of view for the player and a cheap raycast for
//! monster sight checks.

mod fov;
mod los;

pub use fov::calculate_fov;
pub use los::has_line_of_sight;
