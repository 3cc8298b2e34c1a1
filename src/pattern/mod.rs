pub mod classify;
pub mod grid;
pub mod notation;
pub mod stats;
