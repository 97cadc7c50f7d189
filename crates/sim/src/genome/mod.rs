//! Per-agent genetic state.

pub mod individual;

pub use individual::Individual;
