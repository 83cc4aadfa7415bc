pub mod builds;
pub mod triggers;
