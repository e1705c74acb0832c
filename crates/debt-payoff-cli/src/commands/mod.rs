pub mod plan;
pub mod target;
