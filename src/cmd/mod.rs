pub mod batch;
pub mod score;
pub mod stats;
