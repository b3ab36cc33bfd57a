pub mod error;
pub mod forest;
pub mod params;
pub mod rain;
mod tree;
pub mod trend;
