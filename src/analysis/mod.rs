pub mod trend;
pub mod confidence;
pub mod series;
pub mod statistics;
pub mod insight;
