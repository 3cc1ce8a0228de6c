pub mod generation;
pub mod series;
pub mod social;
pub mod usage;
