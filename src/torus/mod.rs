//! Toroidal Game of Life grid and its update engine.

mod engine;
pub mod grid;
pub mod partition;
pub mod report;
pub mod rules;

pub use engine::{TorusLife, TorusLifeConfig};
pub use grid::{Cell, Grid};
pub use partition::{Partition, partition_rows};
pub use report::{LogObserver, StepObserver, StepReport, Strategy};
pub use rules::{count_live_neighbors, next_state};
