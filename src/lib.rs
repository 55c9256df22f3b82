//! Conway's Game of Life (B3/S23) on a toroidal grid, with serial and
//! fork-join parallel update strategies.

pub mod error;
pub mod scaling;
pub mod torus;
pub use error::LifeError;
pub use torus::{Cell, Grid, Strategy, TorusLife, TorusLifeConfig};
