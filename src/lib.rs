//! Linked-cells particle engine: a padded cell grid with pairwise force
//! evaluation, boundary handling through ghost layers, and particle
//! migration between timesteps.

pub mod boundary;
pub mod cell;
pub mod error;
pub mod grid;
pub mod init;
pub mod particle;
pub mod physics;

pub use boundary::{Axis, BorderType, Face};
pub use cell::{Cell, CellType};
pub use error::{Error, Result};
pub use grid::LinkedCells;
pub use particle::{Particle, ParticleState};
