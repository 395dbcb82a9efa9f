use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    /// A construction parameter violates a grid invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A particle's initial position does not map to any cell of the grid.
    #[error("particle at ({}, {}, {}) is outside the domain", .position[0], .position[1], .position[2])]
    OutOfDomain { position: [f64; 3] },

    /// Two cells declared as neighbors share no face. Indicates a corrupted
    /// stencil or a particle that crossed more than one cell in a single
    /// step (timestep too large).
    #[error("cells {cell} and {neighbor} share no face")]
    NoSharedFace { cell: usize, neighbor: usize },

    /// A particle reached a ghost cell through a boundary that should have
    /// kept it inside the domain.
    #[error("particle escaped the domain through a {0:?} boundary")]
    ParticleEscaped(crate::boundary::BorderType),
}
