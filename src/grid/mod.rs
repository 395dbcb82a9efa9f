//! The linked-cells grid: spatial index, boundary handling and the pruned
//! pairwise force loop.

pub mod forces;
pub mod ghost;
pub mod migrate;
pub mod stencil;

use log::debug;

use crate::boundary::{BorderType, Face};
use crate::cell::{Cell, CellType};
use crate::error::{Error, Result};
use crate::particle::Particle;

/// Linked-cells particle container over an axis-aligned rectangular domain.
///
/// The domain is split into cutoff-sized cells, padded with one layer of
/// Ghost cells per axis. Cells hold handles into the owned particle store;
/// the store is only appended to, so handles stay valid for the lifetime of
/// the grid. Removed particles stay in storage but leave the cell lists.
///
/// Per step, after external code moved positions, call [`migrate`] then
/// [`refresh_ghosts`] before [`apply`]. Calling `apply` on stale ghosts
/// yields stale but well-formed forces.
///
/// [`migrate`]: LinkedCells::migrate
/// [`refresh_ghosts`]: LinkedCells::refresh_ghosts
/// [`apply`]: LinkedCells::apply
#[derive(Debug)]
pub struct LinkedCells {
    particles: Vec<Particle>,
    cells: Vec<Cell>,
    domain_size: [f64; 3],
    cell_size: [f64; 3],
    /// Cells per axis, including the two padding layers.
    num_cells: [usize; 3],
    cutoff: f64,
    repulsion_distance: f64,
    delta_t: f64,
    is_2d: bool,
    /// Per-axis periodicity, derived from the face tags (Periodic is always
    /// paired, so the lo face decides).
    periodic: [bool; 3],
    alive: usize,
}

impl LinkedCells {
    /// Build the grid and bin all alive particles.
    ///
    /// `borders` are the per-face boundary tags in [`Face`] order. The
    /// `repulsion_distance` gates mirror creation at Reflection walls
    /// (see [`crate::physics::repulsion_distance`]); `delta_t` is the step
    /// width the position update uses, needed to undo it at
    /// NaiveReflection walls.
    ///
    /// Fails if the domain or cutoff is degenerate, if the resulting cell
    /// size undercuts the cutoff on any axis, if Periodic faces are
    /// unpaired or mixed with reflective faces, or if a particle starts
    /// outside the domain.
    pub fn new(
        particles: Vec<Particle>,
        domain_size: [f64; 3],
        cutoff: f64,
        is_2d: bool,
        repulsion_distance: f64,
        delta_t: f64,
        mut borders: [BorderType; 6],
    ) -> Result<Self> {
        if domain_size.iter().any(|&d| !(d > 0.0)) {
            return Err(Error::InvalidConfig(format!(
                "domain size must be positive on every axis, found {:?}",
                domain_size
            )));
        }
        if !(cutoff > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "cutoff radius must be positive, found {}",
                cutoff
            )));
        }
        if !(repulsion_distance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "repulsion distance must be positive, found {}",
                repulsion_distance
            )));
        }
        if !(delta_t > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "timestep must be positive, found {}",
                delta_t
            )));
        }

        if is_2d {
            // The unused axis never reflects or wraps.
            borders[Face::ZLo.index()] = BorderType::Outflow;
            borders[Face::ZHi.index()] = BorderType::Outflow;
        }
        Self::check_border_config(&borders)?;

        let mut num_cells = [0usize; 3];
        let mut cell_size = [0.0f64; 3];
        for a in 0..3 {
            let n = ((domain_size[a] / cutoff).floor() as usize).max(1);
            num_cells[a] = n + 2;
            cell_size[a] = domain_size[a] / n as f64;
            // A cell narrower than the cutoff under-covers the 26-stencil
            // and silently drops pairs.
            if cell_size[a] < cutoff && !(is_2d && a == 2) {
                return Err(Error::InvalidConfig(format!(
                    "cell size {} on axis {} is smaller than the cutoff {}",
                    cell_size[a], a, cutoff
                )));
            }
        }

        let periodic = [
            borders[Face::XLo.index()] == BorderType::Periodic,
            borders[Face::YLo.index()] == BorderType::Periodic,
            borders[Face::ZLo.index()] == BorderType::Periodic,
        ];

        let mut grid = Self {
            particles,
            cells: vec![Cell::new(); num_cells[0] * num_cells[1] * num_cells[2]],
            domain_size,
            cell_size,
            num_cells,
            cutoff,
            repulsion_distance,
            delta_t,
            is_2d,
            periodic,
            alive: 0,
        };
        grid.assign_cell_types(&borders);
        grid.bin_particles()?;
        Ok(grid)
    }

    fn check_border_config(borders: &[BorderType; 6]) -> Result<()> {
        for axis in 0..3 {
            let lo = borders[axis];
            let hi = borders[axis + 3];
            if (lo == BorderType::Periodic) != (hi == BorderType::Periodic) {
                return Err(Error::InvalidConfig(format!(
                    "Periodic must be set on both faces of axis {}, found {:?}/{:?}",
                    axis, lo, hi
                )));
            }
        }
        let any_periodic = borders.contains(&BorderType::Periodic);
        let any_reflective = borders
            .iter()
            .any(|b| matches!(b, BorderType::Reflection | BorderType::NaiveReflection));
        if any_periodic && any_reflective {
            return Err(Error::InvalidConfig(
                "Periodic cannot be combined with Reflection or NaiveReflection \
                 on the same domain"
                    .into(),
            ));
        }
        Ok(())
    }

    fn assign_cell_types(&mut self, borders: &[BorderType; 6]) {
        let [nx, ny, nz] = self.num_cells;
        for i in 0..self.cells.len() {
            let [x, y, z] = self.index_1d_to_3d(i);
            if x == 0 || y == 0 || z == 0 || x == nx - 1 || y == ny - 1 || z == nz - 1 {
                self.cells[i].cell_type = CellType::Ghost;
                // Ghost cells don't need neighbors.
                continue;
            }

            let stencil = self.build_stencil([x, y, z]);
            self.cells[i].neighbors = stencil;

            if x == 1 || y == 1 || z == 1 || x == nx - 2 || y == ny - 2 || z == nz - 2 {
                self.cells[i].cell_type = CellType::Border;
                let coords = [x, y, z];
                for face in Face::ALL {
                    let a = face.axis().index();
                    let outward = if face.is_lo() {
                        coords[a] == 1
                    } else {
                        coords[a] == self.num_cells[a] - 2
                    };
                    if outward {
                        self.cells[i].borders[face.index()] = borders[face.index()];
                    }
                }
                continue;
            }

            self.cells[i].cell_type = CellType::Regular;
        }
    }

    fn bin_particles(&mut self) -> Result<()> {
        for pi in 0..self.particles.len() {
            if !self.particles[pi].is_alive() {
                continue;
            }
            let position = self.particles[pi].position();
            let index = match self.position_to_index(&position) {
                Some(i) if self.cells[i].cell_type != CellType::Ghost => i,
                _ => return Err(Error::OutOfDomain { position }),
            };
            debug!(
                "particle at ({}, {}, {}) added to cell {}/{}",
                position[0],
                position[1],
                position[2],
                index,
                self.cells.len()
            );
            self.cells[index].particles.push(pi);
            self.alive += 1;
        }
        Ok(())
    }

    // Index conversions. The linearization is x + Nx*y + Nx*Ny*z; the
    // binning rule below is the authoritative cell membership, not any
    // incrementally maintained pointer.

    pub fn index_3d_to_1d(&self, [x, y, z]: [usize; 3]) -> usize {
        x + self.num_cells[0] * y + self.num_cells[0] * self.num_cells[1] * z
    }

    pub fn index_1d_to_3d(&self, index: usize) -> [usize; 3] {
        let slab = self.num_cells[0] * self.num_cells[1];
        let rem = index % slab;
        [rem % self.num_cells[0], rem / self.num_cells[0], index / slab]
    }

    /// Map a continuous position to its 3-D cell coordinate. The +1 offset
    /// accounts for the ghost padding. `None` if outside the padded grid.
    pub fn position_to_coords(&self, position: &[f64; 3]) -> Option<[usize; 3]> {
        let mut coords = [0usize; 3];
        for a in 0..3 {
            let c = (position[a] / self.cell_size[a]).floor() as i64 + 1;
            if c < 0 || c >= self.num_cells[a] as i64 {
                return None;
            }
            coords[a] = c as usize;
        }
        Some(coords)
    }

    pub fn position_to_index(&self, position: &[f64; 3]) -> Option<usize> {
        self.position_to_coords(position)
            .map(|c| self.index_3d_to_1d(c))
    }

    // Getters

    /// Cells per axis, including the two ghost layers.
    pub fn num_cells(&self) -> [usize; 3] {
        self.num_cells
    }
    pub fn total_num_cells(&self) -> usize {
        self.cells.len()
    }
    pub fn cell_size(&self) -> [f64; 3] {
        self.cell_size
    }
    pub fn domain_size(&self) -> [f64; 3] {
        self.domain_size
    }
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }
    pub fn is_2d(&self) -> bool {
        self.is_2d
    }
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }
    /// The full particle store, removed particles included.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
    pub fn particle(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
    /// Number of particles that have not exited through an Outflow face.
    pub fn alive_count(&self) -> usize {
        self.alive
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    /// Apply `f` to every alive particle. This is the hook external
    /// integration and diagnostics run through; call [`Self::migrate`]
    /// afterwards if positions changed.
    pub fn apply_to_particles<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Particle),
    {
        for p in self.particles.iter_mut() {
            if p.is_alive() {
                f(p);
            }
        }
    }
}
