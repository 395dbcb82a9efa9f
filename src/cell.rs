use crate::boundary::BorderType;
use crate::particle::Particle;

/// Role of a cell within the padded grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellType {
    /// Interior cell, not adjacent to any domain wall.
    Regular,
    /// Real cell touching at least one domain wall; carries per-face tags.
    Border,
    /// Padding cell outside the domain. Never holds real particles, only
    /// ghost mirrors and exit detection.
    Ghost,
}

/// One bucket of the linked-cells grid.
///
/// Members are handles into the grid's particle store. The ghost pool holds
/// value copies that are rebuilt every step; `ghost_count` is the live
/// cursor into it so slots can be reused without deallocation.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) particles: Vec<usize>,
    pub(crate) ghost_particles: Vec<Particle>,
    pub(crate) ghost_count: usize,
    pub(crate) cell_type: CellType,
    pub(crate) borders: [BorderType; 6],
    pub(crate) neighbors: [usize; 26],
}

impl Cell {
    pub(crate) fn new() -> Self {
        Self {
            particles: Vec::new(),
            ghost_particles: Vec::new(),
            ghost_count: 0,
            cell_type: CellType::Regular,
            // Regular cells keep Outflow on every face for uniformity.
            borders: [BorderType::Outflow; 6],
            neighbors: [0; 26],
        }
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }
    /// Handles of the real particles currently binned here.
    pub fn particles(&self) -> &[usize] {
        &self.particles
    }
    pub fn borders(&self) -> &[BorderType; 6] {
        &self.borders
    }
    /// Linear indices of the 26 adjacent cells. Meaningless on Ghost cells.
    pub fn neighbors(&self) -> &[usize; 26] {
        &self.neighbors
    }
    /// Number of live ghost mirrors currently hosted by this cell.
    pub fn ghost_count(&self) -> usize {
        self.ghost_count
    }
    /// The live portion of the ghost pool.
    pub fn ghosts(&self) -> &[Particle] {
        &self.ghost_particles[..self.ghost_count]
    }

    /// Drop all ghosts by resetting the cursor. Slots stay allocated.
    pub(crate) fn clear_ghosts(&mut self) {
        self.ghost_count = 0;
    }

    /// Append a ghost mirror, overwriting a retired slot if one is free.
    pub(crate) fn push_ghost(&mut self, position: [f64; 3], velocity: [f64; 3], mass: f64) {
        if self.ghost_count < self.ghost_particles.len() {
            let slot = &mut self.ghost_particles[self.ghost_count];
            slot.set_position(position);
            slot.set_velocity(velocity);
            slot.set_mass(mass);
        } else {
            self.ghost_particles
                .push(Particle::new(position, velocity, mass));
        }
        self.ghost_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_pool_reuses_slots() {
        let mut cell = Cell::new();
        cell.push_ghost([1.0, 0.0, 0.0], [0.0; 3], 1.0);
        cell.push_ghost([2.0, 0.0, 0.0], [0.0; 3], 1.0);
        assert_eq!(cell.ghost_count(), 2);

        cell.clear_ghosts();
        assert_eq!(cell.ghost_count(), 0);
        assert_eq!(cell.ghost_particles.len(), 2);

        cell.push_ghost([3.0, 0.0, 0.0], [0.0; 3], 2.0);
        assert_eq!(cell.ghost_count(), 1);
        // First slot was overwritten, not reallocated.
        assert_eq!(cell.ghost_particles.len(), 2);
        assert_eq!(cell.ghosts()[0].position(), [3.0, 0.0, 0.0]);
        assert_eq!(cell.ghosts()[0].mass(), 2.0);
    }
}
