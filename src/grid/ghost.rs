//! Mirror-particle synthesis at Reflection walls.

use log::{error, trace};

use crate::boundary::{BorderType, Face};
use crate::cell::CellType;

use super::LinkedCells;

impl LinkedCells {
    /// Regenerate the ghost mirrors on all Border cells.
    ///
    /// Must run after [`Self::migrate`] and before [`Self::apply`] whenever
    /// positions changed. All ghost pools are reset by cursor (no
    /// deallocation) and every Border cell's particles are walked once.
    pub fn refresh_ghosts(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.clear_ghosts();
        }
        for cell_index in 0..self.cells.len() {
            if self.cells[cell_index].cell_type != CellType::Border {
                continue;
            }
            for member in 0..self.cells[cell_index].particles.len() {
                let pi = self.cells[cell_index].particles[member];
                self.create_ghosts(pi, cell_index);
            }
        }
    }

    /// Distance from `position` to the wall behind `face` of the given
    /// cell. Coordinate (0,0,0) belongs to cell (1,1,1), hence the -1.
    pub(crate) fn border_distance(&self, cell_index: usize, face: Face, position: &[f64; 3]) -> f64 {
        let coords = self.index_1d_to_3d(cell_index);
        let a = face.axis().index();
        let mut wall = (coords[a] as f64 - 1.0) * self.cell_size[a];
        if !face.is_lo() {
            wall += self.cell_size[a];
        }
        (position[a] - wall).abs()
    }

    fn create_ghosts(&mut self, pi: usize, cell_index: usize) {
        for face in Face::ALL {
            if self.is_2d && face.axis().index() == 2 {
                continue;
            }
            if self.cells[cell_index].borders[face.index()] != BorderType::Reflection {
                continue;
            }

            let particle = &self.particles[pi];
            let position = particle.position();
            let delta = self.border_distance(cell_index, face, &position);
            // A mirror at twice the wall distance only repels the particle
            // if that separation is below the repulsion distance.
            if 2.0 * delta >= self.repulsion_distance {
                continue;
            }

            let a = face.axis().index();
            let mut mirrored = position;
            mirrored[a] += if face.is_lo() { -2.0 * delta } else { 2.0 * delta };
            let mut velocity = particle.velocity();
            velocity[a] = -velocity[a];
            let mass = particle.mass();

            let target = match self.position_to_index(&mirrored) {
                Some(t) => t,
                None => {
                    error!(
                        "mirror of particle at ({}, {}, {}) falls outside the grid",
                        position[0], position[1], position[2]
                    );
                    continue;
                }
            };
            trace!(
                "ghost at ({}, {}, {}) mirrors ({}, {}, {}) into cell {}/{}",
                mirrored[0],
                mirrored[1],
                mirrored[2],
                position[0],
                position[1],
                position[2],
                target,
                self.cells.len()
            );
            self.cells[target].push_ghost(mirrored, velocity, mass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::OUTFLOW;
    use super::*;
    use crate::particle::Particle;
    use approx::assert_relative_eq;

    fn reflective_grid(particles: Vec<Particle>) -> LinkedCells {
        LinkedCells::new(
            particles,
            [3.0, 3.0, 3.0],
            1.0,
            false,
            crate::physics::repulsion_distance(1.0),
            0.01,
            [BorderType::Reflection; 6],
        )
        .expect("valid grid")
    }

    fn all_ghosts(grid: &LinkedCells) -> Vec<Particle> {
        grid.cells()
            .iter()
            .flat_map(|c| c.ghosts().iter().cloned())
            .collect()
    }

    #[test]
    fn near_wall_particle_mirrors_once() {
        let mut grid = reflective_grid(vec![Particle::new(
            [0.1, 1.5, 1.5],
            [-1.0, 0.5, 0.25],
            2.0,
        )]);
        grid.refresh_ghosts();

        let ghosts = all_ghosts(&grid);
        assert_eq!(ghosts.len(), 1);
        let g = &ghosts[0];
        assert_relative_eq!(g.position()[0], -0.1, epsilon = 1e-12);
        assert_relative_eq!(g.position()[1], 1.5);
        assert_relative_eq!(g.position()[2], 1.5);
        assert_eq!(g.velocity(), [1.0, 0.5, 0.25]);
        assert_eq!(g.mass(), 2.0);

        // The mirror sits in the adjacent ghost cell.
        let host = grid.position_to_index(&[-0.1, 1.5, 1.5]).unwrap();
        assert_eq!(grid.cell(host).ghost_count(), 1);
        assert_eq!(grid.cell(host).cell_type(), CellType::Ghost);
    }

    #[test]
    fn far_particle_generates_no_ghosts() {
        // Distance 1.0 to the x-max wall; doubled it exceeds the repulsion
        // distance of about 1.12.
        let mut grid = reflective_grid(vec![Particle::new([2.0, 1.5, 1.5], [0.0; 3], 1.0)]);
        grid.refresh_ghosts();
        assert!(all_ghosts(&grid).is_empty());
    }

    #[test]
    fn corner_particle_mirrors_once_per_face() {
        let mut grid = reflective_grid(vec![Particle::new([0.1, 0.1, 1.5], [0.0; 3], 1.0)]);
        grid.refresh_ghosts();

        let ghosts = all_ghosts(&grid);
        assert_eq!(ghosts.len(), 2);
        let mut positions: Vec<[f64; 3]> = ghosts.iter().map(|g| g.position()).collect();
        positions.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
        assert_relative_eq!(positions[0][0], -0.1, epsilon = 1e-12);
        assert_relative_eq!(positions[0][1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(positions[1][0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(positions[1][1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn refresh_overwrites_previous_step() {
        let mut grid = reflective_grid(vec![Particle::new([0.1, 1.5, 1.5], [0.0; 3], 1.0)]);
        grid.refresh_ghosts();
        grid.refresh_ghosts();
        assert_eq!(all_ghosts(&grid).len(), 1);
    }

    #[test]
    fn outflow_walls_never_mirror() {
        let mut grid = LinkedCells::new(
            vec![Particle::new([0.1, 0.1, 0.1], [0.0; 3], 1.0)],
            [3.0, 3.0, 3.0],
            1.0,
            false,
            crate::physics::repulsion_distance(1.0),
            0.01,
            OUTFLOW,
        )
        .expect("valid grid");
        grid.refresh_ghosts();
        assert!(all_ghosts(&grid).is_empty());
    }
}
