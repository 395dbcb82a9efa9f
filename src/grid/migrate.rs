//! Relocating particles between cells after a position update.

use log::trace;

use crate::boundary::{BorderType, Face};
use crate::cell::CellType;
use crate::error::{Error, Result};
use crate::particle::ParticleState;
use crate::physics;

use super::LinkedCells;

impl LinkedCells {
    /// Re-bin every particle whose position no longer maps to the cell
    /// holding it. Must be called after external code changes positions.
    ///
    /// A destination inside the domain relocates the particle. A Ghost
    /// destination applies the boundary policy of the shared face: Outflow
    /// removes the particle, NaiveReflection undoes the position update
    /// along the wall axis and flips the wall velocity component, Periodic
    /// wraps the coordinate back into the domain. A Reflection wall letting
    /// a particle through means the timestep outran the repulsion and is
    /// reported as an error, as is a position beyond the padded grid.
    pub fn migrate(&mut self) -> Result<()> {
        for ci in 0..self.cells.len() {
            let mut slot = 0;
            while slot < self.cells[ci].particles.len() {
                let pi = self.cells[ci].particles[slot];
                let position = self.particles[pi].position();
                let target = match self.position_to_index(&position) {
                    Some(t) => t,
                    None => return Err(Error::OutOfDomain { position }),
                };
                if target == ci {
                    slot += 1;
                    continue;
                }

                if self.cells[target].cell_type != CellType::Ghost {
                    trace!(
                        "moving particle at ({}, {}, {}) from cell {} to cell {}",
                        position[0],
                        position[1],
                        position[2],
                        ci,
                        target
                    );
                    self.cells[target].particles.push(pi);
                    // Swap-remove; the swapped-in member lands at `slot`
                    // and is inspected next, so don't advance.
                    self.cells[ci].particles.swap_remove(slot);
                    continue;
                }

                let face = self.shared_face(ci, target).ok_or(Error::NoSharedFace {
                    cell: ci,
                    neighbor: target,
                })?;
                match self.cells[ci].borders[face.index()] {
                    BorderType::Outflow => {
                        trace!(
                            "particle at ({}, {}, {}) left the domain",
                            position[0],
                            position[1],
                            position[2]
                        );
                        self.particles[pi].set_state(ParticleState::Removed);
                        self.alive -= 1;
                        self.cells[ci].particles.swap_remove(slot);
                    }
                    BorderType::NaiveReflection => {
                        self.naive_reflect(pi, face);
                        // The particle stays in this cell.
                        slot += 1;
                    }
                    BorderType::Periodic => {
                        self.wrap_periodic(pi, ci, face)?;
                        self.cells[ci].particles.swap_remove(slot);
                    }
                    other => return Err(Error::ParticleEscaped(other)),
                }
            }
        }
        Ok(())
    }

    /// Undo the position update along the wall axis and flip the wall
    /// component of the velocity. Re-running the update with velocity and
    /// both force slots negated lands back on the pre-crossing position;
    /// only the wall axis of that result is kept.
    fn naive_reflect(&mut self, pi: usize, face: Face) {
        let a = face.axis().index();
        let delta_t = self.delta_t;
        let p = &mut self.particles[pi];

        let mut corrected = p.velocity();
        corrected[a] = -corrected[a];

        p.negate_dynamics();
        let reverted = physics::step_position(p, delta_t);
        p.negate_dynamics();

        let mut position = p.position();
        position[a] = reverted[a];
        p.set_position(position);
        p.set_velocity(corrected);
    }

    /// Wrap the particle's offending coordinate by the domain size and bin
    /// it on the opposite side. A corner exit may cross further boundaries
    /// in the same step; each is resolved against the source cell's tags.
    /// The caller drops the particle from the source cell afterwards.
    fn wrap_periodic(&mut self, pi: usize, ci: usize, first_face: Face) -> Result<()> {
        let mut position = self.particles[pi].position();
        let mut face = first_face;
        loop {
            let a = face.axis().index();
            position[a] += if face.is_lo() {
                self.domain_size[a]
            } else {
                -self.domain_size[a]
            };
            let dest = match self.position_to_index(&position) {
                Some(d) => d,
                None => return Err(Error::OutOfDomain { position }),
            };
            if self.cells[dest].cell_type != CellType::Ghost {
                trace!(
                    "wrapping particle to ({}, {}, {}) into cell {}",
                    position[0],
                    position[1],
                    position[2],
                    dest
                );
                self.particles[pi].set_position(position);
                self.cells[dest].particles.push(pi);
                return Ok(());
            }
            face = self.offending_face(dest).ok_or(Error::NoSharedFace {
                cell: ci,
                neighbor: dest,
            })?;
            match self.cells[ci].borders[face.index()] {
                BorderType::Periodic => continue,
                BorderType::Outflow => {
                    self.particles[pi].set_position(position);
                    self.particles[pi].set_state(ParticleState::Removed);
                    self.alive -= 1;
                    return Ok(());
                }
                other => return Err(Error::ParticleEscaped(other)),
            }
        }
    }

    /// The face whose wall a Ghost cell lies behind. For corner Ghosts any
    /// one offending axis is returned; callers loop until none is left.
    fn offending_face(&self, ghost_index: usize) -> Option<Face> {
        let coords = self.index_1d_to_3d(ghost_index);
        Face::ALL.into_iter().find(|face| {
            let a = face.axis().index();
            if face.is_lo() {
                coords[a] == 0
            } else {
                coords[a] == self.num_cells[a] - 1
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{grid_3x3x3, OUTFLOW};
    use super::*;
    use crate::particle::Particle;
    use approx::assert_relative_eq;

    #[test]
    fn particle_staying_in_its_cell_is_untouched() {
        let mut grid = grid_3x3x3(vec![Particle::new([0.5, 0.5, 0.5], [0.0; 3], 1.0)], OUTFLOW);
        let home = grid.position_to_index(&[0.5, 0.5, 0.5]).unwrap();

        grid.apply_to_particles(|p| p.set_position([0.6, 0.5, 0.5]));
        grid.migrate().unwrap();

        assert_eq!(grid.cell(home).particles(), &[0]);
        assert_eq!(grid.alive_count(), 1);
    }

    #[test]
    fn particle_crossing_a_cell_boundary_is_relocated() {
        let mut grid = grid_3x3x3(vec![Particle::new([0.9, 0.5, 0.5], [0.0; 3], 1.0)], OUTFLOW);
        let old = grid.position_to_index(&[0.9, 0.5, 0.5]).unwrap();
        let new = grid.position_to_index(&[1.1, 0.5, 0.5]).unwrap();

        grid.apply_to_particles(|p| p.set_position([1.1, 0.5, 0.5]));
        grid.migrate().unwrap();

        assert!(grid.cell(old).particles().is_empty());
        assert_eq!(grid.cell(new).particles(), &[0]);
    }

    #[test]
    fn outflow_exit_removes_the_particle() {
        let mut grid = grid_3x3x3(
            vec![
                Particle::new([0.1, 1.5, 1.5], [0.0; 3], 1.0),
                Particle::new([1.5, 1.5, 1.5], [0.0; 3], 1.0),
            ],
            OUTFLOW,
        );
        grid.apply_to_particles(|p| {
            let mut x = p.position();
            x[0] -= 0.3;
            p.set_position(x);
        });
        grid.migrate().unwrap();

        assert_eq!(grid.alive_count(), 1);
        assert!(!grid.particle(0).is_alive());
        assert!(grid.particle(1).is_alive());
        assert_eq!(grid.iter_alive().count(), 1);
        // Removed from every cell list but still in storage.
        assert!(grid.cells().iter().all(|c| !c.particles().contains(&0)));
        assert_eq!(grid.particles().len(), 2);
    }

    #[test]
    fn removed_particles_are_skipped_by_later_passes() {
        let mut grid = grid_3x3x3(vec![Particle::new([0.1, 1.5, 1.5], [0.0; 3], 1.0)], OUTFLOW);
        grid.apply_to_particles(|p| p.set_position([-0.1, 1.5, 1.5]));
        grid.migrate().unwrap();

        let mut touched = 0;
        grid.apply_to_particles(|_| touched += 1);
        assert_eq!(touched, 0);
    }

    #[test]
    fn periodic_exit_wraps_to_the_opposite_side() {
        let mut borders = OUTFLOW;
        borders[Face::XLo.index()] = BorderType::Periodic;
        borders[Face::XHi.index()] = BorderType::Periodic;
        let mut grid = grid_3x3x3(vec![Particle::new([0.1, 1.5, 1.5], [0.0; 3], 1.0)], borders);

        grid.apply_to_particles(|p| p.set_position([-0.1, 1.5, 1.5]));
        grid.migrate().unwrap();

        assert_eq!(grid.alive_count(), 1);
        let p = grid.particle(0);
        assert_relative_eq!(p.position()[0], 2.9, epsilon = 1e-12);
        let dest = grid.position_to_index(&[2.9, 1.5, 1.5]).unwrap();
        assert_eq!(grid.cell(dest).particles(), &[0]);
    }

    #[test]
    fn naive_reflection_reverts_the_crossing_axis_and_flips_velocity() {
        let mut borders = OUTFLOW;
        borders[Face::XLo.index()] = BorderType::NaiveReflection;
        let delta_t = 0.1;
        let mut grid = LinkedCells::new(
            vec![Particle::new([0.06, 1.5, 1.5], [-1.0, 0.25, 0.0], 1.0)],
            [3.0, 3.0, 3.0],
            1.0,
            false,
            1.1225,
            delta_t,
            borders,
        )
        .expect("valid grid");
        let home = grid.position_to_index(&[0.06, 1.5, 1.5]).unwrap();

        // External position update steps the particle across the wall.
        grid.apply_to_particles(|p| p.set_position(physics::step_position(p, delta_t)));
        assert_relative_eq!(grid.particle(0).position()[0], -0.04, epsilon = 1e-12);
        grid.migrate().unwrap();

        let p = grid.particle(0);
        assert_relative_eq!(p.position()[0], 0.06, epsilon = 1e-12);
        // Other axes keep their updated positions.
        assert_relative_eq!(p.position()[1], 1.5 + 0.025, epsilon = 1e-12);
        assert_eq!(p.velocity(), [1.0, 0.25, 0.0]);
        assert_eq!(p.force(), [0.0; 3]);
        assert_eq!(grid.cell(home).particles(), &[0]);
    }

    #[test]
    fn escape_through_a_reflection_wall_is_an_error() {
        let mut grid = LinkedCells::new(
            vec![Particle::new([0.1, 1.5, 1.5], [0.0; 3], 1.0)],
            [3.0, 3.0, 3.0],
            1.0,
            false,
            1.1225,
            0.01,
            [BorderType::Reflection; 6],
        )
        .expect("valid grid");
        grid.apply_to_particles(|p| p.set_position([-0.1, 1.5, 1.5]));
        let result = grid.migrate();
        assert!(matches!(
            result,
            Err(Error::ParticleEscaped(BorderType::Reflection))
        ));
    }

    #[test]
    fn position_beyond_the_padded_grid_is_an_error() {
        let mut grid = grid_3x3x3(vec![Particle::new([1.5, 1.5, 1.5], [0.0; 3], 1.0)], OUTFLOW);
        grid.apply_to_particles(|p| p.set_position([-5.0, 1.5, 1.5]));
        assert!(matches!(grid.migrate(), Err(Error::OutOfDomain { .. })));
    }

    #[test]
    fn swap_removal_does_not_skip_the_swapped_in_particle() {
        // Two particles in one cell, both crossing into the next cell.
        let mut grid = grid_3x3x3(
            vec![
                Particle::new([0.8, 0.5, 0.5], [0.0; 3], 1.0),
                Particle::new([0.9, 0.5, 0.5], [0.0; 3], 1.0),
            ],
            OUTFLOW,
        );
        let new = grid.position_to_index(&[1.2, 0.5, 0.5]).unwrap();

        grid.apply_to_particles(|p| {
            let mut x = p.position();
            x[0] += 0.4;
            p.set_position(x);
        });
        grid.migrate().unwrap();

        let mut members = grid.cell(new).particles().to_vec();
        members.sort_unstable();
        assert_eq!(members, vec![0, 1]);
    }

    #[test]
    fn corner_exit_through_two_periodic_axes_wraps_both() {
        let mut borders = OUTFLOW;
        for face in [Face::XLo, Face::XHi, Face::YLo, Face::YHi] {
            borders[face.index()] = BorderType::Periodic;
        }
        let mut grid = grid_3x3x3(vec![Particle::new([0.1, 0.1, 1.5], [0.0; 3], 1.0)], borders);

        grid.apply_to_particles(|p| p.set_position([-0.1, -0.1, 1.5]));
        grid.migrate().unwrap();

        let p = grid.particle(0);
        assert_relative_eq!(p.position()[0], 2.9, epsilon = 1e-12);
        assert_relative_eq!(p.position()[1], 2.9, epsilon = 1e-12);
        let dest = grid.position_to_index(&[2.9, 2.9, 1.5]).unwrap();
        assert_eq!(grid.cell(dest).particles(), &[0]);
    }
}
