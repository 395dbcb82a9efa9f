//! The pruned pairwise force loop.

use log::error;

use crate::boundary::BorderType;
use crate::cell::CellType;
use crate::physics;

use super::LinkedCells;

impl LinkedCells {
    /// Evaluate `force_fn` on every particle pair within the cutoff radius,
    /// once per physically distinct interaction, and accumulate the result
    /// onto both partners (onto the real partner only when the peer is a
    /// ghost mirror).
    ///
    /// `force_fn(p1, p2)` returns the force acting on `p1`. Forces are
    /// zeroed first, so repeated calls without intervening position changes
    /// are idempotent. The cutoff test is by Euclidean distance; the grid
    /// only bounds the search space.
    pub fn apply<F>(&mut self, mut force_fn: F)
    where
        F: FnMut(&crate::particle::Particle, &crate::particle::Particle) -> [f64; 3],
    {
        for p in self.particles.iter_mut() {
            if p.is_alive() {
                p.set_force([0.0; 3]);
            }
        }

        // Pairs within one cell.
        for ci in 0..self.cells.len() {
            let count = self.cells[ci].particles.len();
            for i in 0..count {
                let a = self.cells[ci].particles[i];
                for j in (i + 1)..count {
                    let b = self.cells[ci].particles[j];
                    let f = {
                        let (pa, pb) = (&self.particles[a], &self.particles[b]);
                        if physics::distance(&pa.position(), &pb.position()) > self.cutoff {
                            continue;
                        }
                        force_fn(pa, pb)
                    };
                    self.particles[a].add_force(f);
                    self.particles[b].sub_force(f);
                }
            }
        }

        // Pairs across neighboring cells.
        for ci in 0..self.cells.len() {
            if self.cells[ci].cell_type == CellType::Ghost {
                continue;
            }
            for n in 0..26 {
                let cj = self.cells[ci].neighbors[n];
                let neighbor_type = self.cells[cj].cell_type;
                // Newton's-third-law pruning: the pair was already handled
                // from cj's perspective. Never prune ghost neighbors, or
                // wall repulsion is lost.
                if cj < ci && neighbor_type != CellType::Ghost {
                    continue;
                }

                if neighbor_type == CellType::Ghost {
                    self.apply_across_boundary(ci, cj, &mut force_fn);
                } else {
                    self.apply_cell_pair(ci, cj, &mut force_fn);
                }
            }
        }
    }

    fn apply_cell_pair<F>(&mut self, ci: usize, cj: usize, force_fn: &mut F)
    where
        F: FnMut(&crate::particle::Particle, &crate::particle::Particle) -> [f64; 3],
    {
        for i in 0..self.cells[ci].particles.len() {
            let a = self.cells[ci].particles[i];
            for j in 0..self.cells[cj].particles.len() {
                let b = self.cells[cj].particles[j];
                let f = {
                    let (pa, pb) = (&self.particles[a], &self.particles[b]);
                    if physics::distance(&pa.position(), &pb.position()) > self.cutoff {
                        continue;
                    }
                    force_fn(pa, pb)
                };
                self.particles[a].add_force(f);
                self.particles[b].sub_force(f);
            }
        }
    }

    fn apply_across_boundary<F>(&mut self, ci: usize, cj: usize, force_fn: &mut F)
    where
        F: FnMut(&crate::particle::Particle, &crate::particle::Particle) -> [f64; 3],
    {
        let face = match self.shared_face(ci, cj) {
            Some(face) => face,
            None => {
                error!("cells {} and {} are stencil neighbors but share no face", ci, cj);
                return;
            }
        };
        match self.cells[ci].borders[face.index()] {
            BorderType::Reflection => self.apply_ghost_pool(ci, cj, force_fn),
            BorderType::Periodic => self.apply_periodic_image(ci, cj, force_fn),
            other => {
                // No live interaction exists through these walls.
                if self.cells[cj].ghost_count > 0 {
                    error!(
                        "ghost cell {} hosts {} mirrors behind a {:?} face",
                        cj,
                        self.cells[cj].ghost_count,
                        other
                    );
                }
            }
        }
    }

    /// Wall repulsion: the mirror is discarded after the step, so the force
    /// only goes onto the real particle.
    fn apply_ghost_pool<F>(&mut self, ci: usize, cj: usize, force_fn: &mut F)
    where
        F: FnMut(&crate::particle::Particle, &crate::particle::Particle) -> [f64; 3],
    {
        for i in 0..self.cells[ci].particles.len() {
            let a = self.cells[ci].particles[i];
            for g in 0..self.cells[cj].ghost_count {
                let f = {
                    let pa = &self.particles[a];
                    let ghost = &self.cells[cj].ghost_particles[g];
                    let distance = physics::distance(&pa.position(), &ghost.position());
                    // A mirror only ever repels.
                    if distance >= self.repulsion_distance || distance > self.cutoff {
                        continue;
                    }
                    force_fn(pa, ghost)
                };
                self.particles[a].add_force(f);
            }
        }
    }

    /// Periodic faces carry no mirrors: interact with the real counterpart
    /// on the opposite side of the domain, translated onto the image the
    /// ghost cell stands for.
    fn apply_periodic_image<F>(&mut self, ci: usize, cj: usize, force_fn: &mut F)
    where
        F: FnMut(&crate::particle::Particle, &crate::particle::Particle) -> [f64; 3],
    {
        let ck = self.periodic_counterpart(cj);
        // A corner ghost behind an open wall has no real cell standing in
        // for it.
        if self.cells[ck].cell_type == CellType::Ghost {
            return;
        }
        // The counterpart sees this pair through its own ghost neighbor;
        // the usual index ordering keeps the evaluation unique. A
        // counterpart equal to the cell itself means the domain is a
        // single cell wide, where the image separation is ill-defined.
        if ck <= ci {
            return;
        }
        let shift = self.image_shift(cj);
        for i in 0..self.cells[ci].particles.len() {
            let a = self.cells[ci].particles[i];
            for j in 0..self.cells[ck].particles.len() {
                let b = self.cells[ck].particles[j];
                let f = {
                    let pa = &self.particles[a];
                    let pb = &self.particles[b];
                    let mut image = pb.clone();
                    let p = image.position();
                    image.set_position([p[0] + shift[0], p[1] + shift[1], p[2] + shift[2]]);
                    if physics::distance(&pa.position(), &image.position()) > self.cutoff {
                        continue;
                    }
                    force_fn(pa, &image)
                };
                self.particles[a].add_force(f);
                self.particles[b].sub_force(f);
            }
        }
    }

    /// Translation carrying the counterpart cell onto the specific image
    /// the ghost cell `ghost_index` represents: minus the domain size on
    /// every periodic axis whose padding is on the low side, plus on the
    /// high side. The counterpart may also be a direct stencil neighbor
    /// (a two-cell-wide axis); a fixed shift keeps that wrap image
    /// distinct from the direct interaction instead of collapsing onto it.
    fn image_shift(&self, ghost_index: usize) -> [f64; 3] {
        let coords = self.index_1d_to_3d(ghost_index);
        let mut shift = [0.0; 3];
        for a in 0..3 {
            if !self.periodic[a] {
                continue;
            }
            if coords[a] == 0 {
                shift[a] = -self.domain_size[a];
            } else if coords[a] == self.num_cells[a] - 1 {
                shift[a] = self.domain_size[a];
            }
        }
        shift
    }
}
