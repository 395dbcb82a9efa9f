//! Neighbor stencils and shared-face resolution.

use crate::boundary::Face;
use crate::cell::CellType;

use super::LinkedCells;

impl LinkedCells {
    /// Linear indices of the 26 cells adjacent to `coords`.
    ///
    /// The offset order (x outermost, z innermost) is fixed: shared-face
    /// resolution maps stencil positions back to faces by range.
    pub(crate) fn build_stencil(&self, coords: [usize; 3]) -> [usize; 26] {
        let mut neighbors = [0usize; 26];
        let mut index = 0;
        for dx in -1i64..2 {
            for dy in -1i64..2 {
                for dz in -1i64..2 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    // Non-ghost cells sit at least one cell away from the
                    // grid edge, so the offset coordinate never leaves it.
                    neighbors[index] = self.index_3d_to_1d([
                        (coords[0] as i64 + dx) as usize,
                        (coords[1] as i64 + dy) as usize,
                        (coords[2] as i64 + dz) as usize,
                    ]);
                    index += 1;
                }
            }
        }
        neighbors
    }

    /// Which of `own`'s six faces points towards the neighbor `other`.
    ///
    /// Resolved positionally from the stencil: entries 0-8 lie at x-1,
    /// 9-11 at y-1, 12 at z-1, 13 at z+1, 14-16 at y+1 and 17-25 at x+1.
    /// For edge and corner neighbors this picks the dominant axis, so a
    /// particle escaping through a corner is attributed to one face only.
    ///
    /// Returns `None` if the cells are not neighbors (or `own` is a Ghost
    /// cell, which has no stencil).
    pub fn shared_face(&self, own: usize, other: usize) -> Option<Face> {
        if self.cells[own].cell_type == CellType::Ghost {
            return None;
        }
        let position = self.cells[own]
            .neighbors
            .iter()
            .position(|&n| n == other)?;
        Some(match position {
            0..=8 => Face::XLo,
            9..=11 => Face::YLo,
            12 => Face::ZLo,
            13 => Face::ZHi,
            14..=16 => Face::YHi,
            _ => Face::XHi,
        })
    }

    /// The real cell a Ghost cell stands in for under periodic wrap: each
    /// padding coordinate on a periodic axis is clamped to the opposite
    /// interior boundary. Padding coordinates on non-periodic axes stay,
    /// so a corner ghost behind an open wall resolves to another Ghost
    /// cell and no real cell stands in for it.
    pub(crate) fn periodic_counterpart(&self, ghost_index: usize) -> usize {
        let mut coords = self.index_1d_to_3d(ghost_index);
        for a in 0..3 {
            if !self.periodic[a] {
                continue;
            }
            if coords[a] == 0 {
                coords[a] = self.num_cells[a] - 2;
            } else if coords[a] == self.num_cells[a] - 1 {
                coords[a] = 1;
            }
        }
        self.index_3d_to_1d(coords)
    }
}
