/// Condition applied at one face of the domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderType {
    /// Particles crossing the face are removed from the simulation.
    Outflow,
    /// Near-wall particles are repelled by a mirror (ghost) particle.
    Reflection,
    /// The domain wraps around; interactions use the minimum image.
    Periodic,
    /// Crossing particles have their position update undone and the wall
    /// component of their velocity flipped. Not reflected exactly at the
    /// wall, hence "naive".
    NaiveReflection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}
impl Axis {
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// One of the six logical faces of a cell or of the domain.
///
/// Indexed 0..6: faces 0-2 are the min walls of x, y, z and faces 3-5 the
/// max walls. `index() % 3` therefore recovers the axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    XLo,
    YLo,
    ZLo,
    XHi,
    YHi,
    ZHi,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::XLo,
        Face::YLo,
        Face::ZLo,
        Face::XHi,
        Face::YHi,
        Face::ZHi,
    ];

    pub fn index(&self) -> usize {
        match self {
            Face::XLo => 0,
            Face::YLo => 1,
            Face::ZLo => 2,
            Face::XHi => 3,
            Face::YHi => 4,
            Face::ZHi => 5,
        }
    }
    pub fn axis(&self) -> Axis {
        match self {
            Face::XLo | Face::XHi => Axis::X,
            Face::YLo | Face::YHi => Axis::Y,
            Face::ZLo | Face::ZHi => Axis::Z,
        }
    }
    pub fn is_lo(&self) -> bool {
        self.index() < 3
    }
    pub fn opposite(&self) -> Face {
        match self {
            Face::XLo => Face::XHi,
            Face::YLo => Face::YHi,
            Face::ZLo => Face::ZHi,
            Face::XHi => Face::XLo,
            Face::YHi => Face::YLo,
            Face::ZHi => Face::ZLo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_index_roundtrip() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(face.axis().index(), i % 3);
            assert_eq!(face.is_lo(), i < 3);
            assert_eq!(face.opposite().axis(), face.axis());
            assert_ne!(face.opposite(), *face);
        }
    }
}
