/// Liveness of a particle. Removed particles stay in storage so that cell
/// handles remain valid, but every per-particle pass skips them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleState {
    Alive,
    Removed,
}

/// Physical state of a single particle.
///
/// Ghost mirrors are value copies of this type; real particles are owned by
/// the grid's particle store and addressed by index.
#[derive(Clone, Debug)]
pub struct Particle {
    position: [f64; 3],
    velocity: [f64; 3],
    force: [f64; 3],
    old_force: [f64; 3],
    mass: f64,
    state: ParticleState,
}

impl Particle {
    pub fn new(position: [f64; 3], velocity: [f64; 3], mass: f64) -> Self {
        assert!(mass > 0.0, "Mass should be positive, found {}", mass);
        Self {
            position,
            velocity,
            force: [0.0; 3],
            old_force: [0.0; 3],
            mass,
            state: ParticleState::Alive,
        }
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }
    pub fn velocity(&self) -> [f64; 3] {
        self.velocity
    }
    pub fn force(&self) -> [f64; 3] {
        self.force
    }
    pub fn old_force(&self) -> [f64; 3] {
        self.old_force
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
    pub fn state(&self) -> ParticleState {
        self.state
    }
    pub fn is_alive(&self) -> bool {
        self.state == ParticleState::Alive
    }

    pub fn set_position(&mut self, position: [f64; 3]) {
        self.position = position;
    }
    pub fn set_velocity(&mut self, velocity: [f64; 3]) {
        self.velocity = velocity;
    }
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }
    pub(crate) fn set_state(&mut self, state: ParticleState) {
        self.state = state;
    }

    /// Replace the effective force, archiving the current one as the
    /// previous-step force.
    pub fn set_force(&mut self, force: [f64; 3]) {
        self.old_force = self.force;
        self.force = force;
    }
    /// Accumulate into the effective force without touching the archive.
    pub fn add_force(&mut self, f: [f64; 3]) {
        self.force[0] += f[0];
        self.force[1] += f[1];
        self.force[2] += f[2];
    }
    /// Subtract from the effective force without touching the archive.
    pub fn sub_force(&mut self, f: [f64; 3]) {
        self.force[0] -= f[0];
        self.force[1] -= f[1];
        self.force[2] -= f[2];
    }

    /// Used by migration to undo a position update: flips velocity and both
    /// force slots wholesale.
    pub(crate) fn negate_dynamics(&mut self) {
        for i in 0..3 {
            self.velocity[i] = -self.velocity[i];
            self.force[i] = -self.force[i];
            self.old_force[i] = -self.old_force[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_force_archives_previous() {
        let mut p = Particle::new([0.0; 3], [0.0; 3], 1.0);
        p.set_force([1.0, 2.0, 3.0]);
        p.set_force([4.0, 5.0, 6.0]);
        assert_eq!(p.old_force(), [1.0, 2.0, 3.0]);
        assert_eq!(p.force(), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn accumulation_leaves_archive_untouched() {
        let mut p = Particle::new([0.0; 3], [0.0; 3], 1.0);
        p.set_force([1.0, 1.0, 1.0]);
        p.add_force([0.5, 0.0, 0.0]);
        p.sub_force([0.0, 0.5, 0.0]);
        assert_eq!(p.force(), [1.5, 0.5, 1.0]);
        assert_eq!(p.old_force(), [0.0, 0.0, 0.0]);
    }
}
