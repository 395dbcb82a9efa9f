//! Particle generation and thermal velocity initialization.

use rand_distr::{Distribution, Normal};

use crate::particle::Particle;

/// Append a cuboid block of particles on a regular lattice.
pub fn cuboid(
    particles: &mut Vec<Particle>,
    origin: [f64; 3],
    counts: [usize; 3],
    spacing: f64,
    mass: f64,
    velocity: [f64; 3],
) {
    particles.reserve(counts[0] * counts[1] * counts[2]);
    for x in 0..counts[0] {
        for y in 0..counts[1] {
            for z in 0..counts[2] {
                let position = [
                    origin[0] + spacing * x as f64,
                    origin[1] + spacing * y as f64,
                    origin[2] + spacing * z as f64,
                ];
                particles.push(Particle::new(position, velocity, mass));
            }
        }
    }
}

/// Append a disc of particles in the xy-plane, on a regular lattice clipped
/// to the given radius (in lattice units).
pub fn disc(
    particles: &mut Vec<Particle>,
    center: [f64; 3],
    radius: i32,
    spacing: f64,
    mass: f64,
    velocity: [f64; 3],
) {
    let max_offset = (radius - 1) as f64 * spacing;
    for x in (-radius + 1)..radius {
        for y in (-radius + 1)..radius {
            let dx = spacing * x as f64;
            let dy = spacing * y as f64;
            if (dx * dx + dy * dy).sqrt() > max_offset {
                continue;
            }
            let position = [center[0] + dx, center[1] + dy, center[2]];
            particles.push(Particle::new(position, velocity, mass));
        }
    }
}

/// Superpose Maxwell-Boltzmann distributed thermal noise onto every alive
/// particle's velocity. `dimensions` is 2 or 3; in 2-D the z component is
/// left untouched.
pub fn add_brownian_motion(particles: &mut [Particle], mean_velocity: f64, dimensions: usize) {
    let mut rng = rand::thread_rng();
    // Each Cartesian component of a Maxwell-Boltzmann velocity is an
    // independent Gaussian.
    let dist = Normal::new(0.0, mean_velocity).expect("mean velocity must be finite");
    for p in particles.iter_mut() {
        if !p.is_alive() {
            continue;
        }
        let mut v = p.velocity();
        for d in 0..dimensions.min(3) {
            v[d] += dist.sample(&mut rng);
        }
        p.set_velocity(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_generates_expected_lattice() {
        let mut particles = Vec::new();
        cuboid(
            &mut particles,
            [1.0, 1.0, 1.0],
            [2, 3, 4],
            0.5,
            1.0,
            [0.0; 3],
        );
        assert_eq!(particles.len(), 24);
        assert_eq!(particles[0].position(), [1.0, 1.0, 1.0]);
        let last = particles.last().unwrap();
        assert_eq!(last.position(), [1.5, 2.0, 2.5]);
    }

    #[test]
    fn disc_stays_within_radius() {
        let mut particles = Vec::new();
        disc(&mut particles, [0.0, 0.0, 0.0], 4, 1.0, 1.0, [0.0; 3]);
        assert!(!particles.is_empty());
        for p in &particles {
            let [x, y, z] = p.position();
            assert_eq!(z, 0.0);
            assert!((x * x + y * y).sqrt() <= 3.0 + 1e-12);
        }
    }

    #[test]
    fn brownian_motion_2d_leaves_z_unchanged() {
        let mut particles = vec![Particle::new([0.0; 3], [0.0, 0.0, 7.0], 1.0); 16];
        add_brownian_motion(&mut particles, 1.0, 2);
        for p in &particles {
            assert_eq!(p.velocity()[2], 7.0);
        }
    }
}
