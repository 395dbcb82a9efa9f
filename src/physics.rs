//! Force laws and integration formulas the grid is driven with.
//!
//! The pair functions return the force acting on `p1`; the caller adds it to
//! `p1` and subtracts it from `p2`.

use crate::particle::Particle;

pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let x = a[0] - b[0];
    let y = a[1] - b[1];
    let z = a[2] - b[2];
    (x * x + y * y + z * z).sqrt()
}

/// Separation below which the Lennard-Jones force turns repulsive,
/// 2^(1/6) * sigma. Used as the ghost-creation gate.
pub fn repulsion_distance(sigma: f64) -> f64 {
    2.0_f64.powf(1.0 / 6.0) * sigma
}

/// Lennard-Jones 12-6 force on `p1`:
/// F_ij = -24 eps / r^2 * ((sigma/r)^6 - 2 (sigma/r)^12) * (x_i - x_j)
pub fn lennard_jones_force(p1: &Particle, p2: &Particle, sigma: f64, epsilon: f64) -> [f64; 3] {
    let xi = p1.position();
    let xj = p2.position();
    let r = distance(&xi, &xj);
    let sr6 = (sigma / r).powi(6);
    let coeff = -(24.0 * epsilon) / (r * r) * (sr6 - 2.0 * sr6 * sr6);
    [
        coeff * (xi[0] - xj[0]),
        coeff * (xi[1] - xj[1]),
        coeff * (xi[2] - xj[2]),
    ]
}

/// Gravitational force on `p1`:
/// F_ij = m_i m_j / |x_i - x_j|^3 * (x_j - x_i)
pub fn planet_force(p1: &Particle, p2: &Particle) -> [f64; 3] {
    let xi = p1.position();
    let xj = p2.position();
    let coeff = p1.mass() * p2.mass() / distance(&xi, &xj).powi(3);
    [
        coeff * (xj[0] - xi[0]),
        coeff * (xj[1] - xi[1]),
        coeff * (xj[2] - xi[2]),
    ]
}

/// Störmer-Verlet position update:
/// x(t+dt) = x + dt v + dt^2 F / 2m
pub fn step_position(p: &Particle, delta_t: f64) -> [f64; 3] {
    let x = p.position();
    let v = p.velocity();
    let f = p.force();
    let coeff = delta_t * delta_t / (2.0 * p.mass());
    [
        x[0] + delta_t * v[0] + coeff * f[0],
        x[1] + delta_t * v[1] + coeff * f[1],
        x[2] + delta_t * v[2] + coeff * f[2],
    ]
}

/// Störmer-Verlet velocity update:
/// v(t+dt) = v + dt (F_old + F) / 2m
pub fn step_velocity(p: &Particle, delta_t: f64) -> [f64; 3] {
    let v = p.velocity();
    let f = p.force();
    let of = p.old_force();
    let coeff = delta_t / (2.0 * p.mass());
    [
        v[0] + coeff * (of[0] + f[0]),
        v[1] + coeff * (of[1] + f[1]),
        v[2] + coeff * (of[2] + f[2]),
    ]
}
