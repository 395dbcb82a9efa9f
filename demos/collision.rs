//! Two-cuboid collision: a small fast block hits a large resting one inside
//! a reflective box. Run with `RUST_LOG=info` for per-interval reports.

use lcmd::{init, physics, BorderType, LinkedCells, Particle};

const SIGMA: f64 = 1.0;
const EPSILON: f64 = 5.0;
const CUTOFF: f64 = 3.0;
const DELTA_T: f64 = 0.0005;
const STEPS: usize = 2000;
const REPORT_EVERY: usize = 100;

fn main() -> lcmd::Result<()> {
    env_logger::init();

    let mut particles = Vec::new();
    init::cuboid(
        &mut particles,
        [2.0, 2.0, 0.0],
        [40, 8, 1],
        1.1225,
        1.0,
        [0.0; 3],
    );
    init::cuboid(
        &mut particles,
        [18.0, 16.0, 0.0],
        [8, 8, 1],
        1.1225,
        1.0,
        [0.0, -10.0, 0.0],
    );
    init::add_brownian_motion(&mut particles, 0.1, 2);

    let mut grid = LinkedCells::new(
        particles,
        [50.0, 30.0, 1.0],
        CUTOFF,
        true,
        physics::repulsion_distance(SIGMA),
        DELTA_T,
        [
            BorderType::Reflection,
            BorderType::Reflection,
            BorderType::Outflow,
            BorderType::Reflection,
            BorderType::Reflection,
            BorderType::Outflow,
        ],
    )?;

    let force = |a: &Particle, b: &Particle| physics::lennard_jones_force(a, b, SIGMA, EPSILON);

    // Prime the force slots so the first velocity update has a valid old force.
    grid.refresh_ghosts();
    grid.apply(force);

    for step in 1..=STEPS {
        grid.apply_to_particles(|p| {
            let x = physics::step_position(p, DELTA_T);
            p.set_position(x);
        });
        grid.migrate()?;
        grid.refresh_ghosts();
        grid.apply(force);
        grid.apply_to_particles(|p| {
            let v = physics::step_velocity(p, DELTA_T);
            p.set_velocity(v);
        });

        if step % REPORT_EVERY == 0 {
            let kinetic: f64 = grid
                .iter_alive()
                .map(|p| {
                    let v = p.velocity();
                    0.5 * p.mass() * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2])
                })
                .sum();
            log::info!(
                "step {:4}  t = {:.4}  alive = {}  kinetic = {:.3}",
                step,
                step as f64 * DELTA_T,
                grid.alive_count(),
                kinetic
            );
        }
    }

    println!(
        "finished {} steps, {} particles alive",
        STEPS,
        grid.alive_count()
    );
    Ok(())
}
