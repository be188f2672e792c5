//! Physics Demos headless runner
//!
//! Builds each demo scene, runs it at 60 Hz for a fixed number of frames and
//! logs a summary. Set `RUST_LOG=info` (or `debug`, `trace`) to see output.
//!
//! Usage: `physics-demos [frames] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use glam::DVec2;
    use physics_demos::consts::FRAME_DT;
    use physics_demos::scene;
    use physics_demos::sim::{IntegrationMode, WireConstraint};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let frames: u32 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 600,
    };
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 42,
    };
    log::info!("Physics Demos (headless) frames={frames} seed={seed}");

    // Cannonball under every integrator, same start
    for mode in IntegrationMode::ALL {
        let mut world = scene::cannonball()?;
        world.config.mode = mode;
        for _ in 0..frames {
            world.step(FRAME_DT);
        }
        let ball = &world.bodies()[0];
        log::info!(
            "cannonball [{}]: pos=({:.3}, {:.3}) energy={:.4}",
            mode.as_str(),
            ball.pos.x,
            ball.pos.y,
            world.kinetic_energy()
        );
    }

    let mut billiard = scene::billiard(seed, 20, 20.0, 12.0)?;
    let initial = billiard.kinetic_energy();
    let mut contacts = 0;
    for _ in 0..frames {
        contacts += billiard.step(FRAME_DT).len();
    }
    log::info!(
        "billiard: contacts={contacts} energy {initial:.4} -> {:.4} momentum={:?}",
        billiard.kinetic_energy(),
        billiard.momentum()
    );

    let mut pinball = scene::pinball()?;
    for frame in 0..frames {
        // Tap both flippers once a second
        let pressed = frame % 60 < 10;
        pinball.activate_flipper(0, pressed);
        pinball.activate_flipper(1, pressed);
        pinball.step(FRAME_DT);
    }
    log::info!("pinball: score={} energy={:.4}", pinball.score(), pinball.kinetic_energy());

    let wire = WireConstraint::new(DVec2::new(1.0, 1.0), 0.8)?;
    let mut single = scene::single_bead(wire)?;
    for _ in 0..frames {
        single.step(FRAME_DT);
    }
    log::info!(
        "single bead: force={:.4} analytic={:.4}",
        single.constraint_force(),
        single.analytic_force()
    );

    let mut beads = scene::bead_ring(seed, 10, None, wire)?;
    for _ in 0..frames {
        beads.step(FRAME_DT);
    }
    log::info!(
        "bead ring: beads={} energy={:.4} force={:.4}",
        beads.beads().len(),
        beads.kinetic_energy(),
        beads.constraint_force()
    );

    let mut ball3 = scene::cannonball3d();
    ball3.start();
    for _ in 0..frames {
        ball3.step(FRAME_DT);
    }
    log::info!("cannonball 3d: pos={:?}", ball3.pos);

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by a web front end; nothing to run here
}
