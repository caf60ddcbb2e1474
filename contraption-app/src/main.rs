use anyhow::Context;
use contraption::{
    Bodies, Body, BodyOptions, ConstraintOptions, Engine, EngineConfig, Runner, RunnerConfig,
    Vector,
};
use log::info;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;

fn walls() -> anyhow::Result<Vec<Body>> {
    let fixed = || BodyOptions {
        is_static: true,
        label: "Wall".to_string(),
        ..Default::default()
    };
    Ok(vec![
        Bodies::rectangle(WIDTH / 2.0, HEIGHT + 25.0, WIDTH, 50.0, fixed())?,
        Bodies::rectangle(-25.0, HEIGHT / 2.0, 50.0, HEIGHT, fixed())?,
        Bodies::rectangle(WIDTH + 25.0, HEIGHT / 2.0, 50.0, HEIGHT, fixed())?,
    ])
}

fn build_scene(engine: &mut Engine) -> anyhow::Result<()> {
    for wall in walls()? {
        engine.world.add_body(wall);
    }

    // Pyramid of crates
    let size = 40.0;
    for row in 0..6 {
        let count = 6 - row;
        let left = 100.0 + f64::from(row) * size / 2.0;
        for col in 0..count {
            let x = left + f64::from(col) * size;
            let y = HEIGHT - size / 2.0 - f64::from(row) * size;
            engine
                .world
                .add_body(Bodies::rectangle(x, y, size, size, BodyOptions::default())?);
        }
    }

    // Falling shapes
    let bouncy = || BodyOptions {
        restitution: 0.6,
        ..Default::default()
    };
    engine
        .world
        .add_body(Bodies::circle(450.0, 50.0, 25.0, bouncy(), None)?);
    engine
        .world
        .add_body(Bodies::polygon(520.0, 80.0, 5, 30.0, bouncy())?);
    engine
        .world
        .add_body(Bodies::trapezoid(380.0, 120.0, 60.0, 30.0, 0.4, BodyOptions::default())?);

    // L-shaped composite
    let arm = Bodies::rectangle(300.0, 40.0, 80.0, 20.0, BodyOptions::default())?;
    let leg = Bodies::rectangle(270.0, 70.0, 20.0, 40.0, BodyOptions::default())?;
    engine.world.add_body(Body::new(BodyOptions {
        label: "Composite".to_string(),
        parts: vec![arm, leg],
        ..Default::default()
    })?);

    // Pendulum hanging from a world point
    let bob = engine
        .world
        .add_body(Bodies::circle(700.0, 200.0, 20.0, BodyOptions::default(), None)?);
    engine.world.constrain(
        None,
        Some(bob),
        ConstraintOptions {
            point_a: Vector::new(600.0, 50.0),
            ..Default::default()
        },
    )?;

    info!(
        "scene: {} bodies, {} constraints",
        engine.world.bodies().len(),
        engine.world.constraints().len()
    );
    Ok(())
}

fn report(engine: &Engine) {
    let bodies = engine.world.bodies();
    let sleeping = bodies.iter().filter(|b| b.is_sleeping()).count();
    let moving = bodies
        .iter()
        .filter(|b| !b.is_static() && !b.is_sleeping())
        .count();
    info!(
        "t = {:.0} ms: {} moving, {} sleeping, {} pairs",
        engine.timing.timestamp,
        moving,
        sleeping,
        engine.pairs().len()
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let seconds: u32 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid duration in seconds: `{arg}`"))?,
        None => 10,
    };

    let mut engine = Engine::new(EngineConfig {
        enable_sleeping: true,
        ..Default::default()
    });
    build_scene(&mut engine)?;

    let mut runner = Runner::new(RunnerConfig::default())?;
    let fps = runner.config().fps;
    let frame = 1000.0 / fps;
    let frames = seconds * fps as u32;

    let mut contacts_started = 0;
    for i in 0..frames {
        runner.tick(&mut engine, f64::from(i) * frame);
        contacts_started += engine.collision_start().len();
        if i % fps as u32 == 0 {
            report(&engine);
        }
    }

    report(&engine);
    info!("{contacts_started} contacts started over {seconds} s");
    for body in engine.world.bodies().iter().filter(|b| !b.is_static()) {
        let position = body.position();
        info!(
            "{} {}: ({:.1}, {:.1}) angle {:.3}",
            body.label,
            body.id(),
            position.x,
            position.y,
            body.angle()
        );
    }
    Ok(())
}
