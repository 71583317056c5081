use std::ops::ControlFlow;

use wobble::scene::classic_scene;
use wobble::*;

fn main() -> Result<(), SimError> {
    let mut scene = classic_scene(1280.0, 720.0, EngineConfig::default().with_timing(true))?;
    let blob = scene.blob;
    let mut runner = Runner::new(RunnerConfig::default())?;
    let mut clock = SleepClock::sixty_hz();

    // Five seconds: drift right for two, hop once, then let it settle
    runner.run(&mut scene.engine, &mut clock, |engine, report| {
        let tick = engine.tick();
        engine.set_directional_input(Direction::Right, (60..180).contains(&tick));
        engine.set_directional_input(Direction::Up, (180..190).contains(&tick));

        for w in &report.warnings {
            println!("warning: {}", w);
        }
        if report.frame % 30 == 0 {
            if let Some(b) = engine.bounds(blob) {
                let c = b.center();
                let ms = engine.timing().map(|t| t.step_ms).unwrap_or_default();
                println!(
                    "tick={} center=({:.1},{:.1}) size=({:.1},{:.1}) contacts={} step={:.3}ms",
                    tick,
                    c.x,
                    c.y,
                    b.size().x,
                    b.size().y,
                    report.contacts,
                    ms
                );
            }
        }
        if tick >= 300 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    });
    Ok(())
}
