use glam::Vec2;
use wobble::scene::BoundaryBox;
use wobble::*;

fn main() -> Result<(), SimError> {
    let mut engine = Engine::default();
    let blob = engine.create_blob(Vec2::new(300.0, 300.0), 60.0, 4.0, 2.0, 0.005)?;
    BoundaryBox::new(800.0, 600.0).with_platform(false).build(&mut engine)?;

    let dt = 1.0 / 60.0;
    for _ in 0..60 {
        engine.step(dt);
    }

    // Grab the rightmost body and sweep the pointer to the right
    let grab = engine
        .world()
        .all_bodies(blob)
        .into_iter()
        .filter_map(|id| engine.world().body(id))
        .max_by(|a, b| a.position.x.total_cmp(&b.position.x))
        .map(|b| b.position)
        .unwrap_or(Vec2::new(360.0, 300.0));
    match engine.update_pointer(grab, true) {
        Some(PointerEvent::Grabbed(id)) => println!("grabbed {:?} at ({:.1},{:.1})", id, grab.x, grab.y),
        other => println!("no grab: {:?}", other),
    }

    for i in 0..120 {
        let target = grab + Vec2::new(2.0 * i as f32, -1.0 * i as f32);
        engine.set_pointer(target, true);
        let report = engine.step(dt);
        if i % 20 == 0 {
            let b = engine.bounds(blob).unwrap_or_default();
            println!(
                "tick={} pointer=({:.1},{:.1}) center=({:.1},{:.1}) warnings={}",
                report.tick,
                target.x,
                target.y,
                b.center().x,
                b.center().y,
                report.warnings.len()
            );
        }
    }

    println!("release: {:?}", engine.update_pointer(grab, false));
    for _ in 0..120 {
        engine.step(dt);
    }
    let b = engine.bounds(blob).unwrap_or_default();
    println!("settled center=({:.1},{:.1})", b.center().x, b.center().y);
    Ok(())
}
