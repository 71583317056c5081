use glam::Vec2;
use wobble::scene::BoundaryBox;
use wobble::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn build(blobs: usize, body_radius: f32, cell_size: f32, seed0: u32) -> Result<Engine, SimError> {
    let mut engine = Engine::new(EngineConfig::default().with_cell_size(cell_size).with_timing(true))?;
    BoundaryBox::new(2000.0, 1200.0).build(&mut engine)?;
    let mut seed = seed0;
    for _ in 0..blobs {
        let x = (lcg(&mut seed) as f32 / u32::MAX as f32) * 1600.0 + 200.0;
        let y = (lcg(&mut seed) as f32 / u32::MAX as f32) * 300.0 + 100.0;
        engine.create_blob(Vec2::new(x, y), 60.0, body_radius, 2.0, 0.005)?;
    }
    Ok(engine)
}

fn main() -> Result<(), SimError> {
    let cell_sizes = [16.0f32, 32.0, 64.0, 128.0];
    let body_radii = [3.75f32, 2.0, 1.0];
    let steps = 120;
    println!("blobs,bodies,constraints,cell_size,step_ms,broad_ms,narrow_ms,solve_ms,unique_pairs,contacts");
    for &r in &body_radii {
        for &cs in &cell_sizes {
            let mut engine = build(4, r, cs, 7)?;
            let mut total = StepTiming::default();
            let mut contacts = 0;
            for _ in 0..steps {
                let report = engine.step(1.0 / 60.0);
                contacts = report.contacts;
                let t = report.timing.unwrap_or_default();
                total.step_ms += t.step_ms;
                total.broadphase_ms += t.broadphase_ms;
                total.narrowphase_ms += t.narrowphase_ms;
                total.solve_ms += t.solve_ms;
            }
            let n = steps as f64;
            let stats = engine.broadphase_stats();
            println!(
                "{},{},{},{},{:.3},{:.3},{:.3},{:.3},{},{}",
                4,
                engine.world().body_count(),
                engine.world().constraint_count(),
                cs,
                total.step_ms / n,
                total.broadphase_ms / n,
                total.narrowphase_ms / n,
                total.solve_ms / n,
                stats.unique_pairs,
                contacts
            );
        }
    }
    Ok(())
}
