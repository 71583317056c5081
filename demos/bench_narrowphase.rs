use glam::Vec2;
use std::time::Instant;
use wobble::narrowphase::Narrowphase;
use wobble::*;

fn main() {
    let n = 1_000_000u32;
    let half = Vec2::new(30.0, 30.0);

    let mut acc = 0.0f32;
    let start = Instant::now();
    for i in 0..n {
        let t = (i as f32) * 0.001;
        let c = Vec2::new(t.sin() * 40.0, -25.0);
        if let Some(ov) = Narrowphase::overlap_circle_rect(c, 2.0, Vec2::ZERO, half, 0.3) {
            acc += ov.depth;
        }
    }
    println!("circle_rect {} iters in {:?} acc={}", n, start.elapsed(), acc);

    let mut acc = 0.0f32;
    let start = Instant::now();
    for i in 0..n {
        let t = (i as f32) * 0.001;
        let c0 = Vec2::new(3.0 * t.sin(), 0.0);
        if let Some(ov) = Narrowphase::overlap_circle_circle(c0, 2.0, Vec2::ZERO, 2.0) {
            acc += ov.depth;
        }
    }
    println!("circle_circle {} iters in {:?} acc={}", n, start.elapsed(), acc);
}
