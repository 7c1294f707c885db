//! Timing harness for the simulation kernel
//!
//! Not a criterion suite; just wall-clock loops over the presets and the
//! SAT test, printed to stdout. Run with `rbsim --bench`.

use std::time::Instant;

use crate::simulation::scenario::Scenario;
use crate::simulation::intersect::intersect;
use crate::simulation::stepper::tick;

/// Time full ticks of several presets at their natural body counts
pub fn bench_tick() {
    // (scene index, label)
    let scenes = [
        (0, "single box"),
        (2, "small pile"),
        (5, "stack"),
        (3, "high pile"),
    ];
    let steps = 200;

    for (index, label) in scenes {
        let Scenario {
            mut system,
            parameters,
        } = Scenario::preset(index);
        let n = system.num_bodies();

        // warm up: let the scene make first contact
        for _ in 0..50 {
            tick(&mut system, &parameters);
        }

        let t0 = Instant::now();
        for _ in 0..steps {
            tick(&mut system, &parameters);
        }
        let elapsed = t0.elapsed().as_secs_f64();

        println!(
            "{label:12} N = {n:3}, {steps} ticks in {elapsed:8.4} s ({:7.3} ms/tick)",
            1000.0 * elapsed / steps as f64
        );
    }
}

/// Time the box-box overlap test on the pairs of a settled pile
pub fn bench_intersect() {
    let Scenario {
        mut system,
        parameters,
    } = Scenario::preset(2);
    for _ in 0..400 {
        tick(&mut system, &parameters);
    }

    let n = system.num_bodies();
    let rounds = 10_000;

    let t0 = Instant::now();
    let mut hits = 0usize;
    for _ in 0..rounds {
        for i in 0..n {
            for j in (i + 1)..n {
                if intersect(&system.bodies[i], &system.bodies[j]).is_some() {
                    hits += 1;
                }
            }
        }
    }
    let elapsed = t0.elapsed().as_secs_f64();
    let tests = rounds * n * (n - 1) / 2;

    println!(
        "intersect: {tests} tests ({hits} hits) in {elapsed:8.4} s ({:6.1} ns/test)",
        1.0e9 * elapsed / tests as f64
    );
}
