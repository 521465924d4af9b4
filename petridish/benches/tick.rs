use criterion::{Criterion, criterion_group, criterion_main};
use petridish::Simulation;
use petridish::config::{Settings, Surface};
use petridish::genome::Team;
use std::hint::black_box;
use std::time::Duration;

// the collision pass is all-pairs, so this mostly measures that
fn crowded(n: usize) -> Simulation {
    let mut sim = Simulation::new(1234, Surface::default());
    for i in 0..n {
        sim.spawn(Team::ALL[i % Team::ALL.len()], (i % 4) as u32, None);
    }
    sim
}

fn bench_tick(c: &mut Criterion) {
    let settings = Settings::default();
    for n in [50, 250] {
        c.bench_function(&format!("tick {}", n), |b| {
            b.iter_batched(
                || crowded(n),
                |mut sim| {
                    let snap = sim.tick(Duration::from_millis(16), &settings).unwrap();
                    black_box(snap)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
