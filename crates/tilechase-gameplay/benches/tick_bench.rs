use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tilechase_gameplay::{populate, CountPair, ScriptedInput, SpawnSettings, World};
use tilechase_kernel::{Grid, GridMapData};

fn populated_world(prey: u32, predators: u32) -> World {
    let grid = Grid::new(GridMapData::walled(64, 64, 128)).expect("valid grid");
    let mut world = World::new(grid, 0xC0FFEE);
    let settings = SpawnSettings {
        prey_count: CountPair { fast: prey / 2, slow: prey - prey / 2 },
        predator_count: CountPair {
            fast: predators / 2,
            slow: predators - predators / 2,
        },
        ..SpawnSettings::default()
    };
    populate(&mut world, &settings).expect("populate");
    world
}

fn bench_world_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    for (prey, predators) in [(12, 2), (200, 40), (1000, 200)] {
        group.bench_function(format!("prey{prey}_predators{predators}"), |b| {
            b.iter_batched(
                || (populated_world(prey, predators), ScriptedInput::patrol(32)),
                |(mut world, mut input)| {
                    for _ in 0..64 {
                        world.tick(&mut input);
                        black_box(world.resolve_contacts());
                    }
                    world
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_world_tick);
criterion_main!(benches);
