use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use opskit::account::PasswordGenerator;
use opskit::config::PasswordPolicy;

pub fn generate_os_rng(c: &mut Criterion) {
    let generator = PasswordGenerator::new(&PasswordPolicy::default()).unwrap();

    c.bench_function("generate_os_rng", |b| {
        b.iter(|| generator.generate());
    });
}

pub fn generate_seeded(c: &mut Criterion) {
    const NUM_PASSWORDS: usize = 100;

    let generator = PasswordGenerator::new(&PasswordPolicy::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("generate_seeded", |b| {
        b.iter(|| {
            for _ in 0..NUM_PASSWORDS {
                generator.generate_with(&mut rng);
            }
        });
    });
}

criterion_group!(benches, generate_os_rng, generate_seeded);
criterion_main!(benches);
