use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use morph_animation::{compute_stagger, AnimatedFloatValue, Curve, GroupMargin, StaggerConfig};
use morph_core::Bounds;

fn bench_curve_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("Curve::transform");

    let curves = [
        ("linear", Curve::Linear),
        ("standard", Curve::STANDARD),
        ("exp_in_out", Curve::EXP_IN_OUT),
        ("spring", Curve::SPRING),
        ("shared_standard", Curve::shared(Curve::STANDARD, 0.25, 0.75)),
    ];

    for (name, curve) in curves.iter() {
        group.bench_with_input(BenchmarkId::new("sweep_100", name), curve, |b, curve| {
            b.iter(|| {
                let mut sum = 0.0;
                for step in 0..=100 {
                    sum += curve.transform(black_box(step as f32 / 100.0));
                }
                sum
            })
        });
    }

    group.finish();
}

fn bench_value_at(c: &mut Criterion) {
    let value = AnimatedFloatValue::new(0.0, 360.0)
        .with_curve(Curve::STANDARD)
        .with_duration_offsets(0.1, 0.9)
        .unwrap();

    c.bench_function("AnimatedValue::value_at", |b| {
        b.iter(|| value.value_at(black_box(0.42)))
    });
}

fn bench_stagger(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_stagger");

    for &count in &[16usize, 256, 1024] {
        let nodes: Vec<(usize, Bounds)> = (0..count)
            .map(|i| {
                let column = (i % 32) as f32;
                let row = (i / 32) as f32;
                (i, Bounds::new(column * 20.0, row * 20.0, 18.0, 18.0))
            })
            .collect();
        let config = StaggerConfig::new(0.5)
            .unwrap()
            .with_margin(GroupMargin::Relative(0.1));

        group.bench_with_input(BenchmarkId::new("grid", count), &nodes, |b, nodes| {
            b.iter(|| compute_stagger(&config, nodes, 1000.0))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_curve_transform, bench_value_at, bench_stagger);
criterion_main!(benches);
