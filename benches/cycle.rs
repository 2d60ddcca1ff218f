//! Benchmarks for the FireSense sensing cycle

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use firesense::*;

struct Drift {
    start: DateTime<Utc>,
}

impl Environment for Drift {
    fn lookup(&self, _location: Location, timestamp: DateTime<Utc>) -> Option<EnvironmentalReading> {
        let h = (timestamp - self.start).num_hours() as f64;
        Some(
            EnvironmentalReading::empty(timestamp)
                .with_temperature(20.0 + (h * 0.3).sin() * 4.0)
                .with_wind_speed(12.0 + (h * 0.7).cos())
                .with_relative_humidity(35.0)
                .with_hotspot(false)
                .with_fwi(9.0),
        )
    }
}

fn timestamps(start: DateTime<Utc>, count: i64) -> Vec<DateTime<Utc>> {
    (0..count).map(|i| start + Duration::hours(i)).collect()
}

fn bench_adaptive(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive");

    let start = Utc.with_ymd_and_hms(2016, 5, 1, 0, 0, 0).unwrap();
    let env = Drift { start };
    let steps = timestamps(start, 1000);
    let config = RunConfig::default();
    let base = Location::new(0.0, 0.0);

    group.throughput(Throughput::Elements(1000));

    group.bench_function("step_1000_timesteps", |b| {
        b.iter(|| {
            let mut sensor =
                AdaptiveSensor::new(0, Location::new(250.0, 40.0), base, &config).unwrap();
            let mut rng = SeededRandomness::from_seed(7);
            for ts in &steps {
                black_box(sensor.step(&env, *ts, &mut rng));
            }
        })
    });

    group.finish();
}

fn bench_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("baseline");

    let start = Utc.with_ymd_and_hms(2016, 5, 1, 0, 0, 0).unwrap();
    let env = Drift { start };
    let steps = timestamps(start, 1000);
    let config = RunConfig::default();

    group.throughput(Throughput::Elements(1000));

    group.bench_function("step_1000_timesteps", |b| {
        b.iter(|| {
            let mut sensor = BaselineSensor::new(
                0,
                Location::new(250.0, 40.0),
                Location::new(0.0, 0.0),
                &config,
            )
            .unwrap();
            let mut rng = SeededRandomness::from_seed(7);
            for ts in &steps {
                black_box(sensor.step(&env, *ts, &mut rng));
            }
        })
    });

    group.finish();
}

fn bench_entropy(c: &mut Criterion) {
    let mut history = ErrorHistory::new(30).unwrap();
    for i in 0..30 {
        history.push(((i * 7) % 11) as f64 + 0.5);
    }

    c.bench_function("normalized_entropy_30", |b| {
        b.iter(|| black_box(history.normalized_entropy()))
    });
}

criterion_group!(benches, bench_adaptive, bench_baseline, bench_entropy);
criterion_main!(benches);
