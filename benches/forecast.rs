use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meteocast::{
    build_classifier_features, build_lag_pairs, forecast, DirectionEncoder, ForestParams,
    HistoricalRecord, NumericField, RainClassifier, TrendRegressor, COMPASS_LABELS,
};

fn synthetic_records(n: usize) -> Vec<HistoricalRecord> {
    (0..n)
        .map(|i| {
            let phase = i as f64 / 12.0;
            HistoricalRecord {
                min_temp: 14.0 + 4.0 * phase.sin(),
                max_temp: 26.0 + 4.0 * phase.sin(),
                wind_gust_dir: COMPASS_LABELS[i % COMPASS_LABELS.len()].to_string(),
                wind_gust_speed: 20.0 + (i % 30) as f64,
                humidity: 60.0 + 25.0 * phase.cos(),
                pressure: 1010.0 + (i % 15) as f64,
                temp: 20.0 + 5.0 * phase.sin(),
                rain_tomorrow: if phase.cos() > 0.3 { "Yes" } else { "No" }.to_string(),
            }
        })
        .collect()
}

fn bench_forecast(c: &mut Criterion) {
    let records = synthetic_records(1_000);
    let directions = DirectionEncoder::new();
    let training = build_classifier_features(&records, &directions).unwrap();
    let temp_pairs = build_lag_pairs(&records, NumericField::Temp);
    let classifier_params = ForestParams::classifier();
    let regressor_params = ForestParams::regressor();

    c.bench_function("train_rain_classifier", |b| {
        b.iter(|| RainClassifier::train(black_box(&training), &classifier_params))
    });
    c.bench_function("train_trend_regressor", |b| {
        b.iter(|| TrendRegressor::train(black_box(&temp_pairs), &regressor_params))
    });

    let temp_model = TrendRegressor::train(&temp_pairs, &regressor_params).unwrap();
    c.bench_function("forecast_5_steps", |b| {
        b.iter(|| forecast(&temp_model, black_box(20.0), 5))
    });
}

criterion_group!(benches, bench_forecast);
criterion_main!(benches);
