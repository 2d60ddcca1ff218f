//! End-to-end: generate a field, deploy, run, sweep, read the logs back

use firesense::{Location, RunConfig, SensorKind};
use firesense_sim::logs::{read_csv, EXPERIMENT_LOG, TRANSMISSION_LOG};
use firesense_sim::{
    parse_timestamp, run_sweep, Deployment, ExperimentRow, Simulation, SweepConfig, TimeWindow,
    TransmissionRow,
};
use firesense_testdata::{generate_field, FireField, FireScenario, GeneratorConfig, GridSpec};
use tempfile::tempdir;

fn field_on_disk(dir: &std::path::Path) -> (GridSpec, FireField) {
    let grid = GridSpec::new(Location::new(0.0, 0.0), 250.0, 16, 16);
    let config = GeneratorConfig::new().with_num_timesteps(72).with_seed(2016);
    let field = generate_field(&grid, &FireScenario::grassland(&grid), &config).unwrap();
    field.save(dir).unwrap();
    (grid, FireField::load(dir).unwrap())
}

#[test]
fn test_run_writes_consistent_logs() {
    let data = tempdir().unwrap();
    let results = tempdir().unwrap();
    let (grid, field) = field_on_disk(data.path());

    let deployment = Deployment::scatter(grid.center(), 1500.0, 15, 15, Some(5)).unwrap();
    let window = TimeWindow::new(
        Some(parse_timestamp("2016-05-01 12:00:00").unwrap()),
        Some(parse_timestamp("2016-05-03 12:00:00").unwrap()),
    )
    .unwrap();

    let mut sim = Simulation::new(&deployment, &RunConfig::default(), window, Some(8)).unwrap();
    let log = sim.run(&field, field.timestamps());
    assert_eq!(log.timesteps, 49);
    log.save(results.path()).unwrap();

    let experiment: Vec<ExperimentRow> = read_csv(results.path().join(EXPERIMENT_LOG)).unwrap();
    let transmissions: Vec<TransmissionRow> =
        read_csv(results.path().join(TRANSMISSION_LOG)).unwrap();

    assert_eq!(experiment.len(), log.experiment.len());
    assert_eq!(transmissions.len(), log.transmissions.len());

    // typical sensors inside the grid transmit every observation
    let typical_obs = experiment
        .iter()
        .filter(|r| r.sensor_type == SensorKind::Baseline)
        .count();
    let typical_tx = transmissions
        .iter()
        .filter(|t| t.sensor_type == SensorKind::Baseline)
        .count();
    assert_eq!(typical_obs, typical_tx);
    assert!(log.hotspot_recovery_rate(SensorKind::Baseline) <= 1.0);

    let universal = log.summary(SensorKind::Adaptive);
    assert!((universal.transmissions as usize) < typical_tx);
    for t in transmissions.iter().filter(|t| t.sensor_type == SensorKind::Adaptive) {
        let rate = t.sampling_rate.unwrap();
        assert!((0.0..=1.0).contains(&rate));
    }
}

#[test]
fn test_sweep_over_generated_field() {
    let data = tempdir().unwrap();
    let (grid, field) = field_on_disk(data.path());
    let deployment = Deployment::scatter(grid.center(), 1500.0, 0, 10, Some(6)).unwrap();

    let sweep = SweepConfig {
        kl_thresholds: vec![0.5, 2.0],
        error_histories: vec![5, 20],
    };
    let rows = run_sweep(
        &sweep,
        &RunConfig::default(),
        &deployment,
        &field,
        field.timestamps(),
        TimeWindow::default(),
        Some(1),
    )
    .unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows.iter()
            .map(|r| (r.kl_threshold, r.error_history))
            .collect::<Vec<_>>(),
        vec![(0.5, 5), (0.5, 20), (2.0, 5), (2.0, 20)]
    );
    for row in &rows {
        assert!(row.energy_j >= 0.0);
        assert!((0.0..=1.0).contains(&row.hotspot_recovery_rate));
    }
}
