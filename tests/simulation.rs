use pdmc::{Config, Simulation};

/// End-to-end run on a small system: every batch completes, the move
/// accounting matches, the incremental energy agrees with a fresh
/// recomputation, and the cell list still mirrors particle positions.
#[test]
fn small_run_keeps_the_model_consistent() -> pdmc::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = Config {
        particles: 64,
        batches: 20,
        moves_per_batch: 640,
        seed: 7,
        trajectory: Some(dir.path().join("trajectory.xyz")),
        vmd_script: Some(dir.path().join("vmd.tcl")),
        ..Config::default()
    };
    let mut simulation = Simulation::new(config)?;
    simulation.run()?;
    assert_eq!(simulation.total_moves(), 20 * 640);

    let model = simulation.model();
    assert!(model.energy().is_finite());
    assert!((model.energy() - model.compute_total_energy()).abs() < 1e-9);

    let cells = model.cells();
    for (i, position) in model.particles().positions.iter().enumerate() {
        assert_eq!(cells.cell_of_particle(i), cells.cell_of(position));
    }

    let contents = std::fs::read_to_string(dir.path().join("trajectory.xyz"))?;
    let frames = contents.lines().filter(|line| *line == "64").count();
    assert_eq!(frames, 20);
    assert!(dir.path().join("vmd.tcl").exists());
    Ok(())
}

/// Hard discs stay hard: after a long run no pair sits closer than one
/// diameter.
#[test]
fn no_overlaps_survive_a_run() -> pdmc::Result<()> {
    let config = Config {
        particles: 48,
        batches: 10,
        moves_per_batch: 480,
        seed: 21,
        trajectory: None,
        vmd_script: None,
        ..Config::default()
    };
    let mut simulation = Simulation::new(config)?;
    simulation.run()?;

    let model = simulation.model();
    let positions = &model.particles().positions;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let sep = model.box_().separation(&positions[i], &positions[j]);
            let distance = (sep[0] * sep[0] + sep[1] * sep[1]).sqrt();
            assert!(
                distance >= 1.0,
                "particles {} and {} overlap at distance {}",
                i,
                j,
                distance
            );
        }
    }
    Ok(())
}
