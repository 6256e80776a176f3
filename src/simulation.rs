use std::f64::consts::PI;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::info;

use crate::box_::Box_;
use crate::cell_list::CellList;
use crate::error::{Error, Result};
use crate::initialise;
use crate::io;
use crate::mc::{McParams, MonteCarlo};
use crate::particles::Particles;
use crate::patchy_disc::PatchyDisc;

/// Immutable run parameters, in reduced units (lengths in disc diameters,
/// energies in kT). The defaults reproduce the classic thousand-disc demo.
#[derive(Clone, Debug)]
pub struct Config {
    pub particles: usize,
    pub density: f64,
    pub interaction_energy: f64,
    pub interaction_range: f64,
    pub max_interactions: usize,
    pub translation_step: f64,
    pub rotation_step: f64,
    pub prob_translate: f64,
    /// Number of reporting batches.
    pub batches: usize,
    /// Elementary moves per batch, usually ten per particle.
    pub moves_per_batch: usize,
    pub seed: u64,
    /// Trajectory file, appended once per batch; `None` disables it.
    pub trajectory: Option<PathBuf>,
    /// Companion visualization script, written once; `None` disables it.
    pub vmd_script: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particles: 1000,
            density: 0.2,
            interaction_energy: 8.0,
            interaction_range: 0.1,
            max_interactions: 3,
            translation_step: 0.15,
            rotation_step: 0.2,
            prob_translate: 0.5,
            batches: 1000,
            moves_per_batch: 10_000,
            seed: 0,
            trajectory: Some(PathBuf::from("trajectory.xyz")),
            vmd_script: Some(PathBuf::from("vmd.tcl")),
        }
    }
}

impl Config {
    /// Base length of the square box for the configured count and density
    /// (disc diameter is one).
    pub fn base_length(&self) -> f64 {
        ((self.particles as f64 * PI) / (4.0 * self.density)).sqrt()
    }
    fn validate(&self) -> Result<()> {
        if self.particles == 0 {
            return Err(Error::Configuration(
                "at least one particle is required".into(),
            ));
        }
        if self.density <= 0.0 {
            return Err(Error::Configuration(format!(
                "density should be positive, found {}",
                self.density
            )));
        }
        if self.batches == 0 || self.moves_per_batch == 0 {
            return Err(Error::Configuration(format!(
                "batch counts should be positive, found {} batches of {} moves",
                self.batches, self.moves_per_batch
            )));
        }
        Ok(())
    }
}

/// Owns the engine and drives the reporting loop.
pub struct Simulation {
    config: Config,
    mc: MonteCarlo<PatchyDisc>,
    total_moves: u64,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let base_length = config.base_length();
        let box_ = Box_::new([base_length, base_length])?;
        let mut cells =
            CellList::initialise(box_.size(), 1.0 + 0.5 * config.interaction_range)?;
        info!(
            base_length,
            cells_per_side = cells.num_cells()[0],
            "simulation box ready"
        );

        let mut particles = Particles::with_capacity(config.particles);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        initialise::random_configuration(
            &mut particles,
            &mut cells,
            &box_,
            &mut rng,
            config.particles,
        )?;

        let coordinates = particles.flat_positions();
        let orientations = particles.flat_orientations();
        let box_size = *box_.size();

        let model = PatchyDisc::new(
            box_,
            particles,
            cells,
            config.max_interactions,
            config.interaction_energy,
            config.interaction_range,
        )?;
        info!(energy = model.energy(), "interaction model ready");

        let params = McParams {
            translation_step: config.translation_step,
            rotation_step: config.rotation_step,
            prob_translate: config.prob_translate,
            max_interactions: config.max_interactions,
            seed: config.seed.wrapping_add(1),
        };
        // every disc carries patches
        let is_isotropic = vec![false; config.particles];
        let mc = MonteCarlo::new(
            model,
            config.particles,
            coordinates,
            orientations,
            params,
            box_size,
            is_isotropic,
        )?;

        Ok(Self {
            config,
            mc,
            total_moves: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn model(&self) -> &PatchyDisc {
        self.mc.model()
    }
    pub fn total_moves(&self) -> u64 {
        self.total_moves
    }

    /// Run every reporting batch, printing one report line per batch. The
    /// first engine error stops the loop and propagates.
    pub fn run(&mut self) -> Result<()> {
        if let Some(path) = &self.config.vmd_script {
            io::vmd_script(path, self.mc.model().box_().size())?;
        }
        for batch in 0..self.config.batches {
            self.mc.step(self.config.moves_per_batch)?;
            self.total_moves += self.config.moves_per_batch as u64;

            if let Some(path) = &self.config.trajectory {
                io::append_xyz_trajectory(path, self.mc.model().particles(), batch == 0)?;
            }
            println!(
                "sweeps = {}, energy = {:.4}",
                self.total_moves,
                self.mc.model().energy()
            );
        }
        Ok(())
    }
}
