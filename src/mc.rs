use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{Error, Result};
use crate::model::InteractionModel;

/// Engine parameters, in reduced units (energies in kT, lengths in disc
/// diameters).
#[derive(Clone, Copy, Debug)]
pub struct McParams {
    /// Largest trial displacement along each axis.
    pub translation_step: f64,
    /// Largest trial rotation angle in radians.
    pub rotation_step: f64,
    /// Probability of attempting a translation rather than a rotation.
    pub prob_translate: f64,
    /// Interaction cap per particle, enforced at trial evaluation.
    pub max_interactions: usize,
    /// Seed for the engine's deterministic random stream.
    pub seed: u64,
}

/// Single-particle Metropolis Monte Carlo engine.
///
/// Owns the interaction model plus contiguous copies of every coordinate
/// and orientation. Each elementary trial is evaluated, decided and applied
/// in full before the next begins; accepted moves are mirrored into the
/// model through its post-move callback.
pub struct MonteCarlo<M: InteractionModel> {
    model: M,
    n_particles: usize,
    coordinates: Vec<f64>,
    orientations: Vec<f64>,
    box_size: [f64; 2],
    is_isotropic: Vec<bool>,
    params: McParams,
    rng: Xoshiro256PlusPlus,
    attempted: u64,
    accepted: u64,
}

impl<M: InteractionModel> MonteCarlo<M> {
    pub fn new(
        model: M,
        n_particles: usize,
        coordinates: Vec<f64>,
        orientations: Vec<f64>,
        params: McParams,
        box_size: [f64; 2],
        is_isotropic: Vec<bool>,
    ) -> Result<Self> {
        if n_particles == 0 {
            return Err(Error::Configuration(
                "at least one particle is required".into(),
            ));
        }
        if coordinates.len() != 2 * n_particles || orientations.len() != 2 * n_particles {
            return Err(Error::Configuration(format!(
                "coordinate buffers should hold {} entries, found {} and {}",
                2 * n_particles,
                coordinates.len(),
                orientations.len()
            )));
        }
        if is_isotropic.len() != n_particles {
            return Err(Error::Configuration(format!(
                "one isotropy flag per particle is required, found {}",
                is_isotropic.len()
            )));
        }
        if params.translation_step <= 0.0 || params.rotation_step <= 0.0 {
            return Err(Error::Configuration(format!(
                "move step sizes should be positive, found {} and {}",
                params.translation_step, params.rotation_step
            )));
        }
        if !(0.0..=1.0).contains(&params.prob_translate) {
            return Err(Error::Configuration(format!(
                "translation probability should lie in [0, 1], found {}",
                params.prob_translate
            )));
        }
        Ok(Self {
            model,
            n_particles,
            coordinates,
            orientations,
            box_size,
            is_isotropic,
            rng: Xoshiro256PlusPlus::seed_from_u64(params.seed),
            params,
            attempted: 0,
            accepted: 0,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }
    pub fn attempted(&self) -> u64 {
        self.attempted
    }
    pub fn accepted(&self) -> u64 {
        self.accepted
    }
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }
    pub fn orientations(&self) -> &[f64] {
        &self.orientations
    }

    /// Attempt `moves` elementary trials.
    pub fn step(&mut self, moves: usize) -> Result<()> {
        for _ in 0..moves {
            self.trial()?;
        }
        Ok(())
    }

    fn trial(&mut self) -> Result<()> {
        self.attempted += 1;
        let i = self.rng.gen_range(0..self.n_particles);
        let position = [self.coordinates[2 * i], self.coordinates[2 * i + 1]];
        let orientation = [self.orientations[2 * i], self.orientations[2 * i + 1]];

        let current = self.model.compute_energy(i, &position, &orientation);
        if !current.is_finite() {
            // an accepted state should never overlap
            return Err(Error::Overlap { index: i });
        }

        let translate =
            self.is_isotropic[i] || self.rng.gen::<f64>() < self.params.prob_translate;
        let (trial_position, trial_orientation) = if translate {
            let mut trial = position;
            for d in 0..2 {
                trial[d] += (2.0 * self.rng.gen::<f64>() - 1.0) * self.params.translation_step;
                // same wrap as the box, so the model's store never diverges
                // from these buffers
                trial[d] = trial[d].rem_euclid(self.box_size[d]);
                if trial[d] >= self.box_size[d] {
                    trial[d] -= self.box_size[d];
                }
            }
            (trial, orientation)
        } else {
            let angle = (2.0 * self.rng.gen::<f64>() - 1.0) * self.params.rotation_step;
            let (sin, cos) = angle.sin_cos();
            (
                position,
                [
                    cos * orientation[0] - sin * orientation[1],
                    sin * orientation[0] + cos * orientation[1],
                ],
            )
        };

        let proposed = self.model.compute_energy(i, &trial_position, &trial_orientation);
        if !proposed.is_finite() {
            // hard-core overlap at the trial state
            return Ok(());
        }
        match self
            .model
            .compute_interactions(i, &trial_position, &trial_orientation)
        {
            Ok(partners) if partners.len() > self.params.max_interactions => return Ok(()),
            Ok(_) => {}
            Err(Error::Saturation { .. }) => return Ok(()),
            Err(e) => return Err(e),
        }

        let delta = proposed - current;
        if delta > 0.0 && self.rng.gen::<f64>() >= (-delta).exp() {
            return Ok(());
        }

        self.coordinates[2 * i] = trial_position[0];
        self.coordinates[2 * i + 1] = trial_position[1];
        self.orientations[2 * i] = trial_orientation[0];
        self.orientations[2 * i + 1] = trial_orientation[1];
        self.model
            .apply_post_move_updates(i, &trial_position, &trial_orientation);
        self.accepted += 1;
        Ok(())
    }
}
