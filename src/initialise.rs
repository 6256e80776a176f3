use rand::Rng;
use rand_distr::{Distribution, UnitCircle};
use tracing::debug;

use crate::box_::Box_;
use crate::cell_list::CellList;
use crate::error::{Error, Result};
use crate::particles::Particles;

/// Retry budget per particle before giving up on the configured density.
const MAX_TRIALS: usize = 100_000;

/// Generate a random, non-overlapping configuration of `n` discs.
///
/// Accepted particles enter the store and the cell list immediately, so
/// later candidates are tested against them.
pub fn random_configuration(
    particles: &mut Particles,
    cells: &mut CellList,
    box_: &Box_,
    rng: &mut impl Rng,
    n: usize,
) -> Result<()> {
    for i in 0..n {
        let mut trials = 0;
        loop {
            if trials == MAX_TRIALS {
                return Err(Error::Initialization {
                    placed: i,
                    requested: n,
                    attempts: MAX_TRIALS,
                });
            }
            trials += 1;

            let position = [
                rng.gen::<f64>() * box_.size()[0],
                rng.gen::<f64>() * box_.size()[1],
            ];
            if overlaps(&position, particles, cells, box_) {
                continue;
            }

            let orientation: [f64; 2] = UnitCircle.sample(rng);
            let index = particles.push(position, orientation);
            cells.insert(index, &position);
            break;
        }
    }
    debug!(particles = n, "random configuration complete");
    Ok(())
}

/// Whether a candidate position sits within one diameter of a placed disc.
fn overlaps(position: &[f64; 2], particles: &Particles, cells: &CellList, box_: &Box_) -> bool {
    let cell = cells.cell_of(position);
    for &neighbour in cells.neighbours(cell) {
        for &j in cells.members(neighbour) {
            let sep = box_.separation(position, &particles.positions[j]);
            if sep[0] * sep[0] + sep[1] * sep[1] < 1.0 {
                return true;
            }
        }
    }
    false
}
