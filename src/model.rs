use crate::error::Result;

/// Callback capability consumed by the Monte Carlo engine.
///
/// The engine completes each trial in full (energy evaluation, accept or
/// reject, post-move update) before issuing the next, so implementations
/// may read shared state freely between calls.
pub trait InteractionModel {
    /// Energy of one particle at the given trial state against all current
    /// neighbours. `f64::INFINITY` marks a hard-core overlap.
    fn compute_energy(&self, index: usize, position: &[f64; 2], orientation: &[f64; 2]) -> f64;

    /// Pair energy between two particles at explicit trial states.
    fn compute_pair_energy(
        &self,
        index1: usize,
        position1: &[f64; 2],
        orientation1: &[f64; 2],
        index2: usize,
        position2: &[f64; 2],
        orientation2: &[f64; 2],
    ) -> f64;

    /// Partners currently bonded to the given trial state. Exceeding the
    /// interaction cap returns `Error::Saturation`, which callers treat as
    /// a rejected trial rather than a failure.
    fn compute_interactions(
        &self,
        index: usize,
        position: &[f64; 2],
        orientation: &[f64; 2],
    ) -> Result<Vec<usize>>;

    /// Commit an accepted move: update the store, the cell list and the
    /// running total energy.
    fn apply_post_move_updates(
        &mut self,
        index: usize,
        position: &[f64; 2],
        orientation: &[f64; 2],
    );
}
