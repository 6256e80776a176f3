use std::f64::consts::PI;

use crate::box_::Box_;
use crate::cell_list::CellList;
use crate::error::{Error, Result};
use crate::model::InteractionModel;
use crate::particles::Particles;

/// Pair energies below this threshold count as a bond.
const BOND_THRESHOLD: f64 = -1e-10;

/// Two-dimensional disc of diameter 1 carrying attractive patches on its
/// perimeter.
///
/// Patch `k` sits at angular offset `2 pi k / max_interactions` from the
/// orientation angle, on the perimeter at radius one half. A pair bonds
/// (energy `-interaction_energy`) when any patch point of one disc lies
/// within half the patch diameter of a patch point of the other, which
/// makes `1 + interaction_range / 2` the largest bondable separation.
pub struct PatchyDisc {
    box_: Box_,
    particles: Particles,
    cells: CellList,
    max_interactions: usize,
    interaction_energy: f64,
    patch_separation: f64,
    cutoff: f64,
    squared_cutoff: f64,
    squared_patch_range: f64,
    energy: f64,
}

impl PatchyDisc {
    pub fn new(
        box_: Box_,
        particles: Particles,
        cells: CellList,
        max_interactions: usize,
        interaction_energy: f64,
        interaction_range: f64,
    ) -> Result<Self> {
        if max_interactions == 0 {
            return Err(Error::Configuration(
                "at least one patch per disc is required".into(),
            ));
        }
        if interaction_energy <= 0.0 || interaction_range <= 0.0 {
            return Err(Error::Configuration(format!(
                "interaction energy and range should be positive, found {} and {}",
                interaction_energy, interaction_range
            )));
        }
        let cutoff = 1.0 + 0.5 * interaction_range;
        let mut disc = Self {
            box_,
            particles,
            cells,
            max_interactions,
            interaction_energy,
            patch_separation: 2.0 * PI / max_interactions as f64,
            cutoff,
            squared_cutoff: cutoff * cutoff,
            squared_patch_range: 0.25 * interaction_range * interaction_range,
            energy: 0.0,
        };
        disc.energy = disc.checked_total_energy()?;
        Ok(disc)
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }
    pub fn cells(&self) -> &CellList {
        &self.cells
    }
    pub fn box_(&self) -> &Box_ {
        &self.box_
    }
    pub fn cutoff_distance(&self) -> f64 {
        self.cutoff
    }
    /// Running total energy, kept current by `apply_post_move_updates`.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Recompute the total energy from scratch (half the sum of the
    /// per-particle energies).
    pub fn compute_total_energy(&self) -> f64 {
        let mut total = 0.0;
        for i in 0..self.particles.len() {
            total += self.compute_energy(
                i,
                &self.particles.positions[i],
                &self.particles.orientations[i],
            );
        }
        0.5 * total
    }

    fn checked_total_energy(&self) -> Result<f64> {
        let mut total = 0.0;
        for i in 0..self.particles.len() {
            let energy = self.compute_energy(
                i,
                &self.particles.positions[i],
                &self.particles.orientations[i],
            );
            if !energy.is_finite() {
                return Err(Error::Overlap { index: i });
            }
            total += energy;
        }
        Ok(0.5 * total)
    }
}

impl InteractionModel for PatchyDisc {
    fn compute_energy(&self, index: usize, position: &[f64; 2], orientation: &[f64; 2]) -> f64 {
        let mut energy = 0.0;
        let cell = self.cells.cell_of(position);
        for &neighbour in self.cells.neighbours(cell) {
            for &j in self.cells.members(neighbour) {
                if j == index {
                    continue;
                }
                energy += self.compute_pair_energy(
                    index,
                    position,
                    orientation,
                    j,
                    &self.particles.positions[j],
                    &self.particles.orientations[j],
                );
                if energy == f64::INFINITY {
                    return energy;
                }
            }
        }
        energy
    }

    fn compute_pair_energy(
        &self,
        _index1: usize,
        position1: &[f64; 2],
        orientation1: &[f64; 2],
        _index2: usize,
        position2: &[f64; 2],
        orientation2: &[f64; 2],
    ) -> f64 {
        let mut sep = [position1[0] - position2[0], position1[1] - position2[1]];
        self.box_.minimum_image(&mut sep);
        let norm_sqd = sep[0] * sep[0] + sep[1] * sep[1];

        if norm_sqd >= self.squared_cutoff {
            return 0.0;
        }
        if norm_sqd < 1.0 {
            return f64::INFINITY;
        }

        let angle1 = orientation1[1].atan2(orientation1[0]);
        let angle2 = orientation2[1].atan2(orientation2[0]);
        for i in 0..self.max_interactions {
            let theta1 = angle1 + i as f64 * self.patch_separation;
            let patch1 = [
                position1[0] + 0.5 * theta1.cos(),
                position1[1] + 0.5 * theta1.sin(),
            ];
            for j in 0..self.max_interactions {
                let theta2 = angle2 + j as f64 * self.patch_separation;
                let patch2 = [
                    position2[0] + 0.5 * theta2.cos(),
                    position2[1] + 0.5 * theta2.sin(),
                ];
                let mut patch_sep = [patch1[0] - patch2[0], patch1[1] - patch2[1]];
                self.box_.minimum_image(&mut patch_sep);
                let patch_norm_sqd = patch_sep[0] * patch_sep[0] + patch_sep[1] * patch_sep[1];
                // one bond per pair, first qualifying patch pair wins
                if patch_norm_sqd < self.squared_patch_range {
                    return -self.interaction_energy;
                }
            }
        }
        0.0
    }

    fn compute_interactions(
        &self,
        index: usize,
        position: &[f64; 2],
        orientation: &[f64; 2],
    ) -> Result<Vec<usize>> {
        let mut partners = Vec::with_capacity(self.max_interactions);
        let cell = self.cells.cell_of(position);
        for &neighbour in self.cells.neighbours(cell) {
            for &j in self.cells.members(neighbour) {
                if j == index {
                    continue;
                }
                let energy = self.compute_pair_energy(
                    index,
                    position,
                    orientation,
                    j,
                    &self.particles.positions[j],
                    &self.particles.orientations[j],
                );
                if energy < BOND_THRESHOLD {
                    if partners.len() == self.max_interactions {
                        return Err(Error::Saturation {
                            index,
                            max: self.max_interactions,
                        });
                    }
                    partners.push(j);
                }
            }
        }
        Ok(partners)
    }

    fn apply_post_move_updates(
        &mut self,
        index: usize,
        position: &[f64; 2],
        orientation: &[f64; 2],
    ) {
        let mut wrapped = *position;
        self.box_.wrap(&mut wrapped);

        let old_position = self.particles.positions[index];
        let old_orientation = self.particles.orientations[index];
        let old_energy = self.compute_energy(index, &old_position, &old_orientation);
        let new_energy = self.compute_energy(index, &wrapped, orientation);
        self.energy += new_energy - old_energy;

        self.particles.set(index, wrapped, *orientation);
        self.cells.update_particle(index, &wrapped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two discs bonded head-on along x, plus the supporting structures.
    fn bonded_pair() -> PatchyDisc {
        let box_ = Box_::new([10.0, 10.0]).unwrap();
        let cells = CellList::initialise(box_.size(), 1.05).unwrap();
        let particles = Particles::new();
        let mut disc = PatchyDisc::new(box_, particles, cells, 3, 8.0, 0.1).unwrap();
        disc.insert_for_test([5.0, 5.0], [1.0, 0.0]);
        disc.insert_for_test([6.02, 5.0], [-1.0, 0.0]);
        disc.energy = disc.compute_total_energy();
        disc
    }

    impl PatchyDisc {
        fn insert_for_test(&mut self, position: [f64; 2], orientation: [f64; 2]) {
            let index = self.particles.push(position, orientation);
            self.cells.insert(index, &position);
        }
    }

    #[test]
    fn facing_patches_within_range_bond_at_the_well_depth() {
        let disc = bonded_pair();
        let energy = disc.compute_pair_energy(
            0,
            &[5.0, 5.0],
            &[1.0, 0.0],
            1,
            &[6.02, 5.0],
            &[-1.0, 0.0],
        );
        assert!((energy + 8.0).abs() < 1e-12);
        assert!((disc.energy() + 8.0).abs() < 1e-12);
    }

    #[test]
    fn pair_energy_is_symmetric() {
        let disc = bonded_pair();
        let forward = disc.compute_pair_energy(
            0,
            &[5.0, 5.0],
            &[1.0, 0.0],
            1,
            &[6.02, 5.0],
            &[-1.0, 0.0],
        );
        let reverse = disc.compute_pair_energy(
            1,
            &[6.02, 5.0],
            &[-1.0, 0.0],
            0,
            &[5.0, 5.0],
            &[1.0, 0.0],
        );
        assert_eq!(forward, reverse);
    }

    #[test]
    fn misaligned_patches_do_not_bond() {
        let disc = bonded_pair();
        // rotate the partner far enough that no patch window overlaps
        let angle: f64 = 0.5;
        let orientation = [-angle.cos(), angle.sin()];
        let energy =
            disc.compute_pair_energy(0, &[5.0, 5.0], &[1.0, 0.0], 1, &[6.02, 5.0], &orientation);
        assert_eq!(energy, 0.0);
    }

    #[test]
    fn separations_beyond_the_cutoff_cost_nothing() {
        let disc = bonded_pair();
        let energy = disc.compute_pair_energy(
            0,
            &[5.0, 5.0],
            &[1.0, 0.0],
            1,
            &[6.06, 5.0],
            &[-1.0, 0.0],
        );
        assert_eq!(energy, 0.0);
    }

    #[test]
    fn hard_core_overlap_returns_the_sentinel() {
        let disc = bonded_pair();
        let energy = disc.compute_pair_energy(
            0,
            &[5.0, 5.0],
            &[1.0, 0.0],
            1,
            &[5.9, 5.0],
            &[-1.0, 0.0],
        );
        assert_eq!(energy, f64::INFINITY);
    }

    #[test]
    fn constructing_over_an_overlapping_store_fails() {
        let box_ = Box_::new([10.0, 10.0]).unwrap();
        let mut cells = CellList::initialise(box_.size(), 1.05).unwrap();
        let mut particles = Particles::new();
        cells.insert(particles.push([5.0, 5.0], [1.0, 0.0]), &[5.0, 5.0]);
        cells.insert(particles.push([5.5, 5.0], [-1.0, 0.0]), &[5.5, 5.0]);
        let result = PatchyDisc::new(box_, particles, cells, 3, 8.0, 0.1);
        assert!(matches!(result, Err(Error::Overlap { .. })));
    }

    #[test]
    fn bonds_form_across_the_periodic_boundary() {
        let box_ = Box_::new([10.0, 10.0]).unwrap();
        let mut cells = CellList::initialise(box_.size(), 1.05).unwrap();
        let mut particles = Particles::new();
        cells.insert(particles.push([0.2, 5.0], [-1.0, 0.0]), &[0.2, 5.0]);
        cells.insert(particles.push([9.18, 5.0], [1.0, 0.0]), &[9.18, 5.0]);
        let disc = PatchyDisc::new(box_, particles, cells, 3, 8.0, 0.1).unwrap();
        assert!((disc.energy() + 8.0).abs() < 1e-12);
    }

    #[test]
    fn compute_energy_is_pure_between_moves() {
        let disc = bonded_pair();
        let first = disc.compute_energy(0, &[5.0, 5.0], &[1.0, 0.0]);
        let second = disc.compute_energy(0, &[5.0, 5.0], &[1.0, 0.0]);
        assert_eq!(first, second);
    }

    #[test]
    fn interactions_list_bonded_partners() {
        let disc = bonded_pair();
        let partners = disc.compute_interactions(0, &[5.0, 5.0], &[1.0, 0.0]).unwrap();
        assert_eq!(partners, vec![1]);
    }

    #[test]
    fn wide_patches_can_exceed_the_cap() {
        // single patch, patch diameter 1: both partners bond the same patch
        // without overlapping each other
        let box_ = Box_::new([10.0, 10.0]).unwrap();
        let mut cells = CellList::initialise(box_.size(), 1.5).unwrap();
        let mut particles = Particles::new();
        cells.insert(particles.push([5.0, 5.0], [1.0, 0.0]), &[5.0, 5.0]);
        let a = [6.2, 5.4];
        let towards_a = unit(&[5.5 - a[0], 5.0 - a[1]]);
        cells.insert(particles.push(a, towards_a), &a);
        let b = [6.2, 4.38];
        let towards_b = unit(&[5.5 - b[0], 5.0 - b[1]]);
        cells.insert(particles.push(b, towards_b), &b);

        let disc = PatchyDisc::new(box_, particles, cells, 1, 8.0, 1.0).unwrap();
        let result = disc.compute_interactions(0, &[5.0, 5.0], &[1.0, 0.0]);
        assert!(matches!(
            result,
            Err(Error::Saturation { index: 0, max: 1 })
        ));
    }

    #[test]
    fn post_move_updates_keep_the_running_energy_exact() {
        let mut disc = bonded_pair();
        // break the bond, then restore it
        disc.apply_post_move_updates(1, &[8.0, 8.0], &[-1.0, 0.0]);
        assert_eq!(disc.energy(), 0.0);
        assert_eq!(disc.energy(), disc.compute_total_energy());
        assert_eq!(disc.cells().cell_of_particle(1), disc.cells().cell_of(&[8.0, 8.0]));

        disc.apply_post_move_updates(1, &[6.02, 5.0], &[-1.0, 0.0]);
        assert!((disc.energy() + 8.0).abs() < 1e-12);
        assert_eq!(disc.energy(), disc.compute_total_energy());
    }

    fn unit(v: &[f64; 2]) -> [f64; 2] {
        let norm = (v[0] * v[0] + v[1] * v[1]).sqrt();
        [v[0] / norm, v[1] / norm]
    }
}
