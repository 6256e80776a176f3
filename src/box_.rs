use crate::error::{Error, Result};

/// Periodic simulation box
#[derive(Clone, Debug)]
pub struct Box_ {
    size: [f64; 2],
}

impl Box_ {
    pub fn new(size: [f64; 2]) -> Result<Self> {
        if size.iter().any(|&s| s <= 0.0) {
            return Err(Error::Configuration(format!(
                "box size should be positive in every dimension, found {:?}",
                size
            )));
        }
        Ok(Self { size })
    }
    pub fn size(&self) -> &[f64; 2] {
        &self.size
    }
    /// Map a position onto its canonical image in [0, size).
    pub fn wrap(&self, position: &mut [f64; 2]) {
        for d in 0..2 {
            position[d] = position[d].rem_euclid(self.size[d]);
            // rem_euclid can land exactly on the upper edge for tiny
            // negative inputs
            if position[d] >= self.size[d] {
                position[d] -= self.size[d];
            }
        }
    }
    /// Reduce a displacement to its minimum periodic image.
    pub fn minimum_image(&self, separation: &mut [f64; 2]) {
        for d in 0..2 {
            separation[d] -= self.size[d] * (separation[d] / self.size[d]).round();
        }
    }
    /// Minimum-image vector from `a` to `b`.
    pub fn separation(&self, a: &[f64; 2], b: &[f64; 2]) -> [f64; 2] {
        let mut sep = [b[0] - a[0], b[1] - a[1]];
        self.minimum_image(&mut sep);
        sep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(Box_::new([0.0, 10.0]).is_err());
        assert!(Box_::new([10.0, -1.0]).is_err());
    }

    #[test]
    fn wrap_is_idempotent() {
        let box_ = Box_::new([10.0, 20.0]).unwrap();
        for start in [[-3.2, 75.9], [10.0, 20.0], [-1e-18, 1e6], [9.99, -0.01]] {
            let mut once = start;
            box_.wrap(&mut once);
            let mut twice = once;
            box_.wrap(&mut twice);
            assert_eq!(once, twice);
            assert!(once[0] >= 0.0 && once[0] < 10.0);
            assert!(once[1] >= 0.0 && once[1] < 20.0);
        }
    }

    #[test]
    fn separation_uses_the_minimum_image() {
        let box_ = Box_::new([10.0, 10.0]).unwrap();
        let sep = box_.separation(&[0.5, 5.0], &[9.7, 5.0]);
        assert!((sep[0] + 0.8).abs() < 1e-12);
        assert!(sep[1].abs() < 1e-12);
    }

    #[test]
    fn separation_magnitude_is_at_most_half_the_box() {
        let box_ = Box_::new([10.0, 6.0]).unwrap();
        for a in [[0.0, 0.0], [1.2, 5.9], [9.9, 3.0]] {
            for b in [[5.0, 3.0], [9.6, 0.1], [0.4, 5.5]] {
                let sep = box_.separation(&a, &b);
                assert!(sep[0].abs() <= 5.0 + 1e-12);
                assert!(sep[1].abs() <= 3.0 + 1e-12);
            }
        }
    }

    #[test]
    fn separation_is_invariant_under_period_shifts() {
        let box_ = Box_::new([10.0, 10.0]).unwrap();
        let reference = box_.separation(&[2.0, 3.0], &[8.5, 1.0]);
        let shifted = box_.separation(&[12.0, 3.0], &[8.5, -19.0]);
        assert!((reference[0] - shifted[0]).abs() < 1e-12);
        assert!((reference[1] - shifted[1]).abs() < 1e-12);
    }
}
