//! Equihash parameter sets and their activation by height.

use crate::UnsupportedSolutionSize;
use arrayvec::ArrayVec;
use core::fmt;

/// Equihash `(n, k)` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EquihashParams {
    /// Hash output bit length
    pub n: u32,
    /// Number of collision rounds
    pub k: u32,
}

impl EquihashParams {
    /// Equihash 200,9
    pub const EH200_9: Self = Self::new(200, 9);
    /// Equihash 192,7
    pub const EH192_7: Self = Self::new(192, 7);
    /// Equihash 144,5
    pub const EH144_5: Self = Self::new(144, 5);
    /// Equihash 96,5
    pub const EH96_5: Self = Self::new(96, 5);
    /// Equihash 48,5
    pub const EH48_5: Self = Self::new(48, 5);

    /// Every parameter set a header may use.
    pub const KNOWN: [Self; 5] =
        [Self::EH200_9, Self::EH192_7, Self::EH144_5, Self::EH96_5, Self::EH48_5];

    /// Create parameters
    pub const fn new(n: u32, k: u32) -> Self {
        Self { n, k }
    }

    /// Byte length of a minimal solution: `2^k` indices of `n/(k+1)+1` bits.
    pub const fn solution_size(&self) -> usize {
        ((1usize << self.k) * (self.n as usize / (self.k as usize + 1) + 1)) / 8
    }

    /// Parameters identified by a header's solution length.
    pub fn from_solution_size(size: usize) -> Result<Self, UnsupportedSolutionSize> {
        Self::KNOWN
            .into_iter()
            .find(|params| params.solution_size() == size)
            .ok_or(UnsupportedSolutionSize(size))
    }

    /// BLAKE2b output length used to derive the collision strings.
    pub const fn hash_output_len(&self) -> usize {
        (512 / self.n as usize) * self.n as usize / 8
    }
}

impl fmt::Display for EquihashParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.n, self.k)
    }
}

/// A range of heights in which one Equihash parameter set is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquihashEpoch {
    /// Parameters of the epoch
    pub params: EquihashParams,
    /// First height of the epoch
    pub start_height: i64,
    /// Last height of the epoch, `None` if open-ended
    pub end_height: Option<i64>,
}

/// The two Equihash epochs of a network.
///
/// The second epoch may start before the first ends; in the overlap either
/// parameter set is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquihashEpochs {
    /// Original parameters
    pub epoch1: EquihashEpoch,
    /// Replacement parameters
    pub epoch2: EquihashEpoch,
}

impl EquihashEpochs {
    /// Epochs switching from `epoch1` to `epoch2`, overlapping on
    /// `epoch2_start..=epoch1_end`.
    pub const fn new(
        epoch1: EquihashParams,
        epoch1_end: i64,
        epoch2: EquihashParams,
        epoch2_start: i64,
    ) -> Self {
        Self {
            epoch1: EquihashEpoch { params: epoch1, start_height: 0, end_height: Some(epoch1_end) },
            epoch2: EquihashEpoch { params: epoch2, start_height: epoch2_start, end_height: None },
        }
    }

    /// Last height of the first epoch, if it ends.
    pub const fn epoch1_end(&self) -> Option<i64> {
        self.epoch1.end_height
    }

    /// Parameter sets valid at `height`, newest first.
    pub fn params_for_height(&self, height: i64) -> ArrayVec<EquihashParams, 2> {
        let mut params = ArrayVec::new();
        let epoch1_ended = self.epoch1.end_height.is_some_and(|end| height > end);

        if height >= self.epoch2.start_height && epoch1_ended {
            params.push(self.epoch2.params);
        } else if height < self.epoch2.start_height {
            params.push(self.epoch1.params);
        } else {
            params.push(self.epoch2.params);
            params.push(self.epoch1.params);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    #[test]
    fn test_solution_sizes() {
        assert_eq!(EquihashParams::EH200_9.solution_size(), 1344);
        assert_eq!(EquihashParams::EH192_7.solution_size(), 400);
        assert_eq!(EquihashParams::EH144_5.solution_size(), 100);
        assert_eq!(EquihashParams::EH96_5.solution_size(), 68);
        assert_eq!(EquihashParams::EH48_5.solution_size(), 36);
    }

    #[test]
    fn test_from_solution_size() {
        for params in EquihashParams::KNOWN {
            assert_eq!(EquihashParams::from_solution_size(params.solution_size()), Ok(params));
        }
        assert_matches!(EquihashParams::from_solution_size(0), Err(UnsupportedSolutionSize(0)));
        assert_matches!(EquihashParams::from_solution_size(37), Err(UnsupportedSolutionSize(37)));
        assert_matches!(
            EquihashParams::from_solution_size(1343),
            Err(UnsupportedSolutionSize(1343))
        );
    }

    #[test]
    fn test_hash_output_len() {
        assert_eq!(EquihashParams::EH200_9.hash_output_len(), 50);
        assert_eq!(EquihashParams::EH192_7.hash_output_len(), 48);
        assert_eq!(EquihashParams::EH48_5.hash_output_len(), 60);
    }

    #[test]
    fn test_params_for_height_overlap() {
        let epochs =
            EquihashEpochs::new(EquihashParams::EH200_9, 100_020, EquihashParams::EH192_7, 100_000);

        assert_eq!(epochs.params_for_height(99_999).as_slice(), &[EquihashParams::EH200_9]);
        assert_eq!(
            epochs.params_for_height(100_000).as_slice(),
            &[EquihashParams::EH192_7, EquihashParams::EH200_9]
        );
        assert_eq!(
            epochs.params_for_height(100_020).as_slice(),
            &[EquihashParams::EH192_7, EquihashParams::EH200_9]
        );
        assert_eq!(epochs.params_for_height(100_021).as_slice(), &[EquihashParams::EH192_7]);
    }

    #[test]
    fn test_params_for_height_second_epoch_from_genesis() {
        let epochs = EquihashEpochs::new(EquihashParams::EH200_9, 10, EquihashParams::EH192_7, 0);

        assert_eq!(epochs.params_for_height(0).len(), 2);
        assert_eq!(epochs.params_for_height(10).len(), 2);
        assert_eq!(epochs.params_for_height(11).as_slice(), &[EquihashParams::EH192_7]);
    }

    proptest! {
        #[test]
        fn params_for_height_follows_epoch_bounds(
            epoch1_end in 0i64..1_000,
            epoch2_start in 0i64..1_000,
            height in 0i64..2_000,
        ) {
            let epochs = EquihashEpochs::new(
                EquihashParams::EH200_9,
                epoch1_end,
                EquihashParams::EH192_7,
                epoch2_start,
            );
            let params = epochs.params_for_height(height);

            prop_assert!(!params.is_empty());
            prop_assert_eq!(
                params.contains(&EquihashParams::EH200_9),
                height < epoch2_start || height <= epoch1_end
            );
            prop_assert_eq!(params.contains(&EquihashParams::EH192_7), height >= epoch2_start);
            // The newer parameter set is always tried first.
            if params.len() == 2 {
                prop_assert_eq!(params[0], EquihashParams::EH192_7);
            }
        }
    }
}
