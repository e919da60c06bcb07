//! Equihash solution checks.
//!
//! The Wagner-tree verification itself is delegated to an
//! [`EquihashVerifier`]; this module selects the parameters, prepares the
//! personalized BLAKE2b state and enforces the per-height epochs.

use crate::PowError;
use blake2b_simd::{Hash, Params, State};
use tracing::trace;
use vidulum_chainspec::{ChainParameterSet, EquihashParams};
use vidulum_primitives::BlockHeader;

/// BLAKE2b personalization prefix; followed by `le32(n) || le32(k)`.
pub const PERSONALIZATION_PREFIX: &[u8; 8] = b"ZcashPoW";

/// BLAKE2b state over a header's Equihash input and nonce.
#[derive(Debug, Clone)]
pub struct EquihashState {
    params: EquihashParams,
    state: State,
}

impl EquihashState {
    /// Empty state personalized for `params`.
    pub fn new(params: EquihashParams) -> Self {
        let mut personal = [0u8; 16];
        personal[..8].copy_from_slice(PERSONALIZATION_PREFIX);
        personal[8..12].copy_from_slice(&params.n.to_le_bytes());
        personal[12..].copy_from_slice(&params.k.to_le_bytes());

        let state = Params::new()
            .hash_length(params.hash_output_len())
            .personal(&personal)
            .to_state();
        Self { params, state }
    }

    /// State for `header`: absorbs `I || nonce`.
    pub fn for_header(params: EquihashParams, header: &BlockHeader) -> Self {
        let mut state = Self::new(params);
        state.update(&header.equihash_input()).update(header.nonce.as_slice());
        state
    }

    /// Absorb `data`
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.state.update(data);
        self
    }

    /// Parameters the state is personalized for
    pub const fn params(&self) -> EquihashParams {
        self.params
    }

    /// Digest of the state as is
    pub fn finalize(&self) -> Hash {
        self.state.finalize()
    }
}

/// Verifies an Equihash solution against a prepared state.
pub trait EquihashVerifier {
    /// Whether `solution` is valid for `(n, k)` over `state`.
    fn verify(&self, n: u32, k: u32, state: &EquihashState, solution: &[u8]) -> bool;
}

impl<F> EquihashVerifier for F
where
    F: Fn(u32, u32, &EquihashState, &[u8]) -> bool,
{
    fn verify(&self, n: u32, k: u32, state: &EquihashState, solution: &[u8]) -> bool {
        self(n, k, state, solution)
    }
}

/// Parameters selected by the length of `header`'s solution.
pub fn solution_params(header: &BlockHeader) -> Result<EquihashParams, PowError> {
    EquihashParams::from_solution_size(header.solution.len())
        .map_err(|err| PowError::UnsupportedSolutionSize(err.0))
}

/// Checks `header`'s Equihash solution with `verifier`.
pub fn check_equihash_solution(
    header: &BlockHeader,
    verifier: &impl EquihashVerifier,
) -> Result<(), PowError> {
    let params = solution_params(header)?;
    let state = EquihashState::for_header(params, header);

    if !verifier.verify(params.n, params.k, &state, &header.solution) {
        trace!(target: "pow", %params, "equihash solution rejected");
        return Err(PowError::InvalidEquihashSolution);
    }
    Ok(())
}

/// Checks that the solution's parameters are accepted at `height`.
pub fn check_equihash_params_for_height(
    header: &BlockHeader,
    height: i64,
    params: &ChainParameterSet,
) -> Result<(), PowError> {
    let solution = solution_params(header)?;
    if !params.equihash.params_for_height(height).contains(&solution) {
        return Err(PowError::SolutionParamsNotActive { n: solution.n, k: solution.k, height });
    }
    Ok(())
}
