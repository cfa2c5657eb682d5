//! Problem identifiers and the per-problem directory name derivation.
//!
//! Benchmark problem ids end in a fixed-width run-number block
//! (e.g. `cvdp_copilot_16qam_mapper_0001`). The benchmark writes its
//! artifacts under a directory named after the id with that block removed.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};

/// Width of the trailing block removed to obtain the directory name.
const SUFFIX_LEN: usize = 5;

/// Number of trailing characters that must be ASCII digits.
const DIGIT_TAIL: usize = 4;

/// An opaque benchmark problem identifier with a validated run-number suffix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    /// Validate and wrap a raw problem id.
    ///
    /// The id must be ASCII, longer than the suffix block, and end in at
    /// least four ASCII digits, so that removing the last five characters
    /// yields a meaningful directory name rather than a silent
    /// misderivation. ASCII-only keeps the byte slicing in [`dir_name`]
    /// sound.
    ///
    /// [`dir_name`]: ProblemId::dir_name
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if !id.is_ascii() {
            return Err(SweepError::InvalidProblemId {
                id,
                reason: "must be ASCII".to_string(),
            });
        }

        if id.len() <= SUFFIX_LEN {
            return Err(SweepError::InvalidProblemId {
                id,
                reason: format!("must be longer than {} characters", SUFFIX_LEN),
            });
        }

        if !id
            .chars()
            .rev()
            .take(DIGIT_TAIL)
            .all(|c| c.is_ascii_digit())
        {
            return Err(SweepError::InvalidProblemId {
                id,
                reason: format!("must end in a {}-digit run number", DIGIT_TAIL),
            });
        }

        Ok(Self(id))
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory name for this problem: the id minus its trailing block.
    pub fn dir_name(&self) -> &str {
        &self.0[..self.0.len() - SUFFIX_LEN]
    }
}

impl std::fmt::Display for ProblemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
