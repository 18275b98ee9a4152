//! Engine error types.

use thiserror::Error;

pub type ScoreResult<T> = Result<T, ScoreError>;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Invalid scoring config: {0}")]
    InvalidConfig(String),

    #[error("Stage {stage} produced {actual} outputs for {expected} records")]
    StageInvariant {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl ScoreError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Fail unless a stage emitted exactly one output per record.
    pub fn ensure_aligned(stage: &'static str, expected: usize, actual: usize) -> ScoreResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::StageInvariant {
                stage,
                expected,
                actual,
            })
        }
    }
}
