use std::fmt;

use crate::errors::ReconcileError;

use super::compact::Compaction;
use super::consolidate::ConsolidationStats;

/// Why a reconciliation loop stopped
#[derive(Debug)]
pub enum Termination {
    /// A cursor reached the end of its sequence
    Completed,
    /// The oracle answered with an empty array
    EmptyResponse,
    /// The oracle failed or broke its contract; earlier rounds are kept
    Aborted(ReconcileError),
}

impl Termination {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    /// Error that ended the loop, if any
    pub fn error(&self) -> Option<&ReconcileError> {
        match self {
            Self::Aborted(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::EmptyResponse => write!(f, "oracle reported nothing further"),
            Self::Aborted(error) if error.is_transport_failure() => write!(f, "aborted by oracle failure: {}", error),
            Self::Aborted(error) => write!(f, "aborted by malformed oracle answer: {}", error),
        }
    }
}

/// Final state of an alignment run
#[derive(Debug)]
pub struct AlignmentOutcome {
    /// Compacted reference sequence carrying the source text
    pub compaction: Compaction,
    /// Rounds whose answer was applied
    pub rounds: usize,
    pub termination: Termination,
    /// Edits accumulated over all applied rounds
    pub stats: ConsolidationStats,
}

/// Final state of a translation run
#[derive(Debug)]
pub struct TranslationOutcome {
    /// Compacted sequence with translated text
    pub compaction: Compaction,
    /// Rounds whose answer was applied
    pub rounds: usize,
    pub termination: Termination,
    /// Translated strings written, overlapping cues counted again
    pub translated: usize,
}
