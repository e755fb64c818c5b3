/*!
 * Window scheduling for the reconciliation loops.
 *
 * A window is the half-open slice of a sequence shown to the oracle in one
 * round. Cursor records are advanced by pure functions of the previous cursor
 * and the round's response, and every advance moves at least one cue.
 */

use std::ops::Range;

use crate::errors::ReconcileError;

/// Window size and overlap for one reconciliation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Maximum number of cues shown per sequence and round
    pub size: usize,
    /// Trailing local indices re-shown in the next round
    pub overlap: usize,
}

impl WindowConfig {
    /// Validated window configuration; `overlap` must stay below `size`
    pub fn new(size: usize, overlap: usize) -> Result<Self, ReconcileError> {
        if size == 0 {
            return Err(ReconcileError::InvalidWindow("window size must be at least 1".to_string()));
        }
        if overlap >= size {
            return Err(ReconcileError::InvalidWindow(format!(
                "overlap {} must be smaller than window size {}",
                overlap, size
            )));
        }
        Ok(Self { size, overlap })
    }

    /// 20 cues per list with an overlap of 2
    pub fn alignment_default() -> Self {
        Self { size: 20, overlap: 2 }
    }

    /// 50 cues without overlap
    pub fn translation_default() -> Self {
        Self { size: 50, overlap: 0 }
    }
}

/// Half-open slice `[start, end)` of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First global index in the window
    pub start: usize,
    /// One past the last global index
    pub end: usize,
}

impl Window {
    /// Window of up to `size` cues from `start`, clipped to `total`
    pub fn at(start: usize, size: usize, total: usize) -> Self {
        let start = start.min(total);
        Self {
            start,
            end: start.saturating_add(size).min(total),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Validate an oracle-facing 1-based index and return it as `usize`
    pub fn check_local(&self, local: i64, side: &'static str) -> Result<usize, ReconcileError> {
        match usize::try_from(local) {
            Ok(value) if (1..=self.len()).contains(&value) => Ok(value),
            _ => Err(ReconcileError::IndexOutOfWindow {
                side,
                index: local,
                window_len: self.len(),
            }),
        }
    }

    /// Global index of a validated 1-based local index
    pub fn global(&self, local: usize) -> usize {
        self.start + local - 1
    }
}

/// Cursor advance for a round whose furthest reported local index is `max_local`
pub fn advance_step(max_local: usize, overlap: usize) -> usize {
    max_local.saturating_sub(overlap).max(1)
}

/// Cursor pair of the alignment loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentCursor {
    /// Position in the reference sequence
    pub pos_a: usize,
    /// Position in the source sequence
    pub pos_b: usize,
}

impl AlignmentCursor {
    /// Loop precondition: both cursors still inside their sequences
    pub fn is_active(&self, len_a: usize, len_b: usize) -> bool {
        self.pos_a < len_a && self.pos_b < len_b
    }

    /// Reference and source windows for the current round
    pub fn windows(&self, config: &WindowConfig, len_a: usize, len_b: usize) -> (Window, Window) {
        (
            Window::at(self.pos_a, config.size, len_a),
            Window::at(self.pos_b, config.size, len_b),
        )
    }

    /// Next cursor from the greatest local indices reported in a round
    pub fn advance(self, max_a: usize, max_b: usize, overlap: usize) -> Self {
        Self {
            pos_a: self.pos_a + advance_step(max_a, overlap),
            pos_b: self.pos_b + advance_step(max_b, overlap),
        }
    }
}

/// Cursor of the translation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranslationCursor {
    pub pos: usize,
}

impl TranslationCursor {
    pub fn is_active(&self, len: usize) -> bool {
        self.pos < len
    }

    pub fn window(&self, config: &WindowConfig, len: usize) -> Window {
        Window::at(self.pos, config.size, len)
    }

    /// Next cursor after `returned` translated strings
    pub fn advance(self, returned: usize, overlap: usize) -> Self {
        Self {
            pos: self.pos + advance_step(returned, overlap),
        }
    }
}
