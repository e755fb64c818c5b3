/*!
 * Windowed reconciliation engine.
 *
 * - `window`: window bounds and cursor advance with a progress floor
 * - `working`: working copy with tagged tombstones
 * - `consolidate`: N:M correspondence consolidation for the alignment mode
 * - `rewrite`: 1:1 text rewrite for the translation mode
 * - `compact`: tombstone removal and renumbering
 * - `align` / `translate`: the two oracle-driven loops
 * - `oracle`: the completion oracle seam and its provider-backed implementation
 * - `prompts`: versioned prompt and response contracts
 */

pub mod align;
pub mod compact;
pub mod consolidate;
pub mod oracle;
pub mod outcome;
pub mod prompts;
pub mod rewrite;
pub mod translate;
pub mod window;
pub mod working;

// Re-export main types
pub use align::SubtitleAligner;
pub use compact::{Compaction, compact, recompact};
pub use consolidate::{ConsolidationStats, CorrespondenceMap, CorrespondencePair, consolidate};
pub use oracle::{Oracle, OracleService};
pub use outcome::{AlignmentOutcome, Termination, TranslationOutcome};
pub use translate::SubtitleTranslator;
pub use window::{AlignmentCursor, TranslationCursor, Window, WindowConfig};
pub use working::{CueText, WorkingCue, working_copy};
