/*!
 * Prompt and response contracts for the oracle.
 *
 * - `templates`: prompt text and rendering
 * - `contract`: response schemas and typed payloads, paired per task
 */

pub mod contract;
pub mod templates;

// Re-export main types
pub use contract::{
    AlignmentContract, AlignmentPayload, OracleContract, ResponseSchema, TranslationContract,
    TranslationPayload,
};
