/*!
 * Versioned oracle contracts.
 *
 * Each contract pairs a prompt template with the response schema the oracle
 * must honour and the typed payload the engine parses back.
 */

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::errors::ReconcileError;

use super::templates;

/// Response schema sent alongside a prompt
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    name: &'static str,
    version: u32,
    root_key: &'static str,
    item_schema: Value,
}

impl ResponseSchema {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Property holding the answer array
    pub fn root_key(&self) -> &'static str {
        self.root_key
    }

    /// JSON schema of the whole response object
    pub fn json_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                self.root_key: {
                    "type": "array",
                    "items": self.item_schema,
                }
            },
            "required": [self.root_key],
            "additionalProperties": false,
        })
    }

    /// OpenAI `response_format` value enforcing the schema
    pub fn openai_response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "strict": true,
                "name": self.name,
                "schema": self.json_schema(),
            }
        })
    }

    /// Plain-text instruction for providers without native schema support
    pub fn instruction(&self) -> String {
        format!(
            "Respond only with a single JSON object matching this JSON schema, without any other text:\n{}",
            self.json_schema()
        )
    }
}

/// Prompt/response pairing for one oracle task
pub trait OracleContract {
    /// Typed response payload
    type Payload: DeserializeOwned;

    const NAME: &'static str;
    const VERSION: u32;
    const ROOT_KEY: &'static str;

    /// Schema of one element of the answer array
    fn item_schema() -> Value;

    fn schema() -> ResponseSchema {
        ResponseSchema {
            name: Self::NAME,
            version: Self::VERSION,
            root_key: Self::ROOT_KEY,
            item_schema: Self::item_schema(),
        }
    }

    /// Parse an oracle answer, any schema violation is a malformed payload
    fn parse(value: Value) -> Result<Self::Payload, ReconcileError> {
        serde_json::from_value(value).map_err(|e| {
            ReconcileError::MalformedPayload(format!("{} v{}: {}", Self::NAME, Self::VERSION, e))
        })
    }
}

/// Answer of the alignment oracle
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignmentPayload {
    /// Raw `[reference, source]` pairs, 1-based and local to the windows
    pub corresponding_subtitles: Vec<Vec<i64>>,
}

/// Answer of the translation oracle
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationPayload {
    /// Translations position-aligned with the window
    pub translated_subtitles: Vec<String>,
}

/// Matching of reference and source phrases
pub struct AlignmentContract;

impl AlignmentContract {
    pub fn render_prompt(reference: &[&str], source: &[&str]) -> String {
        templates::render_alignment_prompt(reference, source)
    }
}

impl OracleContract for AlignmentContract {
    type Payload = AlignmentPayload;

    const NAME: &'static str = "corresponding_subtitles";
    const VERSION: u32 = 1;
    const ROOT_KEY: &'static str = "corresponding_subtitles";

    fn item_schema() -> Value {
        json!({ "type": "array", "items": { "type": "integer" } })
    }
}

/// Window-by-window translation
pub struct TranslationContract;

impl TranslationContract {
    pub fn render_prompt(content_description: &str, target_language: &str, texts: &[&str]) -> String {
        templates::render_translation_prompt(content_description, target_language, texts)
    }
}

impl OracleContract for TranslationContract {
    type Payload = TranslationPayload;

    const NAME: &'static str = "translated_subtitles";
    const VERSION: u32 = 1;
    const ROOT_KEY: &'static str = "translated_subtitles";

    fn item_schema() -> Value {
        json!({ "type": "string" })
    }
}
