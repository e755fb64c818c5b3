/*!
 * Prompt text sent to the oracle.
 *
 * Placeholders are substituted with `str::replace`, the templates contain
 * literal JSON braces.
 */

use serde_json::json;

/// Example answer shown in the alignment prompt
pub const ALIGNMENT_RESPONSE_EXAMPLE: &str = r#"{
  "corresponding_subtitles": [
    [1, 3],
    [1, 4],
    [2, 5],
    [3, 7],
    [4, 7]
  ]
}"#;

/// Header of the alignment prompt; `{example}` receives [`ALIGNMENT_RESPONSE_EXAMPLE`]
pub const ALIGNMENT_PROMPT_HEADER: &str = r#"Below are several enumerated sentences, which are part of subtitles for a movie.
Match the phrases from the first list with those from the second list.
In your answer, indicate the correspondence by numbers. Ignore any extra phrases.
One phrase from the first list can correspond to multiple phrases from the second list, and vice versa.
Example of response:
{example}
First element in the integer array must be number of phrase in the first list, second element must be number of
phrase in the second list."#;

/// Header of the translation prompt
pub const TRANSLATION_PROMPT_HEADER: &str = r#"Below is a JSON with subtitles for a part of {content_description}.
Translate them to {target_language} language please.
Provide the response in the following format:
{
  "translated_subtitles": [
    "translation for the first",
    "translation for the second",
    ...
  ]
}
Elements of resulting translated_subtitles object should correspond to elements of original_subtitles."#;

/// Render the alignment prompt for one pair of windows
pub fn render_alignment_prompt(reference: &[&str], source: &[&str]) -> String {
    let mut prompt = ALIGNMENT_PROMPT_HEADER.replace("{example}", ALIGNMENT_RESPONSE_EXAMPLE);

    prompt.push_str("\n\n=== List 1 ===\n\n");
    push_enumerated(&mut prompt, reference);
    prompt.push_str("\n=== List 2 ===\n\n");
    push_enumerated(&mut prompt, source);

    prompt.trim().to_string()
}

fn push_enumerated(prompt: &mut String, texts: &[&str]) {
    for (i, text) in texts.iter().enumerate() {
        prompt.push_str(&format!("{}\n{}\n\n", i + 1, text));
    }
}

/// Render the translation prompt for one window
pub fn render_translation_prompt(content_description: &str, target_language: &str, texts: &[&str]) -> String {
    let header = TRANSLATION_PROMPT_HEADER
        .replace("{content_description}", content_description)
        .replace("{target_language}", target_language);
    let body = serde_json::to_string_pretty(&json!({ "original_subtitles": texts }))
        .unwrap_or_else(|_| "{}".to_string());

    format!("{}\n\n{}", header, body).trim().to_string()
}
