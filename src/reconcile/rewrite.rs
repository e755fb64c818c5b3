use crate::errors::ReconcileError;

use super::window::Window;
use super::working::WorkingCue;

/// Write one round's translations onto the window, position by position
///
/// Fewer strings than cues is accepted, the remainder is picked up by the next
/// round. More strings than cues rejects the round without touching any cue.
/// Returns the number of strings applied.
pub fn apply_translations(
    result: &mut [WorkingCue],
    window: &Window,
    translations: Vec<String>,
) -> Result<usize, ReconcileError> {
    if translations.len() > window.len() {
        return Err(ReconcileError::TooManyTranslations {
            returned: translations.len(),
            window_len: window.len(),
        });
    }

    let applied = translations.len();
    for (cue, text) in result[window.range()].iter_mut().zip(translations) {
        cue.set_text(text);
    }
    Ok(applied)
}
