/*!
 * Tests for language utilities
 */

use yasrai::language_utils::{get_language_name, language_from_code, resolve_language_name};

#[test]
fn test_getLanguageName_withIsoCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("deu").unwrap(), "German");
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert_eq!(get_language_name(" FR ").unwrap(), "French");
    assert!(get_language_name("xx").is_err());
}

#[test]
fn test_resolveLanguageName_withFreeFormName_shouldPassThrough() {
    assert_eq!(resolve_language_name("ru").unwrap(), "Russian");
    assert_eq!(resolve_language_name("Brazilian Portuguese").unwrap(), "Brazilian Portuguese");
    assert!(resolve_language_name("   ").is_err());
}

#[test]
fn test_languageFromCode_withBibliographicCode_shouldMatchTerminologyCode() {
    assert_eq!(language_from_code("fre"), language_from_code("fra"));
    assert!(language_from_code("english").is_none());
}
