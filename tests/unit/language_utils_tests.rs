/*!
 * Tests for ISO language code validation and normalization
 */

use romloc::language_utils::{
    get_language_name, language_codes_match, normalize_to_part1, validate_language_code,
};

#[test]
fn test_validate_language_code_withValidCodes_shouldSucceed() {
    for code in ["en", "da", "ja", "fr", "EN", " da "] {
        assert!(validate_language_code(code).is_ok(), "code {:?} should validate", code);
    }
}

#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    for code in ["", "x", "english", "zz", "12"] {
        assert!(validate_language_code(code).is_err(), "code {:?} should be rejected", code);
    }
}

#[test]
fn test_normalize_to_part1_withTwoLetterCode_shouldLowercase() {
    assert_eq!(normalize_to_part1("DA").unwrap(), "da");
    assert_eq!(normalize_to_part1("en").unwrap(), "en");
}

#[test]
fn test_normalize_to_part1_withThreeLetterCode_shouldMapToTwoLetter() {
    assert_eq!(normalize_to_part1("dan").unwrap(), "da");
    assert_eq!(normalize_to_part1("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1("jpn").unwrap(), "ja");
}

#[test]
fn test_language_codes_match_withEquivalentCodes_shouldReturnTrue() {
    assert!(language_codes_match("da", "dan"));
    assert!(language_codes_match("EN", "eng"));
    assert!(!language_codes_match("da", "en"));
    assert!(!language_codes_match("da", "not-a-code"));
}

#[test]
fn test_get_language_name_withValidCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("da").unwrap(), "Danish");
    assert_eq!(get_language_name("en").unwrap(), "English");
}

#[test]
fn test_get_language_name_withInvalidCode_shouldFail() {
    assert!(get_language_name("zz").is_err());
}
