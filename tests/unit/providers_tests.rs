/*!
 * Tests for provider request/response types
 */

use romloc::providers::deepl::{DeepL, DeepLRequest, DeepLResponse, DeepLTranslation};
use romloc::providers::ollama::{GenerationRequest, GenerationResponse, Ollama};
use romloc::providers::Provider;
use serde_json::json;

#[test]
fn test_deepl_request_withTargetLanguage_shouldUppercaseIt() {
    let request = DeepLRequest::new("HELLO WORLD", "da");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["text"], json!(["HELLO WORLD"]));
    assert_eq!(value["target_lang"], "DA");
    assert_eq!(value["preserve_formatting"], true);
}

#[test]
fn test_deepl_request_withoutSourceLanguage_shouldOmitField() {
    let request = DeepLRequest::new("HELLO", "da");
    let value = serde_json::to_value(&request).unwrap();

    assert!(value.get("source_lang").is_none());
    assert!(value.get("split_sentences").is_none());
}

#[test]
fn test_deepl_request_withSourceLanguage_shouldUppercaseIt() {
    let request = DeepLRequest::new("HELLO", "da").source_lang("en");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["source_lang"], "EN");
}

#[test]
fn test_deepl_response_shouldDeserializeFromApiShape() {
    let payload = json!({
        "translations": [
            { "detected_source_language": "EN", "text": "HEJ VERDEN" }
        ]
    });

    let response: DeepLResponse = serde_json::from_value(payload).unwrap();
    assert_eq!(DeepL::extract_text(&response), "HEJ VERDEN");
}

#[test]
fn test_deepl_extract_text_withEmptyTranslations_shouldReturnEmptyString() {
    let response = DeepLResponse {
        translations: Vec::<DeepLTranslation>::new(),
    };

    assert_eq!(DeepL::extract_text(&response), "");
}

#[test]
fn test_generation_request_shouldDisableStreaming() {
    let request = GenerationRequest::new("llama3.2:3b", "Translate this");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["model"], "llama3.2:3b");
    assert_eq!(value["prompt"], "Translate this");
    assert_eq!(value["stream"], false);
    assert!(value.get("system").is_none());
    assert!(value.get("options").is_none());
}

#[test]
fn test_generation_request_withSystemAndTemperature_shouldIncludeBoth() {
    let request = GenerationRequest::new("llama3.2:3b", "Translate this")
        .system("You are a translator")
        .temperature(0.5);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["system"], "You are a translator");
    assert_eq!(value["options"]["temperature"], 0.5);
}

#[test]
fn test_generation_response_shouldDeserializeFromApiShape() {
    let payload = json!({
        "model": "llama3.2:3b",
        "response": "HEJ VERDEN",
        "done": true,
        "eval_count": 12
    });

    let response: GenerationResponse = serde_json::from_value(payload).unwrap();
    assert_eq!(Ollama::extract_text(&response), "HEJ VERDEN");
    assert!(response.done);
    assert_eq!(response.eval_count, Some(12));
    assert_eq!(response.prompt_eval_count, None);
}
