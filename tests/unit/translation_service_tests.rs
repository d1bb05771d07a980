/*!
 * Tests for translation service behavior over mock providers
 */

use romloc::app_config::TranslationUnit;
use romloc::providers::mock::MockProvider;
use romloc::script_processor::ScriptDocument;
use romloc::translation_service::{BlockTranslator, TranslationService};
use crate::common::{test_config, SAMPLE_SCRIPT};

fn mock_service(provider: MockProvider) -> TranslationService {
    TranslationService::with_mock(provider, test_config().translation)
}

#[tokio::test]
async fn test_translate_text_withEmptyInput_shouldSkipProvider() {
    let provider = MockProvider::working();
    let service = mock_service(provider.clone());

    let result = service.translate_text("   ", "en", "da").await.unwrap();
    assert_eq!(result, "");
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translate_text_withWorkingProvider_shouldReturnTranslation() {
    let service = mock_service(MockProvider::working());

    let result = service.translate_text("HELLO", "en", "da").await.unwrap();
    assert_eq!(result, "[da] HELLO");
}

#[tokio::test]
async fn test_translate_document_withIdentityProvider_shouldPreservePayloads() {
    let service = mock_service(MockProvider::identity());
    let translator = BlockTranslator::new(service, TranslationUnit::Block, false);

    let doc = ScriptDocument::parse(SAMPLE_SCRIPT).unwrap();
    let translated = translator
        .translate_document(&doc, "en", "da", |_, _| {})
        .await
        .unwrap();

    // Identity translation reproduces every payload line exactly
    assert_eq!(translated.render(), doc.render());
}

#[tokio::test]
async fn test_translate_document_withManyBlocks_shouldKeepAppearanceOrder() {
    let mut content = String::new();
    for i in 0..20 {
        content.push_str(&format!("BLOCK{}::\n\ttext \"WORD{} HERE\"\n\tdone\n", i, i));
    }

    let service = mock_service(MockProvider::identity());
    let translator = BlockTranslator::new(service, TranslationUnit::Block, false);

    let doc = ScriptDocument::parse(&content).unwrap();
    let translated = translator
        .translate_document(&doc, "en", "da", |_, _| {})
        .await
        .unwrap();

    // Concurrent completion order must not leak into the output
    let labels: Vec<_> = translated.blocks.iter().map(|b| b.label.as_str()).collect();
    let expected: Vec<_> = (0..20).map(|i| format!("BLOCK{}", i)).collect();
    assert_eq!(labels, expected.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    assert_eq!(translated.render(), content);
}

#[tokio::test]
async fn test_translate_document_withFailingProvider_shouldKeepOriginalBlocks() {
    let service = mock_service(MockProvider::failing());
    let translator = BlockTranslator::new(service, TranslationUnit::Block, false);

    let doc = ScriptDocument::parse(SAMPLE_SCRIPT).unwrap();
    let translated = translator
        .translate_document(&doc, "en", "da", |_, _| {})
        .await
        .unwrap();

    // Per-block isolation: failed blocks fall back to their original text
    assert_eq!(translated.render(), doc.render());
}

#[tokio::test]
async fn test_translate_document_withFailFast_shouldAbortRun() {
    let service = mock_service(MockProvider::failing());
    let translator = BlockTranslator::new(service, TranslationUnit::Block, true);

    let doc = ScriptDocument::parse(SAMPLE_SCRIPT).unwrap();
    let result = translator.translate_document(&doc, "en", "da", |_, _| {}).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_translate_document_withPartialFailure_shouldIsolateFailedBlock() {
    // Two blocks, provider fails on the second request
    let service = mock_service(MockProvider::intermittent(2));
    let translator = BlockTranslator::new(service, TranslationUnit::Block, false);

    let doc = ScriptDocument::parse(SAMPLE_SCRIPT).unwrap();
    let translated = translator
        .translate_document(&doc, "en", "da", |_, _| {})
        .await
        .unwrap();

    // Both blocks still present, in order, line counts intact
    assert_eq!(translated.blocks.len(), 2);
    assert_eq!(translated.blocks[0].label, "GREETING");
    assert_eq!(translated.blocks[1].label, "FAREWELL");
    for (original, result) in doc.blocks.iter().zip(translated.blocks.iter()) {
        assert_eq!(original.lines.len(), result.lines.len());
    }
}

#[tokio::test]
async fn test_translate_document_withShrinkingProvider_shouldUnderrunGracefully() {
    let service = mock_service(MockProvider::shrinking());
    let translator = BlockTranslator::new(service, TranslationUnit::Block, false);

    let doc = ScriptDocument::parse(SAMPLE_SCRIPT).unwrap();
    let translated = translator
        .translate_document(&doc, "en", "da", |_, _| {})
        .await
        .unwrap();

    // One word for the whole GREETING block: the text line gets it all
    let greeting = translated.get("GREETING").unwrap();
    assert_eq!(greeting.lines[0].payload_text(), Some("HELLO"));

    // FAREWELL shrinks to one word too; the second payload line empties out
    let farewell = translated.get("FAREWELL").unwrap();
    assert_eq!(farewell.lines[0].payload_text(), Some("GOODBYE"));
    assert_eq!(farewell.lines[1].raw, "\tpara \"\"\n");
}

#[tokio::test]
async fn test_translate_document_withLineUnit_shouldTranslateEachPayloadLine() {
    let service = mock_service(MockProvider::working());
    let translator = BlockTranslator::new(service, TranslationUnit::Line, false);

    let doc = ScriptDocument::parse(SAMPLE_SCRIPT).unwrap();
    let translated = translator
        .translate_document(&doc, "en", "da", |_, _| {})
        .await
        .unwrap();

    let farewell = translated.get("FAREWELL").unwrap();
    assert_eq!(farewell.lines[0].payload_text(), Some("[da] GOODBYE MY FRIEND"));
    assert_eq!(farewell.lines[1].payload_text(), Some("[da] SEE YOU SOON"));
    // Non-payload lines still byte-identical
    assert_eq!(farewell.lines[2].raw, "\tdone\n");
}

#[tokio::test]
async fn test_translate_text_withQuotesInTranslation_shouldDowngradeThem() {
    let provider =
        MockProvider::working().with_custom_response(|_| "\"HEJ\" VERDEN".to_string());
    let service = mock_service(provider);

    let result = service.translate_text("HELLO WORLD", "en", "da").await.unwrap();
    assert_eq!(result, "'HEJ' VERDEN");
}

#[tokio::test]
async fn test_translate_document_withQuotesInTranslation_shouldKeepDirectivesWellFormed() {
    let provider =
        MockProvider::working().with_custom_response(|_| "\"QUOTED\" REPLY".to_string());
    let service = mock_service(provider);
    let translator = BlockTranslator::new(service, TranslationUnit::Block, false);

    let doc = ScriptDocument::parse("A::\n\ttext \"TWO WORDS\"\n\tdone\n").unwrap();
    let translated = translator
        .translate_document(&doc, "en", "da", |_, _| {})
        .await
        .unwrap();

    // The spliced payload must not terminate the quoted span early
    assert_eq!(translated.render(), "A::\n\ttext \"'QUOTED' REPLY\"\n\tdone\n");
    let reparsed = ScriptDocument::parse(&translated.render()).unwrap();
    assert_eq!(
        reparsed.get("A").unwrap().lines[0].payload_text(),
        Some("'QUOTED' REPLY")
    );
}

#[tokio::test]
async fn test_translate_document_shouldReportProgress() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let service = mock_service(MockProvider::identity());
    let translator = BlockTranslator::new(service, TranslationUnit::Block, false);

    let doc = ScriptDocument::parse(SAMPLE_SCRIPT).unwrap();
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_clone = seen.clone();

    translator
        .translate_document(&doc, "en", "da", move |_current, total| {
            assert_eq!(total, 2);
            seen_clone.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}
