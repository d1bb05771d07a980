/*!
 * Translation service and block-level orchestration.
 *
 * `TranslationService` wraps a configured provider behind a single
 * `translate_text` capability. `BlockTranslator` drives one translation call
 * per labeled block (or per payload line), concurrently, and splices the
 * results back into the document structure.
 */

use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use crate::app_config::{TranslationConfig, TranslationProvider, TranslationUnit};
use crate::language_utils;
use crate::providers::deepl::{DeepL, DeepLRequest};
use crate::providers::ollama::{Ollama, GenerationRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::Provider;
use crate::script_processor::{ScriptBlock, ScriptDocument};

/// Translation provider implementation variants
#[derive(Debug, Clone)]
enum TranslationProviderImpl {
    /// DeepL machine-translation API
    DeepL {
        /// Client instance
        client: DeepL,
    },

    /// Ollama local LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// Mock provider for tests
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Main translation service for dialogue scripts
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let retry_count = config.common.retry_count;
        let retry_backoff_ms = config.common.retry_backoff_ms;

        let provider = match config.provider {
            TranslationProvider::DeepL => TranslationProviderImpl::DeepL {
                client: DeepL::new_with_config(
                    config.get_api_key(),
                    config.get_endpoint(),
                    retry_count,
                    retry_backoff_ms,
                    config.get_rate_limit(),
                ),
            },
            TranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new_with_config(
                    config.get_endpoint(),
                    retry_count,
                    retry_backoff_ms,
                ),
            },
        };

        Ok(Self { provider, config })
    }

    /// Create a translation service backed by a mock provider, for tests
    pub fn with_mock(client: MockProvider, config: TranslationConfig) -> Self {
        Self {
            provider: TranslationProviderImpl::Mock { client },
            config,
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        match &self.provider {
            TranslationProviderImpl::DeepL { client } => client
                .test_connection()
                .await
                .map_err(|e| anyhow!("Failed to connect to DeepL: {}", e)),
            TranslationProviderImpl::Ollama { client } => client
                .test_connection()
                .await
                .map_err(|e| anyhow!("Failed to connect to Ollama: {}", e)),
            TranslationProviderImpl::Mock { client } => client
                .test_connection()
                .await
                .map_err(|e| anyhow!("Mock connection failure: {}", e)),
        }
    }

    /// Translate a single text string
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        // Skip empty text
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let translated = match &self.provider {
            TranslationProviderImpl::DeepL { client } => {
                let request =
                    DeepLRequest::new(text, target_language).source_lang(source_language);
                let response = client
                    .complete(request)
                    .await
                    .map_err(|e| anyhow!("DeepL translation error: {}", e))?;
                DeepL::extract_text(&response)
            }
            TranslationProviderImpl::Ollama { client } => {
                let system_prompt = self.build_system_prompt(source_language, target_language);
                let request = GenerationRequest::new(self.config.get_model(), text)
                    .system(&system_prompt)
                    .temperature(self.config.common.temperature);
                let response = client
                    .complete(request)
                    .await
                    .map_err(|e| anyhow!("Ollama translation error: {}", e))?;
                Ollama::extract_text(&response).trim().to_string()
            }
            TranslationProviderImpl::Mock { client } => {
                let request = MockRequest {
                    text: text.to_string(),
                    source_language: source_language.to_string(),
                    target_language: target_language.to_string(),
                };
                let response = client
                    .complete(request)
                    .await
                    .map_err(|e| anyhow!("Mock translation error: {}", e))?;
                MockProvider::extract_text(&response)
            }
        };

        Ok(Self::sanitize_translation(&translated))
    }

    /// A double quote in the translated text would terminate the quoted span
    /// when spliced back into a directive, so it is downgraded to an
    /// apostrophe. LLM backends in particular like to quote their output.
    fn sanitize_translation(text: &str) -> String {
        text.replace('"', "'")
    }

    /// Fill the system prompt template with language names (falling back to
    /// the raw codes when a name lookup fails)
    fn build_system_prompt(&self, source_language: &str, target_language: &str) -> String {
        let source_name = language_utils::get_language_name(source_language)
            .unwrap_or_else(|_| source_language.to_string());
        let target_name = language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());

        self.config
            .common
            .system_prompt
            .replace("{source_language}", &source_name)
            .replace("{target_language}", &target_name)
    }
}

/// Block translator driving one translation call per label
pub struct BlockTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Maximum number of concurrent requests
    max_concurrent_requests: usize,

    /// Unit of text per request
    unit: TranslationUnit,

    /// Abort the run on the first failed block instead of keeping its
    /// original text
    fail_fast: bool,
}

impl BlockTranslator {
    /// Create a new block translator
    pub fn new(service: TranslationService, unit: TranslationUnit, fail_fast: bool) -> Self {
        Self {
            max_concurrent_requests: service.config.optimal_concurrent_requests().max(1),
            service,
            unit,
            fail_fast,
        }
    }

    /// Translate every block of a document.
    ///
    /// Blocks are independent units of work and are translated concurrently,
    /// bounded by a semaphore. Results are keyed by block position, so the
    /// returned document keeps the original appearance order regardless of
    /// completion order.
    ///
    /// By default a block whose translation fails after retries keeps its
    /// original text and the run continues; with `fail_fast` the first
    /// failure aborts the whole run.
    pub async fn translate_document(
        &self,
        document: &ScriptDocument,
        source_language: &str,
        target_language: &str,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<ScriptDocument> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));
        let total_blocks = document.blocks.len();
        let processed_blocks = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(document.blocks.iter().enumerate())
            .map(|(block_index, block)| {
                let service = self.service.clone();
                let semaphore = semaphore.clone();
                let processed_blocks = processed_blocks.clone();
                let progress_callback = progress_callback.clone();
                let source_language = source_language.to_string();
                let target_language = target_language.to_string();
                let unit = self.unit;

                async move {
                    // Acquire a permit from the semaphore to bound concurrency
                    let _permit = semaphore
                        .acquire()
                        .await
                        .expect("Semaphore should not be closed");

                    debug!("Translating block '{}'", block.label);
                    let result = Self::translate_block(
                        &service,
                        block,
                        &source_language,
                        &target_language,
                        unit,
                    )
                    .await;

                    let current = processed_blocks.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_blocks);

                    (block_index, result)
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Reorder by block index to restore original appearance order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(idx, _)| *idx);

        let mut blocks = Vec::with_capacity(total_blocks);
        let mut failures = Vec::new();

        for (idx, result) in sorted_results {
            match result {
                Ok(block) => blocks.push(block),
                Err(e) => {
                    let label = &document.blocks[idx].label;
                    if self.fail_fast {
                        return Err(anyhow!("Translation of block '{}' failed: {}", label, e));
                    }
                    error!("Block '{}' failed, keeping original text: {}", label, e);
                    failures.push(label.clone());
                    blocks.push(document.blocks[idx].clone());
                }
            }
        }

        if !failures.is_empty() {
            warn!(
                "{} of {} block(s) kept their original text: {}",
                failures.len(),
                total_blocks,
                failures.join(", ")
            );
        }

        Ok(ScriptDocument { blocks })
    }

    /// Translate one block according to the configured unit
    async fn translate_block(
        service: &TranslationService,
        block: &ScriptBlock,
        source_language: &str,
        target_language: &str,
        unit: TranslationUnit,
    ) -> Result<ScriptBlock> {
        match unit {
            TranslationUnit::Block => {
                let flattened = block.flattened_text();
                if flattened.is_empty() {
                    // Nothing translatable; the block passes through as-is
                    return Ok(block.clone());
                }
                let translated = service
                    .translate_text(&flattened, source_language, target_language)
                    .await?;
                Ok(block.realign(&translated))
            }
            TranslationUnit::Line => {
                let mut lines = Vec::with_capacity(block.lines.len());
                for line in &block.lines {
                    match line.payload_text() {
                        Some(payload) => {
                            let translated = service
                                .translate_text(payload, source_language, target_language)
                                .await?;
                            // Collapse any whitespace the backend introduced;
                            // a payload must stay on its single line
                            let flat = translated
                                .split_whitespace()
                                .collect::<Vec<_>>()
                                .join(" ");
                            lines.push(line.with_payload(&flat));
                        }
                        None => lines.push(line.clone()),
                    }
                }
                Ok(ScriptBlock {
                    label: block.label.clone(),
                    label_line: block.label_line.clone(),
                    lines,
                })
            }
        }
    }
}
