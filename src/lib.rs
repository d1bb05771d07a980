/*!
 * # ROMLOC - ROM Dialogue Localization
 *
 * A Rust library for machine translation of dialogue scripts embedded in
 * ROM disassembly projects.
 *
 * ## Features
 *
 * - Parse labeled dialogue blocks from assembly-style script files
 * - Translate quoted payloads using pluggable backends:
 *   - DeepL (machine-translation API)
 *   - Ollama (local LLM)
 * - Preserve indentation, directives, and line terminators byte-for-byte
 * - Word-count realignment of translated text onto the original lines,
 *   or per-line translation for perfect structural fidelity
 * - Concurrent per-block translation with retry and backoff
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `script_processor`: Script parsing, flattening, and reassembly
 * - `translation_service`: Provider dispatch and block orchestration
 * - `file_utils`: File system operations and atomic output
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for translation backends:
 *   - `providers::deepl`: DeepL API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Deterministic test double
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod script_processor;
pub mod translation_service;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use script_processor::{ScriptBlock, ScriptDocument, ScriptLine};
pub use translation_service::{BlockTranslator, TranslationService};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part1};
pub use errors::{AppError, ProviderError, ScriptError, TranslationError};
