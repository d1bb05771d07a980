/*!
 * Common test utilities shared across the romloc test suite
 */

use romloc::app_config::{Config, TranslationUnit};

/// A small dialogue script with two labeled blocks, a comment, and
/// non-payload directives
pub const SAMPLE_SCRIPT: &str = "; dialogue for the intro scene\n\
GREETING::\n\
\ttext \"HELLO WORLD\"\n\
\tdone\n\
\n\
FAREWELL::\n\
\ttext \"GOODBYE MY FRIEND\"\n\
\tpara \"SEE YOU SOON\"\n\
\tdone\n";

/// Build a config suitable for mock-backed tests (no API key checks)
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.source_language = "en".to_string();
    config.target_language = "da".to_string();
    config.translation_unit = TranslationUnit::Block;
    config
}
