use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, error, debug};
use std::path::PathBuf;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::script_processor::ScriptDocument;
use crate::translation_service::{BlockTranslator, TranslationService};

// @module: Application controller driving the translation pipeline

// @struct: Main application controller
pub struct Controller {
    /// Application configuration
    config: Config,
    /// Translation service
    service: TranslationService,
}

impl Controller {
    /// Create a controller from a validated configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(config.translation.clone())?;
        Ok(Self { config, service })
    }

    /// Create a controller with an explicit service, used by tests to
    /// substitute a mock provider
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self { config, service }
    }

    /// Translate script content in memory: parse, translate every block,
    /// reassemble. Structure outside the quoted payloads is preserved
    /// byte-for-byte.
    pub async fn translate_content(
        &self,
        content: &str,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<String> {
        let document = ScriptDocument::parse(content)?;
        if document.blocks.is_empty() {
            warn!("No labeled blocks found in input");
            return Ok(content.to_string());
        }
        self.translate_document(&document, progress_callback).await
    }

    /// Translate an already-parsed document and render the result
    async fn translate_document(
        &self,
        document: &ScriptDocument,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<String> {
        debug!(
            "Translating {} block(s) from {} to {}",
            document.blocks.len(),
            self.config.source_language,
            self.config.target_language
        );

        let translator = BlockTranslator::new(
            self.service.clone(),
            self.config.translation_unit,
            self.config.fail_fast,
        );
        let translated = translator
            .translate_document(
                document,
                &self.config.source_language,
                &self.config.target_language,
                progress_callback,
            )
            .await?;

        Ok(translated.render())
    }

    /// Translate a single script file
    pub async fn run(
        &self,
        input_path: PathBuf,
        output_path: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        if !FileManager::file_exists(&input_path) {
            return Err(anyhow!("Input file does not exist: {:?}", input_path));
        }

        let output_path = output_path.unwrap_or_else(|| {
            FileManager::generate_output_path(&input_path, &self.config.target_language)
        });

        if output_path.exists() && !force_overwrite {
            warn!(
                "Output file already exists: {:?}. Use -f to force overwrite.",
                output_path
            );
            return Ok(());
        }

        info!("Translating script: {:?}", input_path);
        let content = FileManager::read_to_string(&input_path)?;

        let document = ScriptDocument::parse(&content)
            .with_context(|| format!("Failed to parse script: {:?}", input_path))?;

        let translated = if document.blocks.is_empty() {
            warn!("No labeled blocks found in {:?}", input_path);
            content
        } else {
            let progress = Self::block_progress_bar(document.blocks.len() as u64);
            let pb = progress.clone();
            let translated = self
                .translate_document(&document, move |current, _total| {
                    pb.set_position(current as u64);
                })
                .await?;
            progress.finish_and_clear();
            translated
        };

        FileManager::write_atomic(&output_path, &translated)?;
        info!("Wrote translated script: {:?}", output_path);

        Ok(())
    }

    /// Translate every `.asm` script in a directory tree
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        info!("Scanning for scripts in: {:?}", input_dir);
        let files = FileManager::find_files(&input_dir, "asm")?;

        if files.is_empty() {
            warn!("No .asm files found in {:?}", input_dir);
            return Ok(());
        }

        // Outputs from earlier runs (name.<lang>.asm) are not inputs
        let output_marker = format!(".{}.", self.config.target_language);
        let files: Vec<_> = files
            .into_iter()
            .filter(|f| {
                f.file_name()
                    .map(|name| !name.to_string_lossy().contains(&output_marker))
                    .unwrap_or(true)
            })
            .collect();

        let mut processed_count = 0;
        for file in &files {
            if let Err(e) = self.run(file.clone(), None, force_overwrite).await {
                error!("Error processing {:?}: {}", file, e);
            } else {
                processed_count += 1;
            }
        }

        info!("Finished processing {} of {} file(s)", processed_count, files.len());
        Ok(())
    }

    /// Verify that the configured provider is reachable
    pub async fn test_connection(&self) -> Result<()> {
        self.service.test_connection().await
    }

    fn block_progress_bar(len: u64) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} blocks ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb
    }
}
