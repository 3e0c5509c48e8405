//! Run orchestration: scan a folder, caption each image, persist the results.

use std::path::{Path, PathBuf};

use crate::config::RunConfiguration;
use crate::error::{PipelineError, PipelineResult};
use crate::llm::{CaptionClient, CaptionService};
use crate::progress::{messages, ProgressSink};
use crate::storage::{output_file_name, FileStorage, Storage};
use crate::types::ResultItem;

use super::metadata::{MetadataExtractor, MetadataSource};
use super::prompt::caption_prompt;
use super::resize::{ImageResizer, ImageTransformer, UPLOAD_MIME_SUBTYPE};

/// Why a run stopped before processing any file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// A required setting is missing or malformed
    IncompleteConfiguration,
    /// The source folder does not exist
    SourceFolderMissing,
    /// The source folder holds no supported images
    NoImagesFound,
}

/// Totals for a run that reached the end of the file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// `None` when every file failed and nothing was written
    pub output_file: Option<PathBuf>,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Aborted(AbortReason),
    Completed(RunSummary),
}

/// The captioning pipeline: one file at a time, in discovery order.
pub struct Pipeline {
    metadata: Box<dyn MetadataSource>,
    transformer: Box<dyn ImageTransformer>,
    captioner: Box<dyn CaptionService>,
    storage: Box<dyn Storage>,
}

impl Pipeline {
    pub fn new(
        metadata: Box<dyn MetadataSource>,
        transformer: Box<dyn ImageTransformer>,
        captioner: Box<dyn CaptionService>,
        storage: Box<dyn Storage>,
    ) -> Self {
        Self {
            metadata,
            transformer,
            captioner,
            storage,
        }
    }

    /// EXIF extractor, Lanczos resizer, HTTP caption client and local filesystem.
    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(MetadataExtractor),
            Box::new(ImageResizer),
            Box::new(CaptionClient::new()),
            Box::new(FileStorage),
        )
    }

    /// Execute one run.
    ///
    /// Per-file failures are reported to `progress` and counted; they never
    /// end the run. `Err` is returned only when enumerating the source folder
    /// or writing the output file fails.
    pub async fn run(
        &mut self,
        config: &RunConfiguration,
        progress: &dyn ProgressSink,
    ) -> PipelineResult<RunOutcome> {
        // CollectConfig
        let configured = config
            .validate()
            .and_then(|()| self.captioner.init_provider(&config.provider));
        if let Err(e) = configured {
            tracing::warn!("Run aborted: {}", e);
            progress.notify(&format!("{} {}", messages::INCOMPLETE_CONFIGURATION, e));
            return Ok(RunOutcome::Aborted(AbortReason::IncompleteConfiguration));
        }

        // Scan
        let files = match self.scan(&config.source_folder, progress)? {
            Ok(files) => files,
            Err(reason) => return Ok(RunOutcome::Aborted(reason)),
        };

        // ProcessEach
        let mut items = Vec::with_capacity(files.len());
        let mut failed = 0usize;
        for (index, file) in files.iter().enumerate() {
            tracing::debug!("[{}/{}] {:?}", index + 1, files.len(), file);
            match self.process_file(file, config, progress).await {
                Ok(item) => {
                    items.push(item);
                    progress.notify(messages::SEPARATOR);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Skipping {:?}: {}", file, e);
                    progress.notify(&format!("{}: {}", file.display(), e));
                }
            }
        }

        // Persist
        let succeeded = items.len();
        let output_file = if items.is_empty() {
            progress.notify(messages::NOTHING_WRITTEN);
            None
        } else {
            let written = self.persist(config, &items, progress);
            if let Err(e) = &written {
                tracing::error!("Failed to write results: {}", e);
            }
            Some(written?)
        };

        progress.notify(messages::ALL_PROCESSED);
        tracing::info!(
            "Run complete: {} captioned, {} failed{}",
            succeeded,
            failed,
            output_file
                .as_ref()
                .map(|p| format!(", written to {:?}", p))
                .unwrap_or_default()
        );

        Ok(RunOutcome::Completed(RunSummary {
            output_file,
            succeeded,
            failed,
        }))
    }

    /// Outer `Err` is fatal; inner `Err` aborts the run cleanly.
    fn scan(
        &self,
        folder: &Path,
        progress: &dyn ProgressSink,
    ) -> PipelineResult<Result<Vec<PathBuf>, AbortReason>> {
        if !self.storage.directory_exists(folder)? {
            progress.notify(messages::FOLDER_MISSING);
            return Ok(Err(AbortReason::SourceFolderMissing));
        }

        let files = match self.storage.list_images(folder) {
            Ok(files) => files,
            // Removed between the existence check and the walk
            Err(PipelineError::DirectoryNotFound(_)) => {
                progress.notify(messages::FOLDER_MISSING);
                return Ok(Err(AbortReason::SourceFolderMissing));
            }
            Err(e) => return Err(e),
        };

        if files.is_empty() {
            progress.notify(messages::NO_PICTURES_FOUND);
            return Ok(Err(AbortReason::NoImagesFound));
        }
        progress.notify(messages::PICTURE_FOLDER_SELECTED);

        tracing::info!("Found {} image(s) in {:?}", files.len(), folder);
        Ok(Ok(files))
    }

    async fn process_file(
        &self,
        path: &Path,
        config: &RunConfiguration,
        progress: &dyn ProgressSink,
    ) -> PipelineResult<ResultItem> {
        progress.notify(messages::START_IMAGE);

        progress.notify(messages::EXTRACT_EXIF);
        let metadata = self.metadata.extract(path)?;

        progress.notify(messages::RESIZE_IMAGE);
        let image = self
            .transformer
            .resize(path, config.image_width, config.image_height)?;

        let prompt = caption_prompt(
            &config.target_language,
            &metadata,
            config.additional_context.as_deref(),
        )?;

        progress.notify(messages::VISION_REQUEST);
        let caption = self
            .captioner
            .request_caption(&image, UPLOAD_MIME_SUBTYPE, &prompt)
            .await?;

        Ok(ResultItem {
            image_name: path.display().to_string(),
            metadata,
            caption,
        })
    }

    fn persist(
        &self,
        config: &RunConfiguration,
        items: &[ResultItem],
        progress: &dyn ProgressSink,
    ) -> PipelineResult<PathBuf> {
        self.storage.ensure_directory(&config.output_folder)?;

        let name = output_file_name(&config.output_prefix, chrono::Local::now().naive_local());
        let output_file = config.output_folder.join(name);

        progress.notify(messages::WRITING_OUTPUT);
        self.storage.persist(&output_file, items)?;
        Ok(output_file)
    }
}
