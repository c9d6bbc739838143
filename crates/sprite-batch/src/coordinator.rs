use anyhow::Context;
use log::{error, info, warn};
use sprite_anim::{ANIM_DATA_FILE, AnimDataResolver, MetadataResolver, RegistryError};
use sprite_fetch::AssetFetcher;
use thiserror::Error;

use crate::item::{BatchItem, BatchReport, ItemStatus};
use crate::naming::output_name;
use crate::profile::{BatchProfile, ParseErrorPolicy};
use crate::sink::OutputSink;

#[derive(Debug, Error)]
pub enum BatchError {
    /// A malformed registry stopped the run under [`ParseErrorPolicy::Abort`].
    #[error("Run aborted: malformed AnimData.xml for {identifier}")]
    Aborted {
        identifier: String,
        #[source]
        source: RegistryError,
        /// Items finished before the failing identifier.
        report: Box<BatchReport>,
    },
}

/// Why a single item stopped early.
enum StepError {
    Metadata(RegistryError),
    Failed(anyhow::Error),
}

impl From<anyhow::Error> for StepError {
    fn from(e: anyhow::Error) -> Self {
        StepError::Failed(e)
    }
}

/// Drives identifiers through fetch → resolve → crop → trim → persist.
pub struct BatchCoordinator<'a> {
    fetcher: &'a dyn AssetFetcher,
    sink: &'a dyn OutputSink,
    resolver: Box<dyn MetadataResolver + 'a>,
    profile: BatchProfile,
}

impl<'a> BatchCoordinator<'a> {
    pub fn new(
        fetcher: &'a dyn AssetFetcher,
        sink: &'a dyn OutputSink,
        profile: BatchProfile,
    ) -> Self {
        Self {
            fetcher,
            sink,
            resolver: Box::new(AnimDataResolver),
            profile,
        }
    }

    pub fn with_resolver(mut self, resolver: impl MetadataResolver + 'a) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Process identifiers in order.
    ///
    /// Per-item problems become item statuses. The only error is a malformed
    /// registry under [`ParseErrorPolicy::Abort`], in which case nothing after
    /// the failing identifier is attempted.
    pub fn run<I, S>(&self, identifiers: I) -> Result<BatchReport, BatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match self.process_one(identifier) {
                Ok(item) => report.push(item),
                Err(source) => {
                    error!("Error parsing AnimData.xml for {identifier}: {source}");
                    return Err(BatchError::Aborted {
                        identifier: identifier.to_string(),
                        source,
                        report: Box::new(report),
                    });
                }
            }
        }
        info!("{}", report.summary());
        Ok(report)
    }

    /// Process a single identifier.
    ///
    /// `Err` is returned only for a malformed registry when the profile says
    /// to abort; every other outcome is a terminal [`BatchItem`].
    pub fn process_one(&self, identifier: &str) -> Result<BatchItem, RegistryError> {
        let name = output_name(identifier, &self.profile.output_suffix);
        let item = BatchItem::pending(identifier, &name);

        let (status, detail) = match self.try_process(identifier, &name) {
            Ok(status) => (status, None),
            Err(StepError::Metadata(e)) => match self.profile.on_parse_error {
                ParseErrorPolicy::Abort => return Err(e),
                ParseErrorPolicy::Skip => {
                    warn!("Error parsing AnimData.xml for {identifier}: {e}. Skipping...");
                    (ItemStatus::SkippedNoMetadata, Some(e.to_string()))
                }
            },
            Err(StepError::Failed(e)) => {
                warn!("Failed to process {identifier}: {e:#}");
                (ItemStatus::Failed, Some(format!("{e:#}")))
            }
        };
        Ok(item.finish(status, detail))
    }

    fn try_process(&self, identifier: &str, name: &str) -> Result<ItemStatus, StepError> {
        if self.profile.skip_existing && self.sink.contains(name) {
            info!("Skipping {identifier} (Already processed)");
            return Ok(ItemStatus::SkippedExists);
        }

        let Some(document) = self
            .fetcher
            .fetch(identifier, ANIM_DATA_FILE)
            .context("failed to fetch AnimData.xml")?
        else {
            info!("Missing AnimData.xml for {identifier}. Skipping...");
            return Ok(ItemStatus::SkippedNoMetadata);
        };

        let Some(anim) = self
            .resolver
            .resolve(&document, &self.profile.priority)
            .map_err(StepError::Metadata)?
        else {
            info!("No valid animation found in AnimData.xml for {identifier}. Skipping...");
            return Ok(ItemStatus::SkippedNoMetadata);
        };

        let candidates = self.profile.sheet_candidates(&anim);
        let Some(asset) = self
            .fetcher
            .fetch_sprite(identifier, &candidates)
            .context("failed to fetch sprite sheet")?
        else {
            info!("No sprite sheet found for {identifier}. Skipping...");
            return Ok(ItemStatus::SkippedNoAsset);
        };

        let frame = sprite_frame::process(&asset.bytes, anim.frame_width, anim.frame_height)
            .with_context(|| format!("failed to process {}", asset.filename))?;
        let png = frame.to_png().context("failed to encode frame")?;
        let path = self
            .sink
            .write(name, &png)
            .context("failed to save frame")?;

        info!(
            "Saved: {} ({} {}x{} from {})",
            path.display(),
            anim.name,
            frame.width(),
            frame.height(),
            asset.filename
        );
        Ok(ItemStatus::Success)
    }
}
