use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Outcome of one identifier. Everything except `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    Pending,
    SkippedExists,
    SkippedNoMetadata,
    SkippedNoAsset,
    Success,
    Failed,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::SkippedExists => "skipped-exists",
            ItemStatus::SkippedNoMetadata => "skipped-no-metadata",
            ItemStatus::SkippedNoAsset => "skipped-no-asset",
            ItemStatus::Success => "success",
            ItemStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        self != ItemStatus::Pending
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub identifier: String,
    pub output_name: String,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl BatchItem {
    pub fn pending(identifier: &str, output_name: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            output_name: output_name.to_string(),
            status: ItemStatus::Pending,
            detail: None,
        }
    }

    /// Assign the terminal status.
    pub fn finish(mut self, status: ItemStatus, detail: Option<String>) -> Self {
        debug_assert!(!self.status.is_terminal(), "status already assigned");
        self.status = status;
        self.detail = detail;
        self
    }
}

/// Counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub skipped_exists: usize,
    pub skipped_no_metadata: usize,
    pub skipped_no_asset: usize,
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} item(s): {} saved, {} already processed, {} without metadata, {} without sprite, {} failed",
            self.total,
            self.success,
            self.skipped_exists,
            self.skipped_no_metadata,
            self.skipped_no_asset,
            self.failed
        )
    }
}

/// Every item of one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn push(&mut self, item: BatchItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn statuses(&self) -> Vec<ItemStatus> {
        self.items.iter().map(|i| i.status).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.items.len(),
            ..Default::default()
        };
        for item in &self.items {
            match item.status {
                ItemStatus::Success => summary.success += 1,
                ItemStatus::SkippedExists => summary.skipped_exists += 1,
                ItemStatus::SkippedNoMetadata => summary.skipped_no_metadata += 1,
                ItemStatus::SkippedNoAsset => summary.skipped_no_asset += 1,
                ItemStatus::Failed => summary.failed += 1,
                ItemStatus::Pending => {}
            }
        }
        summary
    }

    /// Write the report as pretty-printed JSON.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
