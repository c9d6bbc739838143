use serde::{Deserialize, Serialize};
use sprite_anim::{FULL_PRIORITY, LOCAL_PRIORITY, ResolvedAnimation};

use crate::naming::{DEBUG_SUFFIX, OUTPUT_SUFFIX};

/// What to do when an entity's `AnimData.xml` is not well-formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorPolicy {
    /// Stop the whole run.
    #[default]
    Abort,
    /// Mark the item as having no metadata and continue.
    Skip,
}

/// Which sprite sheets are tried once an animation is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSelection {
    /// Only the resolved animation's sheet.
    Resolved,
    /// Every sheet of the priority list, in order.
    Prioritized,
}

/// Per-mode knobs of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProfile {
    pub priority: Vec<String>,
    pub asset_selection: AssetSelection,
    pub on_parse_error: ParseErrorPolicy,
    pub skip_existing: bool,
    pub output_suffix: String,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl BatchProfile {
    /// Single interactive item: always rewritten, a bad registry only stops that item.
    pub fn debug() -> Self {
        Self {
            priority: names(FULL_PRIORITY),
            asset_selection: AssetSelection::Prioritized,
            on_parse_error: ParseErrorPolicy::Skip,
            skip_existing: false,
            output_suffix: DEBUG_SUFFIX.to_string(),
        }
    }

    /// Directory tree on local disk.
    pub fn local() -> Self {
        Self {
            priority: names(LOCAL_PRIORITY),
            asset_selection: AssetSelection::Prioritized,
            on_parse_error: ParseErrorPolicy::Abort,
            skip_existing: true,
            output_suffix: OUTPUT_SUFFIX.to_string(),
        }
    }

    /// Identifier list fetched from the remote store.
    pub fn remote() -> Self {
        Self {
            priority: names(FULL_PRIORITY),
            asset_selection: AssetSelection::Resolved,
            on_parse_error: ParseErrorPolicy::Abort,
            skip_existing: true,
            output_suffix: OUTPUT_SUFFIX.to_string(),
        }
    }

    pub fn with_parse_error_policy(mut self, policy: ParseErrorPolicy) -> Self {
        self.on_parse_error = policy;
        self
    }

    /// Animations whose sheets are fetched for `resolved`, in order.
    pub fn sheet_candidates(&self, resolved: &ResolvedAnimation) -> Vec<String> {
        match self.asset_selection {
            AssetSelection::Resolved => vec![resolved.name.clone()],
            AssetSelection::Prioritized => self.priority.clone(),
        }
    }
}
