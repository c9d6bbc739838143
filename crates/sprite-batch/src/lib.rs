//! Per-entity fetch → resolve → crop → trim → persist pipeline.

pub mod config;
pub mod coordinator;
pub mod item;
pub mod naming;
pub mod profile;
pub mod sink;
pub mod source;

pub use config::{ExtractConfig, RetryConfig};
pub use coordinator::{BatchCoordinator, BatchError};
pub use item::{BatchItem, BatchReport, BatchSummary, ItemStatus};
pub use naming::{DEBUG_SUFFIX, OUTPUT_SUFFIX, output_name};
pub use profile::{AssetSelection, BatchProfile, ParseErrorPolicy};
pub use sink::{DirectorySink, OutputSink, SinkError};
pub use source::{parse_identifier_list, read_identifier_list, walk_entity_dirs};
