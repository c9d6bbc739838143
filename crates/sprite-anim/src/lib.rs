//! Animation registry (`AnimData.xml`) parsing and priority resolution.

pub mod error;
pub mod registry;
pub mod resolver;

pub use error::RegistryError;
pub use registry::{AnimRegistry, AnimationEntry, ResolvedAnimation};
pub use resolver::{AnimDataResolver, MetadataResolver};

/// File name of the per-entity animation registry.
pub const ANIM_DATA_FILE: &str = "AnimData.xml";

/// Priority list used by the remote and debug modes.
pub const FULL_PRIORITY: &[&str] = &["Idle", "Hover", "Walk"];

/// Priority list used when processing a local sprite tree.
pub const LOCAL_PRIORITY: &[&str] = &["Idle", "Hover"];

/// Sprite sheet file name for an animation, e.g. `Idle-Anim.png`.
pub fn anim_sheet_filename(name: &str) -> String {
    format!("{name}-Anim.png")
}
