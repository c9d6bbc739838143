use log::debug;

use crate::error::RegistryError;
use crate::registry::{AnimRegistry, ResolvedAnimation};

/// Resolves which animation's geometry to use for an entity.
pub trait MetadataResolver {
    /// Parse `document` and pick the first animation named in `priority`.
    ///
    /// `Ok(None)` means the document is valid but nothing in it matches.
    fn resolve(
        &self,
        document: &[u8],
        priority: &[String],
    ) -> Result<Option<ResolvedAnimation>, RegistryError>;
}

/// Resolver for `AnimData.xml` registry documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimDataResolver;

impl MetadataResolver for AnimDataResolver {
    fn resolve(
        &self,
        document: &[u8],
        priority: &[String],
    ) -> Result<Option<ResolvedAnimation>, RegistryError> {
        let registry = AnimRegistry::from_bytes(document)?;
        let resolved = registry.resolve(priority);
        match &resolved {
            Some(anim) => debug!(
                "Found {}: Width {}, Height {}",
                anim.name, anim.frame_width, anim.frame_height
            ),
            None => debug!("No matching animation found in AnimData.xml"),
        }
        Ok(resolved)
    }
}
