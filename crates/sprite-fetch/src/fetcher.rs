use sprite_anim::anim_sheet_filename;

use crate::error::FetchError;

/// Raw sprite sheet bytes for one entity, as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAsset {
    pub entity_path: String,
    pub animation: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Source of per-entity asset files.
///
/// `Ok(None)` means the asset is absent. `Err` is reserved for failures that
/// say nothing about whether the asset exists (transport errors, unreadable
/// files).
pub trait AssetFetcher {
    fn fetch(&self, entity_path: &str, filename: &str) -> Result<Option<Vec<u8>>, FetchError>;

    /// Try each filename in order and return the first one present.
    fn fetch_first(
        &self,
        entity_path: &str,
        filenames: &[String],
    ) -> Result<Option<(String, Vec<u8>)>, FetchError> {
        for filename in filenames {
            if let Some(bytes) = self.fetch(entity_path, filename)? {
                return Ok(Some((filename.clone(), bytes)));
            }
        }
        Ok(None)
    }

    /// Fetch the sprite sheet of the first animation whose sheet exists.
    fn fetch_sprite(
        &self,
        entity_path: &str,
        animations: &[String],
    ) -> Result<Option<SpriteAsset>, FetchError> {
        for animation in animations {
            let filename = anim_sheet_filename(animation);
            if let Some(bytes) = self.fetch(entity_path, &filename)? {
                return Ok(Some(SpriteAsset {
                    entity_path: entity_path.to_string(),
                    animation: animation.clone(),
                    filename,
                    bytes,
                }));
            }
        }
        Ok(None)
    }
}
