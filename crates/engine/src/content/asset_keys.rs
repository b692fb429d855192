use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetKeyError {
    #[error("asset name must not be empty")]
    Empty,
    #[error("asset name must not start with '/'")]
    LeadingSlash,
    #[error("asset name must not contain '\\\\'")]
    Backslash,
    #[error("asset name must not contain '..'")]
    ParentTraversal,
    #[error("asset name contains invalid character {character:?}")]
    InvalidCharacter { character: char },
}

/// Asset names are relative, forward-slash paths below the assets root.
///
/// Punctuation is allowed because special tiles are named after their level
/// symbol (`Tilesets/;.png`, `Tilesets/@.png`).
pub fn validate_asset_name(name: &str) -> Result<(), AssetKeyError> {
    if name.is_empty() {
        return Err(AssetKeyError::Empty);
    }
    if name.starts_with('/') {
        return Err(AssetKeyError::LeadingSlash);
    }
    if name.contains('\\') {
        return Err(AssetKeyError::Backslash);
    }
    if name.contains("..") {
        return Err(AssetKeyError::ParentTraversal);
    }
    for ch in name.chars() {
        if ch.is_control() || ch.is_whitespace() {
            return Err(AssetKeyError::InvalidCharacter { character: ch });
        }
    }
    Ok(())
}
