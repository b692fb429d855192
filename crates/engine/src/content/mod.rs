mod animation;
mod asset_keys;
mod catalog;
mod images;
mod source;

pub use animation::{AnimFrame, Animation, DEATH_FRAME_MS, WALK_FRAME_MS};
pub use asset_keys::{validate_asset_name, AssetKeyError};
pub use catalog::{
    image_name, load_creature_hosts, load_power_up_hosts, load_tile_catalog,
    special_tile_image_name, tile_image_name, AssetCatalog, CatalogError, CreatureHosts,
    TileCatalog, IMAGE_DIR, TILESET_DIR, TILES_PER_PAGE,
};
pub use images::{flip_image, mirror_image, scaled_image, Image};
pub use source::{AssetError, AssetSource, DirAssetSource, MemoryAssetSource};

#[cfg(test)]
pub(crate) use catalog::test_support as catalog_test_support;
