mod level;
mod loader;
mod session;
mod sprite;
mod tile_grid;

pub use level::Level;
pub use loader::{
    classify_symbol, load_level, load_next_level, parse_level, place_sprite,
    reload_current_level, tile_catalog_index, LevelError, LevelNaming, Placement,
    COMMENT_PREFIX, PLAYER_SPAWN_TILE_X, TILE_SLICE_LEVELS,
};
pub use session::{
    LevelSession, SessionStore, SessionStoreError, SESSION_FILE_NAME, SESSION_FORMAT_VERSION,
};
pub use sprite::{
    Activity, AnimationSet, AnimationSlot, EnemyKind, LifeState, PowerUpKind, Sprite, SpriteHost,
    SpriteKind, Vec2,
};
pub use tile_grid::{SpecialTile, Tile, TileGrid, TileId};

#[cfg(test)]
pub(crate) use sprite::test_support as sprite_test_support;
