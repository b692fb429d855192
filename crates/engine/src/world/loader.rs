use thiserror::Error;
use tracing::{error, info, warn};

use crate::app::{tiles_to_pixels, TILE_SIZE};
use crate::content::{AssetCatalog, AssetError, AssetSource, TILES_PER_PAGE};

use super::level::Level;
use super::session::LevelSession;
use super::sprite::{EnemyKind, PowerUpKind, Sprite, SpriteHost, SpriteKind};
use super::tile_grid::{SpecialTile, Tile, TileGrid, TileId};

pub const COMMENT_PREFIX: char = '#';
/// Levels with their own slice of the tile catalog. Tile letters in later
/// levels have no slice to resolve against and stay empty.
pub const TILE_SLICE_LEVELS: u32 = 3;
pub const PLAYER_SPAWN_TILE_X: i32 = 3;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level resource not found: {name}")]
    NotFound { name: String },
    #[error("no levels available")]
    NoLevels,
    #[error(transparent)]
    Asset(AssetError),
}

impl From<AssetError> for LevelError {
    fn from(error: AssetError) -> Self {
        match error {
            AssetError::NotFound { name } => LevelError::NotFound { name },
            other => LevelError::Asset(other),
        }
    }
}

/// Maps a level index to its text resource, `<prefix><index><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelNaming {
    pub prefix: String,
    pub suffix: String,
}

impl Default for LevelNaming {
    fn default() -> Self {
        Self {
            prefix: "maps/map".to_string(),
            suffix: ".txt".to_string(),
        }
    }
}

impl LevelNaming {
    pub fn resource_name(&self, index: u32) -> String {
        format!("{}{}{}", self.prefix, index, self.suffix)
    }
}

/// What a single level-text character places in its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Tile { letter: u8 },
    Special(SpecialTile),
    Sprite(SpriteKind),
    Empty,
}

pub fn classify_symbol(symbol: char) -> Placement {
    if symbol.is_ascii_uppercase() {
        let letter = symbol as u8 - b'A';
        if (letter as usize) < TILES_PER_PAGE {
            return Placement::Tile { letter };
        }
    }
    if let Some(special) = SpecialTile::from_symbol(symbol) {
        return Placement::Special(special);
    }
    match symbol {
        'o' => Placement::Sprite(SpriteKind::PowerUp(PowerUpKind::Coin)),
        '!' => Placement::Sprite(SpriteKind::PowerUp(PowerUpKind::Music)),
        '*' => Placement::Sprite(SpriteKind::PowerUp(PowerUpKind::Goal)),
        '1' => Placement::Sprite(SpriteKind::Enemy(EnemyKind::A)),
        '2' => Placement::Sprite(SpriteKind::Enemy(EnemyKind::B)),
        '3' => Placement::Sprite(SpriteKind::Enemy(EnemyKind::C)),
        _ => Placement::Empty,
    }
}

/// Catalog index for a tile letter in the given level, if that level has a
/// tile slice.
pub fn tile_catalog_index(letter: u8, level_index: u32) -> Option<usize> {
    if level_index == 0 || level_index > TILE_SLICE_LEVELS {
        return None;
    }
    Some(letter as usize + TILES_PER_PAGE * (level_index as usize - 1))
}

/// Spawns from `host`, centred in the tile horizontally and resting on the
/// tile's bottom edge. An unset host places nothing.
pub fn place_sprite(
    sprites: &mut Vec<Sprite>,
    host: Option<&SpriteHost>,
    tile_x: i32,
    tile_y: i32,
) {
    let Some(host) = host else {
        return;
    };
    let mut sprite = host.spawn();
    sprite.position.x =
        (tiles_to_pixels(tile_x) + (TILE_SIZE - sprite.width() as i32) / 2) as f32;
    sprite.position.y = (tiles_to_pixels(tile_y + 1) - sprite.height() as i32) as f32;
    sprites.push(sprite);
}

/// Builds a level from its text. Symbols that resolve to nothing leave their
/// cell empty, so parsing cannot fail.
pub fn parse_level(text: &str, level_index: u32, catalog: &AssetCatalog) -> Level {
    let lines = text
        .lines()
        .filter(|line| !line.starts_with(COMMENT_PREFIX))
        .collect::<Vec<_>>();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let height = lines.len();

    let mut grid = TileGrid::new(width as u32, height as u32);
    let mut sprites = Vec::new();
    let mut unresolved_tiles = 0usize;

    for (y, line) in lines.iter().enumerate() {
        for (x, symbol) in line.chars().enumerate() {
            let (x, y) = (x as i32, y as i32);
            match classify_symbol(symbol) {
                Placement::Tile { letter } => {
                    let resolved = tile_catalog_index(letter, level_index).and_then(|index| {
                        catalog
                            .tiles()
                            .get(index)
                            .map(|image| (index, image.clone()))
                    });
                    match resolved {
                        Some((index, image)) => {
                            grid.set_tile(
                                x,
                                y,
                                Some(Tile {
                                    id: TileId::Indexed(index as u16),
                                    image,
                                }),
                            );
                        }
                        None => unresolved_tiles += 1,
                    }
                }
                Placement::Special(special) => {
                    if let Some(image) = catalog.tiles().special(special) {
                        grid.set_tile(
                            x,
                            y,
                            Some(Tile {
                                id: TileId::Special(special),
                                image: image.clone(),
                            }),
                        );
                    }
                }
                Placement::Sprite(kind) => place_sprite(&mut sprites, catalog.host(kind), x, y),
                Placement::Empty => {}
            }
        }
    }

    if unresolved_tiles > 0 {
        warn!(
            level_index,
            unresolved_tiles,
            catalog_len = catalog.tiles().len(),
            "level_tiles_without_catalog_slice"
        );
    }

    let mut player = catalog.player().spawn();
    player.position.x = tiles_to_pixels(PLAYER_SPAWN_TILE_X) as f32;
    player.position.y = 0.0;

    Level::new(level_index, grid, sprites, player)
}

pub fn load_level(
    level_index: u32,
    catalog: &AssetCatalog,
    source: &dyn AssetSource,
    naming: &LevelNaming,
) -> Result<Level, LevelError> {
    let name = naming.resource_name(level_index);
    let text = source.read_text(&name)?;
    let level = parse_level(&text, level_index, catalog);
    info!(
        level_index,
        resource = name.as_str(),
        width = level.width(),
        height = level.height(),
        sprite_count = level.sprites().len(),
        "level_loaded"
    );
    Ok(level)
}

/// Advances the session to the next level. Running past the last level wraps
/// back to the first one; if even the first level is missing the session is
/// reset and `NoLevels` is returned. Any other failure leaves the session
/// where it was before the call.
pub fn load_next_level(
    session: &mut LevelSession,
    catalog: &AssetCatalog,
    source: &dyn AssetSource,
    naming: &LevelNaming,
) -> Result<Level, LevelError> {
    let previous = *session;
    loop {
        let index = session.advance();
        match load_level(index, catalog, source, naming) {
            Ok(level) => return Ok(level),
            Err(LevelError::NotFound { name }) => {
                if index == LevelSession::FIRST_LEVEL {
                    session.reset();
                    error!(resource = name.as_str(), "no_levels_available");
                    return Err(LevelError::NoLevels);
                }
                warn!(
                    missing_index = index,
                    resource = name.as_str(),
                    "level_sequence_wrapped"
                );
                session.reset();
            }
            Err(other) => {
                *session = previous;
                return Err(other);
            }
        }
    }
}

/// Reloads the session's current level. Failures are logged and returned;
/// the session is left untouched.
pub fn reload_current_level(
    session: &LevelSession,
    catalog: &AssetCatalog,
    source: &dyn AssetSource,
    naming: &LevelNaming,
) -> Result<Level, LevelError> {
    let index = session.current_index();
    load_level(index, catalog, source, naming).map_err(|error| {
        error!(level_index = index, error = %error, "level_reload_failed");
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::catalog_test_support::full_source;
    use crate::content::{Image, MemoryAssetSource};
    use crate::world::sprite_test_support::creature_host;
    use crate::world::Activity;

    fn catalog_with_pages(pages: usize) -> AssetCatalog {
        AssetCatalog::load(&full_source(pages)).expect("catalog")
    }

    fn tile_index(level: &Level, x: i32, y: i32) -> Option<TileId> {
        level.grid().tile(x, y).map(|tile| tile.id)
    }

    #[test]
    fn symbol_table_is_fixed() {
        assert_eq!(classify_symbol('A'), Placement::Tile { letter: 0 });
        assert_eq!(classify_symbol('X'), Placement::Tile { letter: 23 });
        assert_eq!(classify_symbol('Y'), Placement::Empty);
        assert_eq!(classify_symbol('Z'), Placement::Empty);
        assert_eq!(classify_symbol('9'), Placement::Special(SpecialTile::Nine));
        assert_eq!(classify_symbol(';'), Placement::Special(SpecialTile::Semicolon));
        assert_eq!(classify_symbol('='), Placement::Special(SpecialTile::Equals));
        assert_eq!(classify_symbol('@'), Placement::Special(SpecialTile::At));
        assert_eq!(
            classify_symbol('o'),
            Placement::Sprite(SpriteKind::PowerUp(PowerUpKind::Coin))
        );
        assert_eq!(
            classify_symbol('!'),
            Placement::Sprite(SpriteKind::PowerUp(PowerUpKind::Music))
        );
        assert_eq!(
            classify_symbol('*'),
            Placement::Sprite(SpriteKind::PowerUp(PowerUpKind::Goal))
        );
        assert_eq!(classify_symbol('1'), Placement::Sprite(SpriteKind::Enemy(EnemyKind::A)));
        assert_eq!(classify_symbol('2'), Placement::Sprite(SpriteKind::Enemy(EnemyKind::B)));
        assert_eq!(classify_symbol('3'), Placement::Sprite(SpriteKind::Enemy(EnemyKind::C)));
        for other in ['.', ' ', 'a', '4', '#', 'é'] {
            assert_eq!(classify_symbol(other), Placement::Empty, "symbol={other:?}");
        }
    }

    #[test]
    fn tile_slices_are_disjoint_for_first_three_levels() {
        assert_eq!(tile_catalog_index(0, 1), Some(0));
        assert_eq!(tile_catalog_index(23, 1), Some(23));
        assert_eq!(tile_catalog_index(0, 2), Some(24));
        assert_eq!(tile_catalog_index(5, 3), Some(53));
        assert_eq!(tile_catalog_index(0, 4), None);
        assert_eq!(tile_catalog_index(0, 0), None);
    }

    #[test]
    fn small_level_scenario_builds_grid_and_sprite() {
        let catalog = catalog_with_pages(1);
        let level = parse_level("AAA\n1..", 1, &catalog);

        assert_eq!((level.width(), level.height()), (3, 2));
        for x in 0..3 {
            assert_eq!(tile_index(&level, x, 0), Some(TileId::Indexed(0)));
            assert_eq!(tile_index(&level, x, 1), None);
        }
        assert_eq!(level.sprites().len(), 1);
        let enemy = &level.sprites()[0];
        assert_eq!(enemy.kind(), SpriteKind::Enemy(EnemyKind::A));
        // 24x16 enemy frames in a 32px cell on row 1.
        assert_eq!(enemy.position.x, 4.0);
        assert_eq!(enemy.position.y, 48.0);
    }

    #[test]
    fn placed_sprites_are_centered_and_bottom_justified() {
        let catalog = catalog_with_pages(1);
        let level = parse_level("o..\n.2.\n..*!\n...3", 1, &catalog);

        assert_eq!(level.sprites().len(), 5);
        for sprite in level.sprites() {
            let left = sprite.position.x as i32;
            let tile_x = left.div_euclid(TILE_SIZE);
            let tile_left = tile_x * TILE_SIZE;
            let right = left + sprite.width() as i32;
            assert!(left >= tile_left && right <= tile_left + TILE_SIZE);
            assert_eq!(left - tile_left, tile_left + TILE_SIZE - right);
            let bottom = sprite.position.y as i32 + sprite.height() as i32;
            assert_eq!(bottom % TILE_SIZE, 0);
        }
    }

    #[test]
    fn sprites_are_ordered_top_to_bottom_left_to_right() {
        let catalog = catalog_with_pages(1);
        let level = parse_level("..2o\n1...\n.3", 1, &catalog);
        let kinds = level.sprites().iter().map(Sprite::kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                SpriteKind::Enemy(EnemyKind::B),
                SpriteKind::PowerUp(PowerUpKind::Coin),
                SpriteKind::Enemy(EnemyKind::A),
                SpriteKind::Enemy(EnemyKind::C),
            ]
        );
    }

    #[test]
    fn comments_are_skipped_and_ragged_lines_pad_with_empty_cells() {
        let catalog = catalog_with_pages(1);
        let text = "# header\nA\n#AAAAAAAAAA\nBCDE\n\nF";
        let level = parse_level(text, 1, &catalog);

        assert_eq!((level.width(), level.height()), (4, 4));
        assert_eq!(tile_index(&level, 0, 0), Some(TileId::Indexed(0)));
        assert_eq!(tile_index(&level, 1, 0), None);
        assert_eq!(tile_index(&level, 3, 1), Some(TileId::Indexed(4)));
        assert_eq!(tile_index(&level, 0, 2), None);
        assert_eq!(tile_index(&level, 0, 3), Some(TileId::Indexed(5)));
    }

    #[test]
    fn special_tiles_resolve_by_symbol() {
        let catalog = catalog_with_pages(1);
        let level = parse_level("9;=@", 1, &catalog);
        for (x, special) in SpecialTile::ALL.into_iter().enumerate() {
            assert_eq!(tile_index(&level, x as i32, 0), Some(TileId::Special(special)));
        }
    }

    #[test]
    fn later_levels_use_their_own_tile_slice() {
        let catalog = catalog_with_pages(3);
        let second = parse_level("AX", 2, &catalog);
        let third = parse_level("B", 3, &catalog);
        assert_eq!(tile_index(&second, 0, 0), Some(TileId::Indexed(24)));
        assert_eq!(tile_index(&second, 1, 0), Some(TileId::Indexed(47)));
        assert_eq!(tile_index(&third, 0, 0), Some(TileId::Indexed(49)));
    }

    #[test]
    fn letters_without_slice_or_catalog_entry_stay_empty() {
        let catalog = catalog_with_pages(1);
        let fourth = parse_level("AB", 4, &catalog);
        let second = parse_level("AB", 2, &catalog);
        assert_eq!(fourth.grid().occupied_count(), 0);
        assert_eq!(second.grid().occupied_count(), 0);
    }

    #[test]
    fn player_spawns_three_tiles_in_at_top() {
        let catalog = catalog_with_pages(1);
        let level = parse_level("AAAA", 1, &catalog);
        assert_eq!(level.player().kind(), SpriteKind::Player);
        assert_eq!(level.player().position.x, 96.0);
        assert_eq!(level.player().position.y, 0.0);
        assert_eq!(level.player().activity(), Activity::Active);
    }

    #[test]
    fn empty_text_still_yields_a_level_with_player() {
        let catalog = catalog_with_pages(0);
        let level = parse_level("", 1, &catalog);
        assert_eq!((level.width(), level.height()), (0, 0));
        assert!(level.sprites().is_empty());
    }

    #[test]
    fn unset_host_places_nothing() {
        let mut sprites = Vec::new();
        place_sprite(&mut sprites, None, 2, 2);
        assert!(sprites.is_empty());

        let host = creature_host(SpriteKind::Enemy(EnemyKind::A), 10, 10);
        place_sprite(&mut sprites, Some(&host), 2, 2);
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].position.x, 75.0);
        assert_eq!(sprites[0].position.y, 86.0);
    }

    #[test]
    fn placement_in_level_does_not_mutate_host() {
        let catalog = catalog_with_pages(1);
        let mut level = parse_level("1", 1, &catalog);
        level.sprites_mut()[0].position.x = 999.0;
        level.sprites_mut()[0].wake_up();
        let fresh = catalog.spawn(SpriteKind::Enemy(EnemyKind::A)).expect("spawn");
        assert_eq!(fresh.position.x, 0.0);
        assert_eq!(fresh.activity(), Activity::Dormant);
    }

    fn source_with_levels(count: u32) -> MemoryAssetSource {
        let mut source = full_source(1);
        for index in 1..=count {
            source.insert_text(LevelNaming::default().resource_name(index), "A".repeat(index as usize));
        }
        source
    }

    #[test]
    fn load_next_wraps_once_past_the_last_level() {
        let source = source_with_levels(2);
        let catalog = AssetCatalog::load(&source).expect("catalog");
        let naming = LevelNaming::default();
        let mut session = LevelSession::default();

        let widths = (0..5)
            .map(|_| {
                load_next_level(&mut session, &catalog, &source, &naming)
                    .expect("level")
                    .width()
            })
            .collect::<Vec<_>>();
        assert_eq!(widths, vec![1, 2, 1, 2, 1]);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn load_next_without_levels_reports_no_levels() {
        let source = source_with_levels(0);
        let catalog = AssetCatalog::load(&source).expect("catalog");
        let mut session = LevelSession::default();

        let result = load_next_level(&mut session, &catalog, &source, &LevelNaming::default());
        assert!(matches!(result, Err(LevelError::NoLevels)));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn load_next_from_a_missing_saved_index_wraps_to_first() {
        let source = source_with_levels(1);
        let catalog = AssetCatalog::load(&source).expect("catalog");
        let mut session = LevelSession::at(7);

        let level =
            load_next_level(&mut session, &catalog, &source, &LevelNaming::default()).expect("level");
        assert_eq!(level.index(), 1);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn reload_returns_current_level_without_touching_session() {
        let source = source_with_levels(2);
        let catalog = AssetCatalog::load(&source).expect("catalog");
        let naming = LevelNaming::default();
        let mut session = LevelSession::default();
        load_next_level(&mut session, &catalog, &source, &naming).expect("first");
        load_next_level(&mut session, &catalog, &source, &naming).expect("second");

        let reloaded = reload_current_level(&session, &catalog, &source, &naming).expect("reload");
        assert_eq!(reloaded.index(), 2);
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn reload_reports_missing_resource() {
        let source = source_with_levels(1);
        let catalog = AssetCatalog::load(&source).expect("catalog");
        let session = LevelSession::at(5);

        let result = reload_current_level(&session, &catalog, &source, &LevelNaming::default());
        assert!(matches!(result, Err(LevelError::NotFound { .. })));
        assert_eq!(session.current_index(), 5);
    }

    #[test]
    fn non_missing_errors_propagate_without_wrapping() {
        let source = full_source(1).with_image("maps/map1.txt", Image::solid(1, 1, [0; 4]));
        let catalog = AssetCatalog::load(&source).expect("catalog");
        let mut session = LevelSession::default();

        let result = load_next_level(&mut session, &catalog, &source, &LevelNaming::default());
        assert!(matches!(result, Err(LevelError::Asset(_))));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn failed_next_keeps_session_on_the_loaded_level() {
        let source =
            source_with_levels(1).with_image("maps/map2.txt", Image::solid(1, 1, [0; 4]));
        let catalog = AssetCatalog::load(&source).expect("catalog");
        let naming = LevelNaming::default();
        let mut session = LevelSession::default();
        load_next_level(&mut session, &catalog, &source, &naming).expect("first");

        let result = load_next_level(&mut session, &catalog, &source, &naming);
        assert!(matches!(result, Err(LevelError::Asset(_))));
        assert_eq!(session.current_index(), 1);
        let reloaded = reload_current_level(&session, &catalog, &source, &naming).expect("reload");
        assert_eq!(reloaded.index(), 1);
    }

    #[test]
    fn custom_naming_builds_resource_names() {
        let naming = LevelNaming {
            prefix: "levels/level".to_string(),
            suffix: String::new(),
        };
        assert_eq!(naming.resource_name(3), "levels/level3");
        assert_eq!(LevelNaming::default().resource_name(1), "maps/map1.txt");
    }
}
