use thiserror::Error;
use tracing::{info, warn};

use crate::world::{EnemyKind, PowerUpKind, SpecialTile, Sprite, SpriteHost, SpriteKind};

use super::animation::Animation;
use super::images::{mirror_image, Image};
use super::source::{AssetError, AssetSource};

pub const IMAGE_DIR: &str = "images";
pub const TILESET_DIR: &str = "Tilesets";
/// Tile letters per ground-type page, `A` through `X`.
pub const TILES_PER_PAGE: usize = 24;
const FIRST_GROUND_TYPE: u32 = 1;
const GROUND_TYPE_STEP: u32 = 2;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load tile image: {0}")]
    Tile(#[source] AssetError),
    #[error("failed to load player sprite: {0}")]
    PlayerHost(#[source] AssetError),
}

pub fn image_name(relative: &str) -> String {
    format!("{IMAGE_DIR}/{relative}")
}

/// Letters restart at `A` on every page, so page two is `A_3.png` through
/// `X_3.png` rather than continuing the alphabet from page one.
pub fn tile_image_name(page: usize, letter_index: usize) -> String {
    let letter = (b'A' + letter_index as u8) as char;
    let ground_type = FIRST_GROUND_TYPE + GROUND_TYPE_STEP * page as u32;
    image_name(&format!("{TILESET_DIR}/{letter}_{ground_type}.png"))
}

pub fn special_tile_image_name(special: SpecialTile) -> String {
    image_name(&format!("{TILESET_DIR}/{}.png", special.symbol()))
}

/// Tile images in catalog order plus the four symbol-addressed special tiles.
#[derive(Debug, Clone, Default)]
pub struct TileCatalog {
    tiles: Vec<Image>,
    specials: [Option<Image>; 4],
}

impl TileCatalog {
    pub fn new(tiles: Vec<Image>, specials: [Option<Image>; 4]) -> Self {
        Self { tiles, specials }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Image> {
        self.tiles.get(index)
    }

    pub fn special(&self, special: SpecialTile) -> Option<&Image> {
        self.specials[special.index()].as_ref()
    }
}

/// Probes `<Letter>_<GroundType>.png` page by page until the first name that
/// does not exist. Special tiles that are missing leave their slot empty.
pub fn load_tile_catalog(source: &dyn AssetSource) -> Result<TileCatalog, CatalogError> {
    let mut tiles = Vec::new();
    'pages: for page in 0.. {
        for letter_index in 0..TILES_PER_PAGE {
            let name = tile_image_name(page, letter_index);
            if !source.exists(&name) {
                break 'pages;
            }
            tiles.push(source.load_image(&name).map_err(CatalogError::Tile)?);
        }
    }

    let specials = SpecialTile::ALL.map(|special| {
        let name = special_tile_image_name(special);
        match source.load_image(&name) {
            Ok(image) => Some(image),
            Err(error) => {
                warn!(
                    symbol = %special.symbol(),
                    name = name.as_str(),
                    error = %error,
                    "special_tile_missing"
                );
                None
            }
        }
    });

    Ok(TileCatalog::new(tiles, specials))
}

struct CreatureFrames {
    folder: &'static str,
    prefix: &'static str,
    walk: [u8; 3],
    dying: [u8; 9],
}

const PLAYER_FRAMES: CreatureFrames = CreatureFrames {
    folder: "Pomf",
    prefix: "Pomf",
    walk: [1, 2, 3],
    // The player has eight death frames; the ninth holds on frame 3.
    dying: [1, 2, 3, 4, 5, 6, 7, 8, 3],
};

fn enemy_frames(kind: EnemyKind) -> CreatureFrames {
    let (folder, prefix) = match kind {
        EnemyKind::A => ("Enemigo1", "Enemigo1"),
        EnemyKind::B => ("Enemigo2", "Enemigo2"),
        EnemyKind::C => ("Enemigo3", "Enemigo3"),
    };
    CreatureFrames {
        folder,
        prefix,
        walk: [1, 2, 3],
        dying: [1, 2, 3, 4, 5, 6, 7, 8, 9],
    }
}

fn load_frames(
    source: &dyn AssetSource,
    frames: &CreatureFrames,
    tag: char,
    numbers: &[u8],
) -> Result<Vec<Image>, AssetError> {
    numbers
        .iter()
        .map(|number| {
            source.load_image(&image_name(&format!(
                "{}/{}{}{}.png",
                frames.folder, frames.prefix, tag, number
            )))
        })
        .collect()
}

fn load_creature_host(
    source: &dyn AssetSource,
    kind: SpriteKind,
    frames: &CreatureFrames,
) -> Result<SpriteHost, AssetError> {
    let walk_left = load_frames(source, frames, 'W', &frames.walk)?;
    let dying_left = load_frames(source, frames, 'D', &frames.dying)?;
    let walk_right = walk_left.iter().map(mirror_image).collect::<Vec<_>>();
    let dying_right = dying_left.iter().map(mirror_image).collect::<Vec<_>>();
    Ok(SpriteHost::creature(
        kind,
        Animation::walking(walk_left),
        Animation::walking(walk_right),
        Animation::dying(dying_left),
        Animation::dying(dying_right),
    ))
}

#[derive(Debug)]
pub struct CreatureHosts {
    pub player: SpriteHost,
    pub enemies: [Option<SpriteHost>; 3],
}

pub fn load_creature_hosts(source: &dyn AssetSource) -> Result<CreatureHosts, CatalogError> {
    let player = load_creature_host(source, SpriteKind::Player, &PLAYER_FRAMES)
        .map_err(CatalogError::PlayerHost)?;
    let enemies = [EnemyKind::A, EnemyKind::B, EnemyKind::C].map(|kind| {
        let sprite_kind = SpriteKind::Enemy(kind);
        load_creature_host(source, sprite_kind, &enemy_frames(kind))
            .map_err(|error| warn_host_unset(sprite_kind, &error))
            .ok()
    });
    Ok(CreatureHosts { player, enemies })
}

fn power_up_frame(kind: PowerUpKind) -> (&'static str, u64) {
    match kind {
        PowerUpKind::Goal => ("UI/13powerUp1.png", 150),
        PowerUpKind::Coin => ("UI/13powerUp2.png", 100),
        PowerUpKind::Music => ("UI/13powerUp3.png", 150),
    }
}

/// Each power-up shows its single image twice per cycle.
pub fn load_power_up_hosts(source: &dyn AssetSource) -> [Option<SpriteHost>; 3] {
    [PowerUpKind::Coin, PowerUpKind::Music, PowerUpKind::Goal].map(|kind| {
        let (relative, duration_ms) = power_up_frame(kind);
        match source.load_image(&image_name(relative)) {
            Ok(image) => Some(SpriteHost::power_up(
                kind,
                Animation::new([(image.clone(), duration_ms), (image, duration_ms)]),
            )),
            Err(error) => {
                warn_host_unset(SpriteKind::PowerUp(kind), &error);
                None
            }
        }
    })
}

fn warn_host_unset(kind: SpriteKind, error: &AssetError) {
    warn!(kind = ?kind, error = %error, "asset_missing_host_unset");
}

/// Everything loaded once at startup and only read afterwards.
#[derive(Debug)]
pub struct AssetCatalog {
    tiles: TileCatalog,
    player: SpriteHost,
    enemies: [Option<SpriteHost>; 3],
    power_ups: [Option<SpriteHost>; 3],
}

impl AssetCatalog {
    pub fn load(source: &dyn AssetSource) -> Result<Self, CatalogError> {
        let tiles = load_tile_catalog(source)?;
        let CreatureHosts { player, enemies } = load_creature_hosts(source)?;
        let power_ups = load_power_up_hosts(source);
        let catalog = Self::from_parts(tiles, player, enemies, power_ups);
        info!(
            tile_count = catalog.tiles.len(),
            host_count = SpriteKind::ALL
                .iter()
                .filter(|kind| catalog.host(**kind).is_some())
                .count(),
            "catalog_loaded"
        );
        Ok(catalog)
    }

    pub fn from_parts(
        tiles: TileCatalog,
        player: SpriteHost,
        enemies: [Option<SpriteHost>; 3],
        power_ups: [Option<SpriteHost>; 3],
    ) -> Self {
        Self {
            tiles,
            player,
            enemies,
            power_ups,
        }
    }

    pub fn tiles(&self) -> &TileCatalog {
        &self.tiles
    }

    /// The player host is always loaded; a catalog without one fails to build.
    pub fn player(&self) -> &SpriteHost {
        &self.player
    }

    pub fn host(&self, kind: SpriteKind) -> Option<&SpriteHost> {
        match kind {
            SpriteKind::Player => Some(&self.player),
            SpriteKind::Enemy(EnemyKind::A) => self.enemies[0].as_ref(),
            SpriteKind::Enemy(EnemyKind::B) => self.enemies[1].as_ref(),
            SpriteKind::Enemy(EnemyKind::C) => self.enemies[2].as_ref(),
            SpriteKind::PowerUp(PowerUpKind::Coin) => self.power_ups[0].as_ref(),
            SpriteKind::PowerUp(PowerUpKind::Music) => self.power_ups[1].as_ref(),
            SpriteKind::PowerUp(PowerUpKind::Goal) => self.power_ups[2].as_ref(),
        }
    }

    pub fn spawn(&self, kind: SpriteKind) -> Option<Sprite> {
        self.host(kind).map(SpriteHost::spawn)
    }
}
