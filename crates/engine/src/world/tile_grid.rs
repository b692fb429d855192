use crate::content::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialTile {
    Nine,
    Semicolon,
    Equals,
    At,
}

impl SpecialTile {
    pub const ALL: [SpecialTile; 4] = [
        SpecialTile::Nine,
        SpecialTile::Semicolon,
        SpecialTile::Equals,
        SpecialTile::At,
    ];

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '9' => Some(SpecialTile::Nine),
            ';' => Some(SpecialTile::Semicolon),
            '=' => Some(SpecialTile::Equals),
            '@' => Some(SpecialTile::At),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            SpecialTile::Nine => '9',
            SpecialTile::Semicolon => ';',
            SpecialTile::Equals => '=',
            SpecialTile::At => '@',
        }
    }

    pub fn index(self) -> usize {
        match self {
            SpecialTile::Nine => 0,
            SpecialTile::Semicolon => 1,
            SpecialTile::Equals => 2,
            SpecialTile::At => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileId {
    Indexed(u16),
    Special(SpecialTile),
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub image: Image,
}

/// Fixed-size tile map. Reads outside the grid are empty, never errors.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Option<Tile>>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index_of(x, y)
            .and_then(|index| self.tiles.get(index))
            .and_then(Option::as_ref)
    }

    /// Returns `false` when the cell is outside the grid.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Option<Tile>) -> bool {
        let Some(index) = self.index_of(x, y) else {
            return false;
        };
        self.tiles[index] = tile;
        true
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_some()).count()
    }
}
