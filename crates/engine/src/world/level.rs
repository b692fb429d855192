use crate::app::tiles_to_pixels;

use super::sprite::{LifeState, Sprite};
use super::tile_grid::TileGrid;

/// A fully loaded level: tiles, placed sprites in scan order, and the player.
#[derive(Debug, Clone)]
pub struct Level {
    index: u32,
    grid: TileGrid,
    sprites: Vec<Sprite>,
    player: Sprite,
}

impl Level {
    pub fn new(index: u32, grid: TileGrid, sprites: Vec<Sprite>, player: Sprite) -> Self {
        Self {
            index,
            grid,
            sprites,
            player,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn width_px(&self) -> i32 {
        tiles_to_pixels(self.grid.width() as i32)
    }

    pub fn height_px(&self) -> i32 {
        tiles_to_pixels(self.grid.height() as i32)
    }

    pub fn player(&self) -> &Sprite {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Sprite {
        &mut self.player
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn add_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    /// Advances every sprite's animation and drops sprites that finished
    /// dying. The player is kept regardless of its state.
    pub fn update(&mut self, elapsed_ms: u64) {
        self.player.update(elapsed_ms);
        for sprite in &mut self.sprites {
            sprite.update(elapsed_ms);
        }
        self.sprites
            .retain(|sprite| sprite.state() != LifeState::Dead);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::sprite_test_support::{creature_host, power_up_host};
    use crate::world::{EnemyKind, PowerUpKind, SpriteKind};

    fn sample_level() -> Level {
        let enemy = creature_host(SpriteKind::Enemy(EnemyKind::A), 8, 8).spawn();
        let coin = power_up_host(PowerUpKind::Coin, 8).spawn();
        let player = creature_host(SpriteKind::Player, 8, 8).spawn();
        Level::new(1, TileGrid::new(10, 4), vec![enemy, coin], player)
    }

    #[test]
    fn pixel_dimensions_follow_tile_size() {
        let level = sample_level();
        assert_eq!(level.width_px(), 320);
        assert_eq!(level.height_px(), 128);
    }

    #[test]
    fn update_drops_dead_sprites_but_keeps_player() {
        let mut level = sample_level();
        level.sprites_mut()[0].set_dying();
        level.player_mut().set_dying();
        level.update(0);
        level.update(1_000);
        assert_eq!(level.sprites().len(), 1);
        assert_eq!(level.sprites()[0].kind(), SpriteKind::PowerUp(PowerUpKind::Coin));
        assert_eq!(level.player().state(), LifeState::Dead);
    }
}
