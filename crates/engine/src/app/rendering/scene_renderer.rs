use crate::content::Image;
use crate::world::Level;

use super::surface::DrawSurface;
use super::transform::{
    offset_y, parallax_x, round_px, scroll_offset_x, tiles_to_pixels, visible_columns, Viewport,
};

pub const BACKGROUND_LAYER_COUNT: usize = 3;
const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Draws a level over up to three parallax background layers.
///
/// The renderer holds no per-level state; everything it needs per frame comes
/// from the level and the viewport.
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    backgrounds: [Option<Image>; BACKGROUND_LAYER_COUNT],
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers are drawn back to front in argument order.
    pub fn set_backgrounds(&mut self, far: Option<Image>, middle: Option<Image>, near: Option<Image>) {
        self.backgrounds = [far, middle, near];
    }

    pub fn backgrounds(&self) -> &[Option<Image>; BACKGROUND_LAYER_COUNT] {
        &self.backgrounds
    }

    /// Renders one frame. Sprites that come on screen are woken up as a side
    /// effect.
    pub fn draw(&self, surface: &mut dyn DrawSurface, level: &mut Level, viewport: Viewport) {
        let (vw, vh) = (viewport.width_px(), viewport.height_px());
        let (map_w, map_h) = (level.width_px(), level.height_px());

        let offset_x = scroll_offset_x(level.player().position.x, vw, map_w);
        let offset_y = offset_y(vh, map_h);

        let needs_clear = self
            .backgrounds
            .iter()
            .any(|layer| layer.as_ref().map_or(true, |image| (image.height() as i32) < vh));
        if needs_clear {
            surface.fill(CLEAR_COLOR);
        }

        for layer in self.backgrounds.iter().flatten() {
            let x = parallax_x(offset_x, vw, layer.width() as i32, map_w);
            let y = vh - layer.height() as i32;
            surface.draw_image(layer, x, y);
        }

        let grid = level.grid();
        for tile_y in 0..grid.height() as i32 {
            for tile_x in visible_columns(offset_x, vw) {
                if let Some(tile) = grid.tile(tile_x, tile_y) {
                    surface.draw_image(
                        &tile.image,
                        tiles_to_pixels(tile_x) + offset_x,
                        tiles_to_pixels(tile_y) + offset_y,
                    );
                }
            }
        }

        let player = level.player();
        if let Some(image) = player.image() {
            surface.draw_image(
                image,
                round_px(player.position.x).saturating_add(offset_x),
                round_px(player.position.y).saturating_add(offset_y),
            );
        }

        for sprite in level.sprites_mut() {
            let x = round_px(sprite.position.x).saturating_add(offset_x);
            let y = round_px(sprite.position.y).saturating_add(offset_y);
            if let Some(image) = sprite.image() {
                surface.draw_image(image, x, y);
            }
            if (0..vw).contains(&x) {
                sprite.wake_up();
            }
        }
    }
}
