use std::ops::RangeInclusive;

pub const TILE_SIZE: i32 = 32;
pub const TILE_SIZE_BITS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn width_px(self) -> i32 {
        self.width as i32
    }

    pub fn height_px(self) -> i32 {
        self.height as i32
    }
}

/// Floor division by the tile size; negative pixels map to negative tiles.
pub fn pixels_to_tiles(pixels: i32) -> i32 {
    pixels >> TILE_SIZE_BITS
}

pub fn pixels_to_tiles_f32(pixels: f32) -> i32 {
    pixels_to_tiles(round_px(pixels))
}

pub fn tiles_to_pixels(tiles: i32) -> i32 {
    tiles << TILE_SIZE_BITS
}

/// Rounds half up, so `-0.5` lands on `0` and `0.5` on `1`.
pub fn round_px(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// Horizontal scroll that keeps the player near the middle of the screen,
/// clamped so the map never scrolls past its edges. Player positions far off
/// the map still clamp.
pub fn scroll_offset_x(player_x: f32, viewport_width: i32, map_width_px: i32) -> i32 {
    let viewport_width = i64::from(viewport_width);
    let offset = viewport_width / 2 - i64::from(round_px(player_x)) - i64::from(TILE_SIZE);
    offset.min(0).max(viewport_width - i64::from(map_width_px)) as i32
}

/// Aligns the bottom of the map with the bottom of the screen.
pub fn offset_y(viewport_height: i32, map_height_px: i32) -> i32 {
    viewport_height - map_height_px
}

/// Layer x so that it scrolls from its left edge to its right edge while the
/// map scrolls end to end. A map exactly as wide as the viewport never
/// scrolls, so the layer stays at `0`.
pub fn parallax_x(offset_x: i32, viewport_width: i32, layer_width: i32, map_width_px: i32) -> i32 {
    let denominator = i64::from(viewport_width - map_width_px);
    if denominator == 0 {
        return 0;
    }
    let numerator = i64::from(offset_x) * i64::from(viewport_width - layer_width);
    (numerator / denominator) as i32
}

/// Tile columns worth drawing, with one column of slack on each side.
pub fn visible_columns(offset_x: i32, viewport_width: i32) -> RangeInclusive<i32> {
    let first = pixels_to_tiles(-offset_x);
    (first - 1)..=(first + pixels_to_tiles(viewport_width) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_tile_conversions_floor_for_negative_values() {
        assert_eq!(pixels_to_tiles(0), 0);
        assert_eq!(pixels_to_tiles(31), 0);
        assert_eq!(pixels_to_tiles(32), 1);
        assert_eq!(pixels_to_tiles(-1), -1);
        assert_eq!(pixels_to_tiles(-32), -1);
        assert_eq!(pixels_to_tiles(-33), -2);
        assert_eq!(tiles_to_pixels(3), 96);
        assert_eq!(tiles_to_pixels(-2), -64);
    }

    #[test]
    fn float_conversion_rounds_before_shifting() {
        assert_eq!(pixels_to_tiles_f32(31.4), 0);
        assert_eq!(pixels_to_tiles_f32(31.5), 1);
        assert_eq!(pixels_to_tiles_f32(-0.5), 0);
        assert_eq!(pixels_to_tiles_f32(-0.6), -1);
    }

    #[test]
    fn scroll_offset_stays_within_map_bounds() {
        let (vw, map_w) = (640, 3200);
        for player_x in [-500.0, 0.0, 96.0, 300.0, 1500.0, 3100.0, 9000.0] {
            let offset = scroll_offset_x(player_x, vw, map_w);
            assert!(offset <= 0, "player_x={player_x} offset={offset}");
            assert!(offset >= vw - map_w, "player_x={player_x} offset={offset}");
        }
    }

    #[test]
    fn scroll_offset_clamps_extreme_player_positions() {
        assert_eq!(scroll_offset_x(-3.0e9, 640, 3200), 0);
        assert_eq!(scroll_offset_x(3.0e9, 640, 3200), 640 - 3200);
        assert_eq!(scroll_offset_x(f32::MIN, 640, 3200), 0);
        assert_eq!(scroll_offset_x(f32::MAX, 640, 3200), 640 - 3200);
    }

    #[test]
    fn tile_round_trip_lands_on_containing_tile_origin() {
        for pixels in -100..=100 {
            assert_eq!(
                tiles_to_pixels(pixels_to_tiles(pixels)),
                pixels.div_euclid(TILE_SIZE) * TILE_SIZE,
                "pixels={pixels}"
            );
        }
    }

    #[test]
    fn scroll_offset_centers_player_between_clamps() {
        assert_eq!(scroll_offset_x(1000.0, 640, 3200), 320 - 1000 - TILE_SIZE);
        assert_eq!(scroll_offset_x(96.0, 640, 3200), 0);
        assert_eq!(scroll_offset_x(3150.0, 640, 3200), -2560);
    }

    #[test]
    fn narrow_map_pins_to_right_clamp() {
        assert_eq!(scroll_offset_x(50.0, 640, 320), 320);
    }

    #[test]
    fn vertical_offset_bottom_aligns_map() {
        assert_eq!(offset_y(480, 640), -160);
        assert_eq!(offset_y(480, 320), 160);
    }

    #[test]
    fn parallax_maps_scroll_range_onto_layer_range() {
        let (vw, layer_w, map_w) = (640, 1000, 3200);
        assert_eq!(parallax_x(0, vw, layer_w, map_w), 0);
        assert_eq!(parallax_x(vw - map_w, vw, layer_w, map_w), vw - layer_w);
        assert_eq!(parallax_x(-1280, vw, layer_w, map_w), -180);
    }

    #[test]
    fn parallax_pins_layer_when_map_matches_viewport() {
        assert_eq!(parallax_x(0, 640, 1000, 640), 0);
        assert_eq!(parallax_x(-20, 640, 1000, 640), 0);
    }

    #[test]
    fn visible_columns_cover_viewport_with_slack() {
        assert_eq!(visible_columns(0, 640), -1..=21);
        assert_eq!(visible_columns(-100, 640), 2..=24);
    }
}
