mod renderer;
mod scene_renderer;
mod surface;
mod transform;

pub use renderer::Renderer;
pub use scene_renderer::{SceneRenderer, BACKGROUND_LAYER_COUNT};
pub use surface::{DrawSurface, FrameBuffer};
pub use transform::{
    offset_y, parallax_x, pixels_to_tiles, pixels_to_tiles_f32, round_px, scroll_offset_x,
    tiles_to_pixels, visible_columns, Viewport, TILE_SIZE, TILE_SIZE_BITS,
};
