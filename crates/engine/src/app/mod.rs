mod director;
mod loop_runner;
mod rendering;

pub use director::LevelDirector;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    offset_y, parallax_x, pixels_to_tiles, pixels_to_tiles_f32, round_px, scroll_offset_x,
    tiles_to_pixels, visible_columns, DrawSurface, FrameBuffer, Renderer, SceneRenderer,
    Viewport, BACKGROUND_LAYER_COUNT, TILE_SIZE, TILE_SIZE_BITS,
};
