use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::{ImageReader, Rgba, RgbaImage};

const ALPHA_OPAQUE_THRESHOLD: u8 = 128;

/// Shared, immutable RGBA8 image. Clones share the pixel buffer.
#[derive(Clone)]
pub struct Image {
    pixels: Arc<RgbaImage>,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Image {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixels.get_pixel(x, y).0)
    }

    /// Tightly packed RGBA8 rows.
    pub fn as_rgba(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn ptr_eq(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

pub(crate) fn decode_png_file(path: &Path) -> Result<Image, image::ImageError> {
    let decoded = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(Image::from_rgba(decoded.to_rgba8()))
}

/// Horizontal flip: the right-facing copy of a left-facing frame.
pub fn mirror_image(image: &Image) -> Image {
    scaled_image(image, -1.0, 1.0)
}

/// Vertical flip.
pub fn flip_image(image: &Image) -> Image {
    scaled_image(image, 1.0, -1.0)
}

/// Applies `scale(sx, sy)` followed by `translate((sx-1)*w/2, (sy-1)*h/2)`
/// into a buffer the size of the source. Destination pixels are inverse-mapped
/// through the transform and sampled nearest; anything that lands outside the
/// source stays fully transparent. Alpha is snapped to 0 or 255.
pub fn scaled_image(image: &Image, sx: f32, sy: f32) -> Image {
    let width = image.width();
    let height = image.height();
    let mut out = RgbaImage::new(width, height);
    if width == 0 || height == 0 || sx == 0.0 || sy == 0.0 {
        return Image::from_rgba(out);
    }

    let tx = (sx - 1.0) * width as f32 / 2.0;
    let ty = (sy - 1.0) * height as f32 / 2.0;

    for (dst_x, dst_y, dst) in out.enumerate_pixels_mut() {
        let src_x = ((dst_x as f32 + 0.5) / sx - tx).floor();
        let src_y = ((dst_y as f32 + 0.5) / sy - ty).floor();
        if src_x < 0.0 || src_y < 0.0 || src_x >= width as f32 || src_y >= height as f32 {
            continue;
        }
        let Some([r, g, b, a]) = image.pixel(src_x as u32, src_y as u32) else {
            continue;
        };
        *dst = if a >= ALPHA_OPAQUE_THRESHOLD {
            Rgba([r, g, b, 255])
        } else {
            Rgba([0, 0, 0, 0])
        };
    }

    Image::from_rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn two_by_one() -> Image {
        let mut raw = RgbaImage::new(2, 1);
        raw.put_pixel(0, 0, Rgba(RED));
        raw.put_pixel(1, 0, Rgba(BLUE));
        Image::from_rgba(raw)
    }

    #[test]
    fn mirror_swaps_columns_and_keeps_size() {
        let mirrored = mirror_image(&two_by_one());
        assert_eq!((mirrored.width(), mirrored.height()), (2, 1));
        assert_eq!(mirrored.pixel(0, 0), Some(BLUE));
        assert_eq!(mirrored.pixel(1, 0), Some(RED));
    }

    #[test]
    fn flip_swaps_rows() {
        let mut raw = RgbaImage::new(1, 3);
        raw.put_pixel(0, 0, Rgba(RED));
        raw.put_pixel(0, 2, Rgba(BLUE));
        let flipped = flip_image(&Image::from_rgba(raw));
        assert_eq!(flipped.pixel(0, 0), Some(BLUE));
        assert_eq!(flipped.pixel(0, 1), Some([0, 0, 0, 0]));
        assert_eq!(flipped.pixel(0, 2), Some(RED));
    }

    #[test]
    fn mirror_twice_is_identity_for_opaque_images() {
        let source = two_by_one();
        let round_trip = mirror_image(&mirror_image(&source));
        assert_eq!(round_trip.as_rgba(), source.as_rgba());
    }

    #[test]
    fn translucent_pixels_become_transparent_or_opaque() {
        let mut raw = RgbaImage::new(2, 1);
        raw.put_pixel(0, 0, Rgba([10, 20, 30, 40]));
        raw.put_pixel(1, 0, Rgba([10, 20, 30, 200]));
        let mirrored = mirror_image(&Image::from_rgba(raw));
        assert_eq!(mirrored.pixel(0, 0), Some([10, 20, 30, 255]));
        assert_eq!(mirrored.pixel(1, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn mirror_produces_new_buffer() {
        let source = two_by_one();
        assert!(!mirror_image(&source).ptr_eq(&source));
        assert!(source.clone().ptr_eq(&source));
    }

    #[test]
    fn empty_image_is_safe() {
        let empty = Image::solid(0, 0, RED);
        let mirrored = mirror_image(&empty);
        assert_eq!((mirrored.width(), mirrored.height()), (0, 0));
    }
}
