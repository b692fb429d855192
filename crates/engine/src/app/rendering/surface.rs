use crate::content::Image;

/// Something the scene renderer can paint into.
pub trait DrawSurface {
    fn size(&self) -> (u32, u32);
    fn fill(&mut self, color: [u8; 4]);
    /// Copies `image` with its top-left corner at `(x, y)`. Pixels with zero
    /// alpha and pixels off the surface are skipped.
    fn draw_image(&mut self, image: &Image, x: i32, y: i32);
}

/// RGBA8 surface over a borrowed frame, such as the `pixels` back buffer.
pub struct FrameBuffer<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// Rows past the end of `frame` are treated as off-surface.
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        let stride = width as usize * 4;
        let height = if stride == 0 {
            0
        } else {
            height.min((frame.len() / stride) as u32)
        };
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.frame[offset..offset + 4]);
        Some(rgba)
    }
}

impl DrawSurface for FrameBuffer<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: [u8; 4]) {
        let used = self.width as usize * self.height as usize * 4;
        for pixel in self.frame[..used].chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    fn draw_image(&mut self, image: &Image, x: i32, y: i32) {
        let (image_w, image_h) = (image.width() as i32, image.height() as i32);
        if image_w == 0 || image_h == 0 || self.width == 0 || self.height == 0 {
            return;
        }

        let draw_left = x.max(0);
        let draw_top = y.max(0);
        let draw_right = x.saturating_add(image_w).min(self.width as i32);
        let draw_bottom = y.saturating_add(image_h).min(self.height as i32);
        if draw_left >= draw_right || draw_top >= draw_bottom {
            return;
        }

        let src = image.as_rgba();
        let src_stride = image_w as usize * 4;
        let dst_stride = self.width as usize * 4;
        for out_y in draw_top..draw_bottom {
            let src_row = (out_y - y) as usize * src_stride;
            let dst_row = out_y as usize * dst_stride;
            for out_x in draw_left..draw_right {
                let src_offset = src_row + (out_x - x) as usize * 4;
                let Some(texel) = src.get(src_offset..src_offset + 4) else {
                    continue;
                };
                if texel[3] == 0 {
                    continue;
                }
                let dst_offset = dst_row + out_x as usize * 4;
                self.frame[dst_offset..dst_offset + 4].copy_from_slice(texel);
            }
        }
    }
}
