//! Drawing target for bands and its CPU rasterizer.

use image::{imageops, RgbaImage};

use crate::color::Rgba;

/// Axis-aligned rectangle in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// The slice of a 2D canvas the engine draws with.
///
/// Coordinates are logical pixels; implementations multiply by the scale set
/// with [`Surface::set_scale`] to reach backing pixels.
pub trait Surface {
    /// Resize the backing store in physical pixels. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    fn set_scale(&mut self, scale: f32);

    /// Backing size in physical pixels
    fn size(&self) -> (u32, u32);

    fn clear(&mut self);

    /// Source-over fill
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// One logical pixel wide line centered on `y`.
    fn stroke_hline(&mut self, y: f32, x0: f32, x1: f32, color: Rgba) {
        self.fill_rect(Rect::new(x0, y - 0.5, x1 - x0, 1.0), color);
    }

    /// One logical pixel wide line centered on `x`.
    fn stroke_vline(&mut self, x: f32, y0: f32, y1: f32, color: Rgba) {
        self.fill_rect(Rect::new(x - 0.5, y0, 1.0, y1 - y0), color);
    }
}

/// One RGBA8 pixel, as stored in the backing image
pub type Pixel = image::Rgba<u8>;

/// Opaque black, the default raster background
pub const BLACK: Pixel = image::Rgba([0, 0, 0, 255]);

/// Source-over blend of `color` onto an opaque `dst`.
fn blend(dst: &mut Pixel, color: Rgba) {
    let a = color.a.clamp(0.0, 1.0);
    let mix = |src: u8, dst: u8| -> u8 {
        (src as f32 * a + dst as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8
    };
    dst[0] = mix(color.r, dst[0]);
    dst[1] = mix(color.g, dst[1]);
    dst[2] = mix(color.b, dst[2]);
}

/// Opaque RGBA8 raster with source-over blending.
#[derive(Clone, Debug)]
pub struct Raster {
    image: RgbaImage,
    scale: f32,
    background: Pixel,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, BLACK)
    }

    pub fn with_background(width: u32, height: u32, background: Pixel) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            scale: 1.0,
            background,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Pixel at physical coordinates, `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.image.width() && y < self.image.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Copy `src` into this raster with its top-left corner at physical `(x, y)`.
    pub fn blit(&mut self, src: &Raster, x: i64, y: i64) {
        imageops::replace(&mut self.image, &src.image, x, y);
    }

    /// Map a logical span to a clipped physical pixel range.
    fn span(&self, start: f32, len: f32, limit: u32) -> Option<(u32, u32)> {
        let a = (start * self.scale).round();
        let b = ((start + len) * self.scale).round();
        let lo = a.max(0.0).min(limit as f32) as u32;
        let hi = b.max(0.0).min(limit as f32) as u32;
        (lo < hi).then_some((lo, hi))
    }
}

impl Surface for Raster {
    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::from_pixel(width, height, self.background);
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self) {
        let background = self.background;
        self.image.pixels_mut().for_each(|p| *p = background);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        if color.a <= 0.0 || rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        let Some((x0, x1)) = self.span(rect.x, rect.w, self.image.width()) else {
            return;
        };
        let Some((y0, y1)) = self.span(rect.y, rect.h, self.image.height()) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                blend(self.image.get_pixel_mut(x, y), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_fill() {
        let mut r = Raster::new(4, 4);
        r.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), Rgba::new(10, 20, 30, 1.0));
        assert_eq!(r.pixel(0, 0), Some(BLACK));
        assert_eq!(r.pixel(1, 1), Some(image::Rgba([10, 20, 30, 255])));
        assert_eq!(r.pixel(2, 2), Some(image::Rgba([10, 20, 30, 255])));
        assert_eq!(r.pixel(3, 3), Some(BLACK));
    }

    #[test]
    fn test_half_alpha_blend() {
        let mut r = Raster::new(1, 1);
        r.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgba::new(200, 100, 0, 0.5));
        assert_eq!(r.pixel(0, 0), Some(image::Rgba([100, 50, 0, 255])));
    }

    #[test]
    fn test_scale_maps_logical_to_physical() {
        let mut r = Raster::new(8, 8);
        r.set_scale(2.0);
        r.fill_rect(Rect::new(1.0, 1.0, 1.0, 1.0), Rgba::WHITE);
        assert_eq!(r.pixel(1, 1), Some(BLACK));
        assert_eq!(r.pixel(2, 2).map(|p| p[0]), Some(255));
        assert_eq!(r.pixel(3, 3).map(|p| p[0]), Some(255));
        assert_eq!(r.pixel(4, 4), Some(BLACK));
    }

    #[test]
    fn test_fill_clips_to_bounds() {
        let mut r = Raster::new(3, 3);
        r.fill_rect(Rect::new(-5.0, -5.0, 100.0, 100.0), Rgba::WHITE);
        assert!(r.image().pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_hline_covers_one_row() {
        let mut r = Raster::new(4, 4);
        r.stroke_hline(2.5, 0.0, 4.0, Rgba::WHITE);
        for x in 0..4 {
            assert_eq!(r.pixel(x, 1), Some(BLACK));
            assert_eq!(r.pixel(x, 2).map(|p| p[0]), Some(255));
            assert_eq!(r.pixel(x, 3), Some(BLACK));
        }
    }

    #[test]
    fn test_blit_offsets_and_clips() {
        let mut src = Raster::new(2, 2);
        src.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Rgba::WHITE);
        let mut dst = Raster::new(3, 3);
        dst.blit(&src, 2, 2);
        assert_eq!(dst.pixel(2, 2).map(|p| p[0]), Some(255));
        assert_eq!(dst.pixel(1, 1), Some(BLACK));
        dst.blit(&src, -1, -1);
        assert_eq!(dst.pixel(0, 0).map(|p| p[0]), Some(255));
        assert_eq!(dst.pixel(1, 0), Some(BLACK));
    }

    #[test]
    fn test_resize_resets_contents() {
        let mut r = Raster::new(2, 2);
        r.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Rgba::WHITE);
        r.resize(3, 1);
        assert_eq!(r.size(), (3, 1));
        assert_eq!(r.as_bytes().len(), 12);
        assert!(r.image().pixels().all(|p| *p == BLACK));
    }
}
