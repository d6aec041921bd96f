use crate::color::Rgba;
use crate::config::Config;
use crate::surface::{Rect, Surface};

/// Direction the stripes of a cell run in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A transient animation instance on one grid cell.
///
/// Lifecycle: fade in over `fade` seconds, hold for `lifetime` seconds, fade
/// out over `fade` seconds. Total span is `lifetime + 2 * fade`.
#[derive(Clone, Debug)]
pub struct ActiveCell {
    /// Top-left corner in logical pixels, a multiple of the cell size
    pub x: f32,
    pub y: f32,
    pub lifetime: f32,
    pub elapsed: f32,
    pub color: Rgba,
    pub stripes: u32,
    pub orientation: Orientation,
}

impl ActiveCell {
    /// Advance by `dt` seconds. Returns false once the cell has expired.
    pub fn advance(&mut self, dt: f32, config: &Config) -> bool {
        self.elapsed += dt;
        self.elapsed < config.lifespan(self.lifetime)
    }

    pub fn opacity(&self, fade: f32) -> f32 {
        opacity(self.elapsed, self.lifetime, fade)
    }

    pub fn stripe_offset(&self, cell_size: f32) -> f32 {
        stripe_offset(self.elapsed, self.lifetime, cell_size)
    }

    /// Draw the filled square and its stripes at the current opacity.
    pub fn render<S: Surface>(&self, surface: &mut S, config: &Config) {
        let alpha = self.opacity(config.fade);
        if alpha <= 0.0 {
            return;
        }

        let size = config.cell_size;
        let pad = config.padding.min(size / 2.0);
        let inner = size - 2.0 * pad;
        if inner <= 0.0 {
            return;
        }
        let (ox, oy) = (self.x + pad, self.y + pad);

        surface.fill_rect(Rect::new(ox, oy, inner, inner), self.color.fade(alpha));

        let stripe = Rgba::WHITE.with_alpha(config.stripe_alpha * alpha);
        let gap = size / (self.stripes.max(1) as f32 * 1.5);
        let thickness = gap / 2.0;
        let offset = self.stripe_offset(size);

        for (start, len) in stripe_spans(offset, gap, thickness, inner) {
            let rect = match self.orientation {
                Orientation::Horizontal => Rect::new(ox, oy + start, inner, len),
                Orientation::Vertical => Rect::new(ox + start, oy, len, inner),
            };
            surface.fill_rect(rect, stripe);
        }
    }
}

/// Triangular-trapezoid opacity for a cell `elapsed` seconds into its life.
pub fn opacity(elapsed: f32, lifetime: f32, fade: f32) -> f32 {
    if fade <= 0.0 {
        let visible = elapsed >= 0.0 && elapsed < lifetime;
        return if visible { 1.0 } else { 0.0 };
    }

    let value = if elapsed < fade {
        elapsed / fade
    } else if elapsed <= lifetime + fade {
        1.0
    } else {
        1.0 - (elapsed - lifetime - fade) / fade
    };
    value.clamp(0.0, 1.0)
}

/// Stripe sweep offset within a cell; periodic in `lifetime`.
pub fn stripe_offset(elapsed: f32, lifetime: f32, cell_size: f32) -> f32 {
    if lifetime <= 0.0 {
        return 0.0;
    }
    (elapsed.rem_euclid(lifetime) / lifetime) * cell_size
}

/// Stripe spans `(start, len)` across `[0, extent)`, repeating every `gap`
/// from `offset`, with stripes that cross the far edge wrapped to the near one.
pub fn stripe_spans(offset: f32, gap: f32, thickness: f32, extent: f32) -> Vec<(f32, f32)> {
    let mut spans = Vec::new();
    if gap <= 0.0 || thickness <= 0.0 || extent <= 0.0 {
        return spans;
    }

    let mut pos = offset.rem_euclid(gap);
    while pos < extent {
        let end = pos + thickness;
        if end <= extent {
            spans.push((pos, thickness));
        } else {
            spans.push((pos, extent - pos));
            spans.push((0.0, (end - extent).min(extent)));
        }
        pos += gap;
    }
    spans
}
