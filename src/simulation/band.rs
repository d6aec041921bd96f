use rand::Rng;

use crate::color::Rgba;
use crate::config::Config;
use crate::simulation::cell::{ActiveCell, Orientation};
use crate::surface::{Rect, Surface};

/// Where a band sits in the host window
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum BandSlot {
    Top,
    Bottom,
}

/// One decorative strip: a surface, its grid geometry, and the cells
/// currently animating on it.
pub struct Band<S: Surface> {
    pub slot: BandSlot,
    surface: S,
    /// Logical size
    pub width: f32,
    pub height: f32,
    pub columns: u32,
    pub rows: u32,
    pub active: Vec<ActiveCell>,
    /// Stagger offset in [0, 1). Not read by the timing logic.
    pub phase: f32,
}

impl<S: Surface> Band<S> {
    pub fn new(slot: BandSlot, surface: S, phase: f32) -> Self {
        Self {
            slot,
            surface,
            width: 0.0,
            height: 0.0,
            columns: 0,
            rows: 0,
            active: Vec::new(),
            phase,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// (Re)build geometry for a band measuring `width` x `height` logical pixels.
    ///
    /// Resizes the backing surface, recomputes the grid, drops all active
    /// cells and redraws the static grid. Safe to call any number of times.
    pub fn setup(&mut self, width: f32, height: f32, config: &Config) {
        let width = sanitize(width);
        let height = sanitize(height);
        let scale = config.scale;

        self.surface.resize(
            (width * scale).round() as u32,
            (height * scale).round() as u32,
        );
        self.surface.set_scale(scale);

        self.width = width;
        self.height = height;
        self.columns = grid_count(width, config.cell_size);
        self.rows = grid_count(height, config.cell_size);
        self.active.clear();

        self.surface.clear();
        self.draw_grid(config);

        log::debug!(
            "{:?} band: {}x{} logical, {}x{} cells",
            self.slot,
            width,
            height,
            self.columns,
            self.rows
        );
    }

    /// Number of cells this band aims to keep animating.
    pub fn target_active(&self, config: &Config) -> usize {
        let cells = self.columns as f32 * self.rows as f32;
        let wanted = (cells * config.density).round().max(0.0) as usize;
        wanted.min(config.max_active)
    }

    /// Advance the band by `dt` seconds and redraw it.
    pub fn step<R: Rng>(&mut self, dt: f32, config: &Config, rng: &mut R) {
        if self.columns == 0 || self.rows == 0 {
            return;
        }

        self.surface.fill_rect(
            Rect::new(0.0, 0.0, self.width, self.height),
            Rgba::BLACK.with_alpha(config.trail_alpha),
        );
        self.draw_grid(config);

        let below_target = self.active.len() < self.target_active(config);
        if below_target && rng.gen_bool(config.spawn_chance.clamp(0.0, 1.0)) {
            let cell = self.spawn(config, rng);
            log::trace!("{:?} band: spawn at ({}, {})", self.slot, cell.x, cell.y);
            self.active.push(cell);
        }

        let surface = &mut self.surface;
        self.active.retain_mut(|cell| {
            if cell.advance(dt, config) {
                cell.render(surface, config);
                true
            } else {
                log::trace!("retire cell at ({}, {})", cell.x, cell.y);
                false
            }
        });
    }

    fn spawn<R: Rng>(&self, config: &Config, rng: &mut R) -> ActiveCell {
        let column = rng.gen_range(0..self.columns);
        let row = rng.gen_range(0..self.rows);

        let lifetime = if config.max_lifetime > config.min_lifetime {
            rng.gen_range(config.min_lifetime..=config.max_lifetime)
        } else {
            config.min_lifetime
        };

        let color = if config.colors.is_empty() {
            Rgba::WHITE
        } else {
            config.colors[rng.gen_range(0..config.colors.len())]
        };

        let stripes =
            rng.gen_range(config.min_stripes..=config.max_stripes.max(config.min_stripes));
        let orientation = if rng.gen_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };

        ActiveCell {
            x: column as f32 * config.cell_size,
            y: row as f32 * config.cell_size,
            lifetime,
            elapsed: 0.0,
            color,
            stripes,
            orientation,
        }
    }

    fn draw_grid(&mut self, config: &Config) {
        let line = Rgba::WHITE.with_alpha(config.grid_alpha);
        let cell = config.cell_size;

        for row in 0..=self.rows {
            let y = row as f32 * cell + 0.5;
            if y > self.height {
                break;
            }
            self.surface.stroke_hline(y, 0.0, self.width, line);
        }
        for column in 0..=self.columns {
            let x = column as f32 * cell + 0.5;
            if x > self.width {
                break;
            }
            self.surface.stroke_vline(x, 0.0, self.height, line);
        }
    }
}

/// `ceil(extent / cell)`, zero for empty extents or degenerate cells.
pub fn grid_count(extent: f32, cell: f32) -> u32 {
    if extent <= 0.0 || cell <= 0.0 {
        return 0;
    }
    (extent / cell).ceil() as u32
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}
