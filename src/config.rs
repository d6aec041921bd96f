use crate::color::{resolve_theme_color, Rgba};

/// Cell edge length in logical pixels
pub const CELL_SIZE: f32 = 88.0;

/// Band height used when the host has no better measurement
pub const DEFAULT_BAND_HEIGHT: f32 = 176.0;

/// Opacity of the static grid lines
pub const GRID_ALPHA: f32 = 0.07;

/// Target fraction of a band's cells that are animating at once
pub const DENSITY: f32 = 0.12;

/// Hard cap on concurrently active cells per band
pub const MAX_ACTIVE: usize = 14;

/// Active-cell lifetime range in seconds
pub const MIN_LIFETIME: f32 = 2.4;
pub const MAX_LIFETIME: f32 = 4.6;

/// Length of each fade window in seconds
pub const FADE: f32 = 0.6;

/// Per-tick probability of spawning while below target
pub const SPAWN_CHANCE: f64 = 0.25;

/// Largest simulated step per tick, in seconds
pub const MAX_STEP: f32 = 0.05;

/// Inset between a cell's boundary and its filled square
pub const CELL_PADDING: f32 = 6.0;

/// Alpha of the sweeping stripes at full cell opacity
pub const STRIPE_ALPHA: f32 = 0.22;

/// Inclusive stripe count range
pub const MIN_STRIPES: u32 = 4;
pub const MAX_STRIPES: u32 = 9;

/// Alpha of the black wash laid over the band each tick
pub const TRAIL_ALPHA: f32 = 0.18;

/// Alpha applied to theme colors
pub const FILL_ALPHA: f32 = 0.55;

// ============================================
// Narrow viewport
// ============================================

/// Logical viewport width at or below which the narrow settings apply
pub const NARROW_BREAKPOINT: f32 = 720.0;
pub const NARROW_CELL_SIZE: f32 = 56.0;
pub const NARROW_MAX_ACTIVE: usize = 6;

// ============================================
// Theme
// ============================================

pub const DEFAULT_PURPLE: &str = "#7c3aed";
pub const DEFAULT_BLUE: &str = "#3b82f6";
pub const DEFAULT_TEAL: &str = "#14b8a6";

/// Device pixel ratio bounds for backing surfaces
pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 2.0;

/// Quiet period before a resize rebuilds geometry, in milliseconds
pub const RESIZE_DEBOUNCE_MS: u64 = 150;

/// Raw theme values as read from the environment. `None` means unset.
#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub purple: Option<String>,
    pub blue: Option<String>,
    pub teal: Option<String>,
}

/// Startup signals that tune the effect.
#[derive(Clone, Copy, Debug)]
pub struct Environment {
    pub device_pixel_ratio: f32,
    pub reduced_motion: bool,
    /// Logical viewport width
    pub viewport_width: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            reduced_motion: false,
            viewport_width: 1280.0,
        }
    }
}

/// Immutable engine parameters.
#[derive(Clone, Debug)]
pub struct Config {
    pub cell_size: f32,
    pub band_height: f32,
    pub grid_alpha: f32,
    pub density: f32,
    pub max_active: usize,
    pub min_lifetime: f32,
    pub max_lifetime: f32,
    pub fade: f32,
    pub spawn_chance: f64,
    pub max_step: f32,
    pub padding: f32,
    pub stripe_alpha: f32,
    pub min_stripes: u32,
    pub max_stripes: u32,
    pub trail_alpha: f32,
    /// Backing-surface scale, already clamped
    pub scale: f32,
    pub colors: Vec<Rgba>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            band_height: DEFAULT_BAND_HEIGHT,
            grid_alpha: GRID_ALPHA,
            density: DENSITY,
            max_active: MAX_ACTIVE,
            min_lifetime: MIN_LIFETIME,
            max_lifetime: MAX_LIFETIME,
            fade: FADE,
            spawn_chance: SPAWN_CHANCE,
            max_step: MAX_STEP,
            padding: CELL_PADDING,
            stripe_alpha: STRIPE_ALPHA,
            min_stripes: MIN_STRIPES,
            max_stripes: MAX_STRIPES,
            trail_alpha: TRAIL_ALPHA,
            scale: MIN_SCALE,
            colors: Theme::default().colors(),
        }
    }
}

impl Theme {
    /// Fill colors in palette order: purple, blue, teal.
    pub fn colors(&self) -> Vec<Rgba> {
        vec![
            resolve_theme_color(self.purple.as_deref(), DEFAULT_PURPLE, FILL_ALPHA),
            resolve_theme_color(self.blue.as_deref(), DEFAULT_BLUE, FILL_ALPHA),
            resolve_theme_color(self.teal.as_deref(), DEFAULT_TEAL, FILL_ALPHA),
        ]
    }
}

impl Config {
    /// Build the startup config from theme values and environment signals.
    pub fn resolve(theme: &Theme, env: &Environment) -> Self {
        let mut config = Self {
            colors: theme.colors(),
            ..Self::default()
        };
        config.scale = clamp_scale(env.device_pixel_ratio);

        if env.viewport_width <= NARROW_BREAKPOINT {
            config.cell_size = NARROW_CELL_SIZE;
            config.max_active = config.max_active.min(NARROW_MAX_ACTIVE);
        }
        if env.reduced_motion {
            config.max_active = 0;
        }

        log::info!(
            "Config: cell {}px, max active {}, scale {}{}",
            config.cell_size,
            config.max_active,
            config.scale,
            if env.reduced_motion { " (reduced motion)" } else { "" }
        );
        config
    }

    /// Total visible span of a cell with the given lifetime.
    pub fn lifespan(&self, lifetime: f32) -> f32 {
        lifetime + 2.0 * self.fade
    }
}

/// Clamp a device pixel ratio to the supported range. Non-finite input maps to 1.
pub fn clamp_scale(ratio: f32) -> f32 {
    if ratio.is_finite() {
        ratio.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        MIN_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_clamped() {
        assert_eq!(clamp_scale(0.5), 1.0);
        assert_eq!(clamp_scale(1.5), 1.5);
        assert_eq!(clamp_scale(3.0), 2.0);
        assert_eq!(clamp_scale(f32::NAN), 1.0);
    }

    #[test]
    fn test_reduced_motion_disables_spawning() {
        let env = Environment {
            reduced_motion: true,
            ..Environment::default()
        };
        let config = Config::resolve(&Theme::default(), &env);
        assert_eq!(config.max_active, 0);
        assert_eq!(config.cell_size, CELL_SIZE);
    }

    #[test]
    fn test_narrow_viewport() {
        let env = Environment {
            viewport_width: 400.0,
            device_pixel_ratio: 3.0,
            ..Environment::default()
        };
        let config = Config::resolve(&Theme::default(), &env);
        assert_eq!(config.cell_size, NARROW_CELL_SIZE);
        assert_eq!(config.max_active, NARROW_MAX_ACTIVE);
        assert_eq!(config.scale, 2.0);
    }

    #[test]
    fn test_theme_overrides_and_fallbacks() {
        let theme = Theme {
            purple: Some("#abc".into()),
            blue: Some("bogus".into()),
            teal: None,
        };
        let colors = Config::resolve(&theme, &Environment::default()).colors;
        assert_eq!(colors.len(), 3);
        assert_eq!((colors[0].r, colors[0].g, colors[0].b), (0xaa, 0xbb, 0xcc));
        assert_eq!((colors[1].r, colors[1].g, colors[1].b), (0x3b, 0x82, 0xf6));
        assert_eq!((colors[2].r, colors[2].g, colors[2].b), (0x14, 0xb8, 0xa6));
        assert!(colors.iter().all(|c| c.a == FILL_ALPHA));
    }
}
