use rand::Rng;

use crate::config::Config;
use crate::simulation::band::{Band, BandSlot};
use crate::surface::Surface;

/// Owns the config, every band and the random source. Driven by `tick`.
pub struct Engine<S: Surface, R: Rng> {
    config: Config,
    bands: Vec<Band<S>>,
    rng: R,
    /// Simulated seconds since start
    time: f64,
}

impl<S: Surface, R: Rng> Engine<S, R> {
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            config,
            bands: Vec::new(),
            rng,
            time: 0.0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bands(&self) -> &[Band<S>] {
        &self.bands
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Register a band and lay it out at the given logical size.
    pub fn add_band(&mut self, slot: BandSlot, surface: S, width: f32, height: f32) {
        let phase = self.rng.gen_range(0.0..1.0);
        let mut band = Band::new(slot, surface, phase);
        band.setup(width, height, &self.config);
        log::info!(
            "Added {:?} band: {} columns x {} rows",
            slot,
            band.columns,
            band.rows
        );
        self.bands.push(band);
    }

    /// Re-run setup for one band after its size changed.
    pub fn resize_band(&mut self, slot: BandSlot, width: f32, height: f32) {
        for band in self.bands.iter_mut().filter(|b| b.slot == slot) {
            band.setup(width, height, &self.config);
        }
    }

    /// Advance every band by `delta` seconds, clamped to the configured max step.
    pub fn tick(&mut self, delta: f32) {
        if self.bands.is_empty() {
            return;
        }

        let dt = if delta.is_finite() {
            delta.clamp(0.0, self.config.max_step)
        } else {
            0.0
        };
        self.time += dt as f64;

        for band in &mut self.bands {
            band.step(dt, &self.config, &mut self.rng);
        }
    }

    pub fn active_count(&self) -> usize {
        self.bands.iter().map(|b| b.active.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, Theme};
    use crate::surface::{Raster, BLACK};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine(config: Config, seed: u64) -> Engine<Raster, StdRng> {
        let mut engine = Engine::new(config, StdRng::seed_from_u64(seed));
        engine.add_band(BandSlot::Top, Raster::new(0, 0), 1400.0, 176.0);
        engine.add_band(BandSlot::Bottom, Raster::new(0, 0), 1400.0, 176.0);
        engine
    }

    #[test]
    fn test_no_bands_is_noop() {
        let mut engine: Engine<Raster, StdRng> =
            Engine::new(Config::default(), StdRng::seed_from_u64(0));
        for _ in 0..10 {
            engine.tick(0.016);
        }
        assert_eq!(engine.time(), 0.0);
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn test_active_count_never_exceeds_max() {
        let config = Config {
            max_active: 5,
            density: 1.0,
            spawn_chance: 1.0,
            ..Config::default()
        };
        let mut engine = engine(config, 3);
        for _ in 0..2000 {
            engine.tick(0.016);
            for band in engine.bands() {
                assert!(band.active.len() <= 5, "band over cap: {}", band.active.len());
            }
        }
    }

    #[test]
    fn test_reduced_motion_never_spawns_but_draws_grid() {
        let env = Environment {
            reduced_motion: true,
            ..Environment::default()
        };
        let config = Config::resolve(&Theme::default(), &env);
        let mut engine = engine(config, 9);
        for _ in 0..1000 {
            engine.tick(0.05);
            assert_eq!(engine.active_count(), 0);
        }
        let surface = engine.bands()[0].surface();
        assert!(
            surface.image().pixels().any(|p| *p != BLACK),
            "static grid should still render"
        );
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut engine = engine(Config::default(), 1);
        engine.tick(10.0);
        assert!((engine.time() - 0.05).abs() < 1e-6);
        engine.tick(-1.0);
        engine.tick(f32::NAN);
        assert!((engine.time() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_cells_retire_after_lifespan() {
        let config = Config {
            spawn_chance: 1.0,
            ..Config::default()
        };
        let mut engine = engine(config.clone(), 5);
        engine.tick(0.016);
        assert!(engine.active_count() > 0);

        // Stop spawning, then run past the longest possible lifespan.
        engine.config.max_active = 0;
        let lifespan = config.lifespan(config.max_lifetime);
        let steps = (lifespan / config.max_step).ceil() as usize + 2;
        for _ in 0..steps {
            engine.tick(config.max_step);
        }
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn test_same_seed_same_animation() {
        let mut a = engine(Config::default(), 11);
        let mut b = engine(Config::default(), 11);
        for _ in 0..300 {
            a.tick(0.016);
            b.tick(0.016);
        }
        let pa: Vec<_> = a.bands()[0].active.iter().map(|c| (c.x, c.y, c.lifetime)).collect();
        let pb: Vec<_> = b.bands()[0].active.iter().map(|c| (c.x, c.y, c.lifetime)).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.bands()[1].surface().as_bytes(), b.bands()[1].surface().as_bytes());
    }

    #[test]
    fn test_resize_recomputes_geometry() {
        let mut engine = engine(Config::default(), 2);
        for _ in 0..100 {
            engine.tick(0.016);
        }
        engine.resize_band(BandSlot::Top, 500.0, 176.0);
        let top = &engine.bands()[0];
        assert_eq!((top.columns, top.rows), (6, 2));
        assert!(top.active.is_empty());
        assert_eq!(engine.bands()[1].columns, 16);
    }
}
