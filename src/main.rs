mod app;
mod gpu;

use std::process::ExitCode;

use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use hero_bands::{BandSlot, Theme};

use crate::app::{App, Options};

/// Animated decorative grid bands
#[derive(Parser, Debug)]
#[command(name = "hero-bands")]
#[command(version, about = "Animated decorative grid bands")]
struct Cli {
    /// First theme color, as #RGB or #RRGGBB
    #[arg(long, env = "HERO_BANDS_PURPLE")]
    purple: Option<String>,

    /// Second theme color
    #[arg(long, env = "HERO_BANDS_BLUE")]
    blue: Option<String>,

    /// Third theme color
    #[arg(long, env = "HERO_BANDS_TEAL")]
    teal: Option<String>,

    /// Only draw the static grid, never animate cells
    #[arg(long, env = "HERO_BANDS_REDUCED_MOTION")]
    reduced_motion: bool,

    /// Bands to draw (repeatable)
    #[arg(long = "band", value_enum, default_values_t = [BandSlot::Top, BandSlot::Bottom])]
    bands: Vec<BandSlot>,

    /// Draw no bands at all
    #[arg(long, conflicts_with = "bands")]
    no_bands: bool,

    /// Seed for a reproducible animation
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = Options {
        theme: Theme {
            purple: cli.purple,
            blue: cli.blue,
            teal: cli.teal,
        },
        reduced_motion: cli.reduced_motion,
        slots: if cli.no_bands { Vec::new() } else { cli.bands },
        seed: cli.seed,
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_both_bands() {
        let cli = Cli::try_parse_from(["hero-bands"]).unwrap();
        assert_eq!(cli.bands, vec![BandSlot::Top, BandSlot::Bottom]);
        assert!(!cli.reduced_motion);
        assert!(!cli.no_bands);
    }

    #[test]
    fn test_cli_single_band_and_theme() {
        let cli = Cli::try_parse_from([
            "hero-bands",
            "--band",
            "bottom",
            "--purple",
            "#abc",
            "--seed",
            "7",
            "--reduced-motion",
        ])
        .unwrap();
        assert_eq!(cli.bands, vec![BandSlot::Bottom]);
        assert_eq!(cli.purple.as_deref(), Some("#abc"));
        assert_eq!(cli.seed, Some(7));
        assert!(cli.reduced_motion);
    }

    #[test]
    fn test_cli_rejects_unknown_band() {
        assert!(Cli::try_parse_from(["hero-bands", "--band", "middle"]).is_err());
    }
}
