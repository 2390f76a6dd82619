pub mod config;
pub mod headless;
pub mod runner;
#[cfg(feature = "sdl")]
pub mod window;

use anyhow::{Context, Result};
use gbc_core::{EngineConfig, GameBoy};

use config::RunConfig;

/// Load the ROM named in `config` and run it in the selected front end.
pub fn run(config: RunConfig) -> Result<()> {
    let rom = std::fs::read(&config.rom_path)
        .with_context(|| format!("failed to read ROM file {}", config.rom_path.display()))?;

    let mut gb = GameBoy::new(EngineConfig::default());
    gb.load_rom(&rom).context("failed to load ROM")?;

    if config.sdl {
        return run_window(gb, &config);
    }
    headless::run(gb, &config)
}

#[cfg(feature = "sdl")]
fn run_window(gb: GameBoy, config: &RunConfig) -> Result<()> {
    window::run(gb, config)
}

#[cfg(not(feature = "sdl"))]
fn run_window(_gb: GameBoy, _config: &RunConfig) -> Result<()> {
    anyhow::bail!("--sdl needs a build with the `sdl` feature enabled")
}
