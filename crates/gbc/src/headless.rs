use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use gbc_core::{GameBoy, SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::config::{RunConfig, DEFAULT_HEADLESS_FRAMES};
use crate::runner::{Frame, Runner};

/// Run without a window, keep the last frame and optionally dump it.
pub fn run(gb: GameBoy, config: &RunConfig) -> Result<()> {
    let frames = config.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES);
    let runner = Runner::spawn(gb, config.fps, Some(frames))?;

    let last: Option<Frame> = runner.frames().iter().last();
    let gb = runner.join()?;

    if let Some(path) = &config.dump {
        match &last {
            Some(frame) => {
                dump_frame(path, &frame.pixels)?;
                log::info!("wrote frame {} to {}", frame.index, path.display());
            }
            None => log::warn!("no frame was completed, nothing written to {}", path.display()),
        }
    }

    let serial = gb.serial_output();
    if !serial.is_empty() {
        println!("{}", String::from_utf8_lossy(serial));
    }
    Ok(())
}

fn dump_frame(path: &Path, pixels: &[u32]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_ppm(&mut writer, pixels, SCREEN_WIDTH, SCREEN_HEIGHT)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Binary PPM (P6) from `0xAARRGGBB` pixels. Alpha is dropped.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    pixels: &[u32],
    width: usize,
    height: usize,
) -> io::Result<()> {
    write!(writer, "P6\n{width} {height}\n255\n")?;
    for &pixel in pixels.iter().take(width * height) {
        let [_, r, g, b] = pixel.to_be_bytes();
        writer.write_all(&[r, g, b])?;
    }
    Ok(())
}
