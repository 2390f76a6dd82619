use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use typed_builder::TypedBuilder;

pub const USAGE: &str = "usage: gbc <rom> [--frames N] [--dump out.ppm] [--fps N] [--sdl]";

/// Frames a headless run executes when `--frames` is not given.
pub const DEFAULT_HEADLESS_FRAMES: u64 = 600;
pub const DEFAULT_FPS: u32 = 60;

/// Front-end options, from the command line and `GBC_FPS`.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct RunConfig {
    #[builder(setter(into))]
    pub rom_path: PathBuf,
    /// Stop after this many frames.
    #[builder(default)]
    pub frames: Option<u64>,
    /// Write the last frame here as a binary PPM.
    #[builder(default)]
    pub dump: Option<PathBuf>,
    /// Frame cap; 0 runs uncapped.
    #[builder(default = DEFAULT_FPS)]
    pub fps: u32,
    #[builder(default)]
    pub sdl: bool,
}

impl RunConfig {
    /// Parse arguments (without the program name). `fps_override` is the
    /// value of `GBC_FPS` and wins over `--fps`.
    pub fn from_args<I>(args: I, fps_override: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut rom_path = None;
        let mut frames = None;
        let mut dump = None;
        let mut fps = DEFAULT_FPS;
        let mut sdl = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--frames" => frames = Some(parse_number(&mut args, "--frames")?),
                "--dump" => {
                    let path = args.next().ok_or_else(|| anyhow!("--dump needs a path"))?;
                    dump = Some(PathBuf::from(path));
                }
                "--fps" => fps = parse_number(&mut args, "--fps")?,
                "--sdl" => sdl = true,
                flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
                _ if rom_path.is_some() => bail!("unexpected argument '{arg}'"),
                _ => rom_path = Some(PathBuf::from(&arg)),
            }
        }

        if let Some(value) = fps_override {
            fps = value
                .trim()
                .parse()
                .with_context(|| format!("GBC_FPS is not a frame rate: '{value}'"))?;
        }

        let rom_path = rom_path.ok_or_else(|| anyhow!("no ROM path provided"))?;
        Ok(RunConfig::builder()
            .rom_path(rom_path)
            .frames(frames)
            .dump(dump)
            .fps(fps)
            .sdl(sdl)
            .build())
    }
}

fn parse_number<T, I>(args: &mut I, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    I: Iterator<Item = String>,
{
    let value = args.next().ok_or_else(|| anyhow!("{flag} needs a value"))?;
    value
        .parse()
        .with_context(|| format!("{flag} expects a number, got '{value}'"))
}
