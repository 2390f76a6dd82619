use anyhow::Result;
use gbc_common::app::App;
use gbc_common::key::Key;
use gbc_core::{GameBoy, SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};
use gbc_sdl2::{SdlContext, SdlInitInfo};

use crate::config::RunConfig;
use crate::runner::Runner;

/// Display side of a windowed run: pulls finished frames from the worker and
/// forwards keys to it.
struct WindowApp {
    runner: Option<Runner>,
    title: String,
    exit: bool,
}

impl App for WindowApp {
    fn init(&mut self) {
        log::debug!("window open: {}", self.title);
    }

    fn update(&mut self, screen: &mut [u8]) {
        let Some(runner) = &self.runner else {
            return;
        };
        // Only the newest frame is shown.
        if let Some(frame) = runner.frames().try_iter().last() {
            for (dst, pixel) in screen.chunks_exact_mut(3).zip(frame.pixels) {
                let [_, r, g, b] = pixel.to_be_bytes();
                dst.copy_from_slice(&[r, g, b]);
            }
        }
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        match (key, &self.runner) {
            (Key::Escape, _) if is_down => self.exit = true,
            (Key::None, _) | (_, None) => {}
            (key, Some(runner)) => runner.send_key(key, is_down),
        }
    }

    fn should_exit(&self) -> bool {
        self.exit || self.runner.as_ref().map_or(true, Runner::is_finished)
    }

    fn exit(&mut self) {
        if let Some(runner) = self.runner.take() {
            runner.stop();
            match runner.join() {
                Ok(gb) => log::info!("stopped after {} frames", gb.frame_count()),
                Err(err) => log::error!("{err:#}"),
            }
        }
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

pub fn run(gb: GameBoy, config: &RunConfig) -> Result<()> {
    let title = match gb.bus().cartridge() {
        Some(cart) if !cart.header().title.is_empty() => format!("gbc - {}", cart.header().title),
        _ => "gbc".to_string(),
    };
    let app = WindowApp {
        runner: Some(Runner::spawn(gb, config.fps, config.frames)?),
        title,
        exit: false,
    };

    let init_info = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(app.title())
        .build();
    SdlContext::run(init_info, app)?;
    Ok(())
}
