//! Emulation worker thread.
//!
//! The worker owns the `GameBoy`. It runs one frame at a time, forwards a
//! copy of the frame buffer after each VBlank and sleeps to hold the frame
//! cap. The stop flag is checked between frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use gbc_common::key::Key;
use gbc_core::GameBoy;

/// Frames that can wait for the display before the worker blocks.
const FRAME_QUEUE: usize = 2;
const FULL_QUEUE_BACKOFF: Duration = Duration::from_millis(1);

/// A finished frame, `0xAARRGGBB` per pixel.
#[derive(Debug, Clone)]
pub struct Frame {
    /// PPU frame counter at the time of the copy.
    pub index: u64,
    pub pixels: Vec<u32>,
}

pub struct Runner {
    stop: Arc<AtomicBool>,
    frames: Receiver<Frame>,
    keys: Sender<(Key, bool)>,
    handle: Option<JoinHandle<Result<GameBoy>>>,
}

impl Runner {
    /// Start emulating on a new thread. `fps == 0` runs uncapped;
    /// `max_frames` bounds how many frames the worker runs.
    pub fn spawn(gb: GameBoy, fps: u32, max_frames: Option<u64>) -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let (frame_tx, frames) = mpsc::sync_channel(FRAME_QUEUE);
        let (keys, key_rx) = mpsc::channel();

        let worker = Worker {
            gb,
            stop: Arc::clone(&stop),
            frames: frame_tx,
            keys: key_rx,
            frame_time: (fps > 0).then(|| Duration::from_secs(1) / fps),
            max_frames,
        };
        let handle = thread::Builder::new()
            .name("gbc-emulation".to_string())
            .spawn(move || worker.run())
            .context("failed to spawn emulation thread")?;

        Ok(Runner {
            stop,
            frames,
            keys,
            handle: Some(handle),
        })
    }

    pub fn frames(&self) -> &Receiver<Frame> {
        &self.frames
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn send_key(&self, key: Key, pressed: bool) {
        // The worker is gone once it has stopped; there is nobody to tell.
        let _ = self.keys.send((key, pressed));
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Wait for the worker and take the engine back.
    pub fn join(mut self) -> Result<GameBoy> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("emulation thread already joined"))?;
        handle
            .join()
            .map_err(|_| anyhow!("emulation thread panicked"))?
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct Worker {
    gb: GameBoy,
    stop: Arc<AtomicBool>,
    frames: SyncSender<Frame>,
    keys: Receiver<(Key, bool)>,
    frame_time: Option<Duration>,
    max_frames: Option<u64>,
}

impl Worker {
    fn run(mut self) -> Result<GameBoy> {
        let mut ran = 0u64;
        while !self.stopped() {
            let started = Instant::now();
            for (key, pressed) in self.keys.try_iter() {
                self.gb.handle_key(key, pressed);
            }

            let before = self.gb.frame_count();
            self.gb.step_frame().context("emulation stopped")?;
            ran += 1;

            if self.gb.frame_count() != before && !self.publish() {
                log::debug!("display went away, stopping");
                break;
            }
            if self.max_frames.is_some_and(|max| ran >= max) {
                break;
            }

            if let Some(frame_time) = self.frame_time {
                let elapsed = started.elapsed();
                if elapsed < frame_time {
                    thread::sleep(frame_time - elapsed);
                }
            }
        }
        // Input sent before the stop still lands in the returned engine.
        for (key, pressed) in self.keys.try_iter() {
            self.gb.handle_key(key, pressed);
        }
        log::info!("emulation finished after {ran} frames");
        Ok(self.gb)
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Hand the current frame to the display. Returns `false` once nobody is
    /// listening. Waits while the queue is full, unless asked to stop.
    fn publish(&self) -> bool {
        let mut frame = Frame {
            index: self.gb.frame_count(),
            pixels: self.gb.frame_buffer().to_vec(),
        };
        loop {
            match self.frames.try_send(frame) {
                Ok(()) => return true,
                Err(TrySendError::Disconnected(_)) => return false,
                Err(TrySendError::Full(back)) => {
                    if self.stopped() {
                        return true;
                    }
                    frame = back;
                    thread::sleep(FULL_QUEUE_BACKOFF);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbc_core::cpu::Bus;
    use gbc_core::machine::{header_checksum, BOOT_LOGO};
    use gbc_core::EngineConfig;

    /// Header-valid ROM that spins on `JR -2` at 0x0100.
    fn idle_rom() -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0100..0x0102].copy_from_slice(&[0x18, 0xFE]);
        rom[0x0104..0x0134].copy_from_slice(&BOOT_LOGO);
        rom[0x014D] = header_checksum(&rom);
        rom
    }

    fn engine() -> GameBoy {
        let mut gb = GameBoy::new(EngineConfig::default());
        gb.load_rom(&idle_rom()).unwrap();
        gb
    }

    #[test]
    fn runs_the_requested_number_of_frames() {
        let runner = Runner::spawn(engine(), 0, Some(3)).unwrap();
        let indices: Vec<u64> = runner.frames().iter().map(|frame| frame.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        let gb = runner.join().unwrap();
        assert_eq!(gb.frame_count(), 3);
    }

    #[test]
    fn stop_flag_ends_an_unbounded_run() {
        let runner = Runner::spawn(engine(), 0, None).unwrap();
        let first = runner.frames().recv().unwrap();
        assert_eq!(first.pixels.len(), 160 * 144);

        runner.stop_flag().store(true, Ordering::Relaxed);
        let gb = runner.join().unwrap();
        assert!(gb.frame_count() >= 1);
    }

    #[test]
    fn keys_reach_the_worker() {
        let runner = Runner::spawn(engine(), 0, None).unwrap();
        runner.send_key(Key::Enter, true);
        runner.stop();
        let mut gb = runner.join().unwrap();

        gb.bus_mut().write8(0xFF00, 0x10);
        assert_eq!(gb.bus_mut().read8(0xFF00), 0xD7);
    }
}
