pub mod config;
pub mod cpu;
pub mod error;
pub mod machine;

pub use config::EngineConfig;
pub use error::{BankError, CartridgeError, CoreError, CpuError};
pub use machine::{GameBoy, GameBoyModel};

/// Visible LCD width in pixels.
pub const SCREEN_WIDTH: usize = 160;
/// Visible LCD height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
pub const SCREEN_SCALE: u32 = 4;

/// Dots (T-cycles) per CPU machine cycle in normal-speed mode.
pub const DOTS_PER_MCYCLE: u32 = 4;
