use gbc_common::Color;
use typed_builder::TypedBuilder;

use crate::machine::GameBoyModel;

/// Which hardware model to emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelSelect {
    /// Follow the cartridge header's CGB flag.
    #[default]
    Auto,
    Dmg,
    Cgb,
}

impl ModelSelect {
    pub(crate) fn resolve(self, cgb_flag: u8) -> GameBoyModel {
        match self {
            ModelSelect::Dmg => GameBoyModel::Dmg,
            ModelSelect::Cgb => GameBoyModel::Cgb,
            ModelSelect::Auto if cgb_flag & 0x80 != 0 => GameBoyModel::Cgb,
            ModelSelect::Auto => GameBoyModel::Dmg,
        }
    }
}

pub const DEFAULT_PALETTE: [Color; 4] = [
    Color::WHITE,
    Color::LIGHT_GRAY,
    Color::DARK_GRAY,
    Color::BLACK,
];

/// Engine construction options.
///
/// ```
/// use gbc_core::EngineConfig;
///
/// let config = EngineConfig::builder().verify_header(false).build();
/// assert!(!config.verify_header);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct EngineConfig {
    #[builder(default)]
    pub model: ModelSelect,
    /// Reject ROMs whose logo or header checksum is wrong.
    #[builder(default = true)]
    pub verify_header: bool,
    /// Fill WRAM/HRAM with seeded noise at power-on instead of zeros.
    #[builder(default = true)]
    pub randomize_ram: bool,
    #[builder(default = 0x5EED_0B0E)]
    pub ram_seed: u64,
    /// Shades for color indices 0..=3 after palette mapping.
    #[builder(default = DEFAULT_PALETTE)]
    pub palette: [Color; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
