/// JOYP (FF00) button matrix.
///
/// Pressed buttons are kept as set bits and reported inverted, the way the
/// hardware pulls selected lines low.
#[derive(Debug, Clone, Default)]
pub(super) struct Joypad {
    /// Bits 4-5 as last written; 0 selects a group.
    select: u8,
    buttons: u8,
    dpad: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoypadButton {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Joypad {
    pub(super) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.dpad;
        }
        if self.select & 0x20 == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    pub(super) fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    /// Update one button. Returns `true` on a fresh press.
    pub(super) fn set(&mut self, button: JoypadButton, pressed: bool) -> bool {
        let (group, bit) = match button {
            JoypadButton::Right => (&mut self.dpad, 0),
            JoypadButton::Left => (&mut self.dpad, 1),
            JoypadButton::Up => (&mut self.dpad, 2),
            JoypadButton::Down => (&mut self.dpad, 3),
            JoypadButton::A => (&mut self.buttons, 0),
            JoypadButton::B => (&mut self.buttons, 1),
            JoypadButton::Select => (&mut self.buttons, 2),
            JoypadButton::Start => (&mut self.buttons, 3),
        };
        let mask = 1 << bit;
        let was_pressed = *group & mask != 0;
        if pressed {
            *group |= mask;
        } else {
            *group &= !mask;
        }
        pressed && !was_pressed
    }
}
