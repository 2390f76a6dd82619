use crate::cpu::Interrupts;

pub(crate) const SB: u16 = 0xFF01;
pub(crate) const SC: u16 = 0xFF02;

/// Serial port without a link partner.
///
/// A transfer started with the internal clock (SC = 0x81) completes at once:
/// the SB byte is captured in `output`, SB reads back 0xFF as if nothing was
/// connected, and the serial interrupt is requested. Test ROMs print their
/// results this way.
#[derive(Debug, Clone, Default)]
pub(crate) struct Serial {
    sb: u8,
    sc: u8,
    output: Vec<u8>,
}

impl Serial {
    pub(crate) fn power_on() -> Self {
        Serial {
            sb: 0x00,
            sc: 0x7E,
            output: Vec::new(),
        }
    }

    pub(crate) fn output(&self) -> &[u8] {
        &self.output
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            SB => self.sb,
            _ => self.sc | 0x7E,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8, interrupts: &mut Interrupts) {
        match addr {
            SB => self.sb = value,
            _ => {
                self.sc = value;
                if self.sc & 0x81 == 0x81 {
                    self.output.push(self.sb);
                    self.sb = 0xFF;
                    self.sc &= !0x80;
                    interrupts.insert(Interrupts::SERIAL);
                }
            }
        }
    }
}
