// The interrupt controller pairs the two latches the CPU consults between
// instructions:
//
// FFFF - IE - Interrupt Enable (R/W)
// FF0F - IF - Interrupt Flag (R/W)
// Bit 0: V-Blank  Interrupt (INT 40h)  (1=Request/Enable)
// Bit 1: LCD STAT Interrupt (INT 48h)  (1=Request/Enable)
// Bit 2: Timer    Interrupt (INT 50h)  (1=Request/Enable)
// Bit 3: Serial   Interrupt (INT 58h)  (1=Request/Enable)
// Bit 4: Joypad   Interrupt (INT 60h)  (1=Request/Enable)
//
// When several requests are both flagged and enabled, the lowest bit wins.
use super::DmgError;

pub const IF_ADDRESS: u16 = 0xff0f;
pub const IE_ADDRESS: u16 = 0xffff;

#[rustfmt::skip]
#[derive(Clone, Copy)]
pub enum Flag {
    VBlank  = 0,
    LCDStat = 1,
    Timer   = 2,
    Serial  = 3,
    Joypad  = 4,
}

pub struct Intc {
    inte: u8,
    intf: u8,
}

impl Intc {
    pub fn power_up() -> Self {
        Self { inte: 0x00, intf: 0xe1 }
    }

    pub fn hi(&mut self, flag: Flag) {
        self.intf |= 1 << flag as u8;
    }

    // Requests that are both flagged and enabled.
    pub fn pending(&self) -> u8 {
        self.inte & self.intf & 0x1f
    }

    // Picks the winning request, acknowledges it by clearing its IF bit, and
    // returns its handler address. This is the only operation that mutates IF
    // as a side effect.
    pub fn pending_vector(&mut self) -> Option<u16> {
        let pending = self.pending();
        if pending == 0x00 {
            return None;
        }
        let n = pending.trailing_zeros() as u16;
        self.intf &= !(1 << n);
        Some(0x0040 | (n << 3))
    }

    pub fn read(&self, a: u16) -> Result<u8, DmgError> {
        match a {
            IF_ADDRESS => Ok(self.intf),
            IE_ADDRESS => Ok(self.inte),
            _ => Err(DmgError::BadInterruptRegister(a)),
        }
    }

    pub fn write(&mut self, a: u16, v: u8) -> Result<(), DmgError> {
        match a {
            IF_ADDRESS => self.intf = v,
            IE_ADDRESS => self.inte = v,
            _ => return Err(DmgError::BadInterruptRegister(a)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_up_state() {
        let c = Intc::power_up();
        assert_eq!(c.read(IE_ADDRESS).unwrap(), 0x00);
        assert_eq!(c.read(IF_ADDRESS).unwrap(), 0xe1);
    }

    #[test]
    fn lowest_bit_wins() {
        let mut c = Intc::power_up();
        c.write(IE_ADDRESS, 0x1f).unwrap();
        c.write(IF_ADDRESS, 0x1f).unwrap();
        assert_eq!(c.pending_vector(), Some(0x0040));
        assert_eq!(c.read(IF_ADDRESS).unwrap(), 0x1e);
        assert_eq!(c.pending_vector(), Some(0x0048));
        assert_eq!(c.pending_vector(), Some(0x0050));
        assert_eq!(c.pending_vector(), Some(0x0058));
        assert_eq!(c.pending_vector(), Some(0x0060));
        assert_eq!(c.pending_vector(), None);
    }

    #[test]
    fn masked_requests_do_not_vector() {
        let mut c = Intc::power_up();
        c.write(IF_ADDRESS, 0x00).unwrap();
        c.hi(Flag::Timer);
        assert_eq!(c.pending(), 0x00);
        assert_eq!(c.pending_vector(), None);
        // The request stays latched until enabled.
        c.write(IE_ADDRESS, 0x04).unwrap();
        assert_eq!(c.pending_vector(), Some(0x0050));
    }

    #[test]
    fn foreign_address_is_rejected() {
        let mut c = Intc::power_up();
        assert!(c.read(0xff04).is_err());
        assert!(c.write(0xff00, 0x00).is_err());
    }
}
