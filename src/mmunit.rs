// A memory management unit (MMU), sometimes called paged memory management
// unit (PMMU), is a computer hardware unit having all memory references
// passed through itself, primarily performing the translation of virtual
// memory addresses to physical addresses. Here it is a pure dispatcher over
// the 16 bit address space: every read and write lands in exactly one of the
// regions of the map in `memory.rs`.
use super::cartridge::Cartridge;
use super::intc::{Intc, IE_ADDRESS, IF_ADDRESS};
use super::memory::Memory;
use super::timer::Timer;
use std::cell::RefCell;
use std::rc::Rc;

pub struct Mmunit {
    pub cartridge: Cartridge,
    pub timer: Timer,
    intc: Rc<RefCell<Intc>>,
    vram: [u8; 0x2000],
    wram: [u8; 0x2000],
    oam: [u8; 0xa0],
    // Ports of the peripherals this core does not model (PPU, APU, serial,
    // joypad). Kept as plain bytes so programs that poke them read back what
    // they wrote.
    io: [u8; 0x80],
    hram: [u8; 0x7f],
}

impl Mmunit {
    pub fn power_up(cartridge: Cartridge, intc: Rc<RefCell<Intc>>) -> Self {
        Self {
            cartridge,
            timer: Timer::power_up(intc.clone()),
            intc,
            vram: [0x00; 0x2000],
            wram: [0x00; 0x2000],
            oam: [0x00; 0xa0],
            io: [0x00; 0x80],
            hram: [0x00; 0x7f],
        }
    }

    // Commits a cycle delta to the peripherals behind the bus. The
    // motherboard is the only caller, once per instruction step, so every
    // T-cycle the CPU reports is seen exactly once here.
    pub fn next(&mut self, cycles: u32) {
        self.timer.next(cycles);
    }
}

impl Memory for Mmunit {
    fn get(&self, a: u16) -> u8 {
        match a {
            0x0000..=0x7fff => self.cartridge.get(a),
            0x8000..=0x9fff => self.vram[a as usize - 0x8000],
            0xa000..=0xbfff => self.cartridge.get(a),
            0xc000..=0xdfff => self.wram[a as usize - 0xc000],
            0xe000..=0xfdff => self.wram[a as usize - 0xe000],
            0xfe00..=0xfe9f => self.oam[a as usize - 0xfe00],
            0xfea0..=0xfeff => 0xff,
            0xff04..=0xff07 => self.timer.get(a),
            IF_ADDRESS => self.intc.borrow().read(a).unwrap_or(0xff),
            0xff00..=0xff7f => self.io[a as usize - 0xff00],
            0xff80..=0xfffe => self.hram[a as usize - 0xff80],
            IE_ADDRESS => self.intc.borrow().read(a).unwrap_or(0xff),
        }
    }

    fn set(&mut self, a: u16, v: u8) {
        match a {
            0x0000..=0x7fff => self.cartridge.set(a, v),
            0x8000..=0x9fff => self.vram[a as usize - 0x8000] = v,
            0xa000..=0xbfff => self.cartridge.set(a, v),
            0xc000..=0xdfff => self.wram[a as usize - 0xc000] = v,
            0xe000..=0xfdff => self.wram[a as usize - 0xe000] = v,
            0xfe00..=0xfe9f => self.oam[a as usize - 0xfe00] = v,
            0xfea0..=0xfeff => {}
            0xff04..=0xff07 => self.timer.set(a, v),
            IF_ADDRESS => {
                self.intc.borrow_mut().write(a, v).ok();
            }
            0xff00..=0xff7f => self.io[a as usize - 0xff00] = v,
            0xff80..=0xfffe => self.hram[a as usize - 0xff80] = v,
            IE_ADDRESS => {
                self.intc.borrow_mut().write(a, v).ok();
            }
        }
    }
}
