// Sometimes it's useful to have a timer that interrupts at regular intervals
// for routines that require periodic or precise updates. The timer in the
// GameBoy has a selectable frequency of 4096, 16384, 65536, or 262144 Hertz.
// This frequency increments the Timer Counter (TIMA). When it overflows, it
// is reloaded from the Timer Modulo (TMA) and an interrupt is requested.
//
// See: http://gbdev.gg8.se/wiki/articles/Timer_and_Divider_Registers
use super::clock::Clock;
use super::convention::{CLOCK_SPEED, DIV_FREQUENCY, TAC_FREQUENCIES};
use super::intc::{Flag, Intc};
use std::cell::RefCell;
use std::rc::Rc;

pub struct Timer {
    intc: Rc<RefCell<Intc>>,

    // Incremented at 16384 Hz. Writing any value resets it to 0x00.
    div: u8,
    // Incremented at the TAC frequency while TAC bit 2 is set. Overflow
    // reloads the TMA value and raises the timer interrupt.
    tima: u8,
    tma: u8,
    //  Bit  2   - Timer Enable
    //  Bits 1-0 - Input Clock Select
    tac: u8,

    div_clock: Clock,
    tima_clock: Clock,
}

impl Timer {
    pub fn power_up(intc: Rc<RefCell<Intc>>) -> Self {
        Self {
            intc,
            div: 0xab,
            tima: 0x00,
            tma: 0x00,
            tac: 0xf8,
            div_clock: Clock::power_up(CLOCK_SPEED / DIV_FREQUENCY),
            tima_clock: Clock::power_up(CLOCK_SPEED / TAC_FREQUENCIES[0]),
        }
    }

    pub fn get(&self, a: u16) -> u8 {
        match a {
            0xff04 => self.div,
            0xff05 => self.tima,
            0xff06 => self.tma,
            0xff07 => self.tac,
            _ => panic!("Unsupported timer address 0x{:04x}", a),
        }
    }

    pub fn set(&mut self, a: u16, v: u8) {
        match a {
            0xff04 => {
                // Writes reset both the visible register and the cycles it
                // had accumulated towards the next increment.
                self.div = 0x00;
                self.div_clock.rewind();
            }
            0xff05 => self.tima = v,
            0xff06 => self.tma = v,
            0xff07 => {
                self.tac = v;
                self.tima_clock.period = CLOCK_SPEED / TAC_FREQUENCIES[(v & 0x03) as usize];
            }
            _ => panic!("Unsupported timer address 0x{:04x}", a),
        }
    }

    pub fn next(&mut self, cycles: u32) {
        for _ in 0..self.div_clock.next(cycles) {
            self.div = self.div.wrapping_add(1);
        }

        if self.tac & 0x04 == 0x00 {
            return;
        }
        for _ in 0..self.tima_clock.next(cycles) {
            self.tima = self.tima.wrapping_add(1);
            if self.tima == 0x00 {
                self.tima = self.tma;
                self.intc.borrow_mut().hi(Flag::Timer);
            }
        }
    }
}
