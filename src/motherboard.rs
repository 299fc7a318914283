// The motherboard owns every component of the machine and drives them in
// lockstep: one instruction, one interrupt poll, then the cycle total is
// committed to the peripherals behind the bus. This is the only place a
// cycle count crosses from the CPU to anything else, so each T-cycle the
// CPU observes is observed exactly once by every peripheral.
use super::cartridge::Cartridge;
use super::cpu::Cpu;
use super::intc::Intc;
use super::mmunit::Mmunit;
use super::DmgError;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub struct MotherBoard {
    pub mmu: Mmunit,
    pub cpu: Cpu,
    // Host-controlled sentinel; `emulate` returns once it is raised.
    pub stop_cpu: bool,
}

impl MotherBoard {
    pub fn power_up(path: impl AsRef<Path>) -> Result<Self, DmgError> {
        Ok(Self::from_cartridge(Cartridge::power_up(path)?))
    }

    pub fn from_cartridge(cartridge: Cartridge) -> Self {
        let intc = Rc::new(RefCell::new(Intc::power_up()));
        Self {
            mmu: Mmunit::power_up(cartridge, intc.clone()),
            cpu: Cpu::power_up(intc),
            stop_cpu: false,
        }
    }

    // One full machine step.
    pub fn next(&mut self) -> Result<u32, DmgError> {
        let mut cycles = self.cpu.execute_next_instruction(&mut self.mmu)?;
        cycles += self.cpu.handle_interrupts(&mut self.mmu);
        self.mmu.next(cycles);
        Ok(cycles)
    }

    pub fn emulate(&mut self) -> Result<(), DmgError> {
        while !self.stop_cpu {
            self.next()?;
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        self.stop_cpu = true;
    }
}
