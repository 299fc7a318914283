// The chip behind the NINTENDO GAME BOY: The sharp LR35902.
//
// Instructions are grouped into handler functions, one per instruction class;
// which class an opcode byte belongs to is described by the (mask, pattern)
// tables at the bottom of this file, compiled to dense dispatch tables at
// power up. Operands are projected straight out of the opcode byte:
//
//   bits 5-3   8-bit register (destination), bit index, condition code, RST slot
//   bits 2-0   8-bit register (source)
//   bits 5-4   16-bit register pair
//
// Register number 6 names the byte at (HL); those encodings carry their own
// table entries because their timing differs.
use super::decode::{compile, Op};
use super::intc::Intc;
use super::memory::Memory;
use super::register::Flag::{C, H, N, Z};
use super::register::Register;
use super::DmgError;
use std::cell::RefCell;
use std::rc::Rc;

pub type Handler = fn(&mut Cpu, &mut dyn Memory) -> Result<u32, DmgError>;

// Encodings the hardware never implemented. Fetching one is fatal.
pub const UNDEFINED_OPCODES: [u8; 11] =
    [0xd3, 0xdb, 0xdd, 0xe3, 0xe4, 0xeb, 0xec, 0xed, 0xf4, 0xfc, 0xfd];

pub struct Cpu {
    pub reg: Register,
    pub halted: bool,
    pub stopped: bool,
    ime: bool,
    // EI only takes effect after the instruction that follows it; the wish is
    // parked here until the next fetch.
    ime_pending: bool,
    opcode: u8,
    intc: Rc<RefCell<Intc>>,
    ops: [Option<Handler>; 256],
    cb_ops: [Option<Handler>; 256],
}

impl Cpu {
    pub fn power_up(intc: Rc<RefCell<Intc>>) -> Self {
        Self {
            reg: Register::power_up(),
            halted: false,
            stopped: false,
            ime: false,
            ime_pending: false,
            opcode: 0x00,
            intc,
            ops: compile(OPCODES),
            cb_ops: compile(CB_OPCODES),
        }
    }

    pub fn ime(&self) -> bool {
        self.ime
    }

    // Fetches and runs one instruction, returning the T-cycles it consumed.
    // A halted (or stopped) processor burns a NOP's worth of time per step so
    // the peripherals keep advancing until an interrupt wakes it.
    pub fn execute_next_instruction(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        if self.ime_pending {
            self.ime = true;
            self.ime_pending = false;
        }
        if self.halted || self.stopped {
            return Ok(4);
        }
        let pc = self.reg.pc;
        self.opcode = self.imm(mem);
        match self.ops[usize::from(self.opcode)] {
            Some(handler) => handler(self, mem),
            None => Err(DmgError::IllegalOpcode { opcode: self.opcode, pc }),
        }
    }

    // Polled between instructions. Any pending request wakes a halted
    // processor even while IME is cleared; the dispatch itself is gated on
    // IME. Servicing pushes PC, jumps to the vector and costs 5 M-cycles.
    pub fn handle_interrupts(&mut self, mem: &mut dyn Memory) -> u32 {
        if self.intc.borrow().pending() == 0x00 {
            return 0;
        }
        self.halted = false;
        self.stopped = false;
        if !self.ime {
            return 0;
        }
        let vector = match self.intc.borrow_mut().pending_vector() {
            Some(v) => v,
            None => return 0,
        };
        self.ime = false;
        self.stack_add(mem, self.reg.pc);
        self.reg.pc = vector;
        20
    }

    fn imm(&mut self, mem: &mut dyn Memory) -> u8 {
        let v = mem.get(self.reg.pc);
        self.reg.pc = self.reg.pc.wrapping_add(1);
        v
    }

    fn imm_word(&mut self, mem: &mut dyn Memory) -> u16 {
        let v = mem.get_word(self.reg.pc);
        self.reg.pc = self.reg.pc.wrapping_add(2);
        v
    }

    fn stack_add(&mut self, mem: &mut dyn Memory, v: u16) {
        self.reg.sp = self.reg.sp.wrapping_sub(2);
        mem.set_word(self.reg.sp, v);
    }

    fn stack_pop(&mut self, mem: &mut dyn Memory) -> u16 {
        let r = mem.get_word(self.reg.sp);
        self.reg.sp = self.reg.sp.wrapping_add(2);
        r
    }

    // Operand fields of the current opcode.

    fn dst_field(&self) -> u8 {
        (self.opcode >> 3) & 0x07
    }

    fn src_field(&self) -> u8 {
        self.opcode & 0x07
    }

    fn r16_field(&self) -> u8 {
        (self.opcode >> 4) & 0x03
    }

    fn bit_field(&self) -> u8 {
        (self.opcode >> 3) & 0x07
    }

    // Condition code in bits 4-3: NZ, Z, NC, C.
    fn condition(&self) -> bool {
        match (self.opcode >> 3) & 0x03 {
            0x00 => !self.reg.get_flag(Z),
            0x01 => self.reg.get_flag(Z),
            0x02 => !self.reg.get_flag(C),
            _ => self.reg.get_flag(C),
        }
    }

    // Register number 6 never reaches these accessors: the (HL) encodings
    // have their own table entries. Seeing it here means the tables are
    // inconsistent, which is a bug, not a runtime condition.
    fn read_r8(&self, n: u8) -> u8 {
        match n {
            0x00 => self.reg.b,
            0x01 => self.reg.c,
            0x02 => self.reg.d,
            0x03 => self.reg.e,
            0x04 => self.reg.h,
            0x05 => self.reg.l,
            0x07 => self.reg.a,
            n => panic!("Invalid 8-bit register index {}", n),
        }
    }

    fn write_r8(&mut self, n: u8, v: u8) {
        match n {
            0x00 => self.reg.b = v,
            0x01 => self.reg.c = v,
            0x02 => self.reg.d = v,
            0x03 => self.reg.e = v,
            0x04 => self.reg.h = v,
            0x05 => self.reg.l = v,
            0x07 => self.reg.a = v,
            n => panic!("Invalid 8-bit register index {}", n),
        }
    }

    // BC, DE, HL, SP.
    fn read_r16(&self, n: u8) -> u16 {
        match n {
            0x00 => self.reg.get_bc(),
            0x01 => self.reg.get_de(),
            0x02 => self.reg.get_hl(),
            _ => self.reg.sp,
        }
    }

    fn write_r16(&mut self, n: u8, v: u16) {
        match n {
            0x00 => self.reg.set_bc(v),
            0x01 => self.reg.set_de(v),
            0x02 => self.reg.set_hl(v),
            _ => self.reg.sp = v,
        }
    }

    // BC, DE, HL, AF. PUSH and POP trade SP's slot for AF; the F half is
    // masked on restore by the register file.
    fn read_r16_stack(&self, n: u8) -> u16 {
        match n {
            0x00 => self.reg.get_bc(),
            0x01 => self.reg.get_de(),
            0x02 => self.reg.get_hl(),
            _ => self.reg.get_af(),
        }
    }

    fn write_r16_stack(&mut self, n: u8, v: u16) {
        match n {
            0x00 => self.reg.set_bc(v),
            0x01 => self.reg.set_de(v),
            0x02 => self.reg.set_hl(v),
            _ => self.reg.set_af(v),
        }
    }

    // BC, DE, HL+, HL-. The HL slots hand out the current value and then
    // post-increment or post-decrement the pair.
    fn read_r16_mem(&mut self) -> u16 {
        match self.r16_field() {
            0x00 => self.reg.get_bc(),
            0x01 => self.reg.get_de(),
            0x02 => {
                let v = self.reg.get_hl();
                self.reg.set_hl(v.wrapping_add(1));
                v
            }
            _ => {
                let v = self.reg.get_hl();
                self.reg.set_hl(v.wrapping_sub(1));
                v
            }
        }
    }
}

// The arithmetic/logic core. A summary of the commands is given with each;
// if 'Flags affected' is not given then none are.
impl Cpu {
    // Add n to A.
    //
    // Flags affected:
    // Z - Set if result is zero.
    // N - Reset.
    // H - Set if carry from bit 3.
    // C - Set if carry from bit 7.
    fn alu_add(&mut self, n: u8) {
        let a = self.reg.a;
        let r = a.wrapping_add(n);
        self.reg.set_flag(C, u16::from(a) + u16::from(n) > 0xff);
        self.reg.set_flag(H, (a & 0x0f) + (n & 0x0f) > 0x0f);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        self.reg.a = r;
    }

    // Add n + Carry flag to A.
    //
    // Flags affected:
    // Z - Set if result is zero.
    // N - Reset.
    // H - Set if carry from bit 3.
    // C - Set if carry from bit 7.
    fn alu_adc(&mut self, n: u8) {
        let a = self.reg.a;
        let c = u8::from(self.reg.get_flag(C));
        let r = a.wrapping_add(n).wrapping_add(c);
        self.reg.set_flag(C, u16::from(a) + u16::from(n) + u16::from(c) > 0xff);
        self.reg.set_flag(H, (a & 0x0f) + (n & 0x0f) + c > 0x0f);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        self.reg.a = r;
    }

    // Subtract n from A.
    //
    // Flags affected:
    // Z - Set if result is zero.
    // N - Set.
    // H - Set if borrow from bit 4.
    // C - Set if borrow.
    fn alu_sub(&mut self, n: u8) {
        let a = self.reg.a;
        let r = a.wrapping_sub(n);
        self.reg.set_flag(C, u16::from(a) < u16::from(n));
        self.reg.set_flag(H, (a & 0x0f) < (n & 0x0f));
        self.reg.set_flag(N, true);
        self.reg.set_flag(Z, r == 0x00);
        self.reg.a = r;
    }

    // Subtract n + Carry flag from A.
    //
    // Flags affected:
    // Z - Set if result is zero.
    // N - Set.
    // H - Set if borrow from bit 4.
    // C - Set if borrow.
    fn alu_sbc(&mut self, n: u8) {
        let a = self.reg.a;
        let c = u8::from(self.reg.get_flag(C));
        let r = a.wrapping_sub(n).wrapping_sub(c);
        self.reg.set_flag(C, u16::from(a) < u16::from(n) + u16::from(c));
        self.reg.set_flag(H, (a & 0x0f) < (n & 0x0f) + c);
        self.reg.set_flag(N, true);
        self.reg.set_flag(Z, r == 0x00);
        self.reg.a = r;
    }

    // Logically AND n with A, result in A. Z, N=0, H=1, C=0.
    fn alu_and(&mut self, n: u8) {
        let r = self.reg.a & n;
        self.reg.set_flag(C, false);
        self.reg.set_flag(H, true);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        self.reg.a = r;
    }

    // Logical OR n with A, result in A. Z, N=0, H=0, C=0.
    fn alu_or(&mut self, n: u8) {
        let r = self.reg.a | n;
        self.reg.set_flag(C, false);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        self.reg.a = r;
    }

    // Logical exclusive OR n with A, result in A. Z, N=0, H=0, C=0.
    fn alu_xor(&mut self, n: u8) {
        let r = self.reg.a ^ n;
        self.reg.set_flag(C, false);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        self.reg.a = r;
    }

    // Compare A with n: an A - n subtraction with the result thrown away.
    fn alu_cp(&mut self, n: u8) {
        let r = self.reg.a;
        self.alu_sub(n);
        self.reg.a = r;
    }

    // Increment n. Z, N=0, H from bit 3; C untouched.
    fn alu_inc(&mut self, a: u8) -> u8 {
        let r = a.wrapping_add(1);
        self.reg.set_flag(H, (a & 0x0f) + 0x01 > 0x0f);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Decrement n. Z, N=1, H from bit 4 borrow; C untouched.
    fn alu_dec(&mut self, a: u8) -> u8 {
        let r = a.wrapping_sub(1);
        self.reg.set_flag(H, a.trailing_zeros() >= 4);
        self.reg.set_flag(N, true);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Add n to HL.
    //
    // Flags affected:
    // Z - Not affected.
    // N - Reset.
    // H - Set if carry from bit 11.
    // C - Set if carry from bit 15.
    fn alu_add_hl(&mut self, n: u16) {
        let a = self.reg.get_hl();
        let r = a.wrapping_add(n);
        self.reg.set_flag(C, a > 0xffff - n);
        self.reg.set_flag(H, (a & 0x07ff) + (n & 0x07ff) > 0x07ff);
        self.reg.set_flag(N, false);
        self.reg.set_hl(r);
    }

    // Fetch a signed byte and add it to SP, returning the sum. Z=0, N=0;
    // H and C come from the unsigned low-nibble and low-byte sums, before
    // sign extension is applied.
    fn alu_add_sp(&mut self, mem: &mut dyn Memory) -> u16 {
        let a = self.reg.sp;
        let b = i16::from(self.imm(mem) as i8) as u16;
        self.reg.set_flag(C, (a & 0x00ff) + (b & 0x00ff) > 0x00ff);
        self.reg.set_flag(H, (a & 0x000f) + (b & 0x000f) > 0x000f);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, false);
        a.wrapping_add(b)
    }

    // Swap upper and lower nibbles of n. Z, N=0, H=0, C=0.
    fn alu_swap(&mut self, a: u8) -> u8 {
        self.reg.set_flag(C, false);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, a == 0x00);
        (a >> 4) | (a << 4)
    }

    // Decimal adjust A so that it holds the correct Binary Coded Decimal
    // representation after an arithmetic operation, steered by the stored
    // N, H and C flags. Updates Z and C, clears H.
    fn alu_daa(&mut self) {
        let mut a = self.reg.a;
        let mut adjust = if self.reg.get_flag(C) { 0x60 } else { 0x00 };
        if self.reg.get_flag(H) {
            adjust |= 0x06;
        };
        if !self.reg.get_flag(N) {
            if a & 0x0f > 0x09 {
                adjust |= 0x06;
            };
            if a > 0x99 {
                adjust |= 0x60;
            };
            a = a.wrapping_add(adjust);
        } else {
            a = a.wrapping_sub(adjust);
        }
        self.reg.set_flag(C, adjust >= 0x60);
        self.reg.set_flag(H, false);
        self.reg.set_flag(Z, a == 0x00);
        self.reg.a = a;
    }

    // Rotate n left, old bit 7 to Carry. Z, N=0, H=0.
    fn alu_rlc(&mut self, a: u8) -> u8 {
        let c = (a & 0x80) >> 7 == 0x01;
        let r = (a << 1) | u8::from(c);
        self.reg.set_flag(C, c);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Rotate n left through Carry. Z, N=0, H=0.
    fn alu_rl(&mut self, a: u8) -> u8 {
        let c = (a & 0x80) >> 7 == 0x01;
        let r = (a << 1) | u8::from(self.reg.get_flag(C));
        self.reg.set_flag(C, c);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Rotate n right, old bit 0 to Carry. Z, N=0, H=0.
    fn alu_rrc(&mut self, a: u8) -> u8 {
        let c = a & 0x01 == 0x01;
        let r = if c { 0x80 | (a >> 1) } else { a >> 1 };
        self.reg.set_flag(C, c);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Rotate n right through Carry. Z, N=0, H=0.
    fn alu_rr(&mut self, a: u8) -> u8 {
        let c = a & 0x01 == 0x01;
        let r = if self.reg.get_flag(C) { 0x80 | (a >> 1) } else { a >> 1 };
        self.reg.set_flag(C, c);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Shift n left into Carry, LSB becomes 0.
    fn alu_sla(&mut self, a: u8) -> u8 {
        let c = (a & 0x80) >> 7 == 0x01;
        let r = a << 1;
        self.reg.set_flag(C, c);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Shift n right into Carry, MSB keeps its value.
    fn alu_sra(&mut self, a: u8) -> u8 {
        let c = a & 0x01 == 0x01;
        let r = (a >> 1) | (a & 0x80);
        self.reg.set_flag(C, c);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Shift n right into Carry, MSB becomes 0.
    fn alu_srl(&mut self, a: u8) -> u8 {
        let c = a & 0x01 == 0x01;
        let r = a >> 1;
        self.reg.set_flag(C, c);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r == 0x00);
        r
    }

    // Test bit b of n. Z = complement of the bit, N=0, H=1; C untouched.
    fn alu_bit(&mut self, a: u8, b: u8) {
        let r = a & (1 << b) == 0x00;
        self.reg.set_flag(H, true);
        self.reg.set_flag(N, false);
        self.reg.set_flag(Z, r);
    }
}

// Instruction handlers. Each returns the T-cycle cost of the path it took.
impl Cpu {
    fn op_nop(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        Ok(4)
    }

    // STOP parks the processor like HALT does (waking it takes a joypad
    // line, which this core models as an interrupt) and resets the divider.
    fn op_stop(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        self.stopped = true;
        mem.set(0xff04, 0x00);
        Ok(4)
    }

    fn op_halt(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.halted = true;
        Ok(4)
    }

    // DI is immediate; it also cancels a not-yet-promoted EI.
    fn op_di(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.ime = false;
        self.ime_pending = false;
        Ok(4)
    }

    // EI lands after the *next* instruction has executed.
    fn op_ei(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.ime_pending = true;
        Ok(4)
    }

    fn op_cb_prefix(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let pc = self.reg.pc;
        self.opcode = self.imm(mem);
        match self.cb_ops[usize::from(self.opcode)] {
            Some(handler) => handler(self, mem),
            None => Err(DmgError::IllegalOpcode { opcode: self.opcode, pc }),
        }
    }

    // The accumulator rotates clear Z where their CB twins compute it.
    fn op_rlca(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.a = self.alu_rlc(self.reg.a);
        self.reg.set_flag(Z, false);
        Ok(4)
    }

    fn op_rrca(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.a = self.alu_rrc(self.reg.a);
        self.reg.set_flag(Z, false);
        Ok(4)
    }

    fn op_rla(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.a = self.alu_rl(self.reg.a);
        self.reg.set_flag(Z, false);
        Ok(4)
    }

    fn op_rra(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.a = self.alu_rr(self.reg.a);
        self.reg.set_flag(Z, false);
        Ok(4)
    }

    fn op_daa(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.alu_daa();
        Ok(4)
    }

    // Complement A. N=1, H=1.
    fn op_cpl(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.a = !self.reg.a;
        self.reg.set_flag(H, true);
        self.reg.set_flag(N, true);
        Ok(4)
    }

    // Set Carry. N=0, H=0.
    fn op_scf(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.set_flag(C, true);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        Ok(4)
    }

    // Complement Carry. N=0, H=0.
    fn op_ccf(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = !self.reg.get_flag(C);
        self.reg.set_flag(C, v);
        self.reg.set_flag(H, false);
        self.reg.set_flag(N, false);
        Ok(4)
    }

    // 8-bit loads.

    fn op_ld_r_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.write_r8(self.dst_field(), v);
        Ok(4)
    }

    fn op_ld_r_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.write_r8(self.dst_field(), v);
        Ok(8)
    }

    fn op_ld_r_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.write_r8(self.dst_field(), v);
        Ok(8)
    }

    fn op_ld_hl_ind_r(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        mem.set(self.reg.get_hl(), v);
        Ok(8)
    }

    fn op_ld_hl_ind_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        mem.set(self.reg.get_hl(), v);
        Ok(12)
    }

    // LD (BC)/(DE)/(HL+)/(HL-), A.
    fn op_ld_rr_ind_a(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.read_r16_mem();
        mem.set(a, self.reg.a);
        Ok(8)
    }

    // LD A, (BC)/(DE)/(HL+)/(HL-).
    fn op_ld_a_rr_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.read_r16_mem();
        self.reg.a = mem.get(a);
        Ok(8)
    }

    fn op_ld_imm_ind_a(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.imm_word(mem);
        mem.set(a, self.reg.a);
        Ok(16)
    }

    fn op_ld_a_imm_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.imm_word(mem);
        self.reg.a = mem.get(a);
        Ok(16)
    }

    // The LDH forms address the high page at 0xff00.

    fn op_ldh_imm_ind_a(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = 0xff00 | u16::from(self.imm(mem));
        mem.set(a, self.reg.a);
        Ok(12)
    }

    fn op_ldh_a_imm_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = 0xff00 | u16::from(self.imm(mem));
        self.reg.a = mem.get(a);
        Ok(12)
    }

    fn op_ldh_c_ind_a(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        mem.set(0xff00 | u16::from(self.reg.c), self.reg.a);
        Ok(8)
    }

    fn op_ldh_a_c_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.a = mem.get(0xff00 | u16::from(self.reg.c));
        Ok(8)
    }

    // 16-bit loads.

    fn op_ld_rr_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm_word(mem);
        self.write_r16(self.r16_field(), v);
        Ok(12)
    }

    // LD (nn), SP stores little-endian: low byte at nn, high at nn+1.
    fn op_ld_imm_ind_sp(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.imm_word(mem);
        mem.set_word(a, self.reg.sp);
        Ok(20)
    }

    fn op_ld_sp_hl(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.sp = self.reg.get_hl();
        Ok(8)
    }

    fn op_push_rr(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r16_stack(self.r16_field());
        self.stack_add(mem, v);
        Ok(16)
    }

    fn op_pop_rr(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.stack_pop(mem);
        self.write_r16_stack(self.r16_field(), v);
        Ok(12)
    }

    fn op_ld_hl_sp_e(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.alu_add_sp(mem);
        self.reg.set_hl(v);
        Ok(12)
    }

    // 8-bit arithmetic and logic.

    fn op_add_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_add(v);
        Ok(4)
    }

    fn op_add_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_add(v);
        Ok(8)
    }

    fn op_add_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.alu_add(v);
        Ok(8)
    }

    fn op_adc_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_adc(v);
        Ok(4)
    }

    fn op_adc_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_adc(v);
        Ok(8)
    }

    fn op_adc_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.alu_adc(v);
        Ok(8)
    }

    fn op_sub_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_sub(v);
        Ok(4)
    }

    fn op_sub_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_sub(v);
        Ok(8)
    }

    fn op_sub_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.alu_sub(v);
        Ok(8)
    }

    fn op_sbc_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_sbc(v);
        Ok(4)
    }

    fn op_sbc_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_sbc(v);
        Ok(8)
    }

    fn op_sbc_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.alu_sbc(v);
        Ok(8)
    }

    fn op_and_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_and(v);
        Ok(4)
    }

    fn op_and_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_and(v);
        Ok(8)
    }

    fn op_and_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.alu_and(v);
        Ok(8)
    }

    fn op_xor_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_xor(v);
        Ok(4)
    }

    fn op_xor_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_xor(v);
        Ok(8)
    }

    fn op_xor_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.alu_xor(v);
        Ok(8)
    }

    fn op_or_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_or(v);
        Ok(4)
    }

    fn op_or_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_or(v);
        Ok(8)
    }

    fn op_or_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.alu_or(v);
        Ok(8)
    }

    fn op_cp_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_cp(v);
        Ok(4)
    }

    fn op_cp_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_cp(v);
        Ok(8)
    }

    fn op_cp_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.imm(mem);
        self.alu_cp(v);
        Ok(8)
    }

    fn op_inc_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.dst_field();
        let v = self.alu_inc(self.read_r8(n));
        self.write_r8(n, v);
        Ok(4)
    }

    fn op_inc_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_inc(mem.get(a));
        mem.set(a, v);
        Ok(12)
    }

    fn op_dec_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.dst_field();
        let v = self.alu_dec(self.read_r8(n));
        self.write_r8(n, v);
        Ok(4)
    }

    fn op_dec_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_dec(mem.get(a));
        mem.set(a, v);
        Ok(12)
    }

    // 16-bit arithmetic. The pair operations touch no flags.

    fn op_inc_rr(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.r16_field();
        let v = self.read_r16(n).wrapping_add(1);
        self.write_r16(n, v);
        Ok(8)
    }

    fn op_dec_rr(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.r16_field();
        let v = self.read_r16(n).wrapping_sub(1);
        self.write_r16(n, v);
        Ok(8)
    }

    fn op_add_hl_rr(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r16(self.r16_field());
        self.alu_add_hl(v);
        Ok(8)
    }

    fn op_add_sp_e(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.sp = self.alu_add_sp(mem);
        Ok(16)
    }

    // Control flow. Taken branches cost one M-cycle more than skipped ones;
    // the immediate operand is consumed either way.

    fn op_jp_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.pc = self.imm_word(mem);
        Ok(16)
    }

    fn op_jp_hl(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.pc = self.reg.get_hl();
        Ok(4)
    }

    fn op_jp_cc_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.imm_word(mem);
        if self.condition() {
            self.reg.pc = a;
            return Ok(16);
        }
        Ok(12)
    }

    fn op_jr_e(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.imm(mem) as i8;
        self.reg.pc = self.reg.pc.wrapping_add(i16::from(n) as u16);
        Ok(12)
    }

    fn op_jr_cc_e(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.imm(mem) as i8;
        if self.condition() {
            self.reg.pc = self.reg.pc.wrapping_add(i16::from(n) as u16);
            return Ok(12);
        }
        Ok(8)
    }

    fn op_call_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.imm_word(mem);
        self.stack_add(mem, self.reg.pc);
        self.reg.pc = a;
        Ok(24)
    }

    fn op_call_cc_imm(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.imm_word(mem);
        if self.condition() {
            self.stack_add(mem, self.reg.pc);
            self.reg.pc = a;
            return Ok(24);
        }
        Ok(12)
    }

    fn op_ret(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.pc = self.stack_pop(mem);
        Ok(16)
    }

    fn op_ret_cc(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        if self.condition() {
            self.reg.pc = self.stack_pop(mem);
            return Ok(20);
        }
        Ok(8)
    }

    // RETI restores IME without EI's one-instruction delay.
    fn op_reti(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        self.reg.pc = self.stack_pop(mem);
        self.ime = true;
        Ok(16)
    }

    // The target slot in bits 5-3 names one of the eight vectors 0x00..0x38.
    fn op_rst(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        self.stack_add(mem, self.reg.pc);
        self.reg.pc = u16::from(self.bit_field()) << 3;
        Ok(16)
    }

    // CB page: rotates, shifts and bit operations.

    fn op_rlc_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.alu_rlc(self.read_r8(n));
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_rlc_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_rlc(mem.get(a));
        mem.set(a, v);
        Ok(16)
    }

    fn op_rrc_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.alu_rrc(self.read_r8(n));
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_rrc_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_rrc(mem.get(a));
        mem.set(a, v);
        Ok(16)
    }

    fn op_rl_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.alu_rl(self.read_r8(n));
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_rl_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_rl(mem.get(a));
        mem.set(a, v);
        Ok(16)
    }

    fn op_rr_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.alu_rr(self.read_r8(n));
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_rr_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_rr(mem.get(a));
        mem.set(a, v);
        Ok(16)
    }

    fn op_sla_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.alu_sla(self.read_r8(n));
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_sla_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_sla(mem.get(a));
        mem.set(a, v);
        Ok(16)
    }

    fn op_sra_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.alu_sra(self.read_r8(n));
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_sra_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_sra(mem.get(a));
        mem.set(a, v);
        Ok(16)
    }

    fn op_swap_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.alu_swap(self.read_r8(n));
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_swap_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_swap(mem.get(a));
        mem.set(a, v);
        Ok(16)
    }

    fn op_srl_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.alu_srl(self.read_r8(n));
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_srl_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = self.alu_srl(mem.get(a));
        mem.set(a, v);
        Ok(16)
    }

    fn op_bit_b_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = self.read_r8(self.src_field());
        self.alu_bit(v, self.bit_field());
        Ok(8)
    }

    fn op_bit_b_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let v = mem.get(self.reg.get_hl());
        self.alu_bit(v, self.bit_field());
        Ok(12)
    }

    fn op_res_b_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.read_r8(n) & !(1 << self.bit_field());
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_res_b_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = mem.get(a) & !(1 << self.bit_field());
        mem.set(a, v);
        Ok(16)
    }

    fn op_set_b_r(&mut self, _: &mut dyn Memory) -> Result<u32, DmgError> {
        let n = self.src_field();
        let v = self.read_r8(n) | (1 << self.bit_field());
        self.write_r8(n, v);
        Ok(8)
    }

    fn op_set_b_hl_ind(&mut self, mem: &mut dyn Memory) -> Result<u32, DmgError> {
        let a = self.reg.get_hl();
        let v = mem.get(a) | (1 << self.bit_field());
        mem.set(a, v);
        Ok(16)
    }
}

// The unprefixed page. Entries are matched in order, so the exact encodings
// come before the field-coded families they overlap: HALT sits inside the
// LD r,r block, the (HL) and immediate forms inside the register families.
// The eleven undefined bytes match nothing here.
#[rustfmt::skip]
static OPCODES: &[(Op, Handler)] = &[
    // Miscellaneous control.
    (Op::new(0xff, 0x00), Cpu::op_nop as Handler),
    (Op::new(0xff, 0x10), Cpu::op_stop as Handler),
    (Op::new(0xff, 0x76), Cpu::op_halt as Handler),
    (Op::new(0xff, 0xf3), Cpu::op_di as Handler),
    (Op::new(0xff, 0xfb), Cpu::op_ei as Handler),
    (Op::new(0xff, 0xcb), Cpu::op_cb_prefix as Handler),
    // Accumulator rotates and adjustments.
    (Op::new(0xff, 0x07), Cpu::op_rlca as Handler),
    (Op::new(0xff, 0x0f), Cpu::op_rrca as Handler),
    (Op::new(0xff, 0x17), Cpu::op_rla as Handler),
    (Op::new(0xff, 0x1f), Cpu::op_rra as Handler),
    (Op::new(0xff, 0x27), Cpu::op_daa as Handler),
    (Op::new(0xff, 0x2f), Cpu::op_cpl as Handler),
    (Op::new(0xff, 0x37), Cpu::op_scf as Handler),
    (Op::new(0xff, 0x3f), Cpu::op_ccf as Handler),
    // 8-bit loads.
    (Op::new(0xff, 0x36), Cpu::op_ld_hl_ind_imm as Handler),
    (Op::new(0xff, 0xea), Cpu::op_ld_imm_ind_a as Handler),
    (Op::new(0xff, 0xfa), Cpu::op_ld_a_imm_ind as Handler),
    (Op::new(0xff, 0xe0), Cpu::op_ldh_imm_ind_a as Handler),
    (Op::new(0xff, 0xf0), Cpu::op_ldh_a_imm_ind as Handler),
    (Op::new(0xff, 0xe2), Cpu::op_ldh_c_ind_a as Handler),
    (Op::new(0xff, 0xf2), Cpu::op_ldh_a_c_ind as Handler),
    (Op::new(0xcf, 0x02), Cpu::op_ld_rr_ind_a as Handler),
    (Op::new(0xcf, 0x0a), Cpu::op_ld_a_rr_ind as Handler),
    (Op::new(0xf8, 0x70), Cpu::op_ld_hl_ind_r as Handler),
    (Op::new(0xc7, 0x46), Cpu::op_ld_r_hl_ind as Handler),
    (Op::new(0xc7, 0x06), Cpu::op_ld_r_imm as Handler),
    (Op::new(0xc0, 0x40), Cpu::op_ld_r_r as Handler),
    // 16-bit loads and stack operations.
    (Op::new(0xff, 0x08), Cpu::op_ld_imm_ind_sp as Handler),
    (Op::new(0xff, 0xf9), Cpu::op_ld_sp_hl as Handler),
    (Op::new(0xff, 0xf8), Cpu::op_ld_hl_sp_e as Handler),
    (Op::new(0xcf, 0x01), Cpu::op_ld_rr_imm as Handler),
    (Op::new(0xcf, 0xc5), Cpu::op_push_rr as Handler),
    (Op::new(0xcf, 0xc1), Cpu::op_pop_rr as Handler),
    // 8-bit arithmetic and logic.
    (Op::new(0xff, 0x34), Cpu::op_inc_hl_ind as Handler),
    (Op::new(0xff, 0x35), Cpu::op_dec_hl_ind as Handler),
    (Op::new(0xff, 0x86), Cpu::op_add_hl_ind as Handler),
    (Op::new(0xff, 0xc6), Cpu::op_add_imm as Handler),
    (Op::new(0xff, 0x8e), Cpu::op_adc_hl_ind as Handler),
    (Op::new(0xff, 0xce), Cpu::op_adc_imm as Handler),
    (Op::new(0xff, 0x96), Cpu::op_sub_hl_ind as Handler),
    (Op::new(0xff, 0xd6), Cpu::op_sub_imm as Handler),
    (Op::new(0xff, 0x9e), Cpu::op_sbc_hl_ind as Handler),
    (Op::new(0xff, 0xde), Cpu::op_sbc_imm as Handler),
    (Op::new(0xff, 0xa6), Cpu::op_and_hl_ind as Handler),
    (Op::new(0xff, 0xe6), Cpu::op_and_imm as Handler),
    (Op::new(0xff, 0xae), Cpu::op_xor_hl_ind as Handler),
    (Op::new(0xff, 0xee), Cpu::op_xor_imm as Handler),
    (Op::new(0xff, 0xb6), Cpu::op_or_hl_ind as Handler),
    (Op::new(0xff, 0xf6), Cpu::op_or_imm as Handler),
    (Op::new(0xff, 0xbe), Cpu::op_cp_hl_ind as Handler),
    (Op::new(0xff, 0xfe), Cpu::op_cp_imm as Handler),
    (Op::new(0xf8, 0x80), Cpu::op_add_r as Handler),
    (Op::new(0xf8, 0x88), Cpu::op_adc_r as Handler),
    (Op::new(0xf8, 0x90), Cpu::op_sub_r as Handler),
    (Op::new(0xf8, 0x98), Cpu::op_sbc_r as Handler),
    (Op::new(0xf8, 0xa0), Cpu::op_and_r as Handler),
    (Op::new(0xf8, 0xa8), Cpu::op_xor_r as Handler),
    (Op::new(0xf8, 0xb0), Cpu::op_or_r as Handler),
    (Op::new(0xf8, 0xb8), Cpu::op_cp_r as Handler),
    (Op::new(0xc7, 0x04), Cpu::op_inc_r as Handler),
    (Op::new(0xc7, 0x05), Cpu::op_dec_r as Handler),
    // 16-bit arithmetic.
    (Op::new(0xff, 0xe8), Cpu::op_add_sp_e as Handler),
    (Op::new(0xcf, 0x03), Cpu::op_inc_rr as Handler),
    (Op::new(0xcf, 0x0b), Cpu::op_dec_rr as Handler),
    (Op::new(0xcf, 0x09), Cpu::op_add_hl_rr as Handler),
    // Control flow.
    (Op::new(0xff, 0xc3), Cpu::op_jp_imm as Handler),
    (Op::new(0xff, 0xe9), Cpu::op_jp_hl as Handler),
    (Op::new(0xe7, 0xc2), Cpu::op_jp_cc_imm as Handler),
    (Op::new(0xff, 0x18), Cpu::op_jr_e as Handler),
    (Op::new(0xe7, 0x20), Cpu::op_jr_cc_e as Handler),
    (Op::new(0xff, 0xcd), Cpu::op_call_imm as Handler),
    (Op::new(0xe7, 0xc4), Cpu::op_call_cc_imm as Handler),
    (Op::new(0xff, 0xc9), Cpu::op_ret as Handler),
    (Op::new(0xe7, 0xc0), Cpu::op_ret_cc as Handler),
    (Op::new(0xff, 0xd9), Cpu::op_reti as Handler),
    (Op::new(0xc7, 0xc7), Cpu::op_rst as Handler),
];

// The CB page is total: every byte decodes to an operation.
#[rustfmt::skip]
static CB_OPCODES: &[(Op, Handler)] = &[
    (Op::new(0xff, 0x06), Cpu::op_rlc_hl_ind as Handler),
    (Op::new(0xff, 0x0e), Cpu::op_rrc_hl_ind as Handler),
    (Op::new(0xff, 0x16), Cpu::op_rl_hl_ind as Handler),
    (Op::new(0xff, 0x1e), Cpu::op_rr_hl_ind as Handler),
    (Op::new(0xff, 0x26), Cpu::op_sla_hl_ind as Handler),
    (Op::new(0xff, 0x2e), Cpu::op_sra_hl_ind as Handler),
    (Op::new(0xff, 0x36), Cpu::op_swap_hl_ind as Handler),
    (Op::new(0xff, 0x3e), Cpu::op_srl_hl_ind as Handler),
    (Op::new(0xc7, 0x46), Cpu::op_bit_b_hl_ind as Handler),
    (Op::new(0xc7, 0x86), Cpu::op_res_b_hl_ind as Handler),
    (Op::new(0xc7, 0xc6), Cpu::op_set_b_hl_ind as Handler),
    (Op::new(0xf8, 0x00), Cpu::op_rlc_r as Handler),
    (Op::new(0xf8, 0x08), Cpu::op_rrc_r as Handler),
    (Op::new(0xf8, 0x10), Cpu::op_rl_r as Handler),
    (Op::new(0xf8, 0x18), Cpu::op_rr_r as Handler),
    (Op::new(0xf8, 0x20), Cpu::op_sla_r as Handler),
    (Op::new(0xf8, 0x28), Cpu::op_sra_r as Handler),
    (Op::new(0xf8, 0x30), Cpu::op_swap_r as Handler),
    (Op::new(0xf8, 0x38), Cpu::op_srl_r as Handler),
    (Op::new(0xc0, 0x40), Cpu::op_bit_b_r as Handler),
    (Op::new(0xc0, 0x80), Cpu::op_res_b_r as Handler),
    (Op::new(0xc0, 0xc0), Cpu::op_set_b_r as Handler),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu() -> Cpu {
        Cpu::power_up(Rc::new(RefCell::new(Intc::power_up())))
    }

    // One handler per opcode byte, holes exactly where the hardware has them.
    #[test]
    fn dispatch_covers_the_opcode_space() {
        let cpu = cpu();
        for code in 0x00..=0xff_u16 {
            let code = code as u8;
            let defined = !UNDEFINED_OPCODES.contains(&code);
            assert_eq!(cpu.ops[usize::from(code)].is_some(), defined, "opcode 0x{:02x}", code);
            assert!(cpu.cb_ops[usize::from(code)].is_some(), "cb opcode 0x{:02x}", code);
        }
    }

    // HALT lives inside the LD r,r block and must win its slot.
    #[test]
    fn exact_entries_shadow_families() {
        let cpu = cpu();
        assert_eq!(cpu.ops[0x76], Some(Cpu::op_halt as Handler));
        assert_eq!(cpu.ops[0x70], Some(Cpu::op_ld_hl_ind_r as Handler));
        assert_eq!(cpu.ops[0x46], Some(Cpu::op_ld_r_hl_ind as Handler));
        assert_eq!(cpu.ops[0x41], Some(Cpu::op_ld_r_r as Handler));
        assert_eq!(cpu.ops[0x86], Some(Cpu::op_add_hl_ind as Handler));
        assert_eq!(cpu.cb_ops[0x46], Some(Cpu::op_bit_b_hl_ind as Handler));
        assert_eq!(cpu.cb_ops[0x40], Some(Cpu::op_bit_b_r as Handler));
    }
}
