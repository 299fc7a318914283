use dmgboy::cartridge::Cartridge;
use dmgboy::memory::Memory;
use dmgboy::motherboard::MotherBoard;

fn board() -> MotherBoard {
    MotherBoard::from_cartridge(Cartridge::from_buffer(vec![0x00; 0x8000]))
}

#[test]
fn div_increments_every_256_cycles() {
    let mut mbrd = board();
    assert_eq!(mbrd.mmu.get(0xff04), 0xab);
    mbrd.mmu.next(256);
    assert_eq!(mbrd.mmu.get(0xff04), 0xac);
    mbrd.mmu.next(255);
    assert_eq!(mbrd.mmu.get(0xff04), 0xac);
    mbrd.mmu.next(1);
    assert_eq!(mbrd.mmu.get(0xff04), 0xad);
}

#[test]
fn div_write_resets_register_and_accumulator() {
    let mut mbrd = board();
    mbrd.mmu.next(200);
    mbrd.mmu.set(0xff04, 0x77);
    assert_eq!(mbrd.mmu.get(0xff04), 0x00);
    // The 200 cycles gathered before the reset are gone too.
    mbrd.mmu.next(255);
    assert_eq!(mbrd.mmu.get(0xff04), 0x00);
    mbrd.mmu.next(1);
    assert_eq!(mbrd.mmu.get(0xff04), 0x01);
}

#[test]
fn tima_counts_only_while_enabled() {
    let mut mbrd = board();
    mbrd.mmu.set(0xff07, 0x01); // 262144 Hz but disabled
    mbrd.mmu.next(1024);
    assert_eq!(mbrd.mmu.get(0xff05), 0x00);
    mbrd.mmu.set(0xff07, 0x05); // enabled, period 16
    mbrd.mmu.next(16);
    assert_eq!(mbrd.mmu.get(0xff05), 0x01);
}

#[test]
fn tima_overflow_reloads_tma_and_requests_the_interrupt() {
    let mut mbrd = board();
    mbrd.mmu.set(0xff0f, 0x00);
    mbrd.mmu.set(0xff07, 0x05);
    mbrd.mmu.set(0xff05, 0xff);
    mbrd.mmu.set(0xff06, 0x42);
    mbrd.mmu.next(16);
    assert_eq!(mbrd.mmu.get(0xff05), 0x42);
    assert_eq!(mbrd.mmu.get(0xff0f) & 0x04, 0x04);
}

#[test]
fn tac_selects_the_frequency() {
    let mut mbrd = board();
    mbrd.mmu.set(0xff07, 0x06); // enabled, 65536 Hz, period 64
    mbrd.mmu.next(63);
    assert_eq!(mbrd.mmu.get(0xff05), 0x00);
    mbrd.mmu.next(1);
    assert_eq!(mbrd.mmu.get(0xff05), 0x01);
    mbrd.mmu.set(0xff07, 0x07); // enabled, 16384 Hz, period 256
    mbrd.mmu.next(256);
    assert_eq!(mbrd.mmu.get(0xff05), 0x02);
}

#[test]
fn tima_and_tma_are_plain_registers() {
    let mut mbrd = board();
    mbrd.mmu.set(0xff05, 0x12);
    mbrd.mmu.set(0xff06, 0x34);
    assert_eq!(mbrd.mmu.get(0xff05), 0x12);
    assert_eq!(mbrd.mmu.get(0xff06), 0x34);
    assert_eq!(mbrd.mmu.get(0xff07), 0xf8);
}
