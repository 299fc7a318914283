use dmgboy::cartridge::Cartridge;
use dmgboy::memory::Memory;
use dmgboy::motherboard::MotherBoard;

fn board() -> MotherBoard {
    MotherBoard::from_cartridge(Cartridge::from_buffer(vec![0x00; 0x8000]))
}

#[test]
fn ram_regions_round_trip() {
    let mut mbrd = board();
    let regions: [(u16, u16); 4] =
        [(0x8000, 0x9fff), (0xc000, 0xdfff), (0xfe00, 0xfe9f), (0xff80, 0xfffe)];
    for &(lo, hi) in regions.iter() {
        for a in lo..=hi {
            let v = (a & 0xff) as u8 ^ 0x5a;
            mbrd.mmu.set(a, v);
            assert_eq!(mbrd.mmu.get(a), v, "round trip at 0x{:04x}", a);
        }
    }
}

#[test]
fn echo_region_aliases_wram() {
    let mut mbrd = board();
    for a in 0xe000..=0xfdff_u16 {
        assert_eq!(mbrd.mmu.get(a), mbrd.mmu.get(a - 0x2000));
    }
    mbrd.mmu.set(0xc123, 0x42);
    assert_eq!(mbrd.mmu.get(0xe123), 0x42);
    mbrd.mmu.set(0xfdff, 0x99);
    assert_eq!(mbrd.mmu.get(0xddff), 0x99);
}

#[test]
fn prohibited_region_reads_ff_and_drops_writes() {
    let mut mbrd = board();
    mbrd.mmu.set(0xfe9f, 0x11);
    mbrd.mmu.set(0xff80, 0x22);
    for a in 0xfea0..=0xfeff_u16 {
        assert_eq!(mbrd.mmu.get(a), 0xff);
        mbrd.mmu.set(a, 0x55);
        assert_eq!(mbrd.mmu.get(a), 0xff);
    }
    // The neighbours keep their contents.
    assert_eq!(mbrd.mmu.get(0xfe9f), 0x11);
    assert_eq!(mbrd.mmu.get(0xff80), 0x22);
}

#[test]
fn word_accessors_are_little_endian() {
    let mut mbrd = board();
    mbrd.mmu.set_word(0xc000, 0xbeef);
    assert_eq!(mbrd.mmu.get(0xc000), 0xef);
    assert_eq!(mbrd.mmu.get(0xc001), 0xbe);
    assert_eq!(mbrd.mmu.get_word(0xc000), 0xbeef);
}

#[test]
fn interrupt_registers_are_routed_to_the_controller() {
    let mut mbrd = board();
    assert_eq!(mbrd.mmu.get(0xffff), 0x00);
    assert_eq!(mbrd.mmu.get(0xff0f), 0xe1);
    mbrd.mmu.set(0xffff, 0x1f);
    mbrd.mmu.set(0xff0f, 0x04);
    assert_eq!(mbrd.mmu.get(0xffff), 0x1f);
    assert_eq!(mbrd.mmu.get(0xff0f), 0x04);
}

#[test]
fn unclaimed_io_ports_retain_their_bytes() {
    // LCDC and friends belong to peripherals outside this core; the bus
    // still keeps what programs write there.
    let mut mbrd = board();
    mbrd.mmu.set(0xff40, 0x91);
    assert_eq!(mbrd.mmu.get(0xff40), 0x91);
}

#[test]
fn rom_writes_do_not_land_in_rom() {
    let mut mbrd = board();
    let before = mbrd.mmu.get(0x1234);
    mbrd.mmu.set(0x1234, !before);
    assert_eq!(mbrd.mmu.get(0x1234), before);
}
