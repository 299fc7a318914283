use dmgboy::cartridge::{Cartridge, ROM_BANK_SIZE};
use dmgboy::memory::Memory;

// An image whose banks are recognisable: every byte of bank n reads n.
fn banked_rom(banks: usize, cartridge_type: u8, ram_size_code: u8) -> Vec<u8> {
    let mut rom = vec![0x00; banks * ROM_BANK_SIZE];
    for (i, b) in rom.iter_mut().enumerate() {
        *b = (i / ROM_BANK_SIZE) as u8;
    }
    rom[0x0147] = cartridge_type;
    rom[0x0148] = 0x00;
    rom[0x0149] = ram_size_code;
    rom
}

#[test]
fn mbc0_maps_rom_linearly() {
    let mut rom = vec![0x00; 2 * ROM_BANK_SIZE];
    rom[0x0000] = 0x11;
    rom[0x7fff] = 0x22;
    let mut cart = Cartridge::from_buffer(rom);
    assert_eq!(cart.get(0x0000), 0x11);
    assert_eq!(cart.get(0x7fff), 0x22);
    // Control writes are meaningless and ignored.
    cart.set(0x2000, 0x02);
    assert_eq!(cart.get(0x4000), 0x00);
}

#[test]
fn mbc0_without_ram_reads_ff() {
    let mut cart = Cartridge::from_buffer(banked_rom(2, 0x00, 0x00));
    assert_eq!(cart.get(0xa000), 0xff);
    cart.set(0xa000, 0x42);
    assert_eq!(cart.get(0xa000), 0xff);
}

#[test]
fn mbc1_selects_rom_banks() {
    let mut cart = Cartridge::from_buffer(banked_rom(4, 0x01, 0x00));
    // The switchable window starts out at bank 1.
    assert_eq!(cart.get(0x0000), 0x00);
    assert_eq!(cart.get(0x4000), 0x01);
    cart.set(0x2000, 0x02);
    assert_eq!(cart.get(0x4000), 0x02);
    cart.set(0x2000, 0x03);
    assert_eq!(cart.get(0x4000), 0x03);
    // The fixed window never moves.
    assert_eq!(cart.get(0x0000), 0x00);
}

#[test]
fn mbc1_translates_bank_zero_to_one() {
    let mut cart = Cartridge::from_buffer(banked_rom(4, 0x01, 0x00));
    cart.set(0x2000, 0x00);
    let after_zero = cart.get(0x4000);
    cart.set(0x2000, 0x01);
    assert_eq!(after_zero, cart.get(0x4000));
    assert_eq!(after_zero, 0x01);
}

#[test]
fn mbc1_wraps_bank_numbers_on_small_roms() {
    let mut cart = Cartridge::from_buffer(banked_rom(4, 0x01, 0x00));
    // Bank 0x1f on a 4-bank image lands on 0x1f % 4 = 3.
    cart.set(0x2000, 0x1f);
    assert_eq!(cart.get(0x4000), 0x03);
}

#[test]
fn mbc1_ram_requires_enable() {
    let mut cart = Cartridge::from_buffer(banked_rom(4, 0x03, 0x03));
    assert_eq!(cart.get(0xa000), 0xff);
    cart.set(0xa000, 0x42);
    assert_eq!(cart.get(0xa000), 0xff);

    // Any value with 0xA in the low nibble enables.
    cart.set(0x0000, 0x1a);
    cart.set(0xa000, 0x42);
    assert_eq!(cart.get(0xa000), 0x42);

    cart.set(0x0000, 0x00);
    assert_eq!(cart.get(0xa000), 0xff);
    // The byte survives disabled, it is just unreachable.
    cart.set(0x0000, 0x0a);
    assert_eq!(cart.get(0xa000), 0x42);
}

#[test]
fn mbc1_ram_banking_mode() {
    let mut cart = Cartridge::from_buffer(banked_rom(4, 0x03, 0x03));
    cart.set(0x0000, 0x0a);
    cart.set(0x6000, 0x01);
    for bank in 0..4 {
        cart.set(0x4000, bank);
        cart.set(0xa000, 0x10 + bank);
    }
    for bank in 0..4 {
        cart.set(0x4000, bank);
        assert_eq!(cart.get(0xa000), 0x10 + bank);
    }
    // In ROM mode only bank 0 is visible.
    cart.set(0x6000, 0x00);
    assert_eq!(cart.get(0xa000), 0x10);
}

#[test]
fn mbc1_upper_latch_extends_the_rom_bank() {
    let mut cart = Cartridge::from_buffer(banked_rom(64, 0x01, 0x00));
    cart.set(0x2000, 0x01);
    cart.set(0x4000, 0x01);
    // Bank (1 << 5) | 1 = 0x21.
    assert_eq!(cart.get(0x4000), 0x21);
    // In RAM banking mode the fixed window shows the 512 KiB slice base.
    cart.set(0x6000, 0x01);
    assert_eq!(cart.get(0x0000), 0x20);
}

#[test]
fn header_describes_the_image() {
    let cart = Cartridge::from_buffer(banked_rom(4, 0x01, 0x00));
    assert_eq!(cart.cartridge_type(), 0x01);
    assert_eq!(cart.rom_banks(), 4);
}

#[test]
#[should_panic(expected = "Unsupported cartridge type")]
fn unknown_mapper_is_rejected() {
    Cartridge::from_buffer(banked_rom(2, 0x1b, 0x00));
}
