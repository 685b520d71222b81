//! Mapper integration scenarios
//!
//! Bank switching and IRQ behavior observed through the full emulator,
//! not just the mapper structs.

mod common;

use common::{TestRom, PRG_PAGE};

/// Tag each 16 KiB PRG bank with its index so reads identify the bank
fn tag_prg_banks(prg: &mut [u8]) {
    for (bank, chunk) in prg.chunks_mut(PRG_PAGE).enumerate() {
        chunk.fill(bank as u8);
    }
}

#[test]
fn test_mmc1_serial_bank_switch_keeps_reset_vector() {
    // 256 KiB PRG MMC1 cartridge
    let mut rom = TestRom::with_mapper(1, 16, 1);
    tag_prg_banks(&mut rom.prg);

    // Reset vector in the last bank (always mapped at $C000 in mode 3)
    rom.vectors(0x8000, 0x8000, 0x8000);
    let mut emulator = rom.into_emulator();

    // Serial-write 0b00101 to the PRG bank register at $E000: five writes,
    // one bit per write, LSB first
    for bit in [1u8, 0, 1, 0, 0] {
        emulator.bus_mut().write(0xE000, bit);
    }

    assert_eq!(
        emulator.bus_mut().read(0x8000),
        5,
        "Selected bank visible at $8000"
    );
    assert_eq!(
        emulator.bus_mut().read(0xC000),
        15,
        "Last bank stays fixed at $C000"
    );

    // The reset vector bytes live in the fixed bank, so reset still works
    let vector = emulator.bus_mut().read_u16(0xFFFC);
    assert_eq!(vector & 0xFF, 15, "Vector read resolves to the last bank");
}

#[test]
fn test_mmc1_first_instruction_after_reset_is_from_last_bank() {
    let mut rom = TestRom::with_mapper(1, 16, 1);
    tag_prg_banks(&mut rom.prg);

    // Put a recognizable program at the start of the LAST bank, mapped at
    // $C000: LDA #$AB; STA $0200; spin
    let last = 15 * PRG_PAGE;
    rom.prg[last..last + 8].copy_from_slice(&[0xA9, 0xAB, 0x8D, 0x00, 0x02, 0x4C, 0x05, 0xC0]);
    rom.vectors(0xC000, 0xC000, 0xC000);
    let mut emulator = rom.into_emulator();

    // Push the board into 32KB mode (control = 0) so $C000 would float,
    // then reset: mode 3 must come back and re-fix the last bank
    for _ in 0..5 {
        emulator.bus_mut().write(0x8000, 0);
    }
    emulator.reset();
    emulator.run_frame();

    assert_eq!(
        emulator.bus_mut().read(0x0200),
        0xAB,
        "Execution resumed from the fixed last bank after reset"
    );
}

#[test]
fn test_uxrom_bank_switch_through_cpu() {
    let mut rom = TestRom::with_mapper(2, 8, 0);
    tag_prg_banks(&mut rom.prg);
    rom.vectors(0x8000, 0x8000, 0x8000);
    let mut emulator = rom.into_emulator();

    emulator.bus_mut().write(0x8000, 3);

    assert_eq!(emulator.bus_mut().read(0x8000), 3);
    assert_eq!(emulator.bus_mut().read(0xC000), 7, "Fixed last bank");
}

#[test]
fn test_cnrom_chr_bank_switch() {
    let mut rom = TestRom::with_mapper(3, 2, 4);
    for (bank, chunk) in rom.chr.chunks_mut(8 * 1024).enumerate() {
        chunk.fill(bank as u8);
    }
    rom.vectors(0x8000, 0x8000, 0x8000);
    let mut emulator = rom.into_emulator();

    emulator.bus_mut().write(0x8000, 2);

    // Reach the switched CHR bank through PPUADDR/PPUDATA
    emulator.bus_mut().write(0x2006, 0x00);
    emulator.bus_mut().write(0x2006, 0x00);
    let _ = emulator.bus_mut().read(0x2007); // Prime the read buffer
    assert_eq!(emulator.bus_mut().read(0x2007), 2, "CHR bank 2 selected");
}

#[test]
fn test_gxrom_combined_banking() {
    let mut rom = TestRom::with_mapper(66, 4, 2); // Two 32KB PRG banks
    for (bank, chunk) in rom.prg.chunks_mut(32 * 1024).enumerate() {
        chunk.fill(bank as u8);
    }
    rom.vectors(0x8000, 0x8000, 0x8000);
    let mut emulator = rom.into_emulator();

    emulator.bus_mut().write(0x8000, 0x11); // PRG bank 1, CHR bank 1

    assert_eq!(emulator.bus_mut().read(0x8000), 1);
    assert_eq!(emulator.bus_mut().read(0xFFF0), 1, "Whole window switched");
}

#[test]
fn test_mmc3_scanline_irq_fires_once_when_disabled_in_handler() {
    // 32 KiB PRG MMC3 cartridge
    let mut rom = TestRom::with_mapper(4, 2, 1);

    rom.program_at(
        0x8000,
        &[
            0xA9, 0x08, // LDA #$08
            0x8D, 0x00, 0x20, // STA $2000 (sprites at $1000: A12 toggles)
            0xA9, 0x18, // LDA #$18
            0x8D, 0x01, 0x20, // STA $2001 (rendering on)
            0xA9, 0x03, // LDA #$03
            0x8D, 0x00, 0xC0, // STA $C000 (IRQ latch = 3)
            0x8D, 0x01, 0xC0, // STA $C001 (reload)
            0x8D, 0x01, 0xE0, // STA $E001 (enable)
            0x58, // CLI
            0x4C, 0x16, 0x80, // spin: JMP $8016
        ],
    )
    .program_at(
        0x8030,
        &[
            0xEE, 0x10, 0x00, // INC $10
            0x8D, 0x00, 0xE0, // STA $E000 (disable further IRQs)
            0x40, // RTI
        ],
    )
    .vectors(0x8030, 0x8000, 0x8030);
    let mut emulator = rom.into_emulator();

    emulator.run_frame();

    assert_eq!(
        emulator.bus_mut().read(0x10),
        1,
        "The scanline IRQ entered its handler exactly once"
    );
}

#[test]
fn test_mmc3_irq_masked_by_i_flag() {
    // Same setup but without CLI: the IRQ line stays pending and the
    // handler never runs
    let mut rom = TestRom::with_mapper(4, 2, 1);
    rom.program_at(
        0x8000,
        &[
            0xA9, 0x08, 0x8D, 0x00, 0x20, // Sprite table $1000
            0xA9, 0x18, 0x8D, 0x01, 0x20, // Rendering on
            0xA9, 0x03, 0x8D, 0x00, 0xC0, // Latch 3
            0x8D, 0x01, 0xC0, // Reload
            0x8D, 0x01, 0xE0, // Enable
            0x4C, 0x15, 0x80, // spin (no CLI)
        ],
    )
    .program_at(0x8030, &[0xEE, 0x10, 0x00, 0x40])
    .vectors(0x8030, 0x8000, 0x8030);
    let mut emulator = rom.into_emulator();

    emulator.run_frame();

    assert_eq!(
        emulator.bus_mut().read(0x10),
        0,
        "Level-triggered IRQ is held off while I = 1"
    );
}

#[test]
fn test_unsupported_mapper_rejected() {
    let rom = TestRom::with_mapper(7, 2, 1).build();

    let mut emulator = famicore::Emulator::new(famicore::EmulatorConfig::default());
    let result = emulator.load_rom(&rom);

    assert!(matches!(
        result,
        Err(famicore::INesError::UnsupportedMapper(7))
    ));
    assert!(!emulator.rom_loaded());
}
