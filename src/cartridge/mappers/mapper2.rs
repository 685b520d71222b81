// Mapper 2 (UxROM) - Switchable PRG-ROM with fixed upper bank
//
// Memory Layout:
// - CPU $8000-$BFFF: 16KB switchable PRG-ROM bank
// - CPU $C000-$FFFF: 16KB PRG-ROM bank, fixed to the last bank
// - PPU $0000-$1FFF: 8KB CHR (CHR-RAM on real UxROM boards)
//
// Register Interface:
// Any write to $8000-$FFFF selects the low PRG bank. Only as many low bits
// as the ROM has banks are significant.

use crate::cartridge::{Cartridge, Mirroring, PRG_PAGE_SIZE};

use super::Mapper;

/// Mapper 2 implementation (UxROM)
///
/// Used by Mega Man, Castlevania, Contra, and Duck Tales.
pub struct Mapper2 {
    prg_rom: Vec<u8>,
    chr_mem: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,

    /// Selected 16KB bank at $8000
    prg_bank: usize,
    /// Fixed last bank at $C000, derived once from the ROM size
    last_bank: usize,
}

impl Mapper2 {
    /// Create a new Mapper2 instance from a cartridge
    pub fn new(cartridge: Cartridge) -> Self {
        let total_banks = (cartridge.prg_rom.len() / PRG_PAGE_SIZE).max(1);
        Mapper2 {
            prg_rom: cartridge.prg_rom,
            chr_mem: cartridge.chr_rom,
            chr_is_ram: cartridge.chr_is_ram,
            mirroring: cartridge.mirroring,
            prg_bank: 0,
            last_bank: total_banks - 1,
        }
    }

    fn total_banks(&self) -> usize {
        (self.prg_rom.len() / PRG_PAGE_SIZE).max(1)
    }
}

impl Mapper for Mapper2 {
    fn cpu_read(&self, address: u16) -> u8 {
        match address {
            0x8000..=0xBFFF => {
                let index = self.prg_bank * PRG_PAGE_SIZE + (address - 0x8000) as usize;
                self.prg_rom[index % self.prg_rom.len()]
            }
            0xC000..=0xFFFF => {
                let index = self.last_bank * PRG_PAGE_SIZE + (address - 0xC000) as usize;
                self.prg_rom[index % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    /// Any write in $8000-$FFFF selects the low 16KB bank
    fn cpu_write(&mut self, address: u16, value: u8) {
        if address >= 0x8000 {
            self.prg_bank = (value as usize) % self.total_banks();
        }
    }

    fn ppu_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.chr_mem[address as usize % self.chr_mem.len()],
            _ => 0,
        }
    }

    fn ppu_write(&mut self, address: u16, value: u8) {
        if let 0x0000..=0x1FFF = address {
            if self.chr_is_ram {
                let len = self.chr_mem.len();
                self.chr_mem[address as usize % len] = value;
            }
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
