// Mapper 9 (MMC2) - Latch-based CHR banking
//
// Memory Layout:
// - CPU $8000-$9FFF: 8KB switchable PRG-ROM bank
// - CPU $A000-$FFFF: Three 8KB PRG-ROM banks fixed to the last three banks
// - PPU $0000-$0FFF: 4KB CHR bank, selected by latch 0
// - PPU $1000-$1FFF: 4KB CHR bank, selected by latch 1
//
// Register Interface:
// - $A000-$AFFF: PRG bank select (4 bits)
// - $B000-$BFFF: CHR bank for PPU $0000 when latch 0 = $FD
// - $C000-$CFFF: CHR bank for PPU $0000 when latch 0 = $FE
// - $D000-$DFFF: CHR bank for PPU $1000 when latch 1 = $FD
// - $E000-$EFFF: CHR bank for PPU $1000 when latch 1 = $FE
// - $F000-$FFFF: Mirroring (0 = vertical, 1 = horizontal)
//
// The latches flip when the PPU fetches pattern data for tile $FD or $FE
// in the corresponding half of pattern space; the PPU reports each pattern
// fetch address through `notify_chr_access`. Punch-Out!! uses this to
// switch backgrounds mid-scanline without CPU involvement.

use crate::cartridge::{Cartridge, Mirroring};

use super::Mapper;

/// PRG bank size (8KB)
const PRG_BANK_SIZE: usize = 8 * 1024;

/// CHR bank size (4KB)
const CHR_BANK_SIZE: usize = 4 * 1024;

/// Mapper 9 implementation (MMC2)
pub struct Mapper9 {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    mirroring: Mirroring,

    /// Switchable 8KB PRG bank at $8000
    prg_bank: usize,

    // CHR bank registers, one pair per pattern-table half
    chr_bank_0_fd: u8,
    chr_bank_0_fe: u8,
    chr_bank_1_fd: u8,
    chr_bank_1_fe: u8,

    // Latch state: false selects the $FD bank, true the $FE bank
    latch_0: bool,
    latch_1: bool,

    // Derived current banks, rebuilt on register or latch change
    chr_bank_lo: usize,
    chr_bank_hi: usize,
}

impl Mapper9 {
    /// Create a new Mapper9 instance from a cartridge
    pub fn new(cartridge: Cartridge) -> Self {
        let mut mapper = Mapper9 {
            prg_rom: cartridge.prg_rom,
            chr_rom: cartridge.chr_rom,
            mirroring: cartridge.mirroring,
            prg_bank: 0,
            chr_bank_0_fd: 0,
            chr_bank_0_fe: 0,
            chr_bank_1_fd: 0,
            chr_bank_1_fe: 0,
            latch_0: false,
            latch_1: false,
            chr_bank_lo: 0,
            chr_bank_hi: 0,
        };
        mapper.update_banks();
        mapper
    }

    fn total_prg_banks(&self) -> usize {
        (self.prg_rom.len() / PRG_BANK_SIZE).max(1)
    }

    fn total_chr_banks(&self) -> usize {
        (self.chr_rom.len() / CHR_BANK_SIZE).max(1)
    }

    /// Recompute the active CHR banks from the registers and latch state
    fn update_banks(&mut self) {
        let total = self.total_chr_banks();
        let bank_0 = if self.latch_0 {
            self.chr_bank_0_fe
        } else {
            self.chr_bank_0_fd
        };
        let bank_1 = if self.latch_1 {
            self.chr_bank_1_fe
        } else {
            self.chr_bank_1_fd
        };
        self.chr_bank_lo = bank_0 as usize % total;
        self.chr_bank_hi = bank_1 as usize % total;
    }
}

impl Mapper for Mapper9 {
    fn cpu_read(&self, address: u16) -> u8 {
        let total = self.total_prg_banks();
        let index = match address {
            // Switchable bank
            0x8000..=0x9FFF => self.prg_bank * PRG_BANK_SIZE + (address - 0x8000) as usize,
            // Three fixed tail banks
            0xA000..=0xBFFF => {
                (total.saturating_sub(3)) * PRG_BANK_SIZE + (address - 0xA000) as usize
            }
            0xC000..=0xDFFF => {
                (total.saturating_sub(2)) * PRG_BANK_SIZE + (address - 0xC000) as usize
            }
            0xE000..=0xFFFF => (total - 1) * PRG_BANK_SIZE + (address - 0xE000) as usize,
            _ => return 0,
        };
        self.prg_rom[index % self.prg_rom.len()]
    }

    fn cpu_write(&mut self, address: u16, value: u8) {
        match address & 0xF000 {
            0xA000 => {
                self.prg_bank = (value as usize & 0x0F) % self.total_prg_banks();
            }
            0xB000 => {
                self.chr_bank_0_fd = value & 0x1F;
                self.update_banks();
            }
            0xC000 => {
                self.chr_bank_0_fe = value & 0x1F;
                self.update_banks();
            }
            0xD000 => {
                self.chr_bank_1_fd = value & 0x1F;
                self.update_banks();
            }
            0xE000 => {
                self.chr_bank_1_fe = value & 0x1F;
                self.update_banks();
            }
            0xF000 => {
                self.mirroring = if value & 0x01 != 0 {
                    Mirroring::Horizontal
                } else {
                    Mirroring::Vertical
                };
            }
            _ => {}
        }
    }

    fn ppu_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x0FFF => {
                let index = self.chr_bank_lo * CHR_BANK_SIZE + address as usize;
                self.chr_rom[index % self.chr_rom.len()]
            }
            0x1000..=0x1FFF => {
                let index = self.chr_bank_hi * CHR_BANK_SIZE + (address - 0x1000) as usize;
                self.chr_rom[index % self.chr_rom.len()]
            }
            _ => 0,
        }
    }

    /// MMC2 boards carry CHR-ROM; writes are ignored
    fn ppu_write(&mut self, _address: u16, _value: u8) {}

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Flip the CHR latches on $FD/$FE tile fetches
    ///
    /// Pattern data for tile N in either table lives at N*16..N*16+16, so
    /// the tile index is recovered from bits 4-11 of the fetch address.
    fn notify_chr_access(&mut self, address: u16) {
        let tile = ((address >> 4) & 0xFF) as u8;
        if address < 0x1000 {
            match tile {
                0xFD if self.latch_0 => {
                    self.latch_0 = false;
                    self.update_banks();
                }
                0xFE if !self.latch_0 => {
                    self.latch_0 = true;
                    self.update_banks();
                }
                _ => {}
            }
        } else if address < 0x2000 {
            match tile {
                0xFD if self.latch_1 => {
                    self.latch_1 = false;
                    self.update_banks();
                }
                0xFE if !self.latch_1 => {
                    self.latch_1 = true;
                    self.update_banks();
                }
                _ => {}
            }
        }
    }
}
