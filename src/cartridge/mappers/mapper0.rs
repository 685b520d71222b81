// Mapper 0 (NROM) - The simplest NES mapper with no bank switching
//
// Memory Layout:
// - CPU $8000-$BFFF: First 16KB of PRG-ROM
// - CPU $C000-$FFFF: Last 16KB of PRG-ROM (or mirror of first 16KB if only 16KB total)
// - PPU $0000-$1FFF: 8KB CHR-ROM or CHR-RAM
//
// Variants:
// - NROM-128: 16KB PRG-ROM (mirrored to fill 32KB space)
// - NROM-256: 32KB PRG-ROM (no mirroring)
//
// CHR Configuration:
// - CHR-ROM: 8KB read-only pattern memory
// - CHR-RAM: 8KB writable pattern memory (CHR page count 0 in the header)

use crate::cartridge::{Cartridge, Mirroring};

use super::Mapper;

/// Mapper 0 implementation (NROM)
///
/// Used by games like Super Mario Bros., Donkey Kong, and Balloon Fight.
/// It has no bank switching capability.
pub struct Mapper0 {
    /// PRG-ROM data (16KB or 32KB)
    prg_rom: Vec<u8>,
    /// CHR-ROM or CHR-RAM data (8KB)
    chr_mem: Vec<u8>,
    /// Whether CHR memory is RAM (writable) or ROM (read-only)
    chr_is_ram: bool,
    /// Mirroring type (fixed, cannot be changed by the mapper)
    mirroring: Mirroring,
}

impl Mapper0 {
    /// Create a new Mapper0 instance from a cartridge
    ///
    /// # Arguments
    /// * `cartridge` - The cartridge containing ROM data
    pub fn new(cartridge: Cartridge) -> Self {
        Mapper0 {
            prg_rom: cartridge.prg_rom,
            chr_mem: cartridge.chr_rom,
            chr_is_ram: cartridge.chr_is_ram,
            mirroring: cartridge.mirroring,
        }
    }
}

impl Mapper for Mapper0 {
    /// Read from CPU address space
    ///
    /// For NROM:
    /// - $8000-$BFFF: First 16KB of PRG-ROM
    /// - $C000-$FFFF: Last 16KB of PRG-ROM (or mirror of first 16KB for 16KB ROMs)
    fn cpu_read(&self, address: u16) -> u8 {
        match address {
            0x8000..=0xFFFF => {
                let index = (address - 0x8000) as usize;

                // Use modulo to handle mirroring for 16KB ROMs.
                // For 32KB ROMs, modulo has no effect since index < prg_rom.len()
                self.prg_rom[index % self.prg_rom.len()]
            }
            _ => {
                // Unmapped address, open bus
                0
            }
        }
    }

    /// Write to CPU address space
    ///
    /// NROM has no writable registers, so all writes are ignored
    fn cpu_write(&mut self, _address: u16, _value: u8) {
        // NROM has no bank switching or other mapper registers
    }

    /// Read from PPU address space
    ///
    /// For NROM:
    /// - $0000-$1FFF: 8KB CHR-ROM or CHR-RAM, direct
    fn ppu_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => {
                let index = address as usize;
                self.chr_mem[index % self.chr_mem.len()]
            }
            _ => 0,
        }
    }

    /// Write to PPU address space
    ///
    /// For NROM:
    /// - CHR-RAM: writes are allowed
    /// - CHR-ROM: writes are ignored
    fn ppu_write(&mut self, address: u16, value: u8) {
        if let 0x0000..=0x1FFF = address {
            if self.chr_is_ram {
                let len = self.chr_mem.len();
                self.chr_mem[address as usize % len] = value;
            }
            // For CHR-ROM, writes are silently ignored
        }
    }

    /// Get the mirroring mode
    ///
    /// For NROM, mirroring is fixed and determined by the cartridge header
    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_cartridge(prg_size: usize, chr_is_ram: bool) -> Cartridge {
        let mut prg_rom = vec![0u8; prg_size];
        // Tag the first byte of each 16KB bank
        for (bank, chunk) in prg_rom.chunks_mut(16 * 1024).enumerate() {
            chunk[0] = bank as u8 + 1;
        }
        Cartridge {
            prg_rom,
            chr_rom: vec![0u8; 8 * 1024],
            chr_is_ram,
            mapper: 0,
            mirroring: Mirroring::Vertical,
            has_battery: false,
        }
    }

    #[test]
    fn test_16kb_prg_mirroring() {
        let mapper = Mapper0::new(create_test_cartridge(16 * 1024, false));

        // $8000 and $C000 should read the same byte for a 16KB ROM
        assert_eq!(mapper.cpu_read(0x8000), 1);
        assert_eq!(mapper.cpu_read(0xC000), 1, "16KB ROM mirrors at $C000");
    }

    #[test]
    fn test_32kb_prg_direct() {
        let mapper = Mapper0::new(create_test_cartridge(32 * 1024, false));

        assert_eq!(mapper.cpu_read(0x8000), 1, "First bank at $8000");
        assert_eq!(mapper.cpu_read(0xC000), 2, "Second bank at $C000");
    }

    #[test]
    fn test_prg_writes_ignored() {
        let mut mapper = Mapper0::new(create_test_cartridge(16 * 1024, false));
        mapper.cpu_write(0x8000, 0xFF);
        assert_eq!(mapper.cpu_read(0x8000), 1, "PRG-ROM is read-only");
    }

    #[test]
    fn test_chr_rom_write_ignored() {
        let mut mapper = Mapper0::new(create_test_cartridge(16 * 1024, false));
        mapper.ppu_write(0x0000, 0x55);
        assert_eq!(mapper.ppu_read(0x0000), 0, "CHR-ROM is read-only");
    }

    #[test]
    fn test_chr_ram_write() {
        let mut mapper = Mapper0::new(create_test_cartridge(16 * 1024, true));
        mapper.ppu_write(0x0000, 0x55);
        assert_eq!(mapper.ppu_read(0x0000), 0x55, "CHR-RAM accepts writes");
    }

    #[test]
    fn test_mirroring_from_header() {
        let mapper = Mapper0::new(create_test_cartridge(16 * 1024, false));
        assert_eq!(mapper.mirroring(), Mirroring::Vertical);
    }
}
