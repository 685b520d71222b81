// PPU memory access methods

use super::constants::NAMETABLE_SIZE;
use super::Ppu;
use crate::cartridge::Mirroring;

impl Ppu {
    /// Current mirroring arrangement
    ///
    /// Queried live from the mapper so boards that rewrite their mirroring
    /// register mid-frame (MMC1, MMC3, MMC2) take effect immediately.
    pub(super) fn current_mirroring(&self) -> Mirroring {
        match &self.mapper {
            Some(mapper) => mapper.borrow().mirroring(),
            None => self.mirroring,
        }
    }

    /// Mirror nametable address based on the mirroring mode
    ///
    /// The PPU has 2KB of internal VRAM for nametables, but the address
    /// space allows for 4 tables ($2000-$2FFF). This maps a nametable
    /// address onto the two physical pages.
    ///
    /// # Arguments
    ///
    /// * `addr` - Nametable address ($2000-$2FFF)
    ///
    /// # Returns
    ///
    /// Physical VRAM offset (0-2047)
    pub(super) fn mirror_nametable_addr(&self, addr: u16) -> usize {
        // Normalize to 0-0xFFF (strip the $2000 base)
        let addr = (addr & 0x0FFF) as usize;

        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let mirrored_table = match self.current_mirroring() {
            Mirroring::Horizontal => {
                // Horizontal: {0,0,1,1} - $2000=$2400, $2800=$2C00
                match table {
                    0 | 1 => 0,
                    _ => 1,
                }
            }
            Mirroring::Vertical => {
                // Vertical: {0,1,0,1} - $2000=$2800, $2400=$2C00
                match table {
                    0 | 2 => 0,
                    _ => 1,
                }
            }
            Mirroring::SingleScreen => 0,
        };

        mirrored_table * NAMETABLE_SIZE + offset
    }

    /// Mirror palette address
    ///
    /// Palette RAM has special mirroring: $3F10, $3F14, $3F18, $3F1C are
    /// mirrors of $3F00, $3F04, $3F08, $3F0C, because entry 0 of each
    /// sprite palette is really the universal background color.
    ///
    /// # Arguments
    ///
    /// * `addr` - Palette address ($3F00-$3FFF)
    ///
    /// # Returns
    ///
    /// Physical palette RAM offset (0-31)
    pub(super) fn mirror_palette_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x001F) as usize;

        if addr >= 16 && addr % 4 == 0 {
            addr - 16
        } else {
            addr
        }
    }

    /// Read from PPU memory (VRAM)
    ///
    /// Pattern tables resolve through the cartridge mapper; nametables and
    /// palette RAM are internal.
    ///
    /// # Arguments
    ///
    /// * `addr` - PPU memory address ($0000-$3FFF)
    pub(super) fn read_ppu_memory(&self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;

        match addr {
            // Pattern tables: CHR-ROM/RAM via the mapper
            0x0000..=0x1FFF => match &self.mapper {
                Some(mapper) => mapper.borrow().ppu_read(addr),
                None => 0,
            },

            // Nametables: $2000-$2FFF
            0x2000..=0x2FFF => {
                let mirrored_addr = self.mirror_nametable_addr(addr);
                self.nametables[mirrored_addr]
            }

            // Nametable mirrors: $3000-$3EFF -> $2000-$2EFF
            0x3000..=0x3EFF => {
                let mirrored_addr = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[mirrored_addr]
            }

            // Palette RAM: $3F00-$3FFF
            0x3F00..=0x3FFF => {
                let mirrored_addr = self.mirror_palette_addr(addr);
                self.palette_ram[mirrored_addr]
            }

            _ => unreachable!(),
        }
    }

    /// Write to PPU memory (VRAM)
    ///
    /// # Arguments
    ///
    /// * `addr` - PPU memory address ($0000-$3FFF)
    /// * `data` - Byte value to write
    pub(super) fn write_ppu_memory(&mut self, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;

        match addr {
            // Pattern tables: CHR-RAM boards accept these
            0x0000..=0x1FFF => {
                if let Some(mapper) = &self.mapper {
                    mapper.borrow_mut().ppu_write(addr, data);
                }
            }

            0x2000..=0x2FFF => {
                let mirrored_addr = self.mirror_nametable_addr(addr);
                self.nametables[mirrored_addr] = data;
            }

            0x3000..=0x3EFF => {
                let mirrored_addr = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[mirrored_addr] = data;
            }

            0x3F00..=0x3FFF => {
                let mirrored_addr = self.mirror_palette_addr(addr);
                self.palette_ram[mirrored_addr] = data;
            }

            _ => unreachable!(),
        }
    }

    /// Fetch a CHR pattern byte and report the access to the mapper
    ///
    /// MMC2 flips its CHR latches when particular tile rows are fetched,
    /// so every rendering-path pattern read goes through here.
    pub(super) fn fetch_pattern_byte(&self, addr: u16) -> u8 {
        match &self.mapper {
            Some(mapper) => {
                let value = mapper.borrow().ppu_read(addr);
                mapper.borrow_mut().notify_chr_access(addr);
                value
            }
            None => 0,
        }
    }
}
