// Mapper 4 (MMC3) - Fine-grained banking with a scanline IRQ counter
//
// Memory Layout:
// - CPU $6000-$7FFF: 8KB PRG-RAM (battery-backed in some games)
// - CPU $8000-$9FFF: 8KB PRG-ROM bank (switchable or fixed depending on mode)
// - CPU $A000-$BFFF: 8KB PRG-ROM bank (always switchable)
// - CPU $C000-$DFFF: 8KB PRG-ROM bank (switchable or fixed depending on mode)
// - CPU $E000-$FFFF: 8KB PRG-ROM bank (fixed to last bank)
// - PPU $0000-$1FFF: 2KB and 1KB CHR banks, layout controlled by bit 7
//
// Register Interface:
// - $8000 (even): Bank select
//   Bit 7: CHR A12 inversion (2KB banks at $0000 or at $1000)
//   Bit 6: PRG layout (R6 at $8000 or at $C000)
//   Bits 0-2: Which of R0-R7 the next $8001 write updates
// - $8001 (odd): Bank data for the selected register
//   R0, R1: 2KB CHR banks; R2-R5: 1KB CHR banks; R6, R7: 8KB PRG banks
// - $A000 (even): Mirroring (0 = vertical, 1 = horizontal)
// - $A001 (odd): PRG-RAM protect
// - $C000 (even): IRQ latch value
// - $C001 (odd): IRQ reload request
// - $E000 (even): IRQ disable, clears any pending line
// - $E001 (odd): IRQ enable
//
// The IRQ counter is clocked by rising edges of PPU address line A12,
// filtered for stability. When the counter reaches zero with the IRQ
// enabled, the cartridge asserts its IRQ line.

use crate::cartridge::{Cartridge, Mirroring};

use super::Mapper;

/// PRG bank size (8KB)
const PRG_BANK_SIZE: usize = 8 * 1024;

/// CHR bank size (1KB)
const CHR_BANK_SIZE: usize = 1024;

/// PRG-RAM size (8KB)
const PRG_RAM_SIZE: usize = 8 * 1024;

/// Mapper 4 implementation (MMC3)
///
/// Used by Super Mario Bros. 2 and 3, Kirby's Adventure, and many late
/// library titles that rely on the scanline IRQ for status bars.
pub struct Mapper4 {
    prg_rom: Vec<u8>,
    chr_mem: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: [u8; PRG_RAM_SIZE],

    /// Bank select register ($8000)
    bank_select: u8,
    /// Bank data registers R0-R7
    bank_data: [u8; 8],
    /// Mirroring register ($A000 bit 0)
    mirroring: Mirroring,
    /// PRG-RAM protect register ($A001)
    prg_ram_protect: u8,

    // Derived bank tables, rebuilt by update_banks()
    /// Four 8KB PRG banks covering $8000/$A000/$C000/$E000
    prg_banks: [usize; 4],
    /// Eight 1KB CHR banks covering PPU $0000-$1FFF
    chr_banks: [usize; 8],

    // IRQ unit
    irq_latch: u8,
    irq_counter: u8,
    irq_reload: bool,
    irq_enabled: bool,
    irq_pending: bool,

    // A12 edge filter state
    last_a12: bool,
    a12_filter: u8,
}

impl Mapper4 {
    /// Create a new Mapper4 instance from a cartridge
    pub fn new(cartridge: Cartridge) -> Self {
        let mut mapper = Mapper4 {
            prg_rom: cartridge.prg_rom,
            chr_mem: cartridge.chr_rom,
            chr_is_ram: cartridge.chr_is_ram,
            prg_ram: [0; PRG_RAM_SIZE],
            bank_select: 0,
            // Power-on values give an identity-ish CHR layout
            bank_data: [0, 2, 4, 5, 6, 7, 0, 1],
            mirroring: cartridge.mirroring,
            prg_ram_protect: 0,
            prg_banks: [0; 4],
            chr_banks: [0; 8],
            irq_latch: 0,
            irq_counter: 0,
            irq_reload: false,
            irq_enabled: false,
            irq_pending: false,
            last_a12: false,
            a12_filter: 0,
        };
        mapper.update_banks();
        mapper
    }

    fn total_prg_banks(&self) -> usize {
        (self.prg_rom.len() / PRG_BANK_SIZE).max(1)
    }

    fn total_chr_banks(&self) -> usize {
        (self.chr_mem.len() / CHR_BANK_SIZE).max(1)
    }

    /// Rebuild the derived PRG/CHR bank tables from the registers
    ///
    /// The last PRG bank is always fixed at $E000 and the second-to-last
    /// occupies whichever of $8000/$C000 is not switchable in the current
    /// layout, so the reset and interrupt vectors stay reachable.
    fn update_banks(&mut self) {
        let total_prg = self.total_prg_banks();
        let total_chr = self.total_chr_banks();

        let r6 = self.bank_data[6] as usize % total_prg;
        let r7 = self.bank_data[7] as usize % total_prg;
        let second_last = (total_prg.max(2) - 2) % total_prg;
        let last = total_prg - 1;

        if self.bank_select & 0x40 != 0 {
            // PRG layout 1: R6 at $C000, second-to-last at $8000
            self.prg_banks = [second_last, r7, r6, last];
        } else {
            // PRG layout 0: R6 at $8000, second-to-last at $C000
            self.prg_banks = [r6, r7, second_last, last];
        }

        // R0/R1 are 2KB banks (low bit forced even); R2-R5 are 1KB banks
        let r0 = (self.bank_data[0] as usize & !1) % total_chr;
        let r1 = (self.bank_data[1] as usize & !1) % total_chr;
        let fine: [usize; 4] = [
            self.bank_data[2] as usize % total_chr,
            self.bank_data[3] as usize % total_chr,
            self.bank_data[4] as usize % total_chr,
            self.bank_data[5] as usize % total_chr,
        ];

        if self.bank_select & 0x80 != 0 {
            // CHR inversion: 1KB banks at $0000, 2KB banks at $1000
            self.chr_banks = [
                fine[0],
                fine[1],
                fine[2],
                fine[3],
                r0,
                (r0 + 1) % total_chr,
                r1,
                (r1 + 1) % total_chr,
            ];
        } else {
            // Normal: 2KB banks at $0000, 1KB banks at $1000
            self.chr_banks = [
                r0,
                (r0 + 1) % total_chr,
                r1,
                (r1 + 1) % total_chr,
                fine[0],
                fine[1],
                fine[2],
                fine[3],
            ];
        }
    }

    /// Clock the IRQ counter once (one filtered A12 rising edge)
    ///
    /// A pending reload loads the latch without decrementing; a zero latch
    /// with the IRQ enabled fires immediately on reload.
    pub fn clock_irq(&mut self) {
        if self.irq_reload {
            self.irq_counter = self.irq_latch;
            self.irq_reload = false;

            if self.irq_counter == 0 && self.irq_enabled {
                self.irq_pending = true;
            }
            return;
        }

        if self.irq_counter > 0 {
            self.irq_counter -= 1;
            if self.irq_counter == 0 && self.irq_enabled {
                self.irq_pending = true;
            }
        } else {
            // Counter already at zero: reload from the latch
            self.irq_counter = self.irq_latch;
        }
    }

    /// Feed one A12 level sample through the stability filter
    ///
    /// The MMC3 ignores rapid toggling of A12; a level change must hold
    /// for two samples before an edge is recognized.
    fn a12_transition(&mut self, a12_high: bool) {
        if a12_high != self.last_a12 {
            self.a12_filter += 1;
            if self.a12_filter >= 2 {
                if a12_high && !self.last_a12 {
                    // Rising edge: clock the IRQ counter
                    self.clock_irq();
                }
                self.last_a12 = a12_high;
                self.a12_filter = 0;
            }
        } else {
            self.a12_filter = 0;
        }
    }
}

impl Mapper for Mapper4 {
    fn cpu_read(&self, address: u16) -> u8 {
        match address {
            0x6000..=0x7FFF => self.prg_ram[(address - 0x6000) as usize],
            0x8000..=0xFFFF => {
                let slot = ((address - 0x8000) / 0x2000) as usize;
                let offset = ((address - 0x8000) % 0x2000) as usize;
                let index = self.prg_banks[slot] * PRG_BANK_SIZE + offset;
                self.prg_rom[index % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, address: u16, value: u8) {
        match address {
            0x6000..=0x7FFF => {
                // $A001 bit 6 write-protects the RAM
                if self.prg_ram_protect & 0x40 == 0 {
                    self.prg_ram[(address - 0x6000) as usize] = value;
                }
            }
            0x8000..=0xFFFF => match address & 0xE001 {
                0x8000 => {
                    self.bank_select = value;
                    self.update_banks();
                }
                0x8001 => {
                    let register = (self.bank_select & 0x07) as usize;
                    self.bank_data[register] = value;
                    self.update_banks();
                }
                0xA000 => {
                    self.mirroring = if value & 0x01 != 0 {
                        Mirroring::Horizontal
                    } else {
                        Mirroring::Vertical
                    };
                }
                0xA001 => {
                    self.prg_ram_protect = value;
                }
                0xC000 => {
                    self.irq_latch = value;
                }
                0xC001 => {
                    self.irq_reload = true;
                }
                0xE000 => {
                    self.irq_enabled = false;
                    self.irq_pending = false;
                }
                0xE001 => {
                    self.irq_enabled = true;
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn ppu_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => {
                let slot = (address / 0x400) as usize;
                let offset = (address % 0x400) as usize;
                let index = self.chr_banks[slot] * CHR_BANK_SIZE + offset;
                self.chr_mem[index % self.chr_mem.len()]
            }
            _ => 0,
        }
    }

    fn ppu_write(&mut self, address: u16, value: u8) {
        if !self.chr_is_ram {
            return;
        }
        if let 0x0000..=0x1FFF = address {
            let slot = (address / 0x400) as usize;
            let offset = (address % 0x400) as usize;
            let len = self.chr_mem.len();
            let index = self.chr_banks[slot] * CHR_BANK_SIZE + offset;
            self.chr_mem[index % len] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Console reset: power-on bank layout, IRQ unit quiesced
    fn reset(&mut self) {
        self.bank_select = 0;
        self.bank_data = [0, 2, 4, 5, 6, 7, 0, 1];
        self.irq_latch = 0;
        self.irq_counter = 0;
        self.irq_reload = false;
        self.irq_enabled = false;
        self.irq_pending = false;
        self.last_a12 = false;
        self.a12_filter = 0;
        self.update_banks();
    }

    /// Model one PPU dot's worth of A12 activity
    ///
    /// Background pattern fetches occur on dots 5 and 7 of each 8-dot tile
    /// fetch during cycles 1-256 and 321-336; A12 follows the background
    /// pattern-table select (PPUCTRL bit 4). Sprite fetches occupy cycles
    /// 257-320 and follow the sprite pattern-table select (bit 3).
    fn ppu_cycle(&mut self, scanline: u16, cycle: u16, ctrl: u8, rendering: bool) {
        if !rendering {
            return;
        }
        // Only visible scanlines and the pre-render line clock the counter
        if (240..261).contains(&scanline) {
            return;
        }

        let a12_high = match cycle {
            1..=256 | 321..=336 => {
                let fetch_phase = cycle % 8;
                (fetch_phase == 5 || fetch_phase == 7) && ctrl & 0x10 != 0
            }
            257..=320 => ctrl & 0x08 != 0,
            _ => false,
        };

        self.a12_transition(a12_high);
    }

    fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    fn acknowledge_irq(&mut self) {
        self.irq_pending = false;
    }

    fn prg_ram(&self) -> Option<&[u8]> {
        Some(&self.prg_ram)
    }

    fn prg_ram_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.prg_ram)
    }
}
