//! Shared helpers for integration tests
//!
//! Assembles iNES images in memory so the scenario tests run without any
//! ROM files on disk.

use famicore::{Emulator, EmulatorConfig};

/// iNES header size
pub const HEADER_SIZE: usize = 16;

/// PRG page size (16 KiB)
pub const PRG_PAGE: usize = 16 * 1024;

/// CHR page size (8 KiB)
pub const CHR_PAGE: usize = 8 * 1024;

/// Description of a test cartridge
pub struct TestRom {
    pub mapper: u8,
    pub prg: Vec<u8>,
    pub chr: Vec<u8>,
    pub vertical_mirroring: bool,
    pub battery: bool,
}

impl TestRom {
    /// An NROM cartridge with one PRG page and one CHR page
    pub fn nrom() -> Self {
        TestRom {
            mapper: 0,
            prg: vec![0u8; PRG_PAGE],
            chr: vec![0u8; CHR_PAGE],
            vertical_mirroring: false,
            battery: false,
        }
    }

    /// A cartridge for `mapper` with the given PRG/CHR sizes in pages
    pub fn with_mapper(mapper: u8, prg_pages: usize, chr_pages: usize) -> Self {
        TestRom {
            mapper,
            prg: vec![0u8; prg_pages * PRG_PAGE],
            chr: vec![0u8; chr_pages.max(1) * CHR_PAGE],
            vertical_mirroring: false,
            battery: false,
        }
    }

    /// Copy a program into PRG at the offset corresponding to `cpu_addr`
    /// in the bank mapped at $8000 (offset 0 of the PRG image)
    pub fn program_at(&mut self, cpu_addr: u16, bytes: &[u8]) -> &mut Self {
        let offset = (cpu_addr - 0x8000) as usize;
        self.prg[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Set the NMI, RESET, and IRQ vectors in the last PRG bytes
    ///
    /// The fixed-bank invariant of every supported mapper guarantees the
    /// CPU sees these at $FFFA-$FFFF.
    pub fn vectors(&mut self, nmi: u16, reset: u16, irq: u16) -> &mut Self {
        let len = self.prg.len();
        self.prg[len - 6] = (nmi & 0xFF) as u8;
        self.prg[len - 5] = (nmi >> 8) as u8;
        self.prg[len - 4] = (reset & 0xFF) as u8;
        self.prg[len - 3] = (reset >> 8) as u8;
        self.prg[len - 2] = (irq & 0xFF) as u8;
        self.prg[len - 1] = (irq >> 8) as u8;
        self
    }

    /// Serialize to an iNES image
    pub fn build(&self) -> Vec<u8> {
        let mut rom = vec![0u8; HEADER_SIZE];
        rom[0..4].copy_from_slice(b"NES\x1A");
        rom[4] = (self.prg.len() / PRG_PAGE) as u8;
        rom[5] = (self.chr.len() / CHR_PAGE) as u8;
        rom[6] = ((self.mapper & 0x0F) << 4)
            | u8::from(self.vertical_mirroring)
            | (u8::from(self.battery) << 1);
        rom[7] = self.mapper & 0xF0;
        rom.extend_from_slice(&self.prg);
        rom.extend_from_slice(&self.chr);
        rom
    }

    /// Build the image and load it into a fresh emulator
    pub fn into_emulator(&self) -> Emulator {
        let mut emulator = Emulator::new(EmulatorConfig::default());
        emulator
            .load_rom(&self.build())
            .expect("test ROM image must parse");
        emulator
    }
}
