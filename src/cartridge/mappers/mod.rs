// Mappers module - Implementations of the supported NES cartridge mappers
//
// This module contains the mapper trait, the mapper factory, and the
// individual mapper implementations. Each mapper handles PRG/CHR banking
// and, for the boards that have it, IRQ generation.

mod mapper0;
mod mapper1;
mod mapper2;
mod mapper3;
mod mapper4;
mod mapper66;
mod mapper9;

use super::{Cartridge, Mirroring};
pub use mapper0::Mapper0;
pub use mapper1::Mapper1;
pub use mapper2::Mapper2;
pub use mapper3::Mapper3;
pub use mapper4::Mapper4;
pub use mapper66::Mapper66;
pub use mapper9::Mapper9;

/// Interface between the cartridge hardware and the rest of the console
///
/// The bus routes CPU accesses in `$6000-$FFFF` here; the PPU routes
/// pattern-table accesses in `$0000-$1FFF` here. The PPU additionally
/// reports pattern fetch addresses (`notify_chr_access`) for boards with
/// address-sensitive latches, and the scheduler reports PPU dots
/// (`ppu_cycle`) for boards that clock an IRQ counter off the PPU address
/// bus.
pub trait Mapper {
    /// Read from CPU address space (`$8000-$FFFF` banked PRG)
    fn cpu_read(&self, address: u16) -> u8;

    /// Write to CPU address space (typically a mapper register, not memory)
    fn cpu_write(&mut self, address: u16, value: u8);

    /// Read from PPU address space (`$0000-$1FFF` banked CHR)
    fn ppu_read(&self, address: u16) -> u8;

    /// Write to PPU address space (CHR-RAM boards accept these)
    fn ppu_write(&mut self, address: u16, value: u8);

    /// Current nametable mirroring arrangement
    fn mirroring(&self) -> Mirroring;

    /// The PPU fetched a pattern byte at `address`
    ///
    /// Used by MMC2 to flip its CHR latches on the $FD/$FE tile rows.
    fn notify_chr_access(&mut self, _address: u16) {}

    /// One PPU dot elapsed at (`scanline`, `cycle`)
    ///
    /// Used by MMC3 to model A12 rising edges. `ctrl` is the PPUCTRL value
    /// for the current scanline and `rendering` is whether background or
    /// sprite rendering is enabled.
    fn ppu_cycle(&mut self, _scanline: u16, _cycle: u16, _ctrl: u8, _rendering: bool) {}

    /// Return the board's registers to their power-on state
    ///
    /// Called on console reset. Boards whose power-on configuration the
    /// reset vector depends on (MMC1's mode 3) must restore it here.
    fn reset(&mut self) {}

    /// Whether the cartridge is asserting its IRQ line
    fn irq_pending(&self) -> bool {
        false
    }

    /// Drop the IRQ line after the CPU has taken the interrupt
    fn acknowledge_irq(&mut self) {}

    /// Battery-backed PRG-RAM, if the board carries any
    fn prg_ram(&self) -> Option<&[u8]> {
        None
    }

    /// Mutable battery-backed PRG-RAM, if the board carries any
    fn prg_ram_mut(&mut self) -> Option<&mut [u8]> {
        None
    }
}

/// Error type for mapper creation
#[derive(Debug)]
pub enum MapperError {
    /// The requested mapper number is not supported
    UnsupportedMapper(u16),
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapperError::UnsupportedMapper(num) => {
                write!(f, "Mapper {} is not supported", num)
            }
        }
    }
}

impl std::error::Error for MapperError {}

/// Create a mapper instance based on the mapper number in the cartridge
///
/// This factory function creates the appropriate mapper implementation for
/// the given cartridge. The mapper number is determined from the iNES
/// header.
///
/// # Arguments
/// * `cartridge` - The cartridge to create a mapper for
///
/// # Returns
/// A boxed trait object implementing the Mapper trait
///
/// # Errors
/// Returns `MapperError::UnsupportedMapper` if the mapper number is not
/// one of {0, 1, 2, 3, 4, 9, 66}.
pub fn create_mapper(cartridge: Cartridge) -> Result<Box<dyn Mapper>, MapperError> {
    match cartridge.mapper {
        0 => Ok(Box::new(Mapper0::new(cartridge))),
        1 => Ok(Box::new(Mapper1::new(cartridge))),
        2 => Ok(Box::new(Mapper2::new(cartridge))),
        3 => Ok(Box::new(Mapper3::new(cartridge))),
        4 => Ok(Box::new(Mapper4::new(cartridge))),
        9 => Ok(Box::new(Mapper9::new(cartridge))),
        66 => Ok(Box::new(Mapper66::new(cartridge))),
        mapper_num => Err(MapperError::UnsupportedMapper(mapper_num)),
    }
}
