// NES Emulation Core Library
//
// A cycle-accurate emulation core for the Nintendo Entertainment System.
// The library models the console's CPU, PPU, APU, cartridge mappers, and
// internal buses; the host shell provides windowing, input polling, and
// audio output on top of the `Emulator` facade.

// Public modules
pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod display;
pub mod emulator;
pub mod input;
pub mod ppu;

// Re-export main types for convenience
pub use apu::Apu;
pub use bus::{Bus, MemoryMappedDevice};
pub use cartridge::{Cartridge, INesError, INesHeader, Mapper, Mirroring};
pub use cpu::Cpu;
pub use display::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use emulator::{AudioConfig, Emulator, EmulatorConfig, SnapshotError, VideoConfig};
pub use input::{Button, Controller, ControllerIO, Player};
pub use ppu::Ppu;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that all components can be instantiated
        let _cpu = Cpu::new();
        let _ppu = Ppu::new();
        let _apu = Apu::new(44100, 60);
        let _bus = Bus::new();
        let _controller = Controller::new();
        let _controller_io = ControllerIO::new();
        let _emulator = Emulator::new(EmulatorConfig::default());
    }
}
