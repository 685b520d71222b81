// Emulator module - Main emulator coordinator
//
// This module provides the facade that owns all NES components and the
// frame scheduler that drives them in lockstep.
//
// # Frame scheduling
//
// One NTSC frame is 262 scanlines of 341 PPU dots (the pre-render line
// loses one dot on odd frames while rendering is enabled). The CPU runs
// at a third of the PPU clock: every dot adds one unit of CPU debt and a
// full instruction executes once three units have accumulated, paying its
// remaining cycles back into the debt so long instructions defer the next
// step. NMI and mapper IRQ are delivered only at instruction boundaries.

mod config;
mod save_state;

pub use config::{AudioConfig, EmulatorConfig, VideoConfig};
pub use save_state::SnapshotError;

use crate::bus::Bus;
use crate::cartridge::{create_mapper, Cartridge, INesError, Mapper, MapperError};
use crate::cpu::Cpu;
use crate::display::SCREEN_SIZE;
use crate::input::{Button, Player};
use save_state::Snapshot;
use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::Rc;

/// PPU dots per scanline
const DOTS_PER_SCANLINE: u16 = 341;

/// Scanlines per NTSC frame
const SCANLINES_PER_FRAME: u16 = 262;

/// PPU dots per CPU cycle
const CPU_DIVIDER: i64 = 3;

/// Main emulator structure
///
/// Owns the CPU, the bus (which owns the PPU, APU, and controllers), and
/// a shared handle to the cartridge mapper.
pub struct Emulator {
    /// CPU (6502 processor)
    cpu: Cpu,

    /// Bus (connects all components)
    bus: Bus,

    /// Cartridge mapper, shared with the bus and PPU
    mapper: Option<Rc<RefCell<Box<dyn Mapper>>>>,

    /// Mapper number of the loaded cartridge
    mapper_number: u16,

    /// Whether the loaded cartridge has battery-backed SRAM
    has_battery: bool,

    /// Configuration
    config: EmulatorConfig,
}

impl Emulator {
    /// Create a new emulator with the given configuration
    pub fn new(config: EmulatorConfig) -> Self {
        let mut bus = Bus::new();
        bus.apu_mut()
            .configure(config.audio.sample_rate, config.video.fps);

        Emulator {
            cpu: Cpu::new(),
            bus,
            mapper: None,
            mapper_number: 0,
            has_battery: false,
            config,
        }
    }

    /// Load an iNES ROM image
    ///
    /// Parses the header, carves the PRG/CHR data into the right mapper,
    /// wires the mapper into the bus and PPU, and resets the machine. On
    /// error the previously loaded cartridge (if any) stays active.
    ///
    /// # Arguments
    /// * `bytes` - The complete ROM image
    ///
    /// # Errors
    /// * `INesError::InvalidHeader` - magic mismatch or impossible sizes
    /// * `INesError::Truncated` - the stream is shorter than declared
    /// * `INesError::UnsupportedMapper` - mapper outside {0,1,2,3,4,9,66}
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), INesError> {
        let cartridge = Cartridge::from_ines_bytes(bytes)?;
        let mapper_number = cartridge.mapper;
        let has_battery = cartridge.has_battery;

        let mapper = create_mapper(cartridge).map_err(|e| match e {
            MapperError::UnsupportedMapper(num) => INesError::UnsupportedMapper(num),
        })?;

        let mapper = Rc::new(RefCell::new(mapper));
        self.bus.attach_mapper(Rc::clone(&mapper));
        self.mapper = Some(mapper);
        self.mapper_number = mapper_number;
        self.has_battery = has_battery;

        log::info!(
            "Loaded ROM: mapper {}, battery: {}",
            mapper_number,
            has_battery
        );

        self.reset();
        Ok(())
    }

    /// Reset all components to power-on state
    ///
    /// The CPU reloads PC from the reset vector at $FFFC; mapper bank
    /// state is whatever the mapper's power-on configuration dictates
    /// (MMC1 re-fixes its last bank on its own reset logic).
    pub fn reset(&mut self) {
        if let Some(mapper) = &self.mapper {
            mapper.borrow_mut().reset();
        }
        self.bus.ppu_mut().reset();
        self.bus.apu_mut().reset();
        self.bus.controllers_mut().reset();
        self.cpu.reset(&mut self.bus);
    }

    /// Advance one full video frame
    ///
    /// Steps the PPU for every dot of the frame, the CPU every third dot,
    /// routes mapper IRQ clocking, and flushes one frame of audio.
    pub fn run_frame(&mut self) {
        if self.mapper.is_none() {
            return;
        }

        let mut cpu_debt: i64 = 0;

        for scanline in 0..SCANLINES_PER_FRAME {
            // Odd frames skip the last dot of the pre-render line when
            // rendering is enabled
            let dots = if scanline == SCANLINES_PER_FRAME - 1
                && self.bus.ppu().is_odd_frame()
                && self.bus.ppu().is_rendering_enabled()
            {
                DOTS_PER_SCANLINE - 1
            } else {
                DOTS_PER_SCANLINE
            };

            for dot in 0..dots {
                self.bus.ppu_mut().step_cycle(scanline, dot);

                // Mapper-side dot bookkeeping (MMC3 A12 edges)
                let ctrl = self.bus.ppu().ppuctrl;
                let rendering = self.bus.ppu().is_rendering_enabled();
                if let Some(mapper) = &self.mapper {
                    mapper.borrow_mut().ppu_cycle(scanline, dot, ctrl, rendering);
                }

                // CPU runs every third PPU dot
                cpu_debt += 1;
                if cpu_debt >= CPU_DIVIDER {
                    cpu_debt -= CPU_DIVIDER;
                    let cycles_used = self.step_cpu();
                    cpu_debt += (cycles_used as i64 - 1) * CPU_DIVIDER;
                }
            }
        }

        if self.config.audio.enabled {
            self.bus.apu_mut().step_frame();
        }

        self.bus.ppu_mut().end_frame();
    }

    /// Execute one CPU step, honoring pending interrupts first
    ///
    /// Interrupt delivery happens only here, at instruction boundaries:
    /// the PPU's NMI edge wins over the cartridge IRQ level, and each
    /// delivery costs the documented 7 cycles. OAM DMA stalls raised by
    /// the executed instruction are charged immediately (plus one cycle
    /// when the counter is odd).
    fn step_cpu(&mut self) -> u32 {
        if self.bus.ppu().nmi_pending() {
            self.bus.ppu_mut().clear_nmi();
            self.cpu.nmi(&mut self.bus);
            return 7;
        }

        if let Some(mapper) = &self.mapper {
            let irq_asserted = mapper.borrow().irq_pending();
            if irq_asserted && !self.cpu.get_interrupt_disable() {
                mapper.borrow_mut().acknowledge_irq();
                self.cpu.irq(&mut self.bus);
                return 7;
            }
        }

        let mut cycles_used = self.cpu.step(&mut self.bus) as u32;

        let stall = self.bus.take_dma_stall();
        if stall > 0 {
            let stall = stall + (self.cpu.cycles & 1) as u32;
            self.cpu.cycles = self.cpu.cycles.wrapping_add(stall as u64);
            cycles_used += stall;
        }

        cycles_used
    }

    /// Copy the latest rendered frame into the caller's buffer
    ///
    /// # Arguments
    /// * `buffer` - At least 256×240 u16 slots, filled with RGB 5-6-5
    pub fn render_into(&self, buffer: &mut [u16]) {
        assert!(
            buffer.len() >= SCREEN_SIZE,
            "Frame buffer needs at least {} pixels",
            SCREEN_SIZE
        );
        self.bus.ppu().frame().copy_into(buffer);
    }

    /// Read one rendered pixel (RGB 5-6-5); the Zapper hook
    pub fn get_pixel(&self, x: usize, y: usize) -> u16 {
        self.bus.ppu().get_pixel(x, y)
    }

    /// Drain up to `buffer.len()` audio samples
    ///
    /// # Returns
    /// The number of unsigned 8-bit samples written
    pub fn audio_into(&mut self, buffer: &mut [u8]) -> usize {
        self.bus.apu_mut().output(buffer)
    }

    /// Update one controller button
    pub fn set_button(&mut self, player: Player, button: Button, pressed: bool) {
        self.bus.controllers_mut().set_button(player, button, pressed);
    }

    // ========================================
    // Snapshots
    // ========================================

    /// Serialize the snapshot record to a writer
    pub fn snapshot_save<W: Write>(&self, writer: W) -> Result<(), SnapshotError> {
        let snapshot = Snapshot {
            a: self.cpu.a,
            x: self.cpu.x,
            y: self.cpu.y,
            sp: self.cpu.sp,
            status: self.cpu.status,
            pc: self.cpu.pc,
            cycles: self.cpu.cycles,
            ram: self.bus.ram_contents().to_vec(),
            extension: Vec::new(),
        };
        snapshot.write_to(writer)
    }

    /// Restore the emulator from a snapshot record
    ///
    /// The stream is parsed completely before any state is touched, so a
    /// corrupt snapshot leaves the core in its prior valid state.
    pub fn snapshot_load<R: Read>(&mut self, reader: R) -> Result<(), SnapshotError> {
        let snapshot = Snapshot::read_from(reader)?;

        self.cpu.a = snapshot.a;
        self.cpu.x = snapshot.x;
        self.cpu.y = snapshot.y;
        self.cpu.sp = snapshot.sp;
        self.cpu.status = snapshot.status;
        self.cpu.pc = snapshot.pc;
        self.cpu.cycles = snapshot.cycles;
        self.bus.restore_ram_contents(&snapshot.ram);

        Ok(())
    }

    // ========================================
    // Battery-backed SRAM
    // ========================================

    /// Persist the battery-backed SRAM region
    ///
    /// Writes the raw 8 KiB dump when the cartridge is battery-backed and
    /// the board carries PRG-RAM; otherwise writes nothing.
    ///
    /// # Returns
    /// The number of bytes written
    pub fn sram_save<W: Write>(&self, mut writer: W) -> Result<usize, std::io::Error> {
        if !self.has_battery {
            return Ok(0);
        }
        match &self.mapper {
            Some(mapper) => match mapper.borrow().prg_ram() {
                Some(ram) => {
                    writer.write_all(ram)?;
                    Ok(ram.len())
                }
                None => Ok(0),
            },
            None => Ok(0),
        }
    }

    /// Restore the battery-backed SRAM region from a raw dump
    ///
    /// # Returns
    /// The number of bytes read
    pub fn sram_load<R: Read>(&mut self, mut reader: R) -> Result<usize, std::io::Error> {
        if !self.has_battery {
            return Ok(0);
        }
        match &self.mapper {
            Some(mapper) => {
                let mut mapper = mapper.borrow_mut();
                match mapper.prg_ram_mut() {
                    Some(ram) => {
                        let mut total = 0;
                        while total < ram.len() {
                            let read = reader.read(&mut ram[total..])?;
                            if read == 0 {
                                break;
                            }
                            total += read;
                        }
                        Ok(total)
                    }
                    None => Ok(0),
                }
            }
            None => Ok(0),
        }
    }

    // ========================================
    // Component access
    // ========================================

    /// Borrow the CPU
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutably borrow the CPU
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// Borrow the bus
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Mutably borrow the bus
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Mapper number of the loaded cartridge
    pub fn mapper_number(&self) -> u16 {
        self.mapper_number
    }

    /// Whether a cartridge is currently loaded
    pub fn rom_loaded(&self) -> bool {
        self.mapper.is_some()
    }

    /// Number of frames emulated since power-on
    pub fn frame_count(&self) -> u64 {
        self.bus.ppu().frame_count()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(EmulatorConfig::default())
    }
}
