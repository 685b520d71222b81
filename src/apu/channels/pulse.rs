//! Pulse wave channel implementation

use crate::apu::components::{Envelope, LengthCounter, Sweep, Timer};
use crate::apu::constants::DUTY_PATTERNS;

/// Pulse (square wave) channel
///
/// Two of these exist at $4000-$4003 and $4004-$4007. Each combines a
/// duty-cycle sequencer, an envelope, a sweep unit, and a length counter.
#[derive(Debug, Clone)]
pub struct PulseChannel {
    /// Channel enable ($4015)
    pub(crate) enabled: bool,
    /// Duty pattern select (0-3)
    duty_mode: u8,
    /// Position within the 8-step duty sequence
    duty_step: u8,
    /// Waveform timer
    pub(crate) timer: Timer,
    /// Volume envelope
    pub(crate) envelope: Envelope,
    /// Pitch sweep unit
    pub(crate) sweep: Sweep,
    /// Note-length counter
    pub(crate) length: LengthCounter,
}

impl PulseChannel {
    /// Create a pulse channel; `channel` is 1 or 2 (sweep negate differs)
    pub fn new(channel: u8) -> Self {
        Self {
            enabled: false,
            duty_mode: 0,
            duty_step: 0,
            timer: Timer::new(),
            envelope: Envelope::new(),
            sweep: Sweep::new(channel),
            length: LengthCounter::new(),
        }
    }

    /// $4000/$4004: duty, length halt, envelope control
    pub fn write_control(&mut self, data: u8) {
        self.duty_mode = (data >> 6) & 0x03;
        self.length.set_halt(data & 0x20 != 0);
        self.envelope.write_control(data);
        self.envelope.restart();
    }

    /// $4001/$4005: sweep control
    pub fn write_sweep(&mut self, data: u8) {
        self.sweep.write_control(data);
    }

    /// $4002/$4006: timer period low byte
    pub fn write_timer_low(&mut self, data: u8) {
        self.timer.set_period_low(data);
    }

    /// $4003/$4007: length load and timer period high bits
    ///
    /// Restarts the envelope and resets the duty sequence.
    pub fn write_timer_high(&mut self, data: u8) {
        self.length.load(data >> 3);
        self.timer.set_period_high(data);
        self.envelope.restart();
        self.duty_step = 0;
    }

    /// Clock the waveform timer (every CPU cycle)
    pub fn step_timer(&mut self) {
        if self.timer.clock() {
            self.duty_step = (self.duty_step + 1) % 8;
        }
    }

    /// Quarter-frame clock: envelope
    pub fn step_envelope(&mut self) {
        self.envelope.clock();
    }

    /// Half-frame clock: sweep
    pub fn step_sweep(&mut self) {
        if let Some(new_period) = self.sweep.clock(self.timer.period) {
            self.timer.set_period_direct(new_period);
        }
    }

    /// Half-frame clock: length counter
    pub fn step_length(&mut self) {
        self.length.clock();
    }

    /// Enable or disable via $4015; disabling silences immediately
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.length.clear();
        }
    }

    /// Current output level (0-15)
    pub fn output(&self) -> u8 {
        if !self.enabled {
            return 0;
        }
        if !self.length.is_active() {
            return 0;
        }
        if DUTY_PATTERNS[self.duty_mode as usize][self.duty_step as usize] == 0 {
            return 0;
        }
        // Out-of-range periods are inaudible on hardware
        if self.timer.period < 8 || self.timer.period > 0x7FF {
            return 0;
        }
        self.envelope.volume()
    }
}
