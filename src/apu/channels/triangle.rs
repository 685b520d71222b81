//! Triangle wave channel implementation

use crate::apu::components::{LengthCounter, LinearCounter, Timer};
use crate::apu::constants::TRIANGLE_SEQUENCE;

/// Triangle channel
///
/// Registers $4008-$400B. Steps a fixed 32-entry triangle sequence; the
/// linear counter provides fine-grained duration control on top of the
/// length counter. The timer is clocked twice per CPU cycle, putting the
/// triangle one octave below a pulse at the same period.
#[derive(Debug, Clone)]
pub struct TriangleChannel {
    /// Channel enable ($4015)
    pub(crate) enabled: bool,
    /// Position within the 32-step triangle sequence
    sequence_step: u8,
    /// Waveform timer
    pub(crate) timer: Timer,
    /// Note-length counter
    pub(crate) length: LengthCounter,
    /// Linear counter
    pub(crate) linear: LinearCounter,
}

impl TriangleChannel {
    pub fn new() -> Self {
        Self {
            enabled: false,
            sequence_step: 0,
            timer: Timer::new(),
            length: LengthCounter::new(),
            linear: LinearCounter::new(),
        }
    }

    /// $4008: linear counter control / length halt
    pub fn write_control(&mut self, data: u8) {
        self.length.set_halt(data & 0x80 != 0);
        self.linear.write_control(data);
    }

    /// $400A: timer period low byte
    pub fn write_timer_low(&mut self, data: u8) {
        self.timer.set_period_low(data);
    }

    /// $400B: length load, timer period high bits, linear reload
    pub fn write_timer_high(&mut self, data: u8) {
        self.length.load(data >> 3);
        self.timer.set_period_high(data);
        self.timer.reload();
        self.linear.set_reload_flag();
    }

    /// Clock the waveform timer
    ///
    /// The sequencer only advances while both counters are non-zero, so a
    /// silenced triangle holds its last output level instead of popping.
    pub fn step_timer(&mut self) {
        if self.timer.clock() && self.length.is_active() && self.linear.is_active() {
            self.sequence_step = (self.sequence_step + 1) % 32;
        }
    }

    /// Quarter-frame clock: linear counter
    pub fn step_linear(&mut self) {
        self.linear.clock();
    }

    /// Half-frame clock: length counter
    pub fn step_length(&mut self) {
        self.length.clock();
    }

    /// Enable or disable via $4015
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
        if !self.linear.is_active() {
            return 0;
        }
        TRIANGLE_SEQUENCE[self.sequence_step as usize]
    }
}

impl Default for TriangleChannel {
    fn default() -> Self {
        Self::new()
    }
}
