// Stack operation instructions for 6502 CPU
// These instructions handle pushing and pulling values to/from the stack.

use crate::bus::Bus;
use crate::cpu::flags;
use crate::cpu::Cpu;

impl Cpu {
    /// PHA - Push Accumulator
    pub fn pha(&mut self, bus: &mut Bus) {
        self.stack_push(bus, self.a);
    }

    /// PLA - Pull Accumulator
    ///
    /// Flags affected: Z, N
    pub fn pla(&mut self, bus: &mut Bus) {
        self.a = self.stack_pop(bus);
        self.update_zero_and_negative_flags(self.a);
    }

    /// PHP - Push Processor Status
    ///
    /// The pushed copy always has the B and UNUSED bits set; the B flag
    /// only exists on the stack.
    pub fn php(&mut self, bus: &mut Bus) {
        let status = self.status | flags::BREAK | flags::UNUSED;
        self.stack_push(bus, status);
    }

    /// PLP - Pull Processor Status
    ///
    /// The B bit is discarded and the UNUSED bit forced to 1.
    pub fn plp(&mut self, bus: &mut Bus) {
        let status = self.stack_pop(bus);
        self.status = (status | flags::UNUSED) & !flags::BREAK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pha_pla_roundtrip() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        let sp_before = cpu.sp;

        cpu.a = 0x42;
        cpu.pha(&mut bus);
        cpu.a = 0x00;
        cpu.pla(&mut bus);

        assert_eq!(cpu.a, 0x42, "Accumulator round-trips through the stack");
        assert_eq!(cpu.sp, sp_before, "SP restored after push/pull pair");
    }

    #[test]
    fn test_pla_sets_flags() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();

        cpu.a = 0x00;
        cpu.pha(&mut bus);
        cpu.a = 0x55;
        cpu.pla(&mut bus);

        assert!(cpu.get_zero(), "PLA of 0x00 sets Z");

        cpu.a = 0x80;
        cpu.pha(&mut bus);
        cpu.pla(&mut bus);
        assert!(cpu.get_negative(), "PLA of 0x80 sets N");
    }

    #[test]
    fn test_php_sets_b_flag_on_stack() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        let sp_before = cpu.sp;

        cpu.php(&mut bus);

        let pushed = bus.read(0x0100 | (sp_before as u16));
        assert_eq!(
            pushed & flags::BREAK,
            flags::BREAK,
            "PHP pushes with B set"
        );
        assert_eq!(
            pushed & flags::UNUSED,
            flags::UNUSED,
            "PHP pushes with UNUSED set"
        );
        assert!(!cpu.get_break(), "The live B flag is unchanged");
    }

    #[test]
    fn test_plp_ignores_b_and_forces_unused() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();

        // Push a status with B set and UNUSED clear
        cpu.stack_push(&mut bus, flags::BREAK | flags::CARRY);
        cpu.plp(&mut bus);

        assert!(cpu.get_carry(), "Carry restored");
        assert!(!cpu.get_break(), "B bit discarded on pull");
        assert!(cpu.get_flag(flags::UNUSED), "UNUSED forced to 1");
    }
}
