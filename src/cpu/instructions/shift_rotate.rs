// Shift and rotate instructions for 6502 CPU
//
// Each of these instructions has an accumulator form and memory forms.
// The `is_accumulator` argument selects which one is operated on.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    /// ASL - Arithmetic Shift Left
    ///
    /// Shifts all bits left one position; bit 7 goes into the carry and
    /// bit 0 is filled with zero.
    ///
    /// Flags affected: C, Z, N
    pub fn asl(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) {
        let value = if is_accumulator {
            self.a
        } else {
            bus.read(addr_result.address)
        };

        self.set_carry(value & 0x80 != 0);
        let result = value << 1;

        if is_accumulator {
            self.a = result;
        } else {
            bus.write(addr_result.address, result);
        }
        self.update_zero_and_negative_flags(result);
    }

    /// LSR - Logical Shift Right
    ///
    /// Shifts all bits right one position; bit 0 goes into the carry and
    /// bit 7 is filled with zero.
    ///
    /// Flags affected: C, Z, N (N always ends up clear)
    pub fn lsr(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) {
        let value = if is_accumulator {
            self.a
        } else {
            bus.read(addr_result.address)
        };

        self.set_carry(value & 0x01 != 0);
        let result = value >> 1;

        if is_accumulator {
            self.a = result;
        } else {
            bus.write(addr_result.address, result);
        }
        self.update_zero_and_negative_flags(result);
    }

    /// ROL - Rotate Left through carry
    ///
    /// Flags affected: C, Z, N
    pub fn rol(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) {
        let value = if is_accumulator {
            self.a
        } else {
            bus.read(addr_result.address)
        };

        let carry_in = if self.get_carry() { 1 } else { 0 };
        self.set_carry(value & 0x80 != 0);
        let result = (value << 1) | carry_in;

        if is_accumulator {
            self.a = result;
        } else {
            bus.write(addr_result.address, result);
        }
        self.update_zero_and_negative_flags(result);
    }

    /// ROR - Rotate Right through carry
    ///
    /// Flags affected: C, Z, N
    pub fn ror(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) {
        let value = if is_accumulator {
            self.a
        } else {
            bus.read(addr_result.address)
        };

        let carry_in = if self.get_carry() { 0x80 } else { 0 };
        self.set_carry(value & 0x01 != 0);
        let result = (value >> 1) | carry_in;

        if is_accumulator {
            self.a = result;
        } else {
            bus.write(addr_result.address, result);
        }
        self.update_zero_and_negative_flags(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asl_accumulator() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.a = 0b1000_0001;

        cpu.asl(&mut bus, &AddressingResult::new(0), true);

        assert_eq!(cpu.a, 0b0000_0010);
        assert!(cpu.get_carry(), "Bit 7 shifted into carry");
    }

    #[test]
    fn test_asl_memory() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        bus.write(0x0010, 0x40);

        cpu.asl(&mut bus, &AddressingResult::new(0x0010), false);

        assert_eq!(bus.read(0x0010), 0x80);
        assert!(!cpu.get_carry());
        assert!(cpu.get_negative());
    }

    #[test]
    fn test_lsr() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.a = 0b0000_0011;

        cpu.lsr(&mut bus, &AddressingResult::new(0), true);

        assert_eq!(cpu.a, 0b0000_0001);
        assert!(cpu.get_carry(), "Bit 0 shifted into carry");
        assert!(!cpu.get_negative(), "LSR always clears N");
    }

    #[test]
    fn test_rol_through_carry() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.a = 0b1000_0000;
        cpu.set_carry(true);

        cpu.rol(&mut bus, &AddressingResult::new(0), true);

        assert_eq!(cpu.a, 0b0000_0001, "Carry rotated into bit 0");
        assert!(cpu.get_carry(), "Bit 7 rotated into carry");
    }

    #[test]
    fn test_ror_through_carry() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.a = 0b0000_0001;
        cpu.set_carry(true);

        cpu.ror(&mut bus, &AddressingResult::new(0), true);

        assert_eq!(cpu.a, 0b1000_0000, "Carry rotated into bit 7");
        assert!(cpu.get_carry(), "Bit 0 rotated into carry");
        assert!(cpu.get_negative());
    }
}
