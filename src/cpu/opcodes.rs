// Opcode table for the 6502 CPU
//
// One entry per opcode byte: mnemonic, addressing mode, instruction length,
// base cycle count, and whether an index crossing a page boundary costs an
// extra cycle. The table covers the full 256-byte space, including the
// undocumented fusion opcodes (SLO, RLA, SRE, RRA, SAX, LAX, DCP, ISC, and
// friends) and the KIL/JAM bytes, which this core executes as two-cycle
// no-ops.
//
// Branch instructions carry their extra taken/page-cross cycles in the
// branch implementation itself, so their `page_cycle` flag is false here.

use super::addressing::AddressingMode;

/// Static description of one opcode
pub struct OpcodeInfo {
    /// Three-letter mnemonic (undocumented opcodes use their common names)
    pub mnemonic: &'static str,
    /// Addressing mode used to fetch the operand
    pub mode: AddressingMode,
    /// Total instruction length in bytes, including the opcode
    pub bytes: u8,
    /// Base cycle count
    pub cycles: u8,
    /// Whether a page crossing during address calculation adds one cycle
    pub page_cycle: bool,
}

const fn op(
    mnemonic: &'static str,
    mode: AddressingMode,
    bytes: u8,
    cycles: u8,
    page_cycle: bool,
) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        bytes,
        cycles,
        page_cycle,
    }
}

use AddressingMode::*;

/// The 256-entry opcode decode table
pub static OPCODE_TABLE: [OpcodeInfo; 256] = [
    // 0x00-0x0F
    op("BRK", Implied, 1, 7, false),
    op("ORA", IndexedIndirect, 2, 6, false),
    op("KIL", Implied, 1, 2, false),
    op("SLO", IndexedIndirect, 2, 8, false),
    op("NOP", ZeroPage, 2, 3, false),
    op("ORA", ZeroPage, 2, 3, false),
    op("ASL", ZeroPage, 2, 5, false),
    op("SLO", ZeroPage, 2, 5, false),
    op("PHP", Implied, 1, 3, false),
    op("ORA", Immediate, 2, 2, false),
    op("ASL", Accumulator, 1, 2, false),
    op("ANC", Immediate, 2, 2, false),
    op("NOP", Absolute, 3, 4, false),
    op("ORA", Absolute, 3, 4, false),
    op("ASL", Absolute, 3, 6, false),
    op("SLO", Absolute, 3, 6, false),
    // 0x10-0x1F
    op("BPL", Relative, 2, 2, false),
    op("ORA", IndirectIndexed, 2, 5, true),
    op("KIL", Implied, 1, 2, false),
    op("SLO", IndirectIndexed, 2, 8, false),
    op("NOP", ZeroPageX, 2, 4, false),
    op("ORA", ZeroPageX, 2, 4, false),
    op("ASL", ZeroPageX, 2, 6, false),
    op("SLO", ZeroPageX, 2, 6, false),
    op("CLC", Implied, 1, 2, false),
    op("ORA", AbsoluteY, 3, 4, true),
    op("NOP", Implied, 1, 2, false),
    op("SLO", AbsoluteY, 3, 7, false),
    op("NOP", AbsoluteX, 3, 4, true),
    op("ORA", AbsoluteX, 3, 4, true),
    op("ASL", AbsoluteX, 3, 7, false),
    op("SLO", AbsoluteX, 3, 7, false),
    // 0x20-0x2F
    op("JSR", Absolute, 3, 6, false),
    op("AND", IndexedIndirect, 2, 6, false),
    op("KIL", Implied, 1, 2, false),
    op("RLA", IndexedIndirect, 2, 8, false),
    op("BIT", ZeroPage, 2, 3, false),
    op("AND", ZeroPage, 2, 3, false),
    op("ROL", ZeroPage, 2, 5, false),
    op("RLA", ZeroPage, 2, 5, false),
    op("PLP", Implied, 1, 4, false),
    op("AND", Immediate, 2, 2, false),
    op("ROL", Accumulator, 1, 2, false),
    op("ANC", Immediate, 2, 2, false),
    op("BIT", Absolute, 3, 4, false),
    op("AND", Absolute, 3, 4, false),
    op("ROL", Absolute, 3, 6, false),
    op("RLA", Absolute, 3, 6, false),
    // 0x30-0x3F
    op("BMI", Relative, 2, 2, false),
    op("AND", IndirectIndexed, 2, 5, true),
    op("KIL", Implied, 1, 2, false),
    op("RLA", IndirectIndexed, 2, 8, false),
    op("NOP", ZeroPageX, 2, 4, false),
    op("AND", ZeroPageX, 2, 4, false),
    op("ROL", ZeroPageX, 2, 6, false),
    op("RLA", ZeroPageX, 2, 6, false),
    op("SEC", Implied, 1, 2, false),
    op("AND", AbsoluteY, 3, 4, true),
    op("NOP", Implied, 1, 2, false),
    op("RLA", AbsoluteY, 3, 7, false),
    op("NOP", AbsoluteX, 3, 4, true),
    op("AND", AbsoluteX, 3, 4, true),
    op("ROL", AbsoluteX, 3, 7, false),
    op("RLA", AbsoluteX, 3, 7, false),
    // 0x40-0x4F
    op("RTI", Implied, 1, 6, false),
    op("EOR", IndexedIndirect, 2, 6, false),
    op("KIL", Implied, 1, 2, false),
    op("SRE", IndexedIndirect, 2, 8, false),
    op("NOP", ZeroPage, 2, 3, false),
    op("EOR", ZeroPage, 2, 3, false),
    op("LSR", ZeroPage, 2, 5, false),
    op("SRE", ZeroPage, 2, 5, false),
    op("PHA", Implied, 1, 3, false),
    op("EOR", Immediate, 2, 2, false),
    op("LSR", Accumulator, 1, 2, false),
    op("ALR", Immediate, 2, 2, false),
    op("JMP", Absolute, 3, 3, false),
    op("EOR", Absolute, 3, 4, false),
    op("LSR", Absolute, 3, 6, false),
    op("SRE", Absolute, 3, 6, false),
    // 0x50-0x5F
    op("BVC", Relative, 2, 2, false),
    op("EOR", IndirectIndexed, 2, 5, true),
    op("KIL", Implied, 1, 2, false),
    op("SRE", IndirectIndexed, 2, 8, false),
    op("NOP", ZeroPageX, 2, 4, false),
    op("EOR", ZeroPageX, 2, 4, false),
    op("LSR", ZeroPageX, 2, 6, false),
    op("SRE", ZeroPageX, 2, 6, false),
    op("CLI", Implied, 1, 2, false),
    op("EOR", AbsoluteY, 3, 4, true),
    op("NOP", Implied, 1, 2, false),
    op("SRE", AbsoluteY, 3, 7, false),
    op("NOP", AbsoluteX, 3, 4, true),
    op("EOR", AbsoluteX, 3, 4, true),
    op("LSR", AbsoluteX, 3, 7, false),
    op("SRE", AbsoluteX, 3, 7, false),
    // 0x60-0x6F
    op("RTS", Implied, 1, 6, false),
    op("ADC", IndexedIndirect, 2, 6, false),
    op("KIL", Implied, 1, 2, false),
    op("RRA", IndexedIndirect, 2, 8, false),
    op("NOP", ZeroPage, 2, 3, false),
    op("ADC", ZeroPage, 2, 3, false),
    op("ROR", ZeroPage, 2, 5, false),
    op("RRA", ZeroPage, 2, 5, false),
    op("PLA", Implied, 1, 4, false),
    op("ADC", Immediate, 2, 2, false),
    op("ROR", Accumulator, 1, 2, false),
    op("ARR", Immediate, 2, 2, false),
    op("JMP", Indirect, 3, 5, false),
    op("ADC", Absolute, 3, 4, false),
    op("ROR", Absolute, 3, 6, false),
    op("RRA", Absolute, 3, 6, false),
    // 0x70-0x7F
    op("BVS", Relative, 2, 2, false),
    op("ADC", IndirectIndexed, 2, 5, true),
    op("KIL", Implied, 1, 2, false),
    op("RRA", IndirectIndexed, 2, 8, false),
    op("NOP", ZeroPageX, 2, 4, false),
    op("ADC", ZeroPageX, 2, 4, false),
    op("ROR", ZeroPageX, 2, 6, false),
    op("RRA", ZeroPageX, 2, 6, false),
    op("SEI", Implied, 1, 2, false),
    op("ADC", AbsoluteY, 3, 4, true),
    op("NOP", Implied, 1, 2, false),
    op("RRA", AbsoluteY, 3, 7, false),
    op("NOP", AbsoluteX, 3, 4, true),
    op("ADC", AbsoluteX, 3, 4, true),
    op("ROR", AbsoluteX, 3, 7, false),
    op("RRA", AbsoluteX, 3, 7, false),
    // 0x80-0x8F
    op("NOP", Immediate, 2, 2, false),
    op("STA", IndexedIndirect, 2, 6, false),
    op("NOP", Immediate, 2, 2, false),
    op("SAX", IndexedIndirect, 2, 6, false),
    op("STY", ZeroPage, 2, 3, false),
    op("STA", ZeroPage, 2, 3, false),
    op("STX", ZeroPage, 2, 3, false),
    op("SAX", ZeroPage, 2, 3, false),
    op("DEY", Implied, 1, 2, false),
    op("NOP", Immediate, 2, 2, false),
    op("TXA", Implied, 1, 2, false),
    op("XAA", Immediate, 2, 2, false),
    op("STY", Absolute, 3, 4, false),
    op("STA", Absolute, 3, 4, false),
    op("STX", Absolute, 3, 4, false),
    op("SAX", Absolute, 3, 4, false),
    // 0x90-0x9F
    op("BCC", Relative, 2, 2, false),
    op("STA", IndirectIndexed, 2, 6, false),
    op("KIL", Implied, 1, 2, false),
    op("SHA", IndirectIndexed, 2, 6, false),
    op("STY", ZeroPageX, 2, 4, false),
    op("STA", ZeroPageX, 2, 4, false),
    op("STX", ZeroPageY, 2, 4, false),
    op("SAX", ZeroPageY, 2, 4, false),
    op("TYA", Implied, 1, 2, false),
    op("STA", AbsoluteY, 3, 5, false),
    op("TXS", Implied, 1, 2, false),
    op("TAS", AbsoluteY, 3, 5, false),
    op("SHY", AbsoluteX, 3, 5, false),
    op("STA", AbsoluteX, 3, 5, false),
    op("SHX", AbsoluteY, 3, 5, false),
    op("SHA", AbsoluteY, 3, 5, false),
    // 0xA0-0xAF
    op("LDY", Immediate, 2, 2, false),
    op("LDA", IndexedIndirect, 2, 6, false),
    op("LDX", Immediate, 2, 2, false),
    op("LAX", IndexedIndirect, 2, 6, false),
    op("LDY", ZeroPage, 2, 3, false),
    op("LDA", ZeroPage, 2, 3, false),
    op("LDX", ZeroPage, 2, 3, false),
    op("LAX", ZeroPage, 2, 3, false),
    op("TAY", Implied, 1, 2, false),
    op("LDA", Immediate, 2, 2, false),
    op("TAX", Implied, 1, 2, false),
    op("LAX", Immediate, 2, 2, false),
    op("LDY", Absolute, 3, 4, false),
    op("LDA", Absolute, 3, 4, false),
    op("LDX", Absolute, 3, 4, false),
    op("LAX", Absolute, 3, 4, false),
    // 0xB0-0xBF
    op("BCS", Relative, 2, 2, false),
    op("LDA", IndirectIndexed, 2, 5, true),
    op("KIL", Implied, 1, 2, false),
    op("LAX", IndirectIndexed, 2, 5, true),
    op("LDY", ZeroPageX, 2, 4, false),
    op("LDA", ZeroPageX, 2, 4, false),
    op("LDX", ZeroPageY, 2, 4, false),
    op("LAX", ZeroPageY, 2, 4, false),
    op("CLV", Implied, 1, 2, false),
    op("LDA", AbsoluteY, 3, 4, true),
    op("TSX", Implied, 1, 2, false),
    op("LAS", AbsoluteY, 3, 4, true),
    op("LDY", AbsoluteX, 3, 4, true),
    op("LDA", AbsoluteX, 3, 4, true),
    op("LDX", AbsoluteY, 3, 4, true),
    op("LAX", AbsoluteY, 3, 4, true),
    // 0xC0-0xCF
    op("CPY", Immediate, 2, 2, false),
    op("CMP", IndexedIndirect, 2, 6, false),
    op("NOP", Immediate, 2, 2, false),
    op("DCP", IndexedIndirect, 2, 8, false),
    op("CPY", ZeroPage, 2, 3, false),
    op("CMP", ZeroPage, 2, 3, false),
    op("DEC", ZeroPage, 2, 5, false),
    op("DCP", ZeroPage, 2, 5, false),
    op("INY", Implied, 1, 2, false),
    op("CMP", Immediate, 2, 2, false),
    op("DEX", Implied, 1, 2, false),
    op("AXS", Immediate, 2, 2, false),
    op("CPY", Absolute, 3, 4, false),
    op("CMP", Absolute, 3, 4, false),
    op("DEC", Absolute, 3, 6, false),
    op("DCP", Absolute, 3, 6, false),
    // 0xD0-0xDF
    op("BNE", Relative, 2, 2, false),
    op("CMP", IndirectIndexed, 2, 5, true),
    op("KIL", Implied, 1, 2, false),
    op("DCP", IndirectIndexed, 2, 8, false),
    op("NOP", ZeroPageX, 2, 4, false),
    op("CMP", ZeroPageX, 2, 4, false),
    op("DEC", ZeroPageX, 2, 6, false),
    op("DCP", ZeroPageX, 2, 6, false),
    op("CLD", Implied, 1, 2, false),
    op("CMP", AbsoluteY, 3, 4, true),
    op("NOP", Implied, 1, 2, false),
    op("DCP", AbsoluteY, 3, 7, false),
    op("NOP", AbsoluteX, 3, 4, true),
    op("CMP", AbsoluteX, 3, 4, true),
    op("DEC", AbsoluteX, 3, 7, false),
    op("DCP", AbsoluteX, 3, 7, false),
    // 0xE0-0xEF
    op("CPX", Immediate, 2, 2, false),
    op("SBC", IndexedIndirect, 2, 6, false),
    op("NOP", Immediate, 2, 2, false),
    op("ISC", IndexedIndirect, 2, 8, false),
    op("CPX", ZeroPage, 2, 3, false),
    op("SBC", ZeroPage, 2, 3, false),
    op("INC", ZeroPage, 2, 5, false),
    op("ISC", ZeroPage, 2, 5, false),
    op("INX", Implied, 1, 2, false),
    op("SBC", Immediate, 2, 2, false),
    op("NOP", Implied, 1, 2, false),
    op("SBC", Immediate, 2, 2, false),
    op("CPX", Absolute, 3, 4, false),
    op("SBC", Absolute, 3, 4, false),
    op("INC", Absolute, 3, 6, false),
    op("ISC", Absolute, 3, 6, false),
    // 0xF0-0xFF
    op("BEQ", Relative, 2, 2, false),
    op("SBC", IndirectIndexed, 2, 5, true),
    op("KIL", Implied, 1, 2, false),
    op("ISC", IndirectIndexed, 2, 8, false),
    op("NOP", ZeroPageX, 2, 4, false),
    op("SBC", ZeroPageX, 2, 4, false),
    op("INC", ZeroPageX, 2, 6, false),
    op("ISC", ZeroPageX, 2, 6, false),
    op("SED", Implied, 1, 2, false),
    op("SBC", AbsoluteY, 3, 4, true),
    op("NOP", Implied, 1, 2, false),
    op("ISC", AbsoluteY, 3, 7, false),
    op("NOP", AbsoluteX, 3, 4, true),
    op("SBC", AbsoluteX, 3, 4, true),
    op("INC", AbsoluteX, 3, 7, false),
    op("ISC", AbsoluteX, 3, 7, false),
];
