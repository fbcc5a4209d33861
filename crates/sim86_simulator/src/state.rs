use bitflags::bitflags;
use sim86_instruction::{OperandSize, Register, RegisterName};
use std::fmt::{Display, Formatter};

bitflags! {
    /// The 8086 flags register layout. Only [Flags::ZERO] and [Flags::SIGN] are ever updated.
    #[derive(Default)]
    pub struct Flags : u16 {
        const CARRY = 1 << 0;
        const PARITY = 1 << 2;
        const AUX_CARRY = 1 << 4;
        const ZERO = 1 << 6;
        const SIGN = 1 << 7;
        const TRAP = 1 << 8;
        const INTERRUPT = 1 << 9;
        const DIRECTION = 1 << 10;
        const OVERFLOW = 1 << 11;
    }
}

impl Flags {
    /// Sets the zero and sign flags from a result of the given width.
    pub fn set_from_value(&mut self, value: u16, operand_size: OperandSize) {
        let sign_bit = match operand_size {
            OperandSize::Byte => 0x80,
            OperandSize::Word => 0x8000,
        };

        self.set(Flags::ZERO, value == 0);
        self.set(Flags::SIGN, value & sign_bit != 0);
    }
}

/// Letters of the set flags, e.g. `ZS`. Empty when none are set.
impl Display for Flags {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        macro_rules! print_flag {
            ($flag:ident, $letter:literal) => {{
                if self.contains(Flags::$flag) {
                    f.write_str($letter)?;
                }
            }};
        }

        print_flag!(CARRY, "C");
        print_flag!(PARITY, "P");
        print_flag!(AUX_CARRY, "A");
        print_flag!(ZERO, "Z");
        print_flag!(SIGN, "S");
        print_flag!(OVERFLOW, "O");

        Ok(())
    }
}

/// Registers, flags and instruction pointer of the processor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct State {
    registers: [u16; 8],
    pub ip: u16,
    pub flags: Flags,
}

impl State {
    #[inline]
    pub fn word(&self, name: RegisterName) -> u16 {
        self.registers[name as usize]
    }

    #[inline]
    pub fn set_word(&mut self, name: RegisterName, value: u16) {
        self.registers[name as usize] = value;
    }

    /// Reads a register slice, zero extended to 16 bits.
    pub fn register(&self, register: Register) -> u16 {
        let value = self.word(register.name);
        match (register.operand_size(), register.offset) {
            (OperandSize::Word, _) => value,
            (OperandSize::Byte, 0) => value & 0x00FF,
            (OperandSize::Byte, _) => value >> 8,
        }
    }

    /// Writes a register slice, leaving the other byte of a byte slice untouched.
    pub fn set_register(&mut self, register: Register, value: u16) {
        let current = self.word(register.name);
        let value = match (register.operand_size(), register.offset) {
            (OperandSize::Word, _) => value,
            (OperandSize::Byte, 0) => (current & 0xFF00) | (value & 0x00FF),
            (OperandSize::Byte, _) => (current & 0x00FF) | ((value & 0x00FF) << 8),
        };
        self.set_word(register.name, value);
    }

    /// The first register, in listing order, whose value differs between `self` and `other`,
    /// with the old and new values.
    pub fn changed_register(&self, other: &State) -> Option<(RegisterName, u16, u16)> {
        RegisterName::ALL
            .iter()
            .find(|&&name| self.word(name) != other.word(name))
            .map(|&name| (name, self.word(name), other.word(name)))
    }
}

/// Prints the non-zero registers, the instruction pointer and the set flags, one per line.
pub struct FinalRegisters<'a>(pub &'a State);

impl Display for FinalRegisters<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.0;

        writeln!(f, "Final registers:")?;
        for name in RegisterName::ALL {
            let value = state.word(name);
            if value != 0 {
                writeln!(f, "      {}: 0x{:04x} ({})", name, value, value)?;
            }
        }
        writeln!(f, "      ip: 0x{:04x} ({})", state.ip, state.ip)?;
        if !state.flags.is_empty() {
            writeln!(f, "   flags: {}", state.flags)?;
        }

        Ok(())
    }
}
