use crate::{Register, RegisterName};
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandSize {
    Byte,
    Word,
}

impl OperandSize {
    #[inline]
    pub fn in_bytes(self) -> u8 {
        match self {
            OperandSize::Byte => 1,
            OperandSize::Word => 2,
        }
    }
}

impl Display for OperandSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OperandSize::Byte => f.write_str("byte"),
            OperandSize::Word => f.write_str("word"),
        }
    }
}

/// How a memory operand forms its address. `Direct` uses the displacement as an absolute
/// address and is distinct from `Bp`, even though both share the r/m encoding `0b110`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressExpression {
    BxSi,
    BxDi,
    BpSi,
    BpDi,
    Si,
    Di,
    Bp,
    Bx,
    Direct,
}

impl AddressExpression {
    /// The base and index registers that are summed to form the effective address.
    pub fn registers(self) -> &'static [RegisterName] {
        use AddressExpression::*;

        match self {
            BxSi => &[RegisterName::B, RegisterName::Si],
            BxDi => &[RegisterName::B, RegisterName::Di],
            BpSi => &[RegisterName::Bp, RegisterName::Si],
            BpDi => &[RegisterName::Bp, RegisterName::Di],
            Si => &[RegisterName::Si],
            Di => &[RegisterName::Di],
            Bp => &[RegisterName::Bp],
            Bx => &[RegisterName::B],
            Direct => &[],
        }
    }
}

impl Display for AddressExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use AddressExpression::*;

        match self {
            BxSi => write!(f, "bx+si"),
            BxDi => write!(f, "bx+di"),
            BpSi => write!(f, "bp+si"),
            BpDi => write!(f, "bp+di"),
            Si => write!(f, "si"),
            Di => write!(f, "di"),
            Bp => write!(f, "bp"),
            Bx => write!(f, "bx"),
            Direct => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Memory {
    pub expression: AddressExpression,
    /// Signed displacement, or the absolute address when the expression is
    /// [AddressExpression::Direct].
    pub displacement: i32,
    /// Displacement bytes were encoded, even if they hold 0 (e.g. `[bp]`).
    pub has_displacement: bool,
}

impl Memory {
    /// A displacement of 0 is taken as not encoded, use [Memory::displaced] to say otherwise.
    pub fn new(expression: AddressExpression, displacement: i32) -> Self {
        Self {
            expression,
            displacement,
            has_displacement: displacement != 0,
        }
    }

    /// Memory addressed with displacement bytes that were present in the encoding.
    pub fn displaced(expression: AddressExpression, displacement: i32) -> Self {
        Self {
            expression,
            displacement,
            has_displacement: true,
        }
    }

    pub fn direct(address: u16) -> Self {
        Self {
            expression: AddressExpression::Direct,
            displacement: address as i32,
            has_displacement: false,
        }
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        self.expression == AddressExpression::Direct
    }
}

impl Display for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_direct() {
            return write!(f, "[{}]", self.displacement);
        }

        write!(f, "[{}", self.expression)?;
        if self.displacement != 0 {
            write!(f, "{:+}", self.displacement)?;
        }
        write!(f, "]")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Register(Register),
    Memory(Memory),
    /// Stored wide; semantically 8 or 16 bits depending on the instruction.
    Immediate(i32),
    /// A jump displacement that already includes the +2 the assembler subtracts from `$`-relative
    /// targets, so printing it back re-assembles to the same bytes.
    RelativeJump(i32),
}

impl Operand {
    #[inline]
    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::Memory(_))
    }

    #[inline]
    pub fn is_immediate(&self) -> bool {
        matches!(self, Operand::Immediate(_))
    }
}

impl From<Register> for Operand {
    fn from(register: Register) -> Self {
        Operand::Register(register)
    }
}

impl From<Memory> for Operand {
    fn from(memory: Memory) -> Self {
        Operand::Memory(memory)
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Register(register) => register.fmt(f),
            Operand::Memory(memory) => memory.fmt(f),
            Operand::Immediate(value) => write!(f, "{}", value),
            Operand::RelativeJump(value) => {
                if *value > 0 {
                    write!(f, "$+{}", value)
                } else {
                    write!(f, "${}", value)
                }
            }
        }
    }
}
