use crate::OperandSize;

/// One of the 8 general purpose 16-bit registers. The discriminant is the index into a register
/// file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RegisterName {
    A = 0,
    C = 1,
    D = 2,
    B = 3,
    Sp = 4,
    Bp = 5,
    Si = 6,
    Di = 7,
}

impl RegisterName {
    /// In the order a listing of register values is usually printed.
    pub const ALL: [RegisterName; 8] = [
        RegisterName::A,
        RegisterName::B,
        RegisterName::C,
        RegisterName::D,
        RegisterName::Sp,
        RegisterName::Bp,
        RegisterName::Si,
        RegisterName::Di,
    ];

    /// Only the a/b/c/d registers can be addressed by their low and high bytes.
    #[inline]
    pub fn has_byte_halves(self) -> bool {
        matches!(
            self,
            RegisterName::A | RegisterName::B | RegisterName::C | RegisterName::D
        )
    }
}

/// Prints the full 16-bit name of the register.
impl std::fmt::Display for RegisterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RegisterName::*;

        f.write_str(match self {
            A => "ax",
            C => "cx",
            D => "dx",
            B => "bx",
            Sp => "sp",
            Bp => "bp",
            Si => "si",
            Di => "di",
        })
    }
}

/// A slice of a register: the whole 16 bits, or the low (offset 0) or high (offset 1) byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Register {
    pub name: RegisterName,
    pub offset: u8,
    pub width: u8,
}

impl Register {
    pub fn new(name: RegisterName, offset: u8, width: u8) -> Self {
        debug_assert!(width == 1 || width == 2);
        debug_assert!(offset == 0 || (offset == 1 && width == 1 && name.has_byte_halves()));

        Self {
            name,
            offset,
            width,
        }
    }

    #[inline]
    pub fn word(name: RegisterName) -> Self {
        Self::new(name, 0, 2)
    }

    #[inline]
    pub fn low(name: RegisterName) -> Self {
        Self::new(name, 0, 1)
    }

    #[inline]
    pub fn high(name: RegisterName) -> Self {
        Self::new(name, 1, 1)
    }

    pub fn operand_size(&self) -> OperandSize {
        if self.width == 2 {
            OperandSize::Word
        } else {
            OperandSize::Byte
        }
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RegisterName::*;

        let prefix = match self.name {
            A => 'a',
            B => 'b',
            C => 'c',
            D => 'd',
            Sp | Bp | Si | Di => return self.name.fmt(f),
        };

        let suffix = if self.offset == 1 {
            'h'
        } else if self.width == 2 {
            'x'
        } else {
            'l'
        };

        write!(f, "{}{}", prefix, suffix)
    }
}
