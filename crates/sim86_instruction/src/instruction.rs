use crate::{Operand, OperandSize, Operation};
use std::fmt::{Display, Formatter};

/// First line of every listing; tells the assembler to emit 16-bit code.
pub const LISTING_HEADER: &str = "bits 16";

/// The first operand is the one printed first, which is the destination when there are two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandSet {
    None,
    Destination(Operand),
    DestinationAndSource(Operand, Operand),
}

impl OperandSet {
    pub fn destination(&self) -> Option<&Operand> {
        match self {
            OperandSet::None => None,
            OperandSet::Destination(destination)
            | OperandSet::DestinationAndSource(destination, _) => Some(destination),
        }
    }

    pub fn source(&self) -> Option<&Operand> {
        match self {
            OperandSet::DestinationAndSource(_, source) => Some(source),
            _ => None,
        }
    }

    /// A size qualifier is needed only when neither operand pins the width, which happens when a
    /// memory operand is paired with an immediate.
    fn needs_size_qualifier(&self) -> bool {
        match self {
            OperandSet::DestinationAndSource(destination, source) => {
                (destination.is_memory() && source.is_immediate())
                    || (destination.is_immediate() && source.is_memory())
            }
            _ => false,
        }
    }
}

/// Representation of a decoded instruction.
///
/// ```rust
/// use sim86_instruction::*;
///
/// // mov ax, 5
/// let i = Instruction::new(
///     Operation::MOV,
///     OperandSize::Word,
///     OperandSet::DestinationAndSource(
///         Operand::Register(Register::word(RegisterName::A)),
///         Operand::Immediate(5),
///     ),
/// )
/// .with_size(3);
///
/// assert_eq!(i.to_string(), "mov ax, 5");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub operation: Operation,
    pub operand_size: OperandSize,
    /// Total encoded length in bytes.
    pub size: u8,
    pub operands: OperandSet,
}

impl Instruction {
    pub fn new(operation: Operation, operand_size: OperandSize, operands: OperandSet) -> Self {
        Self {
            operation,
            operand_size,
            size: 0,
            operands,
        }
    }

    pub fn with_size(mut self, size: u8) -> Self {
        self.size = size;
        self
    }

    #[inline]
    pub fn is_wide(&self) -> bool {
        self.operand_size == OperandSize::Word
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let qualifier = if self.operands.needs_size_qualifier() {
            Some(self.operand_size)
        } else {
            None
        };

        fn write_operand(
            f: &mut Formatter<'_>,
            operand: &Operand,
            qualifier: Option<OperandSize>,
        ) -> std::fmt::Result {
            match (operand, qualifier) {
                (Operand::Immediate(_), Some(size)) => write!(f, "{} {}", size, operand),
                _ => write!(f, "{}", operand),
            }
        }

        write!(f, "{}", self.operation)?;

        match &self.operands {
            OperandSet::None => Ok(()),
            OperandSet::Destination(destination) => {
                write!(f, " ")?;
                write_operand(f, destination, qualifier)
            }
            OperandSet::DestinationAndSource(destination, source) => {
                write!(f, " ")?;
                write_operand(f, destination, qualifier)?;
                write!(f, ", ")?;
                write_operand(f, source, qualifier)
            }
        }
    }
}
