use crate::bits::BitFieldExt;
use crate::{DecodeError, Result};
use sim86_instruction::OperandSize;

pub trait OpCodeExt {
    /// Operand size from the `w` bit at the given position.
    fn operand_size_at(self, offset: u8) -> OperandSize;
}

impl OpCodeExt for u8 {
    fn operand_size_at(self, offset: u8) -> OperandSize {
        if self.bits(offset, 1) == 0 {
            OperandSize::Byte
        } else {
            OperandSize::Word
        }
    }
}

pub trait ReadExt {
    fn read_u8(&mut self) -> Result<u8>;

    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes([self.read_u8()?, self.read_u8()?]))
    }
}

impl<T: Iterator<Item = u8>> ReadExt for T {
    fn read_u8(&mut self) -> Result<u8> {
        if let Some(byte) = self.next() {
            Ok(byte)
        } else {
            Err(DecodeError::CouldNotReadExtraBytes)
        }
    }
}

/// Counts the bytes pulled through it, which gives the encoded length of an instruction.
pub(crate) struct Counted<I> {
    inner: I,
    pub count: u8,
}

impl<I> Counted<I> {
    pub fn new(inner: I) -> Self {
        Self { inner, count: 0 }
    }
}

impl<I: Iterator<Item = u8>> Iterator for Counted<I> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let byte = self.inner.next()?;
        self.count += 1;
        Some(byte)
    }
}
