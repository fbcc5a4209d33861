//! Decodes 8086 machine code for the mov/add/sub/cmp/conditional jump subset into
//! [sim86_instruction::Instruction]s.

mod bits;
mod classify;
mod decode;
mod errors;
mod mod_reg_rm;
mod traits;

#[cfg(test)]
mod test;

pub use bits::{sign_extend, BitFieldExt};
pub use classify::{classify, resolve_extra_op_code, Encoding, OpCodePattern, Resolution};
pub use decode::decode_instruction;
pub use errors::{DecodeError, Result};
pub use mod_reg_rm::{register_operand, ModRegRM};
pub use traits::{OpCodeExt, ReadExt};

use sim86_instruction::Instruction;

/// Walks a buffer of machine code, yielding each instruction with the offset it was decoded
/// from. Iteration stops after the first error.
pub struct Decoder<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Offset of the next byte that will be decoded.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<(usize, Instruction)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.data.len() {
            return None;
        }

        let offset = self.position;
        let mut it = self.data[offset..].iter().copied();
        match decode_instruction(&mut it) {
            Ok(instruction) => {
                self.position += instruction.size as usize;
                Some(Ok((offset, instruction)))
            }
            Err(err) => {
                self.position = self.data.len();
                Some(Err(err))
            }
        }
    }
}
