use crate::bits::{sign_extend, BitFieldExt};
use crate::errors::Result;
use crate::traits::ReadExt;
use sim86_instruction::{
    AddressExpression, Memory, Operand, OperandSize, Register, RegisterName,
};

/// The fields of a mod-reg-r/m byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModRegRM {
    pub mode: u8,
    pub reg: u8,
    pub rm: u8,
    pub byte: u8,
}

impl ModRegRM {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            mode: byte.bits(6, 2),
            reg: byte.bits(3, 3),
            rm: byte.bits(0, 3),
            byte,
        }
    }

    /// mod = 11 selects a register instead of memory for the r/m field.
    #[inline]
    pub fn is_register(&self) -> bool {
        self.mode == 0b11
    }

    /// Decodes the r/m side of the byte, reading any displacement that follows.
    pub fn register_or_memory(
        &self,
        operand_size: OperandSize,
        it: &mut impl Iterator<Item = u8>,
    ) -> Result<Operand> {
        if self.is_register() {
            Ok(register_operand(self.rm, operand_size).into())
        } else {
            Ok(memory_operand(self.rm, self.mode, it)?.into())
        }
    }
}

/// Maps a 3-bit register index to a register slice. In byte mode, indices `100..=111` select the
/// high byte of a/c/d/b rather than sp/bp/si/di.
pub fn register_operand(index: u8, operand_size: OperandSize) -> Register {
    use RegisterName::*;

    const LOW: [RegisterName; 4] = [A, C, D, B];
    const WIDE_HIGH: [RegisterName; 4] = [Sp, Bp, Si, Di];

    debug_assert!(index <= 0b111);

    let index = (index & 0b111) as usize;
    match operand_size {
        OperandSize::Word if index < 4 => Register::word(LOW[index]),
        OperandSize::Word => Register::word(WIDE_HIGH[index - 4]),
        OperandSize::Byte if index < 4 => Register::low(LOW[index]),
        OperandSize::Byte => Register::high(LOW[index - 4]),
    }
}

fn address_expression(rm: u8) -> AddressExpression {
    use AddressExpression::*;

    match rm & 0b111 {
        0b000 => BxSi,
        0b001 => BxDi,
        0b010 => BpSi,
        0b011 => BpDi,
        0b100 => Si,
        0b101 => Di,
        0b110 => Bp,
        _ => Bx,
    }
}

/// Decodes a memory operand and its displacement:
///
/// - mod = 00: no displacement, except r/m = 110 which is a 16-bit direct address.
/// - mod = 01: 8-bit displacement, sign extended.
/// - mod = 10: 16-bit displacement.
pub fn memory_operand(rm: u8, mode: u8, it: &mut impl Iterator<Item = u8>) -> Result<Memory> {
    debug_assert!(mode != 0b11, "mod = 11 does not address memory");

    Ok(match mode {
        0b00 if rm == 0b110 => Memory::direct(it.read_u16()?),
        0b00 => Memory::new(address_expression(rm), 0),
        0b01 => Memory::displaced(address_expression(rm), sign_extend(it.read_u8()?) as i32),
        _ => Memory::displaced(address_expression(rm), it.read_u16()? as i16 as i32),
    })
}

/// Reads an immediate value. Only a wide immediate can be sign extended from a single byte.
pub fn immediate_operand(
    sign_extend_byte: bool,
    operand_size: OperandSize,
    it: &mut impl Iterator<Item = u8>,
) -> Result<Operand> {
    let value = match (sign_extend_byte, operand_size) {
        (false, OperandSize::Byte) => it.read_u8()? as i32,
        (false, OperandSize::Word) => it.read_u16()? as i32,
        (true, OperandSize::Word) => sign_extend(it.read_u8()?) as i32,
        (true, OperandSize::Byte) => unreachable!("byte immediates are never sign extended"),
    };

    Ok(Operand::Immediate(value))
}

/// Reads the signed 8-bit jump displacement. The stored value is 2 more than the encoded one
/// because the assembler subtracts the 2-byte length of the jump from `$`-relative targets.
pub fn relative_jump_operand(it: &mut impl Iterator<Item = u8>) -> Result<Operand> {
    Ok(Operand::RelativeJump(sign_extend(it.read_u8()?) as i32 + 2))
}
