use crate::bits::BitFieldExt;
use crate::classify::{classify, resolve_extra_op_code, Encoding, Resolution};
use crate::errors::Result;
use crate::mod_reg_rm::{
    immediate_operand, memory_operand, register_operand, relative_jump_operand, ModRegRM,
};
use crate::traits::{Counted, OpCodeExt, ReadExt};
use crate::DecodeError;
use sim86_instruction::{Instruction, Operand, OperandSet, OperandSize, Operation, RegisterName};

fn accumulator(operand_size: OperandSize) -> Operand {
    register_operand(RegisterName::A as u8, operand_size).into()
}

// x x x x x x d w | mod reg r/m
fn register_or_memory_and_register(
    operation: Operation,
    op_code: u8,
    it: &mut impl Iterator<Item = u8>,
) -> Result<Instruction> {
    let operand_size = op_code.operand_size_at(0);
    let reg_is_destination = op_code.bits(1, 1) == 1;

    let mrrm = ModRegRM::from_byte(it.read_u8()?);

    let reg = register_operand(mrrm.reg, operand_size).into();
    let reg_mem = mrrm.register_or_memory(operand_size, it)?;

    // Both sides are decoded before the direction bit picks the destination.
    let operands = if reg_is_destination {
        OperandSet::DestinationAndSource(reg, reg_mem)
    } else {
        OperandSet::DestinationAndSource(reg_mem, reg)
    };

    Ok(Instruction::new(operation, operand_size, operands))
}

// x x x x x x s w | mod xxx r/m | data | data if s:w = 01
fn immediate_to_register_or_memory(
    resolution: Resolution,
    op_code: u8,
    it: &mut impl Iterator<Item = u8>,
) -> Result<Instruction> {
    let operand_size = op_code.operand_size_at(0);
    let mrrm = ModRegRM::from_byte(it.read_u8()?);

    let invalid = DecodeError::InvalidEncoding {
        op_code,
        mod_reg_rm: mrrm.byte,
    };

    let (operation, sign_extend_byte) = match resolution {
        // mov has its own immediate-to-register op code, so this form only writes memory.
        Resolution::Operation(operation) => {
            if mrrm.reg != 0b000 || mrrm.is_register() {
                return Err(invalid);
            }
            (operation, false)
        }

        Resolution::ExtraOpCode => {
            let operation =
                resolve_extra_op_code(mrrm.reg).ok_or(DecodeError::UnknownExtraOpCode {
                    op_code,
                    extra: mrrm.reg,
                })?;

            let sign_extend_byte = op_code.bits(1, 1) == 1;
            if sign_extend_byte && operand_size == OperandSize::Byte {
                return Err(invalid);
            }
            (operation, sign_extend_byte)
        }
    };

    let destination = mrrm.register_or_memory(operand_size, it)?;
    let source = immediate_operand(sign_extend_byte, operand_size, it)?;

    Ok(Instruction::new(
        operation,
        operand_size,
        OperandSet::DestinationAndSource(destination, source),
    ))
}

// x x x x w reg | data | data if w = 1
fn immediate_to_register(
    operation: Operation,
    op_code: u8,
    it: &mut impl Iterator<Item = u8>,
) -> Result<Instruction> {
    let operand_size = op_code.operand_size_at(3);
    let source = immediate_operand(false, operand_size, it)?;
    let destination = register_operand(op_code.bits(0, 3), operand_size).into();

    Ok(Instruction::new(
        operation,
        operand_size,
        OperandSet::DestinationAndSource(destination, source),
    ))
}

// x x x x x x x w | addr-lo | addr-hi
fn memory_and_accumulator(
    operation: Operation,
    accumulator_is_destination: bool,
    op_code: u8,
    it: &mut impl Iterator<Item = u8>,
) -> Result<Instruction> {
    let operand_size = op_code.operand_size_at(0);
    let memory = memory_operand(0b110, 0b00, it)?.into();

    let operands = if accumulator_is_destination {
        OperandSet::DestinationAndSource(accumulator(operand_size), memory)
    } else {
        OperandSet::DestinationAndSource(memory, accumulator(operand_size))
    };

    Ok(Instruction::new(operation, operand_size, operands))
}

// x x x x x x x w | data | data if w = 1
fn immediate_to_accumulator(
    operation: Operation,
    op_code: u8,
    it: &mut impl Iterator<Item = u8>,
) -> Result<Instruction> {
    let operand_size = op_code.operand_size_at(0);

    Ok(Instruction::new(
        operation,
        operand_size,
        OperandSet::DestinationAndSource(
            accumulator(operand_size),
            immediate_operand(false, operand_size, it)?,
        ),
    ))
}

// x x x x x x x x | ip-inc8
fn relative_jump(operation: Operation, it: &mut impl Iterator<Item = u8>) -> Result<Instruction> {
    Ok(Instruction::new(
        operation,
        OperandSize::Byte,
        OperandSet::Destination(relative_jump_operand(it)?),
    ))
}

/// Decodes a single instruction from the front of the byte stream. The returned instruction
/// carries the number of bytes it consumed in [Instruction::size].
pub fn decode_instruction(it: &mut impl Iterator<Item = u8>) -> Result<Instruction> {
    let mut it = Counted::new(it);

    let op_code = it.read_u8().map_err(|e| match e {
        DecodeError::CouldNotReadExtraBytes => DecodeError::EndOfInput,
        err => err,
    })?;

    let pattern = classify(op_code).ok_or(DecodeError::UnknownOpCode(op_code))?;

    use Resolution::Operation as Resolved;

    let instruction = match (pattern.encoding, pattern.resolution) {
        // The operation of the immediate group is only known once the second byte is read.
        (Encoding::ImmediateToRegisterOrMemory, resolution) => {
            immediate_to_register_or_memory(resolution, op_code, &mut it)
        }
        (_, Resolution::ExtraOpCode) => Err(DecodeError::UnknownOpCode(op_code)),

        (Encoding::RegisterOrMemoryWithRegister, Resolved(operation)) => {
            register_or_memory_and_register(operation, op_code, &mut it)
        }
        (Encoding::ImmediateToRegister, Resolved(operation)) => {
            immediate_to_register(operation, op_code, &mut it)
        }
        (Encoding::MemoryToAccumulator, Resolved(operation)) => {
            memory_and_accumulator(operation, true, op_code, &mut it)
        }
        (Encoding::AccumulatorToMemory, Resolved(operation)) => {
            memory_and_accumulator(operation, false, op_code, &mut it)
        }
        (Encoding::ImmediateToAccumulator, Resolved(operation)) => {
            immediate_to_accumulator(operation, op_code, &mut it)
        }
        (Encoding::RelativeJump, Resolved(operation)) => relative_jump(operation, &mut it),
    }?;

    Ok(instruction.with_size(it.count))
}
