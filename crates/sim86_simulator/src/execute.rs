use crate::error::{Error, Result};
use crate::state::{Flags, State};
use crate::Simulator;
use sim86_instruction::{Instruction, Memory, Operand, OperandSize, Operation, Register};
use tracing::trace;

/// Sums the registers of the address expression and the displacement, wrapping at 16 bits.
pub fn effective_address(state: &State, memory: &Memory) -> u16 {
    if memory.is_direct() {
        return memory.displacement as u16;
    }

    memory
        .expression
        .registers()
        .iter()
        .fold(memory.displacement as u16, |address, &name| {
            address.wrapping_add(state.word(name))
        })
}

/// Somewhere a result can be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Location {
    Register(Register),
    Memory(u16),
}

fn mask(value: u16, operand_size: OperandSize) -> u16 {
    match operand_size {
        OperandSize::Byte => value & 0x00FF,
        OperandSize::Word => value,
    }
}

impl Simulator {
    fn location(&self, operand: &Operand) -> Result<Location> {
        match operand {
            Operand::Register(register) => Ok(Location::Register(*register)),
            Operand::Memory(memory) => Ok(Location::Memory(effective_address(
                &self.state,
                memory,
            ))),
            _ => Err(Error::InvalidDestination(*operand)),
        }
    }

    fn read_location(&self, location: Location, operand_size: OperandSize) -> u16 {
        match (location, operand_size) {
            (Location::Register(register), _) => self.state.register(register),
            (Location::Memory(address), OperandSize::Byte) => {
                self.memory.read_u8(address as u32) as u16
            }
            (Location::Memory(address), OperandSize::Word) => {
                self.memory.read_u16(address as u32)
            }
        }
    }

    fn write_location(&mut self, location: Location, operand_size: OperandSize, value: u16) {
        match (location, operand_size) {
            (Location::Register(register), _) => self.state.set_register(register, value),
            (Location::Memory(address), OperandSize::Byte) => {
                self.memory.write_u8(address as u32, value as u8)
            }
            (Location::Memory(address), OperandSize::Word) => {
                self.memory.write_u16(address as u32, value)
            }
        }
    }

    fn read_operand(&self, operand: &Operand, operand_size: OperandSize) -> u16 {
        let value = match operand {
            Operand::Register(register) => self.state.register(*register),
            Operand::Memory(memory) => self.read_location(
                Location::Memory(effective_address(&self.state, memory)),
                operand_size,
            ),
            Operand::Immediate(value) | Operand::RelativeJump(value) => *value as u16,
        };

        mask(value, operand_size)
    }

    /// Executes a decoded instruction. The instruction pointer must already point past it.
    /// Returns true if a jump was taken.
    pub(crate) fn execute(&mut self, instruction: &Instruction, start: u16) -> Result<bool> {
        use Operation::*;

        let operand_size = instruction.operand_size;

        if instruction.operation.is_jump() {
            let displacement = match instruction.operands.destination() {
                Some(Operand::RelativeJump(displacement)) => *displacement,
                Some(operand) => return Err(Error::InvalidDestination(*operand)),
                None => return Ok(false),
            };

            // Only jnz changes control flow, the rest are decoded and skipped.
            if instruction.operation == JNZ && !self.state.flags.contains(Flags::ZERO) {
                self.state.ip = start.wrapping_add(displacement as u16);
                trace!("jump taken to {:04X}", self.state.ip);
                return Ok(true);
            }
            return Ok(false);
        }

        let (destination, source) = match (
            instruction.operands.destination(),
            instruction.operands.source(),
        ) {
            (Some(destination), Some(source)) => (destination, source),
            _ => return Ok(false),
        };

        let location = self.location(destination)?;
        let source = self.read_operand(source, operand_size);

        match instruction.operation {
            MOV => self.write_location(location, operand_size, source),

            ADD | SUB | CMP => {
                let current = self.read_location(location, operand_size);
                let result = if instruction.operation == ADD {
                    current.wrapping_add(source)
                } else {
                    current.wrapping_sub(source)
                };
                let result = mask(result, operand_size);

                self.state.flags.set_from_value(result, operand_size);

                if instruction.operation != CMP {
                    self.write_location(location, operand_size, result);
                }
            }

            _ => {}
        }

        Ok(false)
    }
}
