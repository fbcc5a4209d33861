use sim86_instruction::{AddressExpression, Instruction, Memory, Operand, Operation};

/// Cycle cost of one executed instruction, split into the base cost of the operation and the cost
/// of calculating an effective address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clocks {
    pub base: u32,
    pub ea: u32,
}

impl Clocks {
    #[inline]
    pub fn total(&self) -> u32 {
        self.base + self.ea
    }
}

/// Effective address calculation time. Encoded displacement bytes add 4, even when they are 0.
pub fn ea_clocks(memory: &Memory) -> u32 {
    use AddressExpression::*;

    let base = match memory.expression {
        Direct => return 6,
        Bx | Bp | Si | Di => 5,
        BpDi | BxSi => 7,
        BpSi | BxDi => 8,
    };

    if memory.has_displacement {
        base + 4
    } else {
        base
    }
}

#[derive(Clone, Copy)]
enum Form {
    RegisterRegister,
    RegisterMemory,
    MemoryRegister,
    RegisterImmediate,
    MemoryImmediate,
}

/// Estimates the cost of `instruction`. `jumped` tells whether a conditional jump was taken.
pub fn estimate(instruction: &Instruction, jumped: bool) -> Clocks {
    use Operation::*;

    if instruction.operation.is_jump() {
        let base = match instruction.operation {
            JNZ if jumped => 16,
            LOOP | LOOPNZ => 5,
            LOOPZ | JCXZ => 6,
            _ => 4,
        };
        return Clocks { base, ea: 0 };
    }

    let (destination, source) = match (
        instruction.operands.destination(),
        instruction.operands.source(),
    ) {
        (Some(destination), Some(source)) => (destination, source),
        _ => return Clocks::default(),
    };

    let (form, ea) = match (destination, source) {
        (Operand::Memory(memory), Operand::Immediate(_)) => {
            (Form::MemoryImmediate, ea_clocks(memory))
        }
        (Operand::Memory(memory), _) => (Form::MemoryRegister, ea_clocks(memory)),
        (_, Operand::Memory(memory)) => (Form::RegisterMemory, ea_clocks(memory)),
        (_, Operand::Immediate(_)) => (Form::RegisterImmediate, 0),
        _ => (Form::RegisterRegister, 0),
    };

    let base = match (instruction.operation, form) {
        (MOV, Form::RegisterRegister) => 2,
        (MOV, Form::RegisterMemory) => 8,
        (MOV, Form::MemoryRegister) => 9,
        (MOV, Form::RegisterImmediate) => 4,
        (MOV, Form::MemoryImmediate) => 10,

        (ADD | SUB, Form::RegisterRegister) => 3,
        (ADD | SUB, Form::RegisterMemory) => 9,
        (ADD | SUB, Form::MemoryRegister) => 16,
        (ADD | SUB, Form::RegisterImmediate) => 4,
        (ADD | SUB, Form::MemoryImmediate) => 17,

        (CMP, Form::RegisterRegister) => 3,
        (CMP, Form::RegisterMemory | Form::MemoryRegister) => 9,
        (CMP, Form::RegisterImmediate) => 4,
        (CMP, Form::MemoryImmediate) => 10,

        _ => 0,
    };

    Clocks { base, ea }
}
