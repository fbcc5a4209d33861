//! Maps the leading byte of an instruction to the encoding pattern it uses.
//!
//! Op codes are matched on their most significant bits. Narrow patterns can be bit prefixes of
//! wider ones, so widths are tried from 8 down to 4 and the first match wins.

use crate::bits::BitFieldExt;
use sim86_instruction::Operation;

pub const MAX_OP_CODE_WIDTH: u8 = 8;
pub const MIN_OP_CODE_WIDTH: u8 = 4;

/// The layout of the bytes that follow the op code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// `x x x x x x d w | mod reg r/m | disp-lo | disp-hi`
    RegisterOrMemoryWithRegister,
    /// `x x x x x x s w | mod xxx r/m | disp-lo | disp-hi | data | data if s:w = 01`
    ImmediateToRegisterOrMemory,
    /// `x x x x w reg | data | data if w = 1`
    ImmediateToRegister,
    /// `x x x x x x x w | addr-lo | addr-hi`
    MemoryToAccumulator,
    /// `x x x x x x x w | addr-lo | addr-hi`
    AccumulatorToMemory,
    /// `x x x x x x x w | data | data if w = 1`
    ImmediateToAccumulator,
    /// `x x x x x x x x | ip-inc8`
    RelativeJump,
}

/// What the op code tells us about the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Operation(Operation),
    /// Shared by add/sub/cmp; the 3-bit extra op code in the second byte decides.
    ExtraOpCode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpCodePattern {
    pub width: u8,
    pub bits: u8,
    pub encoding: Encoding,
    pub resolution: Resolution,
}

const fn pattern(width: u8, bits: u8, encoding: Encoding, resolution: Resolution) -> OpCodePattern {
    OpCodePattern {
        width,
        bits,
        encoding,
        resolution,
    }
}

const fn jump(bits: u8, operation: Operation) -> OpCodePattern {
    pattern(
        8,
        bits,
        Encoding::RelativeJump,
        Resolution::Operation(operation),
    )
}

use Encoding::*;
use Operation::*;

const PATTERNS: &[OpCodePattern] = &[
    jump(0b0111_0100, JZ),
    jump(0b0111_1100, JL),
    jump(0b0111_1110, JLE),
    jump(0b0111_0010, JB),
    jump(0b0111_0110, JBE),
    jump(0b0111_1010, JP),
    jump(0b0111_0000, JO),
    jump(0b0111_1000, JS),
    jump(0b0111_0101, JNZ),
    jump(0b0111_1101, JNL),
    jump(0b0111_1111, JNLE),
    jump(0b0111_0011, JNB),
    jump(0b0111_0111, JNBE),
    jump(0b0111_1011, JNP),
    jump(0b0111_0001, JNO),
    jump(0b0111_1001, JNS),
    jump(0b1110_0010, LOOP),
    jump(0b1110_0001, LOOPZ),
    jump(0b1110_0000, LOOPNZ),
    jump(0b1110_0011, JCXZ),
    pattern(7, 0b1100011, ImmediateToRegisterOrMemory, Resolution::Operation(MOV)),
    pattern(7, 0b1010000, MemoryToAccumulator, Resolution::Operation(MOV)),
    pattern(7, 0b1010001, AccumulatorToMemory, Resolution::Operation(MOV)),
    pattern(7, 0b0000010, ImmediateToAccumulator, Resolution::Operation(ADD)),
    pattern(7, 0b0010110, ImmediateToAccumulator, Resolution::Operation(SUB)),
    pattern(7, 0b0011110, ImmediateToAccumulator, Resolution::Operation(CMP)),
    pattern(6, 0b100010, RegisterOrMemoryWithRegister, Resolution::Operation(MOV)),
    pattern(6, 0b000000, RegisterOrMemoryWithRegister, Resolution::Operation(ADD)),
    pattern(6, 0b001010, RegisterOrMemoryWithRegister, Resolution::Operation(SUB)),
    pattern(6, 0b001110, RegisterOrMemoryWithRegister, Resolution::Operation(CMP)),
    pattern(6, 0b100000, ImmediateToRegisterOrMemory, Resolution::ExtraOpCode),
    pattern(4, 0b1011, ImmediateToRegister, Resolution::Operation(MOV)),
];

/// Finds the pattern for an op code byte, scanning widths 8 down to 4. Returns `None` when no
/// width matches.
pub fn classify(op_code: u8) -> Option<&'static OpCodePattern> {
    (MIN_OP_CODE_WIDTH..=MAX_OP_CODE_WIDTH)
        .rev()
        .find_map(|width| {
            let bits = op_code.top_bits(width);
            PATTERNS
                .iter()
                .find(|pattern| pattern.width == width && pattern.bits == bits)
        })
}

/// Second query for the immediate group, once the extra op code field has been read.
pub fn resolve_extra_op_code(extra: u8) -> Option<Operation> {
    match extra {
        0b000 => Some(ADD),
        0b101 => Some(SUB),
        0b111 => Some(CMP),
        _ => None,
    }
}
