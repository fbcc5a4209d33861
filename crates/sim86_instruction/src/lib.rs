//! This crate holds all the structs and constants to represent a decoded instruction for the
//! supported 8086 subset (mov/add/sub/cmp and the conditional jumps/loops), as well as the
//! [std::fmt::Display] implementations that print them back as re-assemblable source text.

mod instruction;
mod operand;
mod operation;
mod register;

pub use instruction::{Instruction, OperandSet, LISTING_HEADER};
pub use operand::{AddressExpression, Memory, Operand, OperandSize};
pub use operation::Operation;
pub use register::{Register, RegisterName};
