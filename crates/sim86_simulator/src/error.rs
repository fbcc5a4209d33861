use sim86_decoder::DecodeError;
use sim86_instruction::Operand;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not decode instruction! {0}")]
    Decode(#[from] DecodeError),

    #[error("Operand can not be written to! ({0})")]
    InvalidDestination(Operand),

    #[error("Program does not fit in the 16-bit instruction pointer range! ({0} bytes)")]
    ProgramTooLarge(usize),

    #[error("Could not write memory image! {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
