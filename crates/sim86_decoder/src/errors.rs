use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("End of input")]
    EndOfInput,

    #[error("Could not fetch extra bytes from stream")]
    CouldNotReadExtraBytes,

    #[error("Unknown op code ({0:#04x})")]
    UnknownOpCode(u8),

    #[error("Unknown extra op code ({extra:#05b}) for op code ({op_code:#04x})")]
    UnknownExtraOpCode { op_code: u8, extra: u8 },

    #[error("Invalid mod/reg/rm encoding ({mod_reg_rm:#010b}) for op code ({op_code:#04x})")]
    InvalidEncoding { op_code: u8, mod_reg_rm: u8 },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
