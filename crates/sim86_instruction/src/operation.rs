/// The kind of operation an [crate::Instruction] performs.
///
/// The discriminant doubles as the index into the mnemonic table, so the order of the variants
/// must match [MNEMONICS].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Operation {
    MOV,
    ADD,
    SUB,
    CMP,
    JZ,     // Jump on equal/zero (alias JE)
    JL,     // Jump on less/not greater or equal (alias JNGE)
    JLE,    // Jump on less or equal/not greater (alias JNG)
    JB,     // Jump on below/not above or equal (alias JNAE)
    JBE,    // Jump on below or equal/not above (alias JNA)
    JP,     // Jump on parity/parity even (alias JPE)
    JO,     // Jump on overflow
    JS,     // Jump on sign
    JNZ,    // Jump on not equal/not zero (alias JNE)
    JNL,    // Jump on not less/greater or equal (alias JGE)
    JNLE,   // Jump on not less or equal/greater (alias JG)
    JNB,    // Jump on not below/above or equal (alias JAE)
    JNBE,   // Jump on not below or equal/above (alias JA)
    JNP,    // Jump on not parity/parity odd (alias JPO)
    JNO,    // Jump on not overflow
    JNS,    // Jump on not sign
    LOOP,   // Loop CX times
    LOOPZ,  // Loop while zero/equal (alias LOOPE)
    LOOPNZ, // Loop while not zero/equal (alias LOOPNE)
    JCXZ,   // Jump on CX zero
}

const MNEMONICS: [&str; Operation::COUNT] = [
    "mov", "add", "sub", "cmp", "jz", "jl", "jle", "jb", "jbe", "jp", "jo", "js", "jnz", "jnl",
    "jnle", "jnb", "jnbe", "jnp", "jno", "jns", "loop", "loopz", "loopnz", "jcxz",
];

impl Operation {
    pub const COUNT: usize = 24;

    /// Every operation, in mnemonic table order.
    pub const ALL: [Operation; Operation::COUNT] = [
        Operation::MOV,
        Operation::ADD,
        Operation::SUB,
        Operation::CMP,
        Operation::JZ,
        Operation::JL,
        Operation::JLE,
        Operation::JB,
        Operation::JBE,
        Operation::JP,
        Operation::JO,
        Operation::JS,
        Operation::JNZ,
        Operation::JNL,
        Operation::JNLE,
        Operation::JNB,
        Operation::JNBE,
        Operation::JNP,
        Operation::JNO,
        Operation::JNS,
        Operation::LOOP,
        Operation::LOOPZ,
        Operation::LOOPNZ,
        Operation::JCXZ,
    ];

    #[inline]
    pub fn mnemonic(self) -> &'static str {
        MNEMONICS[self as usize]
    }

    /// Returns true for the conditional jumps and loops, which all take a single relative jump
    /// operand.
    pub fn is_jump(self) -> bool {
        !matches!(
            self,
            Operation::MOV | Operation::ADD | Operation::SUB | Operation::CMP
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
