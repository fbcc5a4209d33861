use crate::clocks::{estimate, Clocks};
use crate::error::{Error, Result};
use crate::memory::Memory;
use crate::state::State;
use sim86_decoder::decode_instruction;
use sim86_instruction::Instruction;
use std::fmt::{Display, Formatter};
use tracing::debug;

/// Runs a program loaded at address 0 until the instruction pointer leaves it.
pub struct Simulator {
    pub(crate) state: State,
    pub(crate) memory: Memory,
    code_end: u32,
    total_clocks: u32,
    executed: usize,
}

/// The outcome of executing a single instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub instruction: Instruction,
    pub before: State,
    pub after: State,
    pub clocks: Clocks,
    /// Running total after this instruction.
    pub total_clocks: u32,
}

impl Simulator {
    pub fn new(code: &[u8]) -> Result<Self> {
        if code.len() > u16::MAX as usize + 1 {
            return Err(Error::ProgramTooLarge(code.len()));
        }

        let mut memory = Memory::default();
        memory.load(0, code);

        Ok(Self {
            state: State::default(),
            memory,
            code_end: code.len() as u32,
            total_clocks: 0,
            executed: 0,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn total_clocks(&self) -> u32 {
        self.total_clocks
    }

    pub fn instructions_executed(&self) -> usize {
        self.executed
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.ip as u32 >= self.code_end
    }

    /// Fetches, decodes and executes the instruction at the instruction pointer. Returns `None`
    /// once the instruction pointer is past the end of the program.
    pub fn step(&mut self) -> Result<Option<Step>> {
        if self.is_finished() {
            return Ok(None);
        }

        let before = self.state;
        let start = before.ip;

        // Fetch stops at the end of the program, so a truncated instruction is an error.
        let remaining = (self.code_end - start as u32) as usize;
        let instruction =
            decode_instruction(&mut self.memory.bytes_from(start as u32).take(remaining))?;

        self.state.ip = start.wrapping_add(instruction.size as u16);
        let jumped = self.execute(&instruction, start)?;

        let clocks = estimate(&instruction, jumped);
        self.total_clocks += clocks.total();
        self.executed += 1;

        debug!(
            "{:04X} {} ({} clocks, {} total)",
            start,
            instruction,
            clocks.total(),
            self.total_clocks
        );

        Ok(Some(Step {
            instruction,
            before,
            after: self.state,
            clocks,
            total_clocks: self.total_clocks,
        }))
    }

    /// Steps until the program ends. Does not guard against programs that never do.
    pub fn run(&mut self) -> Result<()> {
        while self.step()?.is_some() {}
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TraceOptions {
    pub show_clocks: bool,
    pub explain_clocks: bool,
}

impl Step {
    pub fn trace(&self, options: TraceOptions) -> TraceLine<'_> {
        TraceLine {
            step: self,
            options,
        }
    }
}

/// An instruction followed by the changes it made, e.g.
/// `mov bx, 1000 ; Clocks: +4 = 4 | bx:0x0->0x3e8 ip:0x0->0x3`.
pub struct TraceLine<'a> {
    step: &'a Step,
    options: TraceOptions,
}

impl Display for TraceLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let step = self.step;

        write!(f, "{} ;", step.instruction)?;

        if self.options.show_clocks || self.options.explain_clocks {
            write!(
                f,
                " Clocks: +{} = {}",
                step.clocks.total(),
                step.total_clocks
            )?;
            if self.options.explain_clocks && step.clocks.ea > 0 {
                write!(f, " ({} + {}ea)", step.clocks.base, step.clocks.ea)?;
            }
            write!(f, " |")?;
        }

        if let Some((name, old, new)) = step.before.changed_register(&step.after) {
            write!(f, " {}:{:#x}->{:#x}", name, old, new)?;
        }

        write!(f, " ip:{:#x}->{:#x}", step.before.ip, step.after.ip)?;

        if step.before.flags != step.after.flags {
            write!(f, " flags:{}->{}", step.before.flags, step.after.flags)?;
        }

        Ok(())
    }
}
