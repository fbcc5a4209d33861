//! Executes the mov/add/sub/cmp/jnz subset of 8086 instructions against a register file and a
//! flat 1 MiB memory, estimating the clock cost of every instruction.

mod clocks;
mod error;
mod execute;
mod memory;
mod simulator;
mod state;

#[cfg(test)]
mod test;

pub use clocks::{ea_clocks, estimate, Clocks};
pub use error::{Error, Result};
pub use execute::effective_address;
pub use memory::{Memory, MEMORY_SIZE};
pub use simulator::{Simulator, Step, TraceLine, TraceOptions};
pub use state::{FinalRegisters, Flags, State};
