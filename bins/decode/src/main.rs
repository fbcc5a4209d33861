mod config;

use config::{Config, MEMORY_DUMP_PATH};
use sim86_decoder::Decoder;
use sim86_instruction::LISTING_HEADER;
use sim86_simulator::{FinalRegisters, Memory, Result, Simulator};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn create_output(path: Option<&Path>) -> std::io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    })
}

fn disassemble(code: &[u8], out: &mut dyn Write) -> Result<usize> {
    let mut count = 0;
    for decoded in Decoder::new(code) {
        let (_, instruction) = decoded?;
        writeln!(out, "{}", instruction)?;
        count += 1;
    }
    Ok(count)
}

fn simulate(code: &[u8], config: &Config, out: &mut dyn Write) -> Result<Simulator> {
    let mut simulator = Simulator::new(code)?;
    let options = config.trace_options();

    while let Some(step) = simulator.step()? {
        writeln!(out, "{}", step.trace(options))?;
    }

    writeln!(out)?;
    write!(out, "{}", FinalRegisters(simulator.state()))?;

    Ok(simulator)
}

/// Writes the memory image of a program that was only disassembled. Programs of any size load,
/// even those too large to simulate.
fn dump_program(code: &[u8], path: &Path) -> Result<()> {
    let mut memory = Memory::default();
    let loaded = memory.load(0, code);
    if loaded < code.len() {
        warn!("Only {} of {} bytes fit in memory.", loaded, code.len());
    }
    memory.dump(path)
}

fn run(config: &Config, code: &[u8], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}\n", LISTING_HEADER)?;

    let count = if config.exec {
        let simulator = simulate(code, config, out)?;
        if config.dump {
            simulator.memory().dump(MEMORY_DUMP_PATH)?;
            info!("Memory written to {}", MEMORY_DUMP_PATH);
        }
        simulator.instructions_executed()
    } else {
        let count = disassemble(code, out)?;
        if config.dump {
            dump_program(code, Path::new(MEMORY_DUMP_PATH))?;
            info!("Memory written to {}", MEMORY_DUMP_PATH);
        }
        count
    };

    out.flush()?;

    info!("Instructions decoded: {}", count);

    Ok(())
}

/// Keeps the partial listing written before a failure. A failed flush is only reported.
fn flush_after_error(out: &mut dyn Write) {
    if let Err(err) = out.flush() {
        warn!("Could not flush output! ({})", err);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_args();

    for advisory in config.advisories() {
        warn!("{}", advisory);
    }

    let code = match std::fs::read(&config.input) {
        Ok(code) => code,
        Err(err) => {
            error!(
                "Could not read input file! ({}) ({})",
                config.input.display(),
                err
            );
            std::process::exit(-1);
        }
    };

    let mut out = match create_output(config.output.as_deref()) {
        Ok(out) => out,
        Err(err) => {
            error!("Could not open output file! ({})", err);
            std::process::exit(-1);
        }
    };

    if let Err(err) = run(&config, &code, out.as_mut()) {
        error!("{}", err);
        flush_after_error(out.as_mut());
        std::process::exit(-1);
    }
}
