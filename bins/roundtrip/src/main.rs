mod generate;

use clap::Parser;
use rand::SeedableRng;
use sim86_decoder::Decoder;
use sim86_instruction::LISTING_HEADER;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Generates random machine code, disassembles it, re-assembles the listing with nasm and checks
/// that the bytes come back unchanged.
#[derive(Debug, Parser)]
#[command(name = "roundtrip", version)]
struct Opt {
    /// Seed for the instruction generator
    #[arg(short, long, default_value_t = 10)]
    seed: u64,

    /// Number of instructions to generate
    #[arg(short, long, default_value_t = 1000)]
    count: usize,

    /// The assembler to run
    #[arg(long, default_value = "nasm")]
    nasm: String,

    /// Directory for the generated and assembled files
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,
}

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn assemble(opt: &Opt, listing: &str) -> Result<Vec<u8>> {
    let asm_path = opt.work_dir.join("roundtrip.asm");
    let bin_path = opt.work_dir.join("roundtrip.bin");

    std::fs::write(&asm_path, listing)?;

    let status = Command::new(&opt.nasm)
        .stdout(Stdio::null())
        .arg(&asm_path)
        .arg("-w+error=number-overflow")
        .arg("-f")
        .arg("bin")
        .arg("-o")
        .arg(&bin_path)
        .status()?;

    if !status.success() {
        return Err(format!("{} failed with {}", opt.nasm, status).into());
    }

    Ok(std::fs::read(&bin_path)?)
}

/// Returns the number of instructions that did not survive the round trip. Comparison stops at
/// the first one, every offset after it is shifted.
fn compare(original: &[u8], assembled: &[u8]) -> Result<usize> {
    for decoded in Decoder::new(original) {
        let (offset, instruction) = decoded?;
        let end = offset + instruction.size as usize;

        let expected = &original[offset..end];
        let actual = assembled.get(offset..end.min(assembled.len())).unwrap_or(&[]);

        if expected != actual {
            error!(
                "{:04X}: {} assembled to {:02X?}, expected {:02X?}",
                offset, instruction, actual, expected
            );
            return Ok(1);
        }
    }

    if assembled.len() != original.len() {
        error!(
            "Assembled {} bytes, expected {}",
            assembled.len(),
            original.len()
        );
        return Ok(1);
    }

    Ok(0)
}

fn run(opt: &Opt) -> Result<usize> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(opt.seed);
    let original = generate::generate(&mut rng, opt.count)?;
    info!("Generated {} bytes from seed {}", original.len(), opt.seed);

    let mut listing = Vec::new();
    writeln!(listing, "{}\n", LISTING_HEADER)?;
    for decoded in Decoder::new(&original) {
        let (_, instruction) = decoded?;
        writeln!(listing, "{}", instruction)?;
    }
    let listing = String::from_utf8(listing)?;

    let assembled = assemble(opt, &listing)?;

    compare(&original, &assembled)
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opt = Opt::parse();

    match run(&opt) {
        Ok(0) => info!("{} instructions round tripped", opt.count),
        Ok(_) => std::process::exit(1),
        Err(err) => {
            error!("{}", err);
            std::process::exit(-1);
        }
    }
}
