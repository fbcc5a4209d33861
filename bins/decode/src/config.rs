use clap::Parser;
use sim86_simulator::TraceOptions;
use std::ffi::OsString;
use std::path::PathBuf;

/// Where `--dump` writes the memory image.
pub const MEMORY_DUMP_PATH: &str = "sim86_memory_0.data";

/// Switches that are also accepted with a single dash, e.g. `-exec`.
const SINGLE_DASH_SWITCHES: [&str; 4] = ["exec", "dump", "showclocks", "explainclocks"];

#[derive(Debug, Parser)]
#[command(name = "decode", version, about = "Disassemble or simulate 8086 machine code")]
pub struct Config {
    /// Raw machine code to decode
    pub input: PathBuf,

    /// Where to write the listing, defaults to stdout
    pub output: Option<PathBuf>,

    /// Simulate the program and annotate every instruction with the changes it made
    #[arg(long)]
    pub exec: bool,

    /// Write the simulated memory to sim86_memory_0.data afterwards
    #[arg(long)]
    pub dump: bool,

    /// Show the estimated clock count of each instruction
    #[arg(long = "showclocks")]
    pub show_clocks: bool,

    /// Like --showclocks, but also split out the effective address cost
    #[arg(long = "explainclocks")]
    pub explain_clocks: bool,
}

impl Config {
    pub fn from_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn trace_options(&self) -> TraceOptions {
        TraceOptions {
            show_clocks: self.show_clocks || self.explain_clocks,
            explain_clocks: self.explain_clocks,
        }
    }

    /// Combinations of arguments that are allowed, but probably not what was intended.
    pub fn advisories(&self) -> Vec<String> {
        let mut advisories = vec![];

        if self.exec {
            if let Some(output) = &self.output {
                if output.extension().map_or(true, |ext| ext != "txt") {
                    advisories.push(format!(
                        "Simulating with an output file that is not a .txt file: {}",
                        output.display()
                    ));
                }
            }
        }

        if self.dump && !self.exec {
            advisories.push(
                "Dumping memory without simulating, the image only holds the program".into(),
            );
        }

        advisories
    }
}

/// Rewrites `-exec` style switches to `--exec` so clap can parse them.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(s)
                if s
                    .strip_prefix('-')
                    .map_or(false, |name| SINGLE_DASH_SWITCHES.contains(&name)) =>
            {
                OsString::from(format!("-{}", s))
            }
            _ => arg,
        })
        .collect()
}
