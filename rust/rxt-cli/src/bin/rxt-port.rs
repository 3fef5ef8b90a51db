//! rxt-port: inspect tagged value words and print them through a console port.

use clap::{ArgGroup, Args, Parser as ClapParser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use rxt_cli::colors::{red, yellow};
use rxt_cli::commands::{self, EncodeRequest};
use rxt_cli::config::RxtConfig;
use rxt_cli::error::CliError;
use rxt_cli::logging;
use rxt_port::Sink;

#[derive(ClapParser)]
#[command(name = "rxt-port", version, about = "Tagged value codec and console port")]
struct Cli {
    /// Config file (default: rxt.toml in this or a parent directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deliver words to a console port, one line each
    Print {
        /// Words as 0x.., 0b.., decimal, or negative decimal
        #[arg(required = true, allow_negative_numbers = true)]
        words: Vec<String>,

        /// Print to stderr instead of the configured sink
        #[arg(long)]
        stderr: bool,
    },
    /// Show the tag and payload fields of each word
    Decode {
        #[arg(required = true, allow_negative_numbers = true)]
        words: Vec<String>,
    },
    /// Pack a value into a word
    Encode(EncodeArgs),
    /// Check the built-in conformance vectors
    Vectors,
    /// Print a default rxt.toml
    InitConfig,
}

#[derive(Args)]
#[command(group(ArgGroup::new("kind").required(true)))]
struct EncodeArgs {
    /// Integer in the 61-bit signed range
    #[arg(long, group = "kind", allow_negative_numbers = true)]
    int: Option<i64>,

    /// Boolean
    #[arg(long = "bool", group = "kind")]
    boolean: Option<bool>,

    /// Nil
    #[arg(long, group = "kind")]
    nil: bool,

    /// 8-byte aligned address
    #[arg(long, group = "kind")]
    addr: Option<String>,
}

impl EncodeArgs {
    fn request(self) -> EncodeRequest {
        if let Some(n) = self.int {
            EncodeRequest::Int(n)
        } else if let Some(b) = self.boolean {
            EncodeRequest::Bool(b)
        } else if let Some(addr) = self.addr {
            EncodeRequest::Addr(addr)
        } else {
            EncodeRequest::Nil
        }
    }
}

fn run(cli: Cli, config: RxtConfig) -> Result<(), CliError> {
    let stdout = io::stdout();
    match cli.command {
        Commands::Print { words, stderr } => {
            let sink = if stderr { Sink::Stderr } else { config.port.sink };
            commands::print(&words, sink)
        }
        Commands::Decode { words } => {
            commands::write_lines(&mut stdout.lock(), commands::decode(&words)?)
        }
        Commands::Encode(args) => {
            let value = commands::encode(&args.request())?;
            commands::write_lines(&mut stdout.lock(), [commands::format_word(value)])
        }
        Commands::Vectors => {
            let (lines, result) = commands::vectors();
            commands::write_lines(&mut stdout.lock(), lines)?;
            result
        }
        Commands::InitConfig => {
            let mut out = stdout.lock();
            out.write_all(RxtConfig::default_template().as_bytes())?;
            out.flush()?;
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let (config, ignored) = match &cli.config {
        Some(path) => match RxtConfig::load_from(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => {
                eprintln!("{} {}", red("error:"), e);
                std::process::exit(1);
            }
        },
        // a broken discovered file falls back to defaults, but says so
        None => match RxtConfig::load() {
            Ok(cfg) => (cfg, None),
            Err(e) => (RxtConfig::default(), Some(e)),
        },
    };
    if let Some(e) = &ignored {
        eprintln!("{} {} (ignoring config file)", yellow("warning:"), e);
    }
    logging::init(cli.verbose, config.log.filter.as_deref());
    tracing::debug!(target: "rxt_cli", ?config, "configuration loaded");

    match run(cli, config) {
        Ok(()) => {}
        Err(e) if e.is_broken_pipe() => {}
        Err(e) => {
            eprintln!("{} {}", red("error:"), e);
            std::process::exit(1);
        }
    }
}
