//! hxd - Hex dump tool for raw HTTP messages
//!
//! Unix-style front end to the hexpane pipeline: reads a raw HTTP message
//! from a file or stdin, prints dumps, and writes edited messages to stdout.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexpane::codec::{self, HexCase};
use hexpane::config::Config;
use hexpane::encoding;
use hexpane::host::{HostError, Notifier, Severity, Surface, Target, ViewBinding, WriteBack};
use hexpane::http;
use hexpane::session::{CommitContext, CommitOutcome, Scope};

/// Hex dump tool for raw HTTP messages
#[derive(Parser, Debug)]
#[command(name = "hxd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// 表示設定（設定ファイル + 上書き）
#[derive(ClapArgs, Debug)]
struct ViewOptions {
    /// Input file (default: stdin)
    #[arg(short, long)]
    input: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the body only
    #[arg(short, long)]
    body: bool,

    /// Uppercase hex tokens
    #[arg(short, long)]
    upper: bool,

    /// Truncate input to this many characters
    #[arg(long)]
    max_chars: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the hex/ASCII dump of a message
    Dump {
        #[command(flatten)]
        view: ViewOptions,
    },

    /// Show method, headers and body size
    Parse {
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Convert hex tokens to the ASCII preview
    Hex2ascii {
        /// Space separated tokens (e.g., "48 65 6c")
        hex: String,
    },

    /// Convert text to hex tokens
    Ascii2hex {
        ascii: String,

        /// Original tokens; '.' keeps the byte at the same position
        #[arg(short, long)]
        original: Option<String>,
    },

    /// Normalize line breaks to CRLF
    Crlf {
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Replace one dump row and write the message to stdout
    EditRow {
        /// Row index (0 based)
        row: usize,

        /// New hex tokens for the row
        hex: String,

        #[command(flatten)]
        view: ViewOptions,
    },

    /// Replace the whole buffer and write the message to stdout
    SetHex {
        /// Hex text; whitespace is ignored
        hex: String,

        #[command(flatten)]
        view: ViewOptions,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Dump { view } => cmd_dump(&view),
        Command::Parse { input } => cmd_parse(input.as_deref()),
        Command::Hex2ascii { hex } => {
            println!("{}", codec::hex_to_ascii(&hex));
            Ok(())
        }
        Command::Ascii2hex { ascii, original } => {
            println!("{}", codec::ascii_to_hex(&ascii, original.as_deref()));
            Ok(())
        }
        Command::Crlf { input } => cmd_crlf(input.as_deref()),
        Command::EditRow { row, hex, view } => cmd_edit(&view, |binding| {
            binding.edit_row(row, &hex)?;
            Ok(())
        }),
        Command::SetHex { hex, view } => cmd_edit(&view, |binding| {
            binding.set_hex_text(&hex);
            Ok(())
        }),
    }
}

/// ログ出力の初期化（stderr）
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read input from file or stdin (1 byte = 1 char)
fn read_input(path: Option<&str>) -> Result<String> {
    let bytes = match path {
        Some(p) => std::fs::read(p)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(encoding::decode_bytes(&bytes).into_owned())
}

/// 設定ファイルを読み、コマンドライン指定で上書き
fn load_config(view: &ViewOptions) -> Result<Config> {
    let mut config = match &view.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if view.body {
        config.scope = Scope::Body;
    }
    if view.upper {
        config.hex_case = HexCase::Upper;
    }
    if let Some(max_chars) = view.max_chars {
        config.max_chars = max_chars;
    }
    Ok(config)
}

fn bind(view: &ViewOptions, config: &Config) -> Result<ViewBinding> {
    let raw = read_input(view.input.as_deref())?;
    let mut binding = ViewBinding::new(
        config,
        CommitContext {
            surface: Surface::Replay,
            target: Target::Request,
        },
    );
    binding.on_raw_text(&raw);
    Ok(binding)
}

/// 編集結果を標準出力へ書き出す
struct StdoutWriteBack;

impl WriteBack for StdoutWriteBack {
    fn write_back(&mut self, raw: &str) -> Result<(), HostError> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&encoding::encode_text(raw))?;
        stdout.flush()?;
        Ok(())
    }
}

/// 通知を標準エラーへ
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        eprintln!("[{}] {}", severity.tag(), message);
    }
}

// === Commands ===

fn cmd_dump(view: &ViewOptions) -> Result<()> {
    let config = load_config(view)?;
    let binding = bind(view, &config)?;
    println!("{}", binding.session().dump_text());
    Ok(())
}

fn cmd_parse(input: Option<&str>) -> Result<()> {
    let raw = read_input(input)?;
    let Some(message) = http::parse_http_raw(&raw) else {
        bail!("No header/body boundary (CRLF CRLF) found");
    };

    println!("Method: {}", message.method);
    let mut headers: Vec<_> = message.headers.iter().collect();
    headers.sort();
    for (name, value) in headers {
        println!("{}: {}", name, value);
    }
    println!("Body: {} bytes", message.body.chars().count());
    Ok(())
}

fn cmd_crlf(input: Option<&str>) -> Result<()> {
    let raw = read_input(input)?;
    io::stdout().write_all(&encoding::encode_text(&http::ensure_crlf(&raw)))?;
    Ok(())
}

fn cmd_edit(
    view: &ViewOptions,
    edit: impl FnOnce(&mut ViewBinding) -> Result<()>,
) -> Result<()> {
    let config = load_config(view)?;
    let mut binding = bind(view, &config)?;
    edit(&mut binding)?;

    match binding.commit(&mut StdoutWriteBack, &mut StderrNotifier) {
        CommitOutcome::Committed(_) => Ok(()),
        CommitOutcome::NotPermitted => bail!("Commit not permitted"),
        CommitOutcome::Truncated => bail!(
            "Input exceeds {} characters; raise --max-chars",
            config.max_chars
        ),
        CommitOutcome::Failed(message) => bail!(message),
    }
}
