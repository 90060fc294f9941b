use std::fs::File;
use std::io::{self, IsTerminal, Read, Write as _};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, queue,
    terminal::{
        disable_raw_mode, enable_raw_mode, BeginSynchronizedUpdate, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use hexpane::app::App;
use hexpane::codec::HexCase;
use hexpane::config::Config;
use hexpane::encoding;
use hexpane::host::{Surface, Target};
use hexpane::session::{CommitContext, EditMode, Scope};

/// Hex/ASCII viewer and byte editor for raw HTTP messages
#[derive(Parser, Debug)]
#[command(name = "hexpane")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw HTTP message to open
    #[arg(value_name = "FILE")]
    file: Option<String>,

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

    /// Edit one row at a time instead of the whole buffer
    #[arg(long)]
    per_row: bool,

    /// Read-only mode (history view, saving is refused)
    #[arg(short, long)]
    readonly: bool,

    /// Treat the message as a response (saving is refused)
    #[arg(long)]
    response: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

impl Args {
    /// 設定ファイルを読み、コマンドライン指定で上書き
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if self.body {
            config.scope = Scope::Body;
        }
        if self.upper {
            config.hex_case = HexCase::Upper;
        }
        if let Some(max_chars) = self.max_chars {
            config.max_chars = max_chars;
        }
        if self.per_row {
            config.edit_mode = EditMode::PerRow;
        }
        Ok(config)
    }

    fn context(&self) -> CommitContext {
        CommitContext {
            surface: if self.readonly {
                Surface::History
            } else {
                Surface::Replay
            },
            target: if self.response {
                Target::Response
            } else {
                Target::Request
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 画面を使うため、ログはファイル指定時のみ
    if let Some(path) = &args.log {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let config = args.config()?;

    // 標準入力からデータを読み込む（パイプされている場合）
    let stdin_data = if !io::stdin().is_terminal() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        Some(data)
    } else {
        None
    };

    // ターミナルの初期化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // アプリケーションの実行
    let result = run_app(&mut terminal, &args, &config, stdin_data);

    // ターミナルの後処理
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    args: &Args,
    config: &Config,
    stdin_data: Option<Vec<u8>>,
) -> Result<()> {
    let mut app = App::new(config, args.context());

    // データを読み込む（優先順位: ファイル > 標準入力）
    if let Some(ref path) = args.file {
        app.open(path)?;
    } else if let Some(data) = stdin_data {
        app.load_text(&encoding::decode_bytes(&data));
    }

    // ウィンドウタイトルを設定
    let title = format!("hexpane - {}", app.filename().unwrap_or("[stdin]"));
    execute!(terminal.backend_mut(), SetTitle(&title))?;

    // メインループ
    loop {
        // Synchronized Update: 描画のちらつきを防止
        queue!(terminal.backend_mut(), BeginSynchronizedUpdate)?;
        terminal.draw(|f| app.draw(f))?;
        queue!(terminal.backend_mut(), EndSynchronizedUpdate)?;
        terminal.backend_mut().flush()?;

        app.handle_event()?;

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
