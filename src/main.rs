use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use snappy_tree_lib::config::ThemeName;
use snappy_tree_lib::observer::LogObserver;
use snappy_tree_lib::ui::{self, Theme};
use snappy_tree_lib::{Config, Document, Session};

/// Explore a JSON document in the terminal with vim-style keys.
#[derive(Debug, Parser)]
#[command(name = "snappy-tree", version, about)]
struct Cli {
    /// JSON file to open; reads stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Read the document from the system clipboard
    #[arg(long, conflicts_with = "file")]
    clipboard: bool,

    /// Config file (defaults to <config dir>/snappy-tree/config.toml)
    #[arg(long, env = "SNAPPY_TREE_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    theme: Option<ThemeName>,

    /// Start with the root collapsed
    #[arg(long)]
    collapsed: bool,

    /// Disable the copy commands
    #[arg(long)]
    no_clipboard: bool,

    /// Write logs here (filter with SNAPPY_TREE_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path else { return Ok(()) };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_env("SNAPPY_TREE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_document(cli: &Cli) -> anyhow::Result<Document> {
    if cli.clipboard {
        return Document::open_clipboard().context("loading JSON from clipboard");
    }
    match &cli.file {
        Some(path) if path.as_os_str() != "-" => {
            Document::open_file(path).with_context(|| format!("opening {}", path.display()))
        }
        _ => {
            if std::io::stdin().is_terminal() {
                bail!("no input: pass a JSON file, pipe one on stdin, or use --clipboard");
            }
            Document::open_stdin().context("reading JSON from stdin")
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut config = Config::load_or_default(cli.config.as_deref()).context("loading config")?;
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.collapsed {
        config.initially_expanded = false;
    }
    if cli.no_clipboard {
        config = config.read_only();
    }

    let document = load_document(&cli)?;
    let theme = Theme::named(config.theme);
    let mut session = Session::new(document, config).with_observer(LogObserver);
    ui::run(&mut session, &theme).context("running terminal UI")?;
    Ok(())
}
