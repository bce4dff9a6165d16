//! `arabic-keyboard`: convert, browse variants, manage history and run a
//! line-oriented editing session from the terminal.
//!
//! Usage:
//!   arabic-keyboard convert marhaba
//!   arabic-keyboard variants ا
//!   arabic-keyboard --memory edit
//!   arabic-keyboard history list

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use libarabic::display::{render_entry, render_layout, render_popover, render_status, render_variants};
use libarabic::{
    search_url, transliterate, EditorContext, EditorSession, Interaction, Key, KeyboardConfig,
    SaveOutcome, SearchKind, Storage, StdoutOpener, StorageKind,
};
use libarabic_core::{Anchor, ExportArtifact};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "arabic-keyboard")]
#[command(about = "Virtual Arabic keyboard with transliteration and saved history")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History database (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep history in memory only
    #[arg(long, global = true, conflicts_with = "db")]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transliterate Latin text to Arabic
    Convert { text: Vec<String> },
    /// Show long-press variants for a key, or for every key
    Variants { key: Option<String> },
    /// Print the keyboard layout
    Layout,
    /// Inspect and manage saved history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Print a search URL for the text
    Search {
        /// Search videos instead of the web
        #[arg(long)]
        video: bool,
        text: Vec<String>,
    },
    /// Interactive line-oriented editor
    Edit,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List entries, newest first
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the full text of an entry
    Show { id: String },
    /// Delete one entry
    Delete { id: String },
    /// Delete every entry
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Save text as a new entry
    Save { text: Vec<String> },
    /// Write an entry to arabic-text-<date>.txt
    Export {
        id: String,
        /// Output directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> anyhow::Result<KeyboardConfig> {
    let mut config = match &cli.config {
        Some(path) => KeyboardConfig::load_toml(path)
            .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", path.display(), e))?,
        None => KeyboardConfig::default(),
    };
    if cli.memory {
        config.storage = StorageKind::Memory;
    } else if let Some(db) = &cli.db {
        config.storage = StorageKind::Redb;
        config.db_path = Some(db.clone());
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    debug!(storage = ?config.storage, "configuration loaded");

    match cli.command {
        Command::Convert { text } => {
            println!("{}", transliterate(&text.join(" ")));
        }
        Command::Variants { key } => match render_variants(key.as_deref()) {
            Some(out) => println!("{}", out),
            None => println!("(no variants)"),
        },
        Command::Layout => print!("{}", render_layout()),
        Command::Search { video, text } => {
            let kind = if video { SearchKind::Video } else { SearchKind::Web };
            match search_url(kind, &text.join(" ")) {
                Some(url) => println!("{}", url),
                None => bail!("nothing to search for"),
            }
        }
        Command::History { action } => {
            let session = config
                .open_session()
                .context("failed to open history storage")?;
            run_history(&session, action)?;
        }
        Command::Edit => {
            let session = config
                .open_session()
                .context("failed to open history storage")?;
            run_editor(session)?;
        }
    }
    Ok(())
}

fn run_history(session: &EditorSession<Storage>, action: HistoryAction) -> anyhow::Result<()> {
    let history = session.history();
    match action {
        HistoryAction::List { json } => {
            let entries = history.list();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("(no history)");
            } else {
                let now = Utc::now();
                for entry in &entries {
                    println!("{}", render_entry(entry, now));
                }
            }
        }
        HistoryAction::Show { id } => match history.load(&id) {
            Some(text) => println!("{}", text),
            None => bail!("no history entry {}", id),
        },
        HistoryAction::Delete { id } => {
            if !history.delete(&id) {
                bail!("no history entry {}", id);
            }
        }
        HistoryAction::Clear { yes } => {
            if !yes {
                bail!("refusing to clear history without --yes");
            }
            history.clear_all();
        }
        HistoryAction::Save { text } => match history.save(&text.join(" ")) {
            SaveOutcome::Saved(entry) => println!("{}", entry.id),
            SaveOutcome::Blank => bail!("nothing to save"),
            SaveOutcome::Duplicate => println!("already in history"),
            SaveOutcome::StorageFailed => bail!("failed to write history"),
        },
        HistoryAction::Export { id, dir } => {
            let entry = match history.get(&id) {
                Some(entry) => entry,
                None => bail!("no history entry {}", id),
            };
            let path = ExportArtifact::from_entry(&entry)
                .write_to(&dir)
                .with_context(|| format!("failed to write into {}", dir.display()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

const EDITOR_HELP: &str = "\
Type text and press Enter to insert it. Commands:
  :auto          toggle Latin-to-Arabic conversion of typed text
  :convert       convert the whole buffer
  :bs            backspace
  :nl            insert a newline
  :hold <KEY>    long-press a key and show its variants
  :pick <N>      choose variant N from the open picker
  :save          save the buffer to history
  :history       list saved entries
  :load <ID>     replace the buffer with a saved entry
  :search        print a web search URL for the buffer
  :video         print a video search URL for the buffer
  :export        write the buffer to arabic-text.txt
  :clear         empty the buffer
  :quit          leave (a pending autosave is written first)";

fn run_editor(mut session: EditorSession<Storage>) -> anyhow::Result<()> {
    println!("{}", EDITOR_HELP);
    let mut ctx = EditorContext::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        let now = Instant::now();

        // Timers that elapsed while waiting for input
        if let Some(outcome) = session.tick(now).autosave {
            debug!(?outcome, "autosave");
        }

        if !handle_line(&mut session, &line, now) {
            break;
        }

        session.sync_to_context(&mut ctx);
        println!("{}", ctx.text);
        if let Some(popover) = &ctx.popover {
            println!("  {}", render_popover(popover));
        }
        if let Some(notice) = ctx.take_notice() {
            println!("  {}", notice.message());
        }
        println!("  {}", render_status(&ctx));
        stdout.flush()?;
    }

    // Flush a pending autosave instead of dropping it
    if let Some(deadline) = session.next_deadline() {
        if let Some(SaveOutcome::StorageFailed) = session.tick(deadline).autosave {
            warn!("final autosave failed");
        }
    }
    Ok(())
}

/// Apply one input line. Returns false on `:quit`.
fn handle_line(session: &mut EditorSession<Storage>, line: &str, now: Instant) -> bool {
    let (command, arg) = match line.strip_prefix(':') {
        Some(rest) => {
            let mut parts = rest.splitn(2, ' ');
            (parts.next().unwrap_or(""), parts.next().map(str::trim))
        }
        None => {
            session.type_text(line, now);
            return true;
        }
    };

    match (command, arg) {
        ("quit", _) | ("q", _) => return false,
        ("auto", _) => {
            let on = session.toggle_auto_convert();
            println!("  auto-convert {}", if on { "on" } else { "off" });
        }
        ("convert", _) => session.convert_all(now),
        ("bs", _) => {
            session.press_key(Key::Backspace, Anchor::default(), now);
        }
        ("nl", _) => {
            session.press_key(Key::Enter, Anchor::default(), now);
        }
        ("hold", Some(key)) if !key.is_empty() => {
            session.press_key(Key::char(key), Anchor::default(), now);
            let held = now + session.long_press_threshold();
            if let Interaction::None = session.tick(held).interaction {
                // No picker for this key; the hold ends as a tap
                session.release_key(held);
            }
        }
        ("pick", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => {
                if let Interaction::None = session.select_variant_index(n - 1, now) {
                    println!("  no such variant");
                }
            }
            _ => println!("  usage: :pick <N>"),
        },
        ("save", _) => {
            if let SaveOutcome::Blank = session.manual_save() {
                println!("  nothing to save");
            }
        }
        ("history", _) => {
            let now_utc = Utc::now();
            for entry in session.history_entries() {
                println!("  {}", render_entry(&entry, now_utc));
            }
        }
        ("load", Some(id)) => {
            if !session.load_entry(id) {
                println!("  no history entry {}", id);
            }
        }
        ("search", _) => {
            if !session.search(SearchKind::Web, &mut StdoutOpener) {
                println!("  nothing to search for");
            }
        }
        ("video", _) => {
            if !session.search(SearchKind::Video, &mut StdoutOpener) {
                println!("  nothing to search for");
            }
        }
        ("export", _) => match session.export().write_to(".") {
            Ok(path) => println!("  wrote {}", path.display()),
            Err(e) => println!("  export failed: {}", e),
        },
        ("clear", _) => session.clear(),
        _ => println!("{}", EDITOR_HELP),
    }
    true
}
