//! Folio command-line tool.
//!
//! Edits documents stored in a local SQLite database. Each invocation loads
//! the document into an engine session, applies one operation, and saves it
//! back, so history lives only for the length of a command.
//!
//! Usage:
//!   folio new "Portfolio"
//!   folio add Portfolio hero
//!   folio add Portfolio contact --secondary --title "Get in touch"
//!   folio move Portfolio 0 2
//!   folio layout Portfolio --mode sidebar --widgets sidebar
//!   folio render Portfolio --mode two-column --overlay tweaks.json
//!   folio export Portfolio --out portfolio.json
//!
//! Documents are addressed by exact name, unique name prefix, or id prefix.
//! Logging goes to stderr; set `RUST_LOG=folio=debug` for no-op traces.

mod config;
mod outline;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use folio_compose::{
    BuiltinCatalog, Confirm, DeletionOutcome, Engine, Overlay, SeedSource, render_view,
};
use folio_store::{DocumentStore, SqliteStore, export_json, import_json};
use folio_types::{
    BlockId, BlockKind, BlockPatch, Collection, Document, DocumentId, LayoutMode, LayoutPatch, Slot,
};

use crate::config::Config;
use crate::outline::OutlineRenderer;

/// Compose documents from ordered blocks.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Block-based document composer")]
struct Args {
    /// Config file (defaults to ~/.config/folio/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty document
    New { name: String },

    /// List stored documents
    List,

    /// Print a document's blocks in order
    Show { document: String },

    /// Append a block from the built-in catalog
    Add {
        document: String,
        /// Block kind (text, hero, skills, ...)
        kind: String,
        /// Add to the widget collection instead of sections
        #[arg(long)]
        secondary: bool,
        #[arg(long)]
        title: Option<String>,
    },

    /// Move a block by rendered index
    Move {
        document: String,
        from: usize,
        to: usize,
        #[arg(long)]
        secondary: bool,
    },

    /// Hide a block from rendering
    Hide {
        document: String,
        /// Block id prefix
        block: String,
    },

    /// Make a hidden block render again
    Unhide {
        document: String,
        /// Block id prefix
        block: String,
    },

    /// Change the layout mode, spacing, or widget placement
    Layout {
        document: String,
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        section_gap: Option<u32>,
        #[arg(long)]
        region_gap: Option<u32>,
        #[arg(long)]
        page_padding: Option<u32>,
        /// Slot for widgets, or "none" to leave them out
        #[arg(long)]
        widgets: Option<String>,
    },

    /// Remove a block after confirmation
    Remove {
        document: String,
        /// Block id prefix
        block: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the region-partitioned outline
    Render {
        document: String,
        /// Layout mode (defaults to config, then the document's own)
        #[arg(long)]
        mode: Option<String>,
        /// Overlay JSON applied at read time
        #[arg(long)]
        overlay: Option<PathBuf>,
    },

    /// Write a document as JSON
    Export {
        document: String,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate and store a JSON document
    Import { file: PathBuf },

    /// Delete a stored document
    Delete {
        document: String,
        #[arg(short, long)]
        yes: bool,
    },
}

/// Confirmation on the terminal: `y`/`yes` grants, anything else declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        std::io::stderr().flush().ok();
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Always-yes confirmation for `--yes`.
struct Assume;

impl Confirm for Assume {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes { Box::new(Assume) } else { Box::new(StdinConfirm) }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let db_path = args.db.clone().unwrap_or_else(|| config.db_path());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    tracing::debug!(path = %db_path.display(), "store open");

    let mut engine = Engine::new(config.session());
    run(args.command, &config, &store, &mut engine)
}

fn run(command: Command, config: &Config, store: &SqliteStore, engine: &mut Engine) -> Result<()> {
    match command {
        Command::New { name } => {
            let id = engine.create_document().id;
            engine.rename(&id, &name)?;
            engine.save(&id, store)?;
            println!("{id}");
        }

        Command::List => {
            for s in store.list()? {
                println!(
                    "{}  {:<24}  {} sections, {} widgets",
                    s.id.short(),
                    s.name,
                    s.sections,
                    s.widgets
                );
            }
        }

        Command::Show { document } => {
            let id = open(engine, store, &document)?;
            print_blocks(engine.document(&id)?);
        }

        Command::Add {
            document,
            kind,
            secondary,
            title,
        } => {
            let catalog = BuiltinCatalog;
            let Some(kind) = BlockKind::from_str(&kind) else {
                let known: Vec<&str> = catalog.kinds().iter().map(BlockKind::as_str).collect();
                bail!("unknown block kind '{kind}' (expected one of: {})", known.join(", "));
            };
            let mut seed = catalog
                .seed(kind)
                .with_context(|| format!("no template for {kind}"))?;
            if let Some(title) = title {
                seed.title = title;
            }
            let id = open(engine, store, &document)?;
            engine.add_block(&id, collection(secondary), &seed)?;
            engine.save(&id, store)?;
        }

        Command::Move {
            document,
            from,
            to,
            secondary,
        } => {
            let id = open(engine, store, &document)?;
            let moved = engine
                .session_mut(&id)?
                .move_block(collection(secondary), from, Some(to));
            if !moved {
                bail!("nothing moved: index out of range or already in place");
            }
            engine.save(&id, store)?;
        }

        Command::Hide { document, block } => {
            set_visible(engine, store, &document, &block, false)?
        }

        Command::Unhide { document, block } => {
            set_visible(engine, store, &document, &block, true)?
        }

        Command::Layout {
            document,
            mode,
            section_gap,
            region_gap,
            page_padding,
            widgets,
        } => {
            let mut patch = LayoutPatch {
                section_gap,
                region_gap,
                page_padding,
                ..Default::default()
            };
            if let Some(m) = mode {
                patch.mode = Some(
                    LayoutMode::from_str(&m).with_context(|| format!("unknown layout mode '{m}'"))?,
                );
            }
            if let Some(w) = widgets {
                patch.secondary_slot = Some(parse_widget_slot(&w)?);
            }
            let id = open(engine, store, &document)?;
            let layout = &engine.set_layout(&id, &patch)?.layout;
            let placement = layout
                .secondary_slot
                .map_or_else(|| "none".to_string(), |s| s.to_string());
            println!("layout: {}  widgets: {placement}", layout.mode);
            engine.save(&id, store)?;
        }

        Command::Remove {
            document,
            block,
            yes,
        } => {
            let id = open(engine, store, &document)?;
            let (col, block) = resolve_block(engine.document(&id)?, &block)?;
            let mut confirm = confirmer(yes);
            let outcome = engine
                .session_mut(&id)?
                .remove_block_confirmed(col, &block, confirm.as_mut());
            match outcome {
                Some(DeletionOutcome::Removed) => engine.save(&id, store)?,
                Some(DeletionOutcome::Declined) => eprintln!("kept"),
                Some(DeletionOutcome::Stale) | None => bail!("block already gone"),
            }
        }

        Command::Render {
            document,
            mode,
            overlay,
        } => {
            let id = open(engine, store, &document)?;
            let overlay = match overlay {
                Some(path) => read_overlay(&path)?,
                None => Overlay::new(),
            };
            let mode = match mode {
                Some(m) => LayoutMode::from_str(&m)
                    .with_context(|| format!("unknown layout mode '{m}'"))?,
                None => config
                    .render
                    .default_mode
                    .unwrap_or(engine.document(&id)?.layout.mode),
            };
            let view = engine.render(&id, &overlay, mode)?;
            let mut out = OutlineRenderer::new(std::io::stdout().lock());
            let stats = render_view(&view, &mut out);
            out.finish()?;
            if stats.skipped > 0 {
                tracing::info!(skipped = stats.skipped, "some blocks could not be rendered");
            }
        }

        Command::Export { document, out } => {
            let id = open(engine, store, &document)?;
            let json = export_json(engine.document(&id)?)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "exported");
                }
                None => println!("{json}"),
            }
        }

        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let doc = import_json(&text).with_context(|| format!("importing {}", file.display()))?;
            store.save(&doc)?;
            tracing::info!(document = %doc.id, name = %doc.name, "imported");
            println!("{}", doc.id);
        }

        Command::Delete { document, yes } => {
            let id = resolve_document(store, &document)?;
            let name = store
                .list()?
                .into_iter()
                .find(|s| s.id == id)
                .map(|s| s.name)
                .unwrap_or_default();
            if confirmer(yes).confirm(&format!("Delete document \"{name}\"?")) {
                store.delete(&id)?;
                tracing::info!(document = %id, "deleted");
            } else {
                eprintln!("kept");
            }
        }
    }
    Ok(())
}

fn collection(secondary: bool) -> Collection {
    if secondary {
        Collection::Secondary
    } else {
        Collection::Main
    }
}

/// `none` clears the placement; anything else must name a slot.
fn parse_widget_slot(value: &str) -> Result<Option<Slot>> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match value.parse::<Slot>() {
        Ok(slot) => Ok(Some(slot)),
        Err(_) => bail!("unknown slot '{value}'"),
    }
}

/// Set a block's visibility; leaves the document untouched when it already matches.
fn set_visible(
    engine: &mut Engine,
    store: &SqliteStore,
    document: &str,
    query: &str,
    visible: bool,
) -> Result<()> {
    let id = open(engine, store, document)?;
    let (col, block) = resolve_block(engine.document(&id)?, query)?;
    let current = engine
        .document(&id)?
        .block(col, &block)
        .map(|b| b.visible);
    if current == Some(visible) {
        eprintln!("unchanged");
        return Ok(());
    }
    engine.apply_patch(&id, col, &block, &BlockPatch::default().visible(visible))?;
    engine.save(&id, store)?;
    Ok(())
}

fn resolve_document(store: &SqliteStore, query: &str) -> Result<DocumentId> {
    let summaries = store.list()?;
    let id = folio_types::resolve_document_prefix(
        summaries.iter().map(|s| (s.id, s.name.as_str())),
        query,
    )?;
    Ok(id)
}

/// Resolve `query` against the store and load it into a session.
fn open(engine: &mut Engine, store: &SqliteStore, query: &str) -> Result<DocumentId> {
    let id = resolve_document(store, query)?;
    engine.load(&id, store)?;
    Ok(id)
}

/// Find a block in either collection by id prefix.
fn resolve_block(doc: &Document, query: &str) -> Result<(Collection, BlockId)> {
    let hex = query.replace('-', "").to_ascii_lowercase();
    let matches: Vec<(Collection, BlockId)> = [Collection::Main, Collection::Secondary]
        .into_iter()
        .flat_map(|c| doc.blocks(c).iter().map(move |b| (c, b.id)))
        .filter(|(_, id)| !hex.is_empty() && id.matches_hex_prefix(&hex))
        .collect();
    match matches.as_slice() {
        [one] => Ok(*one),
        [] => bail!("no block matches '{query}'"),
        _ => bail!("'{query}' matches {} blocks", matches.len()),
    }
}

fn read_overlay(path: &Path) -> Result<Overlay> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing overlay {}", path.display()))
}

fn print_blocks(doc: &Document) {
    println!("{}  ({})", doc.name, doc.id.short());
    println!("layout: {}", doc.layout.mode);
    for c in [Collection::Main, Collection::Secondary] {
        println!("{c}:");
        for b in doc.ordered(c) {
            println!(
                "  {}  {:>3}  r{}  {:<12} {}{}",
                b.id.short(),
                b.order,
                b.region,
                b.kind.as_str(),
                b.title,
                if b.visible { "" } else { "  (hidden)" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_slot_parsing() {
        assert_eq!(parse_widget_slot("sidebar").unwrap(), Some(Slot::Sidebar));
        assert_eq!(parse_widget_slot("Footer").unwrap(), Some(Slot::Footer));
        assert_eq!(parse_widget_slot("none").unwrap(), None);
        assert!(parse_widget_slot("gutter").is_err());
    }

    #[test]
    fn test_layout_command_parses() {
        let args = Args::try_parse_from([
            "folio", "layout", "cv", "--mode", "sidebar", "--section-gap", "12", "--widgets", "none",
        ])
        .unwrap();
        match args.command {
            Command::Layout {
                document,
                mode,
                section_gap,
                widgets,
                ..
            } => {
                assert_eq!(document, "cv");
                assert_eq!(mode.as_deref(), Some("sidebar"));
                assert_eq!(section_gap, Some(12));
                assert_eq!(widgets.as_deref(), Some("none"));
            }
            other => panic!("parsed as {other:?}"),
        }
    }

    #[test]
    fn test_hide_twice_keeps_block_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("folio.db")).unwrap();
        let mut engine = Engine::default();
        let id = engine.create_document().id;
        let block = engine
            .add_block(&id, Collection::Main, &folio_types::BlockSeed::new(BlockKind::Text, "About"))
            .unwrap()
            .main[0]
            .id;
        engine.save(&id, &store).unwrap();

        let query = block.to_string();
        for _ in 0..2 {
            let mut engine = Engine::default();
            set_visible(&mut engine, &store, &id.to_string(), &query, false).unwrap();
        }
        let stored = store.load(&id).unwrap().unwrap();
        assert!(!stored.main[0].visible);

        let mut engine = Engine::default();
        set_visible(&mut engine, &store, &id.to_string(), &query, true).unwrap();
        assert!(store.load(&id).unwrap().unwrap().main[0].visible);
    }

    #[test]
    fn test_layout_places_widgets_for_render() {
        let mut engine = Engine::default();
        let id = engine.create_document().id;
        let seed = BuiltinCatalog.seed(BlockKind::Contact).unwrap();
        engine.add_block(&id, Collection::Secondary, &seed).unwrap();

        let view = engine.render(&id, &Overlay::new(), LayoutMode::Sidebar).unwrap();
        assert_eq!(view.slot(Slot::Sidebar).len(), 1);

        let patch = LayoutPatch {
            secondary_slot: Some(parse_widget_slot("none").unwrap()),
            ..Default::default()
        };
        engine.set_layout(&id, &patch).unwrap();
        let view = engine.render(&id, &Overlay::new(), LayoutMode::Sidebar).unwrap();
        assert_eq!(view.block_count(), 0);
    }
}
