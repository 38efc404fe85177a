use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};

use ytgrid::block;
use ytgrid::grid::{self, Card, RenderedBlock};
use ytgrid::html;
use ytgrid::layout::GridStyle;
use ytgrid::notes::{self, NoteOutcome};
use ytgrid::notify::LogNotifier;
use ytgrid::settings::{self, Settings};
use ytgrid::vault::{self, FsVault, SystemWorkspace, VaultError, Workspace};
use ytgrid::video_id::extract_video_id;
use ytgrid::yt::{MetadataClient, TitleLookup};

#[derive(Parser, Debug)]
#[command(about = "Render youtubeGrid blocks and manage video notes from the terminal")]
struct Args {
    /// Vault root (defaults to the nearest folder holding .obsidian)
    #[arg(long, global = true, value_name = "DIR")]
    vault: Option<PathBuf>,

    /// Use this API key instead of the stored one
    #[arg(long, global = true, value_name = "KEY")]
    api_key: Option<String>,

    /// Override the Data API base URL
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every grid block of a document
    Render {
        document: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Skip title lookups
        #[arg(long)]
        offline: bool,
    },
    /// Create or open the note for one video of a document
    Note {
        document: PathBuf,
        url: String,
        /// Only look in this grid block (1-based)
        #[arg(long, value_name = "N")]
        block: Option<usize>,
        /// Do not hand the note to the system opener
        #[arg(long)]
        no_open: bool,
    },
    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Show,
    SetApiKey { key: String },
    ClearApiKey,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
    Html,
}

struct NoOpenWorkspace;

impl Workspace for NoOpenWorkspace {
    fn open(&self, _path: &str, _origin: &str) -> Result<(), VaultError> {
        Ok(())
    }
}

fn metadata_client(args: &Args, settings: &Settings) -> Option<MetadataClient> {
    let client = MetadataClient::from_settings(settings)?;
    Some(match &args.endpoint {
        Some(endpoint) => client.with_endpoint(endpoint.clone()),
        None => client,
    })
}

fn mask_key(key: &str) -> String {
    let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("{}{}", "*".repeat(key.chars().count().saturating_sub(4)), visible)
}

fn print_text(blocks: &[RenderedBlock]) {
    if blocks.is_empty() {
        println!("no {} blocks", block::BLOCK_TAG);
    }
    for rendered in blocks {
        println!(
            "block {} (line {}): {} column(s), {} card(s)",
            rendered.index + 1,
            rendered.start_line,
            rendered.grid.columns,
            rendered.grid.cards.len()
        );
        for card in &rendered.grid.cards {
            println!(
                "  {} | {} | {}",
                card.video_id,
                card.title.as_deref().unwrap_or("(no title)"),
                card.watch_url
            );
        }
    }
}

async fn render(
    args: &Args,
    settings: &Settings,
    document: &Path,
    format: Format,
    offline: bool,
) -> anyhow::Result<ExitCode> {
    let markdown = tokio::fs::read_to_string(document)
        .await
        .with_context(|| format!("reading {}", document.display()))?;
    let client = if offline {
        None
    } else {
        metadata_client(args, settings)
    };
    let lookup = client.as_ref().map(|c| c as &dyn TitleLookup);
    let blocks = grid::render_document(&markdown, lookup).await;

    match format {
        Format::Text => print_text(&blocks),
        Format::Json => println!("{}", serde_json::to_string_pretty(&blocks)?),
        Format::Html => print!(
            "{}",
            html::render_page(
                &document.display().to_string(),
                &blocks,
                &GridStyle::default()
            )
        ),
    }
    Ok(ExitCode::SUCCESS)
}

fn find_card(blocks: &[RenderedBlock], video_id: &str, only: Option<usize>) -> Option<Card> {
    blocks
        .iter()
        .filter(|b| only.is_none_or(|n| b.index + 1 == n))
        .flat_map(|b| b.grid.cards.iter())
        .find(|card| card.video_id == video_id)
        .cloned()
}

async fn note(
    args: &Args,
    settings: &Settings,
    document: &Path,
    url: &str,
    only_block: Option<usize>,
    no_open: bool,
) -> anyhow::Result<ExitCode> {
    let Some(video_id) = extract_video_id(url) else {
        bail!("'{url}' does not contain a YouTube video id");
    };
    let location = vault::locate_document(document, args.vault.as_deref())?;
    let markdown = tokio::fs::read_to_string(document)
        .await
        .with_context(|| format!("reading {}", document.display()))?;

    // Only the requested card needs a title.
    let blocks = grid::render_document(&markdown, None).await;
    let Some(mut card) = find_card(&blocks, &video_id, only_block) else {
        bail!(
            "video {video_id} is not part of any {} block in {}",
            block::BLOCK_TAG,
            document.display()
        );
    };
    if let Some(client) = metadata_client(args, settings) {
        card = Card::new(&video_id, client.fetch_title(&video_id).await);
    }

    let vault = FsVault::new(&location.root);
    let workspace: Box<dyn Workspace> = if no_open {
        Box::new(NoOpenWorkspace)
    } else {
        Box::new(SystemWorkspace::new(&location.root))
    };
    let outcome = notes::open_or_create_note(
        &vault,
        workspace.as_ref(),
        &LogNotifier,
        &card.action,
        &location.source_path,
    )
    .await?;

    match outcome {
        NoteOutcome::MissingTitle => Ok(ExitCode::from(2)),
        NoteOutcome::Created { path } | NoteOutcome::AlreadyExists { path } => {
            println!("{}", vault.resolve(&path).display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn settings_command(action: &SettingsAction) -> anyhow::Result<ExitCode> {
    let mut stored = settings::load_or_default();
    match action {
        SettingsAction::Show => {
            let path = settings::settings_path()?;
            println!("file: {}", path.display());
            match stored.api_key() {
                Some(key) => println!("api key: {}", mask_key(key)),
                None => println!("api key: (not set)"),
            }
            return Ok(ExitCode::SUCCESS);
        }
        SettingsAction::SetApiKey { key } => stored.set_api_key(key),
        SettingsAction::ClearApiKey => stored.set_api_key(""),
    }
    let path = settings::save(&stored)?;
    println!("saved {}", path.display());
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    ytgrid::logging::init(args.verbose);

    let settings = settings::load_or_default()
        .with_env_override()
        .with_override(args.api_key.as_deref());

    match &args.command {
        Command::Render {
            document,
            format,
            offline,
        } => render(&args, &settings, document, *format, *offline).await,
        Command::Note {
            document,
            url,
            block,
            no_open,
        } => note(&args, &settings, document, url, *block, *no_open).await,
        Command::Settings { action } => settings_command(action),
    }
}
