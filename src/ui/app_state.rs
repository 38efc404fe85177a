use std::path::PathBuf;
use std::sync::mpsc;

use egui::Context;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::grid::{self, NoteAction, RenderedBlock};
use crate::notes;
use crate::notify::{ChannelNotifier, Notice, NoticeLevel, Notifier};
use crate::settings::{self, Settings};
use crate::vault::{self, DocumentLocation, FsVault, SystemWorkspace};
use crate::yt::{MetadataClient, TitleLookup};

use super::thumbnails::ThumbnailCache;

pub enum LoadResult {
    Loaded(Vec<RenderedBlock>),
    Failed(String),
}

/// Something the user clicked on a card.
pub enum CardAction {
    OpenVideo(String),
    Note(NoteAction),
}

pub struct OpenDocument {
    pub path: PathBuf,
    pub location: DocumentLocation,
}

pub struct AppState {
    pub settings: Settings,
    pub api_key_input: String,
    pub status: String,
    pub status_level: NoticeLevel,
    pub runtime: Runtime,
    pub vault_override: Option<PathBuf>,
    pub document: Option<OpenDocument>,
    pub blocks: Vec<RenderedBlock>,
    pub is_loading: bool,
    pub pending_task: Option<JoinHandle<()>>,
    pub load_rx: Option<mpsc::Receiver<LoadResult>>,
    pub notice_tx: mpsc::Sender<Notice>,
    pub notice_rx: mpsc::Receiver<Notice>,
    pub thumbnail_cache: ThumbnailCache,
}

impl AppState {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        document: Option<PathBuf>,
        vault_override: Option<PathBuf>,
    ) -> Self {
        super::theme::apply_theme(&cc.egui_ctx);

        let settings = settings::load_or_default();
        let api_key_input = settings.api_key().unwrap_or_default().to_owned();
        let runtime = Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to start tokio runtime");
        let (notice_tx, notice_rx) = mpsc::channel();

        let mut state = Self {
            settings,
            api_key_input,
            status: String::from("Ready."),
            status_level: NoticeLevel::Info,
            runtime,
            vault_override,
            document: None,
            blocks: Vec::new(),
            is_loading: false,
            pending_task: None,
            load_rx: None,
            notice_tx,
            notice_rx,
            thumbnail_cache: ThumbnailCache::new(),
        };
        if let Some(path) = document {
            state.open_document(&cc.egui_ctx, path);
        }
        state
    }

    fn set_status(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.status_level = level;
        self.status = message.into();
    }

    pub fn pick_document(&mut self, ctx: &Context) {
        match native_dialog::FileDialog::new()
            .add_filter("Markdown", &["md", "markdown"])
            .add_filter("All files", &["*"])
            .show_open_single_file()
        {
            Ok(Some(path)) => self.open_document(ctx, path),
            Ok(None) => {}
            Err(err) => self.set_status(NoticeLevel::Error, format!("File dialog failed: {err}")),
        }
    }

    pub fn open_document(&mut self, ctx: &Context, path: PathBuf) {
        match vault::locate_document(&path, self.vault_override.as_deref()) {
            Ok(location) => {
                info!(source_path = %location.source_path, root = %location.root.display(), "opened document");
                self.document = Some(OpenDocument { path, location });
                self.blocks.clear();
                self.launch_load(ctx);
            }
            Err(err) => self.set_status(NoticeLevel::Error, err.to_string()),
        }
    }

    /// Re-reads the open document and rebuilds its grids in the background.
    pub fn launch_load(&mut self, ctx: &Context) {
        let Some(document) = &self.document else {
            return;
        };
        if let Some(handle) = self.pending_task.take() {
            handle.abort();
        }
        let path = document.path.clone();
        let settings = self.settings.clone().with_env_override();
        let repaint = ctx.clone();
        let (tx, rx) = mpsc::channel();

        self.is_loading = true;
        self.set_status(NoticeLevel::Info, "Loading...");
        let task = self.runtime.spawn(async move {
            let message = match tokio::fs::read_to_string(&path).await {
                Ok(markdown) => {
                    let client = MetadataClient::from_settings(&settings);
                    let lookup = client.as_ref().map(|c| c as &dyn TitleLookup);
                    LoadResult::Loaded(grid::render_document(&markdown, lookup).await)
                }
                Err(err) => LoadResult::Failed(format!("Failed to read {}: {err}", path.display())),
            };
            let _ = tx.send(message);
            repaint.request_repaint();
        });
        self.pending_task = Some(task);
        self.load_rx = Some(rx);
    }

    /// Applies finished loads and queued notices.
    pub fn poll_background(&mut self) {
        if let Some(result) = self.load_rx.as_ref().and_then(|rx| rx.try_recv().ok()) {
            match result {
                LoadResult::Loaded(blocks) => {
                    let cards: usize = blocks.iter().map(|b| b.grid.cards.len()).sum();
                    self.thumbnail_cache.retain_ids(
                        blocks
                            .iter()
                            .flat_map(|b| b.grid.cards.iter())
                            .map(|card| card.video_id.as_str()),
                    );
                    let message = format!("Rendered {} grid(s) with {cards} video(s).", blocks.len());
                    self.blocks = blocks;
                    self.set_status(NoticeLevel::Info, message);
                }
                LoadResult::Failed(err) => self.set_status(NoticeLevel::Error, err),
            }
            self.is_loading = false;
            self.load_rx = None;
            self.pending_task = None;
        }

        while let Ok(notice) = self.notice_rx.try_recv() {
            self.set_status(notice.level, notice.message);
        }
    }

    /// Saves the key typed into the settings field.
    pub fn update_api_key(&mut self) {
        self.settings.set_api_key(&self.api_key_input);
        if let Err(err) = settings::save(&self.settings) {
            warn!("{err}");
            self.set_status(NoticeLevel::Error, format!("Failed to save settings: {err}"));
        }
    }

    pub fn handle_card_action(&mut self, ctx: &Context, action: CardAction) {
        match action {
            CardAction::OpenVideo(url) => {
                if let Err(err) = open::that(&url) {
                    self.set_status(NoticeLevel::Error, format!("Failed to open browser: {err}"));
                }
            }
            CardAction::Note(action) => self.launch_note(ctx, action),
        }
    }

    fn launch_note(&mut self, ctx: &Context, action: NoteAction) {
        let Some(document) = &self.document else {
            return;
        };
        let root = document.location.root.clone();
        let source_path = document.location.source_path.clone();
        let notifier = ChannelNotifier::new(self.notice_tx.clone());
        let repaint = ctx.clone();
        self.runtime.spawn(async move {
            let vault = FsVault::new(&root);
            let workspace = SystemWorkspace::new(&root);
            let result =
                notes::open_or_create_note(&vault, &workspace, &notifier, &action, &source_path)
                    .await;
            if let Err(err) = result {
                warn!("{err}");
                notifier.notify(Notice::error(err.to_string()));
            }
            repaint.request_repaint();
        });
    }
}
