//! Companion notes: path derivation and the create-or-open flow behind each
//! card's note button.

use tracing::info;

use crate::grid::NoteAction;
use crate::notify::{Notice, Notifier};
use crate::vault::{Vault, VaultError, Workspace};
use crate::video_id::watch_url;

pub const NOTES_FOLDER: &str = "video-notes";
pub const NOTE_EXTENSION: &str = "md";
pub const MAX_FILE_STEM_CHARS: usize = 100;

pub const MSG_MISSING_TITLE: &str = "No title available. Check the API key.";
pub const MSG_CREATED: &str = "Note created.";
pub const MSG_EXISTS: &str = "Note already exists.";

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("could not create notes folder '{path}': {source}")]
    CreateFolder {
        path: String,
        #[source]
        source: VaultError,
    },
    #[error("could not create note '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: VaultError,
    },
    #[error("could not open note '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: VaultError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    /// No title was known; nothing was touched.
    MissingTitle,
    Created { path: String },
    AlreadyExists { path: String },
}

impl NoteOutcome {
    pub fn path(&self) -> Option<&str> {
        match self {
            NoteOutcome::MissingTitle => None,
            NoteOutcome::Created { path } | NoteOutcome::AlreadyExists { path } => Some(path.as_str()),
        }
    }
}

/// Canonical vault path: `/` separators, no empty segments, no leading or
/// trailing slash, non-breaking spaces turned into plain ones. The vault root
/// is `/`.
pub fn normalize_path(path: &str) -> String {
    let cleaned: String = path
        .chars()
        .map(|c| match c {
            '\\' => '/',
            '\u{00A0}' | '\u{202F}' => ' ',
            other => other,
        })
        .collect();
    let joined = cleaned
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Folder that holds the notes for documents next to `source_path`.
pub fn notes_folder(source_path: &str) -> String {
    match source_path.rfind('/') {
        Some(idx) if idx > 0 => normalize_path(&format!("{}/{}", &source_path[..idx], NOTES_FOLDER)),
        _ => normalize_path(NOTES_FOLDER),
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, 'ä' | 'ö' | 'ü' | 'Ä' | 'Ö' | 'Ü' | 'ß' | ' ' | '-')
}

/// File name for a note about a video titled `title`.
pub fn note_file_name(title: &str) -> String {
    let kept: String = title.chars().filter(|&c| is_allowed(c)).collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    let stem: String = collapsed.chars().take(MAX_FILE_STEM_CHARS).collect();
    format!("{}.{}", stem, NOTE_EXTENSION)
}

pub fn note_path(source_path: &str, title: &str) -> String {
    normalize_path(&format!(
        "{}/{}",
        notes_folder(source_path),
        note_file_name(title)
    ))
}

/// Body written into a freshly created note.
pub fn note_content(video_id: &str) -> String {
    format!("![]({})\n", watch_url(video_id))
}

/// Runs the note button flow for one card.
///
/// Without a title the user is warned and nothing else happens. Otherwise the
/// note is created when missing (folder included) and then opened in either
/// case. Storage and open failures are returned to the caller.
pub async fn open_or_create_note(
    vault: &dyn Vault,
    workspace: &dyn Workspace,
    notifier: &dyn Notifier,
    action: &NoteAction,
    source_path: &str,
) -> Result<NoteOutcome, NoteError> {
    let Some(title) = action.title.as_deref().filter(|t| !t.is_empty()) else {
        notifier.notify(Notice::warning(MSG_MISSING_TITLE));
        return Ok(NoteOutcome::MissingTitle);
    };

    let folder = notes_folder(source_path);
    let path = note_path(source_path, title);

    let outcome = if vault.exists(&path).await {
        notifier.notify(Notice::info(MSG_EXISTS));
        NoteOutcome::AlreadyExists { path }
    } else {
        if !vault.exists(&folder).await {
            vault
                .create_folder(&folder)
                .await
                .map_err(|source| NoteError::CreateFolder {
                    path: folder.clone(),
                    source,
                })?;
        }
        vault
            .create_file(&path, &note_content(&action.video_id))
            .await
            .map_err(|source| NoteError::CreateFile {
                path: path.clone(),
                source,
            })?;
        info!(path = %path, video_id = %action.video_id, "created note");
        notifier.notify(Notice::info(MSG_CREATED));
        NoteOutcome::Created { path }
    };

    if let Some(path) = outcome.path() {
        workspace
            .open(path, source_path)
            .map_err(|source| NoteError::Open {
                path: path.to_string(),
                source,
            })?;
    }
    Ok(outcome)
}
