//! End-to-end: a markdown document is rendered against a mock Data API and
//! the resulting cards drive note creation in a temporary vault.

use std::sync::Mutex;

use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytgrid::grid::render_document;
use ytgrid::notes::{MSG_CREATED, MSG_EXISTS, MSG_MISSING_TITLE, NoteOutcome, open_or_create_note};
use ytgrid::notify::{Notice, Notifier};
use ytgrid::vault::{FsVault, VaultError, Workspace};
use ytgrid::yt::{MetadataClient, TitleLookup};

#[derive(Default)]
struct Recorder {
    notices: Mutex<Vec<Notice>>,
    opened: Mutex<Vec<(String, String)>>,
}

impl Notifier for Recorder {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

impl Workspace for Recorder {
    fn open(&self, path: &str, origin: &str) -> Result<(), VaultError> {
        self.opened
            .lock()
            .unwrap()
            .push((path.to_string(), origin.to_string()));
        Ok(())
    }
}

const DOC: &str = "# Talks\n\n```youtubeGrid\nhttps://www.youtube.com/watch?v=aaaaaaaaaaa\n\nhttps://youtu.be/bbbbbbbbbbb\nnot a link\n```\n";

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "aaaaaaaaaaa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{ "id": "aaaaaaaaaaa", "snippet": { "title": "Rust: Ownership, Explained!" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "bbbbbbbbbbb"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn rendered_cards_create_notes_next_to_the_document() {
    let server = mock_api().await;
    let client = MetadataClient::new("test-key").with_endpoint(server.uri());
    let rendered = render_document(DOC, Some(&client as &dyn TitleLookup)).await;

    assert_eq!(rendered.len(), 1);
    let grid = &rendered[0].grid;
    assert_eq!(grid.columns, 3);
    assert_eq!(grid.cards.len(), 2);
    assert_eq!(
        grid.cards[0].title.as_deref(),
        Some("Rust: Ownership, Explained!")
    );
    assert_eq!(grid.cards[1].title, None);

    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("talks")).unwrap();
    let vault = FsVault::new(dir.path());
    let recorder = Recorder::default();

    let first = open_or_create_note(
        &vault,
        &recorder,
        &recorder,
        &grid.cards[0].action,
        "talks/index.md",
    )
    .await
    .unwrap();
    let expected_path = "talks/video-notes/Rust Ownership Explained.md";
    assert_eq!(
        first,
        NoteOutcome::Created {
            path: expected_path.into()
        }
    );

    let on_disk = dir
        .path()
        .join("talks")
        .join("video-notes")
        .join("Rust Ownership Explained.md");
    assert_eq!(
        std::fs::read_to_string(&on_disk).unwrap(),
        "![](https://www.youtube.com/watch?v=aaaaaaaaaaa)\n"
    );

    std::fs::write(&on_disk, "my own notes\n").unwrap();
    let second = open_or_create_note(
        &vault,
        &recorder,
        &recorder,
        &grid.cards[0].action,
        "talks/index.md",
    )
    .await
    .unwrap();
    assert_eq!(
        second,
        NoteOutcome::AlreadyExists {
            path: expected_path.into()
        }
    );
    assert_eq!(std::fs::read_to_string(&on_disk).unwrap(), "my own notes\n");

    let untitled = open_or_create_note(
        &vault,
        &recorder,
        &recorder,
        &grid.cards[1].action,
        "talks/index.md",
    )
    .await
    .unwrap();
    assert_eq!(untitled, NoteOutcome::MissingTitle);

    let messages: Vec<String> = recorder
        .notices
        .lock()
        .unwrap()
        .iter()
        .map(|n| n.message.clone())
        .collect();
    assert_eq!(messages, [MSG_CREATED, MSG_EXISTS, MSG_MISSING_TITLE]);

    let opened = recorder.opened.lock().unwrap();
    assert_eq!(
        opened.as_slice(),
        [
            (expected_path.to_string(), "talks/index.md".to_string()),
            (expected_path.to_string(), "talks/index.md".to_string()),
        ]
    );
    assert_eq!(
        std::fs::read_dir(dir.path().join("talks").join("video-notes"))
            .unwrap()
            .count(),
        1
    );
}

#[tokio::test]
async fn document_without_blocks_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = MetadataClient::new("test-key").with_endpoint(server.uri());

    let rendered = render_document(
        "plain text\n```youtubeGrid\n\n   \n```\n",
        Some(&client as &dyn TitleLookup),
    )
    .await;
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].grid.cards.is_empty());
    assert_eq!(rendered[0].grid.columns, 1);
}
