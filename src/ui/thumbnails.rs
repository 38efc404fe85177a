use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use directories::ProjectDirs;
use egui::{ColorImage, Context, ImageData, TextureHandle, TextureOptions, Vec2};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::grid::Card;

/// Card thumbnails, decoded into textures and mirrored on disk.
pub struct ThumbnailCache {
    entries: HashMap<String, ThumbnailState>,
    client: reqwest::Client,
    tx: Sender<ThumbnailMessage>,
    rx: Receiver<ThumbnailMessage>,
    disk_dir: PathBuf,
}

enum ThumbnailState {
    Loading,
    Ready { texture: TextureHandle, size: Vec2 },
    Failed,
}

pub struct ThumbnailRef {
    pub texture: TextureHandle,
    pub size: Vec2,
}

struct ThumbnailMessage {
    video_id: String,
    payload: Result<ThumbnailPayload, String>,
}

struct ThumbnailPayload {
    image: ColorImage,
    bytes: Vec<u8>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let disk_dir = ProjectDirs::from("com", "ytgrid", "ytgrid")
            .map(|proj| proj.cache_dir().join("thumbnails"))
            .unwrap_or_else(|| PathBuf::from("thumbnails"));
        if let Err(err) = fs::create_dir_all(&disk_dir) {
            warn!("failed to create thumbnail cache dir: {err}");
        }
        Self {
            entries: HashMap::new(),
            client: reqwest::Client::new(),
            tx,
            rx,
            disk_dir,
        }
    }

    /// Drops textures for videos no longer on screen.
    pub fn retain_ids<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: HashSet<&str> = ids.into_iter().collect();
        self.entries.retain(|id, _| keep.contains(id.as_str()));
    }

    pub fn request(&mut self, card: &Card, ctx: &Context, runtime: &Runtime) {
        if self.entries.contains_key(&card.video_id) {
            return;
        }
        if let Some(cached) = load_from_disk(&self.disk_dir, &card.video_id) {
            let [w, h] = cached.size;
            let texture = ctx.load_texture(
                format!("thumbnail://{}", card.video_id),
                ImageData::from(cached),
                TextureOptions::LINEAR,
            );
            self.entries.insert(
                card.video_id.clone(),
                ThumbnailState::Ready {
                    texture,
                    size: Vec2::new(w as f32, h as f32),
                },
            );
            return;
        }

        self.entries
            .insert(card.video_id.clone(), ThumbnailState::Loading);
        let tx = self.tx.clone();
        let client = self.client.clone();
        let repaint = ctx.clone();
        let video_id = card.video_id.clone();
        let url = card.thumbnail_url.clone();
        runtime.spawn(async move {
            let payload = fetch_thumbnail(client, &url).await;
            let _ = tx.send(ThumbnailMessage { video_id, payload });
            repaint.request_repaint();
        });
    }

    pub fn update(&mut self, ctx: &Context) {
        while let Ok(message) = self.rx.try_recv() {
            let Some(entry) = self.entries.get_mut(&message.video_id) else {
                continue;
            };
            match message.payload {
                Ok(payload) => {
                    let [w, h] = payload.image.size;
                    let texture = ctx.load_texture(
                        format!("thumbnail://{}", message.video_id),
                        ImageData::from(payload.image),
                        TextureOptions::LINEAR,
                    );
                    *entry = ThumbnailState::Ready {
                        texture,
                        size: Vec2::new(w as f32, h as f32),
                    };
                    if let Err(err) =
                        persist_to_disk(&self.disk_dir, &message.video_id, &payload.bytes)
                    {
                        warn!("failed to persist thumbnail: {err}");
                    }
                }
                Err(err) => {
                    debug!(video_id = %message.video_id, "thumbnail fetch failed: {err}");
                    *entry = ThumbnailState::Failed;
                }
            }
        }
    }

    pub fn thumbnail(&self, video_id: &str) -> Option<ThumbnailRef> {
        match self.entries.get(video_id)? {
            ThumbnailState::Ready { texture, size } => Some(ThumbnailRef {
                texture: texture.clone(),
                size: *size,
            }),
            _ => None,
        }
    }

    pub fn is_failed(&self, video_id: &str) -> bool {
        matches!(self.entries.get(video_id), Some(ThumbnailState::Failed))
    }
}

async fn fetch_thumbnail(client: reqwest::Client, url: &str) -> Result<ThumbnailPayload, String> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|err| err.to_string())?;
    let bytes = response.bytes().await.map_err(|err| err.to_string())?;
    let buffer = bytes.to_vec();
    let image = decode_image(&buffer)?;
    Ok(ThumbnailPayload {
        image,
        bytes: buffer,
    })
}

fn decode_image(bytes: &[u8]) -> Result<ColorImage, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let image = image.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image.into_vec();
    Ok(ColorImage::from_rgba_unmultiplied(size, &pixels))
}

fn cache_path(base: &Path, video_id: &str) -> PathBuf {
    base.join(format!("{}.img", sanitize_id(video_id)))
}

fn load_from_disk(base: &Path, video_id: &str) -> Option<ColorImage> {
    let bytes = fs::read(cache_path(base, video_id)).ok()?;
    decode_image(&bytes).ok()
}

fn persist_to_disk(base: &Path, video_id: &str, bytes: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(base)?;
    fs::write(cache_path(base, video_id), bytes)
}

fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|ch| match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => ch,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_file_names_are_filesystem_safe() {
        let base = Path::new("/cache");
        assert_eq!(
            cache_path(base, "dQw4w9WgXcQ"),
            PathBuf::from("/cache/dQw4w9WgXcQ.img")
        );
        assert_eq!(sanitize_id("../a b"), "___a_b");
    }

    #[test]
    fn undecodable_bytes_are_rejected() {
        assert!(decode_image(b"not an image").is_err());
    }
}
