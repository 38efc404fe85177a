use super::YtError;
use super::types::{GoogleApiErrorResponse, VideosListResponse};

fn format_youtube_error(status: reqwest::StatusCode, body: &str, endpoint: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<GoogleApiErrorResponse>(body) {
        let reason = parsed
            .error
            .errors
            .first()
            .and_then(|e| e.reason.as_deref())
            .unwrap_or("");
        let status_str = parsed.error.status.unwrap_or_default();
        if reason.is_empty() && status_str.is_empty() {
            return format!(
                "YouTube {} failed (HTTP {}): {}",
                endpoint,
                status.as_u16(),
                parsed.error.message
            );
        }
        return format!(
            "YouTube {} failed (HTTP {}, {}{}): {}",
            endpoint,
            status.as_u16(),
            status_str,
            if reason.is_empty() {
                "".into()
            } else {
                format!(", reason={}", reason)
            },
            parsed.error.message
        );
    }
    format!(
        "YouTube {} failed (HTTP {}): {}",
        endpoint,
        status.as_u16(),
        body.trim()
    )
}

pub(crate) fn videos_url(endpoint: &str, api_key: &str, video_id: &str) -> String {
    let mut url = endpoint.trim_end_matches('/').to_string();
    url.push_str("/videos?part=snippet");
    url.push_str("&id=");
    url.push_str(&urlencoding::encode(video_id));
    url.push_str("&key=");
    url.push_str(&urlencoding::encode(api_key.trim()));
    url
}

/// `videos.list` with `part=snippet` for a single video id.
pub async fn video_snippet(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    video_id: &str,
) -> Result<VideosListResponse, YtError> {
    let url = videos_url(endpoint, api_key, video_id);
    let resp = client.get(&url).send().await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes);
        return Err(YtError::Api(format_youtube_error(
            status,
            &body,
            "videos.list",
        )));
    }
    let parsed = serde_json::from_slice::<VideosListResponse>(&bytes)?;
    Ok(parsed)
}
