use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub struct VideosListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Deserialize, Debug)]
pub struct VideoItem {
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
}

#[derive(Deserialize, Debug)]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: Option<String>,
}

impl VideosListResponse {
    /// Title of the first returned item, if it has a non-empty one.
    pub fn first_title(&self) -> Option<&str> {
        self.items
            .first()
            .and_then(|item| item.snippet.as_ref())
            .and_then(|snippet| snippet.title.as_deref())
            .filter(|title| !title.is_empty())
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct GoogleApiErrorResponse {
    pub error: GoogleApiError,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GoogleApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<GoogleApiErrorDetail>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GoogleApiErrorDetail {
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_title_reads_first_item_only() {
        let body = r#"{"items":[{"id":"a","snippet":{"title":"First"}},{"id":"b","snippet":{"title":"Second"}}]}"#;
        let parsed: VideosListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.first_title(), Some("First"));
    }

    #[test]
    fn missing_pieces_yield_no_title() {
        for body in [
            r#"{}"#,
            r#"{"items":[]}"#,
            r#"{"items":[{"id":"a"}]}"#,
            r#"{"items":[{"snippet":{}}]}"#,
            r#"{"items":[{"snippet":{"title":""}}]}"#,
        ] {
            let parsed: VideosListResponse = serde_json::from_str(body).unwrap();
            assert_eq!(parsed.first_title(), None, "body: {body}");
        }
    }
}
