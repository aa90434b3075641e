//! Clip records and the song page they arrive in

use std::hash::{Hash, Hasher};

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Top-level page wrapper returned by the catalog endpoint.
///
/// Pagination fields are decoded but never acted on; only the first page is
/// ever requested.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SongsPage {
    pub page: u32,
    pub per_page: u32,
    pub start: u32,
    pub end: u32,
    pub total_pages: u32,
    pub total_songs: u32,
    pub songs: Vec<SongEntry>,
}

impl SongsPage {
    /// Flatten the page into its clips, preserving order
    pub fn into_clips(self) -> Vec<Clip> {
        self.songs.into_iter().map(|entry| entry.clip).collect()
    }
}

/// Each element under `songs` wraps a `clip` plus fields we ignore
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SongEntry {
    pub clip: Clip,
}

/// A playable song record.
///
/// Two clips are the same clip when their ids match, whatever the other
/// fields say.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Clip {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub image_large_url: String,
    pub is_liked: bool,
    pub upvote_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl Clip {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        handle: impl Into<String>,
        image_large_url: impl Into<String>,
        is_liked: bool,
        upvote_count: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            handle: handle.into(),
            image_large_url: image_large_url.into(),
            is_liked,
            upvote_count,
            audio_url: None,
        }
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    /// Parsed playback URL, `None` when missing or malformed
    pub fn playback_url(&self) -> Option<Url> {
        self.audio_url.as_deref().and_then(|raw| Url::parse(raw).ok())
    }

    pub fn image_url(&self) -> Option<Url> {
        Url::parse(&self.image_large_url).ok()
    }
}

impl PartialEq for Clip {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Clip {}

impl Hash for Clip {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const PAGE_JSON: &str = r#"{
        "page": 0,
        "per_page": 2,
        "start": 0,
        "end": 2,
        "total_pages": 5,
        "total_songs": 10,
        "songs": [
            {
                "clip": {
                    "id": "a1",
                    "title": "Night Drive",
                    "handle": "synthkid",
                    "image_large_url": "https://cdn.example.com/a1.jpeg",
                    "is_liked": true,
                    "upvote_count": 42,
                    "audio_url": "https://cdn.example.com/a1.mp3",
                    "play_count": 900
                },
                "position": 1
            },
            {
                "clip": {
                    "id": "b2",
                    "title": "Porch Song",
                    "handle": "banjo",
                    "image_large_url": "https://cdn.example.com/b2.png",
                    "is_liked": false,
                    "upvote_count": 0
                }
            }
        ]
    }"#;

    #[test]
    fn test_page_flattens_in_order() {
        let page: SongsPage = serde_json::from_str(PAGE_JSON).unwrap();
        assert_eq!(page.total_songs, 10);
        let entries = page.songs.len();

        let clips = page.into_clips();
        assert_eq!(clips.len(), entries);
        assert_eq!(clips[0].id, "a1");
        assert_eq!(clips[0].title, "Night Drive");
        assert_eq!(clips[0].handle, "synthkid");
        assert_eq!(clips[0].image_large_url, "https://cdn.example.com/a1.jpeg");
        assert!(clips[0].is_liked);
        assert_eq!(clips[0].upvote_count, 42);
        assert_eq!(clips[1].id, "b2");
        assert!(!clips[1].is_liked);
    }

    #[test]
    fn test_missing_audio_url_has_no_playback_url() {
        let clips: Vec<Clip> = serde_json::from_str::<SongsPage>(PAGE_JSON).unwrap().into_clips();
        assert!(clips[0].playback_url().is_some());
        assert!(clips[1].playback_url().is_none());

        let broken = Clip::new("c", "t", "h", "x", false, 0).with_audio_url("not a url");
        assert!(broken.playback_url().is_none());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let json = r#"{"page":0,"per_page":1,"start":0,"end":1,"total_pages":1,"total_songs":1,
            "songs":[{"clip":{"id":"x","title":"t","handle":"h","is_liked":false,"upvote_count":1}}]}"#;
        assert!(serde_json::from_str::<SongsPage>(json).is_err());
    }

    #[test]
    fn test_equality_and_hash_use_id_only() {
        let a = Clip::new("same", "First", "one", "https://a", true, 1);
        let b = Clip::new("same", "Second", "two", "https://b", false, 99);
        let c = Clip::new("other", "First", "one", "https://a", true, 1);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Clip> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
