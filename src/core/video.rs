use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::completion_rate;
use crate::collection::Entity;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistSource {
    Youtube,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub watched: bool,
    /// Display duration, e.g. "10:30".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(with = "super::timestamp::rfc3339")]
    pub date_added: DateTime<Utc>,
}

impl VideoItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            url: url.into(),
            watched: false,
            duration: None,
            date_added: super::timestamp::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPlaylist {
    /// A uuid for custom playlists, the YouTube list id for synced ones.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub source: PlaylistSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_url: Option<String>,
    #[serde(default)]
    pub videos: Vec<VideoItem>,
    #[serde(with = "super::timestamp::rfc3339")]
    pub date_added: DateTime<Utc>,
    #[serde(with = "super::timestamp::rfc3339")]
    pub last_updated: DateTime<Utc>,
    /// Percentage of watched videos. Cached; recomputed from `videos` on
    /// every mutation and on load.
    #[serde(default)]
    pub progress: u8,
}

impl VideoPlaylist {
    pub fn new_custom(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = super::timestamp::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            source: PlaylistSource::Custom,
            playlist_url: None,
            videos: Vec::new(),
            date_added: now,
            last_updated: now,
            progress: 0,
        }
    }

    pub fn watched_count(&self) -> usize {
        self.videos.iter().filter(|v| v.watched).count()
    }

    pub fn computed_progress(&self) -> u8 {
        completion_rate(&self.videos, |v| v.watched)
    }

    pub fn refresh_progress(&mut self) {
        self.progress = self.computed_progress();
    }

    pub fn touch(&mut self) {
        self.last_updated = super::timestamp::now();
    }
}

impl Entity for VideoPlaylist {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn assign_fresh_id(&mut self) {
        self.id = Uuid::new_v4().to_string();
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required { field: "title" });
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.refresh_progress();
    }
}
