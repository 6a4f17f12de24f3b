use std::future::Future;
use std::time::Duration;

use uuid::Uuid;

use crate::core::timestamp;
use crate::core::video::{PlaylistSource, VideoItem, VideoPlaylist};
use crate::error::SyncError;

/// Fetches a remote playlist by its URL.
pub trait PlaylistSyncService {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<VideoPlaylist, SyncError>> + Send;
}

/// The `list=` parameter of a playlist URL, if present.
pub fn playlist_id_from_url(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("list="))
        .filter(|id| !id.is_empty())
}

/// Offline stand-in for the YouTube Data API. Waits `delay`, then returns a
/// fixed five-video playlist with the first two marked watched.
#[derive(Debug, Clone, Default)]
pub struct SimulatedYoutubeSync {
    pub delay: Duration,
}

impl SimulatedYoutubeSync {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn sample_playlist(id: String, url: &str) -> VideoPlaylist {
        let now = timestamp::now();
        let videos = (0..5)
            .map(|i| VideoItem {
                id: Uuid::new_v4(),
                title: format!("Video {} - YouTube Tutorial", i + 1),
                url: format!("https://youtube.com/watch?v=sample{}", i),
                watched: i < 2,
                duration: Some("10:30".to_string()),
                date_added: now,
            })
            .collect();
        let mut playlist = VideoPlaylist {
            id,
            title: "Watch Later Playlist".to_string(),
            description: "Synced from YouTube".to_string(),
            source: PlaylistSource::Youtube,
            playlist_url: Some(url.to_string()),
            videos,
            date_added: now,
            last_updated: now,
            progress: 0,
        };
        playlist.refresh_progress();
        playlist
    }
}

impl PlaylistSyncService for SimulatedYoutubeSync {
    async fn fetch(&self, url: &str) -> Result<VideoPlaylist, SyncError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SyncError::InvalidPlaylistUrl(url.to_string()));
        }
        let id = match playlist_id_from_url(url) {
            Some(id) => id.to_string(),
            None => format!("PL{}", &Uuid::new_v4().simple().to_string()[..9]),
        };

        tokio::time::sleep(self.delay).await;
        log::info!("Fetched playlist {} ({})", id, url);
        Ok(Self::sample_playlist(id, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_param_is_extracted() {
        assert_eq!(
            playlist_id_from_url("https://youtube.com/playlist?list=PLabc123&si=x"),
            Some("PLabc123")
        );
        assert_eq!(
            playlist_id_from_url("https://youtube.com/watch?v=zz&list=WL"),
            Some("WL")
        );
        assert_eq!(playlist_id_from_url("https://youtube.com/playlist?list="), None);
        assert_eq!(playlist_id_from_url("https://youtube.com/"), None);
    }

    #[tokio::test]
    async fn simulated_fetch_has_forty_percent_progress() {
        let sync = SimulatedYoutubeSync::default();
        let playlist = sync
            .fetch("https://youtube.com/playlist?list=PLdemo")
            .await
            .unwrap();
        assert_eq!(playlist.id, "PLdemo");
        assert_eq!(playlist.source, PlaylistSource::Youtube);
        assert_eq!(playlist.videos.len(), 5);
        assert_eq!(playlist.progress, 40);
    }

    #[tokio::test]
    async fn url_without_list_gets_generated_id() {
        let playlist = SimulatedYoutubeSync::default()
            .fetch("https://youtube.com/feed/library")
            .await
            .unwrap();
        assert!(playlist.id.starts_with("PL"));
        assert_eq!(playlist.id.len(), 11);
    }

    #[tokio::test]
    async fn blank_url_is_rejected() {
        let err = SimulatedYoutubeSync::default().fetch("  ").await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidPlaylistUrl(_)));
    }
}
