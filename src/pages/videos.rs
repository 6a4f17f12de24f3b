use std::sync::Arc;

use uuid::Uuid;

use super::SyncedState;
use crate::collection::Collection;
use crate::core::video::{VideoItem, VideoPlaylist};
use crate::error::ValidationError;
use crate::services::PlaylistSyncService;
use crate::store::{EntityStore, keys};

/// Whether a sync created a playlist or refreshed an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Added(String),
    Updated(String),
}

impl SyncOutcome {
    pub fn playlist_id(&self) -> &str {
        match self {
            Self::Added(id) | Self::Updated(id) => id,
        }
    }
}

#[derive(Debug)]
pub struct VideosPage {
    playlists: SyncedState<Collection<VideoPlaylist>>,
}

impl VideosPage {
    pub fn mount(store: Arc<EntityStore>) -> Self {
        Self {
            playlists: SyncedState::mount(store, keys::VIDEO_PLAYLISTS, Collection::new),
        }
    }

    pub fn playlists(&self) -> &Collection<VideoPlaylist> {
        self.playlists.get()
    }

    pub fn create_playlist(&mut self, title: &str, description: &str) -> crate::Result<String> {
        let playlist = VideoPlaylist::new_custom(title.trim(), description.trim());
        let (next, id) = self.playlists.get().try_add(playlist)?;
        self.playlists.apply(|_| next)?;
        log::info!("Created playlist {}", id);
        Ok(id)
    }

    /// Append a video to the selected playlist.
    pub fn add_video(
        &mut self,
        playlist_id: Option<&str>,
        title: &str,
        url: &str,
        duration: Option<&str>,
    ) -> crate::Result<Uuid> {
        let playlist_id = playlist_id
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::Required { field: "playlist" })?;
        if !self.playlists.get().contains(&playlist_id.to_string()) {
            return Err(ValidationError::UnknownTarget {
                kind: "playlist",
                id: playlist_id.to_string(),
            }
            .into());
        }
        if title.trim().is_empty() {
            return Err(ValidationError::Required { field: "title" }.into());
        }
        if url.trim().is_empty() {
            return Err(ValidationError::Required { field: "url" }.into());
        }

        let mut video = VideoItem::new(title.trim(), url.trim());
        video.duration = duration.map(str::trim).filter(|d| !d.is_empty()).map(String::from);
        let video_id = video.id;

        self.playlists.apply(|playlists| {
            playlists.update(&playlist_id.to_string(), |playlist| {
                playlist.videos.push(video);
                playlist.touch();
            })
        })?;
        Ok(video_id)
    }

    pub fn toggle_watched(&mut self, playlist_id: &str, video_id: Uuid) -> crate::Result<()> {
        self.playlists.apply(|playlists| {
            playlists.update(&playlist_id.to_string(), |playlist| {
                if let Some(video) = playlist.videos.iter_mut().find(|v| v.id == video_id) {
                    video.watched = !video.watched;
                    playlist.touch();
                }
            })
        })?;
        Ok(())
    }

    pub fn delete_playlist(&mut self, playlist_id: &str) -> crate::Result<()> {
        self.playlists
            .apply(|playlists| playlists.remove(&playlist_id.to_string()))?;
        Ok(())
    }

    /// Fetch a remote playlist and store it under its remote id. A playlist
    /// synced before keeps its metadata and gets the fetched videos.
    pub async fn sync_playlist<S: PlaylistSyncService>(
        &mut self,
        service: &S,
        url: &str,
    ) -> crate::Result<SyncOutcome> {
        let fetched = service.fetch(url).await.inspect_err(|e| {
            log::warn!("Playlist sync failed: {}", e);
        })?;
        let id = fetched.id.clone();

        let outcome = if self.playlists.get().contains(&id) {
            self.playlists.apply(|playlists| {
                playlists.update(&id, |playlist| {
                    playlist.videos = fetched.videos;
                    playlist.touch();
                })
            })?;
            SyncOutcome::Updated(id)
        } else {
            self.playlists.apply(|playlists| playlists.upsert(fetched))?;
            SyncOutcome::Added(id)
        };
        log::info!("Synced playlist: {:?}", outcome);
        Ok(outcome)
    }

    pub fn reload(&mut self) {
        self.playlists.reload();
    }
}
