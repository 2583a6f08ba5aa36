use reqwest::Client;
use serde::Deserialize;

use super::resources::LearningItem;
use crate::config::{LearnConfig, NetworkConfig};
use crate::error::{OpenHubError, Result};

/// Which kind of YouTube result to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Video,
    Playlist,
}

impl SearchKind {
    fn as_str(self) -> &'static str {
        match self {
            SearchKind::Video => "video",
            SearchKind::Playlist => "playlist",
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
    playlist_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    channel_title: Option<String>,
    published_at: Option<String>,
}

/// YouTube Data API v3 search client.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl YouTubeClient {
    /// `None` when no API key is configured.
    pub fn from_config(learn: &LearnConfig, network: &NetworkConfig) -> Result<Option<Self>> {
        let Some(key) = learn.youtube_api_key.as_deref().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        Ok(Some(Self::with_client(
            crate::http::shared_client(network)?,
            &learn.youtube_api_base,
            key,
        )))
    }

    pub fn with_client(client: Client, api_base: &str, api_key: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Searches YouTube and maps hits to learning items: videos become
    /// `video` items, playlists become `course` items.
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        language: &str,
        max: usize,
    ) -> Result<Vec<LearningItem>> {
        let url = format!(
            "{}/youtube/v3/search?key={}&part=snippet&q={}&type={}&maxResults={}&safeSearch=moderate&relevanceLanguage={}",
            self.api_base,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query),
            kind.as_str(),
            max,
            urlencoding::encode(language),
        );
        tracing::debug!("YouTube search ({}): {}", kind.as_str(), query);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OpenHubError::Other(format!(
                "YouTube search failed: {}",
                status.as_u16()
            )));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .filter_map(|item| to_learning_item(item, kind))
            .collect())
    }
}

fn to_learning_item(item: SearchItem, kind: SearchKind) -> Option<LearningItem> {
    let (item_type, url) = match kind {
        SearchKind::Video => (
            "video",
            format!("https://www.youtube.com/watch?v={}", item.id.video_id?),
        ),
        SearchKind::Playlist => (
            "course",
            format!(
                "https://www.youtube.com/playlist?list={}",
                item.id.playlist_id?
            ),
        ),
    };
    Some(LearningItem {
        kind: item_type.to_string(),
        title: item.snippet.title,
        url,
        channel: item.snippet.channel_title,
        published_at: item.snippet.published_at,
    })
}
