//! Local repository learning tools.
//!
//! Everything behind `/api/learn`: curated and YouTube resources for a
//! path, HEAD change polling, selection export and the rate limiter.

pub mod archive;
pub mod rate_limit;
pub mod resources;
pub mod watcher;
pub mod youtube;

pub use rate_limit::RateLimiter;
pub use resources::{LearningItem, TechnologyResources};
pub use watcher::{HeadTracker, WatchEvent};
pub use youtube::{SearchKind, YouTubeClient};

/// Default number of YouTube videos per contextual lookup.
pub const DEFAULT_MAX_RESULTS: usize = 6;

/// Contextual resources for a repository path.
///
/// Curated catalog items and concept links come first. YouTube videos
/// (`<keywords> tutorial`) and playlists (`<keywords> full course`) follow
/// when a client is available. Search failures only drop the dynamic part.
pub async fn contextual_items(
    path: &str,
    language: &str,
    max: usize,
    youtube: Option<&YouTubeClient>,
) -> Vec<LearningItem> {
    let mut items = resources::curated_items(path);

    if let Some(youtube) = youtube {
        let keywords = resources::derive_keywords(path);
        let video_query = format!("{} tutorial", keywords);
        let course_query = format!("{} full course", keywords);

        let (videos, courses) = tokio::join!(
            youtube.search(&video_query, SearchKind::Video, language, max),
            youtube.search(&course_query, SearchKind::Playlist, language, (max / 2).max(3)),
        );
        match (videos, courses) {
            (Ok(videos), Ok(courses)) => {
                items.extend(videos);
                items.extend(courses);
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("YouTube lookup failed, using curated resources only: {}", e);
            }
        }
    }

    resources::unique_items(items)
}

/// Parses the `max` query value, falling back to [`DEFAULT_MAX_RESULTS`].
///
/// The YouTube API accepts 1..=50.
pub fn parse_max_results(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .map(|n| n.clamp(1, 50))
        .unwrap_or(DEFAULT_MAX_RESULTS)
}
