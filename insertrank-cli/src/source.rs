/// Item sources: AniList completed lists, or a local JSON file.
///
/// Failures come back as `SourceError`. The caller decides how to degrade;
/// `main` logs them and treats the source as empty.
use insertrank_core::{Item, dedup_by_id};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const ANILIST_API_URL: &str = "https://graphql.anilist.co";

/// Default HTTP timeout for the list fetch.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const UNKNOWN_TITLE: &str = "Unknown";

const COLLECTION_QUERY: &str = "query ($name: String, $type: MediaType) { \
     MediaListCollection(userName: $name, type: $type, status: COMPLETED) { \
     lists { entries { score media { id title { english romaji } coverImage { large } } } } } }";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Anime,
    Manga,
}

impl MediaKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "anime" => Some(MediaKind::Anime),
            "manga" => Some(MediaKind::Manga),
            _ => None,
        }
    }

    fn graphql_name(self) -> &'static str {
        match self {
            MediaKind::Anime => "ANIME",
            MediaKind::Manga => "MANGA",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Anime => "anime",
            MediaKind::Manga => "manga",
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AniList returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("AniList reported errors: {0}")]
    GraphQl(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse items file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: Variables<'a>,
}

#[derive(Serialize)]
struct Variables<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    media_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseData {
    media_list_collection: Option<MediaListCollection>,
}

#[derive(Debug, Deserialize)]
struct MediaListCollection {
    #[serde(default)]
    lists: Vec<MediaList>,
}

#[derive(Debug, Deserialize)]
struct MediaList {
    #[serde(default)]
    entries: Vec<MediaEntry>,
}

#[derive(Debug, Deserialize)]
struct MediaEntry {
    score: Option<f64>,
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Media {
    id: i64,
    title: Option<MediaTitle>,
    cover_image: Option<CoverImage>,
}

#[derive(Debug, Deserialize)]
struct MediaTitle {
    english: Option<String>,
    romaji: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoverImage {
    large: Option<String>,
}

/// Settings for talking to AniList.
pub struct AniListConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for AniListConfig {
    fn default() -> Self {
        AniListConfig {
            endpoint: ANILIST_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Fetch a user's completed list as deduplicated items (first occurrence wins).
pub async fn fetch_completed_list(
    client: &Client,
    config: &AniListConfig,
    user: &str,
    kind: MediaKind,
) -> Result<Vec<Item>, SourceError> {
    let request = GraphQlRequest {
        query: COLLECTION_QUERY,
        variables: Variables {
            name: user,
            media_type: kind.graphql_name(),
        },
    };

    tracing::debug!(user, kind = kind.label(), endpoint = %config.endpoint, "fetching completed list");

    let resp = client
        .post(&config.endpoint)
        .timeout(config.timeout)
        .json(&request)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status,
            body: body.chars().take(200).collect(),
        });
    }

    let data: GraphQlResponse = resp.json().await?;
    items_from_response(data)
}

fn items_from_response(resp: GraphQlResponse) -> Result<Vec<Item>, SourceError> {
    if resp.data.is_none() && !resp.errors.is_empty() {
        let messages: Vec<String> = resp.errors.into_iter().map(|e| e.message).collect();
        return Err(SourceError::GraphQl(messages.join("; ")));
    }

    let entries = resp
        .data
        .and_then(|d| d.media_list_collection)
        .map(|c| c.lists)
        .unwrap_or_default()
        .into_iter()
        .flat_map(|list| list.entries);

    let items = entries
        .filter_map(|entry| {
            let media = entry.media?;
            let title = media
                .title
                .and_then(|t| non_empty(t.english).or_else(|| non_empty(t.romaji)))
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
            let cover = media.cover_image.and_then(|c| c.large).unwrap_or_default();
            Some(
                Item::new(media.id, title)
                    .with_cover(cover)
                    .with_score(entry.score.unwrap_or(0.0)),
            )
        })
        .collect();

    Ok(dedup_by_id(items))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Load items from a JSON array of `{ id, title, cover_ref?, prior_score? }`.
pub fn load_items_file(path: &Path) -> Result<Vec<Item>, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_items_json(&content)
}

fn parse_items_json(content: &str) -> Result<Vec<Item>, SourceError> {
    let items: Vec<Item> = serde_json::from_str(content)?;
    Ok(dedup_by_id(items))
}
