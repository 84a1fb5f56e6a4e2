//! Wire types for the article API.
//!
//! Field names follow the JSON the server emits. Deserialization is lenient:
//! optional presentation fields default to empty strings and article ids are
//! accepted as either JSON strings or numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// Discriminator value for notifications announcing a freshly published article.
pub const NEW_ARTICLE_EVENT: &str = "new_article";

/// Separator used by the server between category labels in `Article::tag`.
const TAG_SEPARATOR: &str = ", ";

/// A single article from `GET /articles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    /// Body text. Rendered clamped to one line unless the card is expanded.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub url: String,
    /// Comma-space separated category labels, e.g. `"LLM, Research"`.
    #[serde(default)]
    pub tag: String,
}

impl Article {
    /// Category labels, in server order, with empty labels dropped.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tag
            .split(TAG_SEPARATOR)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Host part of the source URL, if the URL parses.
    pub fn source_host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
    }
}

/// Article summary embedded in a push notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationArticle {
    pub title: String,
    pub id: i64,
    pub content: String,
    pub tag: String,
    pub url: String,
}

/// Payload of one push event from `GET /news-notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub event: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub article: NotificationArticle,
}

impl Notification {
    pub fn is_new_article(&self) -> bool {
        self.event == NEW_ARTICLE_EVENT
    }
}

/// A notification as kept in the session log, stamped on arrival.
#[derive(Debug, Clone)]
pub struct ReceivedNotification {
    pub notification: Notification,
    pub received_at: DateTime<Utc>,
}

impl ReceivedNotification {
    pub fn now(notification: Notification) -> Self {
        Self {
            notification,
            received_at: Utc::now(),
        }
    }
}

/// Response body of `POST /articles/{id}/ask`. The answer may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

/// Accept `"42"` and `42` alike for identifiers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Uint(n) => n.to_string(),
    })
}
