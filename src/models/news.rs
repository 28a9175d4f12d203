//! News feed items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NewsId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: NewsId,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            image_url,
            created_at: Utc::now(),
        }
    }
}
