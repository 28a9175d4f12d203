//! News feed: add, edit, delete.

use crate::models::{NewsId, NewsItem, TournamentError};
use crate::store::NewsRepository;

/// Partial update of a news item. `None` keeps the current value; for `image_url`,
/// `Some(None)` clears the image.
#[derive(Clone, Debug, Default)]
pub struct NewsEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
}

fn required(value: &str, field: &'static str) -> Result<String, TournamentError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(TournamentError::EmptyField(field));
    }
    Ok(v.to_string())
}

pub fn add_news<S>(
    store: &mut S,
    title: &str,
    content: &str,
    image_url: Option<String>,
) -> Result<NewsItem, TournamentError>
where
    S: NewsRepository + ?Sized,
{
    let item = NewsItem::new(
        required(title, "title")?,
        required(content, "content")?,
        image_url.filter(|u| !u.trim().is_empty()),
    );
    log::info!("News '{}' published", item.title);
    store.save_news(item.clone());
    Ok(item)
}

/// Apply a partial edit. Blank title/content count as "keep".
pub fn edit_news<S>(store: &mut S, id: NewsId, edit: NewsEdit) -> Result<NewsItem, TournamentError>
where
    S: NewsRepository + ?Sized,
{
    let mut item = store.news_by_id(id)?;
    if let Some(title) = edit.title.filter(|t| !t.trim().is_empty()) {
        item.title = title.trim().to_string();
    }
    if let Some(content) = edit.content.filter(|c| !c.trim().is_empty()) {
        item.content = content.trim().to_string();
    }
    if let Some(image_url) = edit.image_url {
        item.image_url = image_url;
    }
    store.save_news(item.clone());
    Ok(item)
}

pub fn delete_news<S>(store: &mut S, id: NewsId) -> Result<NewsItem, TournamentError>
where
    S: NewsRepository + ?Sized,
{
    store.delete_news(id)
}
