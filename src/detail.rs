//! Detail view for a selected item.

use parking_lot::Mutex;
use tracing::debug;

use crate::reconcile::DetailView;
use crate::types::{Anime, StreamingLink};

/// Placeholder for fields the catalog left empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Everything the detail view displays, flattened to strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalContent {
    pub id: u64,
    pub title: String,
    pub image_src: String,
    pub image_alt: String,
    pub synopsis: String,
    pub genres: Vec<String>,
    pub rank: String,
    pub score: String,
    pub rating: String,
    pub status: String,
    pub streaming: Vec<StreamingLink>,
}

impl ModalContent {
    pub fn from_anime(anime: &Anime) -> Self {
        Self {
            id: anime.id,
            title: anime.title.clone(),
            image_src: anime.cover_image_url().unwrap_or_default().to_string(),
            image_alt: anime.title.clone(),
            synopsis: anime
                .synopsis
                .clone()
                .unwrap_or_else(|| "No synopsis available.".to_string()),
            genres: anime.genre_names().into_iter().map(str::to_string).collect(),
            rank: or_na(anime.rank.map(|r| format!("#{}", r))),
            score: or_na(anime.score.map(|s| format!("{:.2}", s))),
            rating: or_na(anime.rating.clone()),
            status: or_na(anime.status.clone()),
            streaming: anime.streaming.clone(),
        }
    }
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Modal detail view.
///
/// Opening replaces the content wholesale, so nothing from a previous item
/// (genres in particular) survives into the next one.
///
/// # Examples
///
/// ```rust
/// use anime_album::detail::DetailModal;
/// use anime_album::types::Anime;
///
/// let anime: Anime = serde_json::from_value(serde_json::json!({
///     "mal_id": 5114,
///     "title": "Fullmetal Alchemist: Brotherhood",
///     "genres": [{ "name": "Action" }, { "name": "Drama" }],
///     "score": 9.1
/// }))
/// .unwrap();
///
/// let modal = DetailModal::new();
/// modal.open(&anime);
///
/// let content = modal.content().unwrap();
/// assert_eq!(content.genres, ["Action", "Drama"]);
/// assert_eq!(content.score, "9.10");
/// assert_eq!(content.rank, "N/A");
/// ```
#[derive(Debug, Default)]
pub struct DetailModal {
    content: Mutex<Option<ModalContent>>,
}

impl DetailModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, anime: &Anime) {
        debug!(id = anime.id, "opening detail view");
        *self.content.lock() = Some(ModalContent::from_anime(anime));
    }

    pub fn close(&self) {
        self.content.lock().take();
    }

    pub fn is_open(&self) -> bool {
        self.content.lock().is_some()
    }

    /// Copy of what is currently shown.
    pub fn content(&self) -> Option<ModalContent> {
        self.content.lock().clone()
    }

    /// Id of the item currently shown.
    pub fn current_id(&self) -> Option<u64> {
        self.content.lock().as_ref().map(|c| c.id)
    }

    /// Fills streaming links fetched after the modal opened.
    ///
    /// Links are dropped and `false` returned when the modal was closed or
    /// now shows a different item.
    pub fn attach_streaming(&self, id: u64, links: Vec<StreamingLink>) -> bool {
        let mut content = self.content.lock();
        match content.as_mut() {
            Some(shown) if shown.id == id => {
                shown.streaming = links;
                true
            }
            _ => {
                debug!(id, "detail view moved on, dropping streaming links");
                false
            }
        }
    }
}

impl DetailView for DetailModal {
    fn show(&self, anime: &Anime) {
        self.open(anime);
    }
}
