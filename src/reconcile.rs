//! Card pool reconciliation.
//!
//! A [`CardPool`] is the view-side list of fixed-shape card slots. Rendering
//! first resizes the pool to the item count, appending blank slots or
//! dropping trailing ones, then binds slots from an offset onward. Slot `i`
//! always shows item `i`.
//!
//! # Examples
//!
//! ```rust
//! use anime_album::reconcile::{CardPool, DetailView};
//! use anime_album::types::Anime;
//! use std::sync::Arc;
//!
//! struct Ignore;
//! impl DetailView for Ignore {
//!     fn show(&self, _anime: &Anime) {}
//! }
//!
//! let item = |id: u64, title: &str| -> Anime {
//!     serde_json::from_value(serde_json::json!({ "mal_id": id, "title": title })).unwrap()
//! };
//!
//! let mut pool = CardPool::new(Arc::new(Ignore));
//! let items = vec![item(1, "Mushishi"), item(2, "The Melancholy of Haruhi Suzumiya")];
//!
//! pool.render(&items, 0);
//! assert_eq!(pool.len(), 2);
//! assert_eq!(pool.slots()[1].caption, "The Melancholy of ...");
//!
//! pool.render(&items[..1], 0);
//! assert_eq!(pool.len(), 1);
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::config::DEFAULT_MAX_TITLE_LEN;
use crate::types::Anime;

/// Marker appended to truncated captions.
pub const ELLIPSIS: &str = "...";

/// Collaborator that presents a selected item in full.
pub trait DetailView: Send + Sync {
    fn show(&self, anime: &Anime);
}

/// One card placeholder.
///
/// A blank slot has empty strings and no bound item; it only exists
/// between the resize and populate steps of a render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardSlot {
    pub image_src: String,
    pub image_alt: String,
    pub caption: String,
    bound: Option<Anime>,
}

impl CardSlot {
    /// The item this slot was last bound to.
    pub fn item(&self) -> Option<&Anime> {
        self.bound.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        self.bound.is_none()
    }

    fn bind(&mut self, anime: &Anime, max_title_len: usize) {
        self.image_src = anime.card_image_url().unwrap_or_default().to_string();
        self.image_alt = anime.title.clone();
        self.caption = truncate_title(&anime.title, max_title_len);
        self.bound = Some(anime.clone());
    }
}

/// Shortens `title` to `max_len` characters followed by [`ELLIPSIS`]
/// when it is longer than `max_len`.
///
/// Lengths are counted in characters, not bytes.
///
/// ```rust
/// use anime_album::reconcile::truncate_title;
///
/// assert_eq!(truncate_title("Frieren", 18), "Frieren");
/// assert_eq!(truncate_title("Neon Genesis Evangelion", 18), "Neon Genesis Evang...");
/// assert_eq!(truncate_title("進撃の巨人 The Final Season", 5), "進撃の巨人...");
/// ```
pub fn truncate_title(title: &str, max_len: usize) -> String {
    match title.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}{}", &title[..cut], ELLIPSIS),
        None => title.to_string(),
    }
}

/// The shared pool of card slots.
pub struct CardPool {
    slots: Vec<CardSlot>,
    max_title_len: usize,
    detail: Arc<dyn DetailView>,
}

impl CardPool {
    /// Creates an empty pool that opens `detail` when a card is selected.
    pub fn new(detail: Arc<dyn DetailView>) -> Self {
        Self {
            slots: Vec::new(),
            max_title_len: DEFAULT_MAX_TITLE_LEN,
            detail,
        }
    }

    pub fn with_max_title_len(mut self, max_title_len: usize) -> Self {
        self.max_title_len = max_title_len;
        self
    }

    pub fn slots(&self) -> &[CardSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resizes the pool to `items.len()` and binds slots `from..`.
    ///
    /// Slots before `from` keep their bindings, so appending a page only
    /// touches the new cards. `from >= items.len()` binds nothing but still
    /// resizes.
    pub fn render(&mut self, items: &[Anime], from: usize) {
        self.resize(items.len());

        let mut bound = 0;
        for (slot, anime) in self.slots.iter_mut().zip(items).skip(from) {
            slot.bind(anime, self.max_title_len);
            bound += 1;
        }

        debug!(from, bound, total = self.slots.len(), "rendered cards");
    }

    fn resize(&mut self, len: usize) {
        let current = self.slots.len();
        if len > current {
            debug!(current, len, "appending blank cards");
            self.slots.resize_with(len, CardSlot::default);
        } else if len < current {
            debug!(current, len, "removing trailing cards");
            self.slots.truncate(len);
        }
    }

    /// Opens the detail view for the card at `index`.
    ///
    /// Returns `false` if there is no such card or it is blank.
    pub fn select(&self, index: usize) -> bool {
        match self.slots.get(index).and_then(CardSlot::item) {
            Some(anime) => {
                self.detail.show(anime);
                true
            }
            None => false,
        }
    }
}
