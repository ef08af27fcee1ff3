//! Card pool tests
//!
//! Resize-then-populate rendering, caption truncation and selection.

use anime_album::prelude::*;
use anime_album::reconcile::truncate_title;
use std::sync::Arc;

mod common;
use common::{RecordingDetail, anime};

fn items(count: u64) -> Vec<Anime> {
    (0..count).map(|i| anime(i, &format!("Title {}", i))).collect()
}

#[cfg(test)]
mod reconcile_tests {
    use super::*;

    #[test]
    fn test_render_matches_item_count() {
        let mut pool = CardPool::new(Arc::new(RecordingDetail::default()));
        let list = items(7);

        pool.render(&list, 0);
        assert_eq!(pool.len(), 7);
        for (slot, item) in pool.slots().iter().zip(&list) {
            assert_eq!(slot.item(), Some(item));
            assert_eq!(slot.image_alt, item.title);
            assert_eq!(slot.image_src, item.card_image_url().unwrap());
        }
    }

    #[test]
    fn test_render_shrinks_pool() {
        let mut pool = CardPool::new(Arc::new(RecordingDetail::default()));
        pool.render(&items(10), 0);
        pool.render(&items(3), 0);

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.slots()[2].item().unwrap().id, 2);
    }

    #[test]
    fn test_render_from_offset_keeps_earlier_slots() {
        let mut pool = CardPool::new(Arc::new(RecordingDetail::default()));
        pool.render(&items(3), 0);

        // Same length prefix, different content: only slots from 3 on are rebound.
        let mut grown = items(6);
        grown[0].title = "Changed".to_string();
        pool.render(&grown, 3);

        assert_eq!(pool.len(), 6);
        assert_eq!(pool.slots()[0].caption, "Title 0");
        assert_eq!(pool.slots()[5].caption, "Title 5");
        assert!(pool.slots().iter().all(|s| !s.is_blank()));
    }

    #[test]
    fn test_render_from_beyond_len_only_resizes() {
        let mut pool = CardPool::new(Arc::new(RecordingDetail::default()));
        pool.render(&items(2), 0);
        pool.render(&items(4), 10);

        assert_eq!(pool.len(), 4);
        assert!(!pool.slots()[1].is_blank());
        assert!(pool.slots()[2].is_blank());
        assert!(pool.slots()[3].is_blank());
    }

    #[test]
    fn test_render_empty_list() {
        let mut pool = CardPool::new(Arc::new(RecordingDetail::default()));
        pool.render(&items(5), 0);
        pool.render(&[], 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_caption_truncation() {
        let mut pool = CardPool::new(Arc::new(RecordingDetail::default()));
        let list = vec![
            anime(1, "Exactly eighteen c"),
            anime(2, "Nineteen characters"),
            anime(3, "Short"),
        ];
        pool.render(&list, 0);

        assert_eq!(pool.slots()[0].caption, "Exactly eighteen c");
        assert_eq!(pool.slots()[1].caption, "Nineteen character...");
        assert_eq!(pool.slots()[2].caption, "Short");
        // Alt text keeps the full title.
        assert_eq!(pool.slots()[1].image_alt, "Nineteen characters");
    }

    #[test]
    fn test_custom_title_length() {
        let mut pool =
            CardPool::new(Arc::new(RecordingDetail::default())).with_max_title_len(5);
        pool.render(&[anime(1, "Bleach"), anime(2, "Mob")], 0);

        assert_eq!(pool.slots()[0].caption, "Bleac...");
        assert_eq!(pool.slots()[1].caption, "Mob");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_title("", 18), "");
        assert_eq!(truncate_title("ちはやふる", 3), "ちはや...");
        assert_eq!(truncate_title("ちはやふる", 5), "ちはやふる");
    }

    #[test]
    fn test_large_image_falls_back_to_regular() {
        let mut item = anime(1, "Monster");
        item.images.jpg.large_image_url = None;

        let mut pool = CardPool::new(Arc::new(RecordingDetail::default()));
        pool.render(&[item], 0);
        assert_eq!(pool.slots()[0].image_src, "https://cdn.example/1.jpg");
    }

    #[test]
    fn test_select_opens_bound_item() {
        let detail = Arc::new(RecordingDetail::default());
        let mut pool = CardPool::new(detail.clone());
        pool.render(&items(4), 0);

        assert!(pool.select(2));
        assert!(!pool.select(4));
        assert_eq!(detail.shown(), vec![2]);
    }

    #[test]
    fn test_select_blank_slot() {
        let detail = Arc::new(RecordingDetail::default());
        let mut pool = CardPool::new(detail.clone());
        pool.render(&items(3), 5);

        assert!(!pool.select(0));
        assert!(detail.shown().is_empty());
    }
}
