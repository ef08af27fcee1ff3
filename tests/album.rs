//! Selection layer tests
//!
//! Filter switching, load more, search memo and response attribution.

use anime_album::prelude::*;
use anime_album::search::normalize_query;
use std::sync::Arc;

mod common;
use common::{FakeCatalog, RecordingDetail, TEST_PAGE_SIZE, item_id, shared};

fn config() -> AlbumConfig {
    AlbumConfig {
        page_size: TEST_PAGE_SIZE,
        ..Default::default()
    }
}

fn album(pages: u32) -> (Arc<FakeCatalog>, Arc<RecordingDetail>, Album) {
    let (catalog, source) = shared(FakeCatalog::new(pages));
    let detail = Arc::new(RecordingDetail::default());
    let album = Album::new(source, detail.clone(), &config());
    (catalog, detail, album)
}

fn card_ids(album: &Album) -> Vec<u64> {
    album
        .pool()
        .slots()
        .iter()
        .filter_map(|s| s.item().map(|a| a.id))
        .collect()
}

#[cfg(test)]
mod album_tests {
    use super::*;

    #[tokio::test]
    async fn test_init_shows_default_filter() {
        let (catalog, _, mut album) = album(3);
        album.init().await.unwrap();

        assert_eq!(album.active(), &ActiveView::Filter(TopFilter::Airing));
        assert_eq!(album.pool().len(), TEST_PAGE_SIZE as usize);
        assert_eq!(catalog.top_calls(), vec![(TopFilter::Airing, 1)]);
    }

    #[tokio::test]
    async fn test_switching_back_does_not_refetch() {
        let (catalog, _, mut album) = album(3);
        album.select_filter(TopFilter::Airing).await.unwrap();
        album.select_filter(TopFilter::Upcoming).await.unwrap();
        album.select_filter(TopFilter::Airing).await.unwrap();

        assert_eq!(catalog.top_call_count(), 2);
        assert_eq!(card_ids(&album)[0], item_id(TopFilter::Airing, 0));
    }

    #[tokio::test]
    async fn test_load_more_grows_pool() {
        let (_, _, mut album) = album(2);
        album.init().await.unwrap();

        assert!(album.load_more().await.unwrap());
        assert_eq!(album.pool().len(), 2 * TEST_PAGE_SIZE as usize);

        // Exhausted now.
        assert!(!album.load_more().await.unwrap());
        assert_eq!(album.pool().len(), 2 * TEST_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn test_pool_length_tracks_active_bucket() {
        let (_, _, mut album) = album(3);
        album.select_filter(TopFilter::Airing).await.unwrap();
        album.load_more().await.unwrap();
        album.load_more().await.unwrap();
        assert_eq!(album.pool().len(), 3 * TEST_PAGE_SIZE as usize);

        album.select_filter(TopFilter::Favorite).await.unwrap();
        assert_eq!(album.pool().len(), TEST_PAGE_SIZE as usize);
        assert!(
            card_ids(&album)
                .iter()
                .all(|id| *id >= item_id(TopFilter::Favorite, 0)
                    && *id < item_id(TopFilter::ByPopularity, 0))
        );
    }

    #[tokio::test]
    async fn test_search_is_memoized() {
        let (catalog, _, mut album) = album(1);
        album.submit_search("naruto").await.unwrap();
        let first = card_ids(&album);
        album.submit_search("  NARUTO ").await.unwrap();

        assert_eq!(catalog.search_calls(), vec!["naruto".to_string()]);
        assert_eq!(card_ids(&album), first);
        assert_eq!(album.active(), &ActiveView::Search("naruto".to_string()));
        assert_eq!(
            album.search_cache().last_query().await.as_deref(),
            Some("naruto")
        );
    }

    #[tokio::test]
    async fn test_search_memo_holds_one_query() {
        let (catalog, _, mut album) = album(1);
        album.submit_search("naruto").await.unwrap();
        album.submit_search("bleach").await.unwrap();
        album.submit_search("naruto").await.unwrap();

        assert_eq!(catalog.search_calls(), vec!["naruto", "bleach", "naruto"]);
    }

    #[tokio::test]
    async fn test_load_more_during_search_is_noop() {
        let (catalog, _, mut album) = album(3);
        album.init().await.unwrap();
        album.submit_search("one piece").await.unwrap();

        assert!(!album.load_more().await.unwrap());
        assert_eq!(catalog.top_call_count(), 1);
        assert_eq!(album.pool().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_search_returns_to_last_filter() {
        let (catalog, _, mut album) = album(3);
        album.select_filter(TopFilter::Upcoming).await.unwrap();
        album.submit_search("monster").await.unwrap();
        album.submit_search("   ").await.unwrap();

        assert_eq!(album.active(), &ActiveView::Filter(TopFilter::Upcoming));
        assert_eq!(card_ids(&album)[0], item_id(TopFilter::Upcoming, 0));
        assert_eq!(catalog.top_call_count(), 1);
        assert!(catalog.search_calls().len() == 1);
    }

    #[tokio::test]
    async fn test_stale_bucket_is_not_rendered() {
        let (_, _, mut album) = album(3);
        album.select_filter(TopFilter::Airing).await.unwrap();

        // An upcoming load finished after the user had moved to favorites.
        let upcoming = album.cache().ensure_loaded(TopFilter::Upcoming).await.unwrap();
        album.activate(TopFilter::Favorite);

        assert!(!album.show_bucket(&upcoming));
        assert!(album.pool().is_empty());

        // The response still landed in its own bucket.
        album.activate(TopFilter::Upcoming);
        assert_eq!(album.pool().len(), TEST_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn test_stale_search_results_are_discarded() {
        let (_, _, mut album) = album(1);
        let search = album.search_cache();

        let query = album.request_search("Haikyuu");
        let stale = search.search(&query).await.unwrap();
        let newer = album.request_search("Mushishi");
        let fresh = search.search(&newer).await.unwrap();

        assert!(album.pool().is_empty());
        assert!(album.show_search_results(&newer, &fresh));
        assert_eq!(album.active(), &ActiveView::Search(newer.clone()));
        assert!(!album.show_search_results(&query, &stale));
        assert_eq!(album.pool().slots()[0].item(), fresh.first());
        assert_eq!(newer, normalize_query("Mushishi"));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_cards() {
        let (catalog, _, mut album) = album(3);
        album.init().await.unwrap();
        let before = card_ids(&album);

        catalog.fail_next(1);
        assert!(album.load_more().await.is_err());
        assert_eq!(card_ids(&album), before);

        catalog.fail_next(1);
        assert!(album.submit_search("gintama").await.is_err());
        assert_eq!(card_ids(&album), before);
        assert_eq!(album.active(), &ActiveView::Filter(TopFilter::Airing));
        assert_eq!(album.pending(), None);

        // The filter view still pages after the failed search.
        let calls = catalog.top_call_count();
        assert!(album.load_more().await.unwrap());
        assert_eq!(catalog.top_call_count(), calls + 1);
        assert_eq!(album.pool().len(), 2 * TEST_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn test_failed_switch_keeps_cards_and_view() {
        let (catalog, _, mut album) = album(3);
        album.init().await.unwrap();
        let before = card_ids(&album);

        catalog.fail_next(1);
        assert!(album.select_filter(TopFilter::Upcoming).await.is_err());

        assert_eq!(card_ids(&album), before);
        assert_eq!(album.active(), &ActiveView::Filter(TopFilter::Airing));
        assert_eq!(album.last_filter(), TopFilter::Airing);
        assert!(!album.cache().bucket(TopFilter::Upcoming).is_loaded());

        album.select_filter(TopFilter::Upcoming).await.unwrap();
        assert_eq!(card_ids(&album)[0], item_id(TopFilter::Upcoming, 0));
    }

    #[tokio::test]
    async fn test_pending_filter_takes_over_on_arrival() {
        let (_, _, mut album) = album(3);
        album.init().await.unwrap();
        let before = card_ids(&album);

        assert!(album.request_filter(TopFilter::Upcoming));
        assert_eq!(album.active(), &ActiveView::Filter(TopFilter::Airing));
        assert_eq!(
            album.pending(),
            Some(&ActiveView::Filter(TopFilter::Upcoming))
        );
        assert_eq!(card_ids(&album), before);

        let snapshot = album.cache().ensure_loaded(TopFilter::Upcoming).await.unwrap();
        assert!(album.show_bucket(&snapshot));
        assert_eq!(album.active(), &ActiveView::Filter(TopFilter::Upcoming));
        assert_eq!(album.pending(), None);
        assert_eq!(card_ids(&album)[0], item_id(TopFilter::Upcoming, 0));

        // Loaded buckets switch without a fetch.
        assert!(!album.request_filter(TopFilter::Airing));
        assert_eq!(card_ids(&album), before);
    }

    #[tokio::test]
    async fn test_outdated_snapshot_is_not_rendered() {
        let (_, _, mut album) = album(3);
        album.init().await.unwrap();

        let early = album.cache().ensure_loaded(TopFilter::Airing).await.unwrap();
        assert!(album.load_more().await.unwrap());

        assert!(!album.show_bucket(&early));
        assert_eq!(album.pool().len(), 2 * TEST_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn test_select_card_opens_detail() {
        let (_, detail, mut album) = album(1);
        album.init().await.unwrap();

        assert!(album.select_card(1));
        assert!(!album.select_card(99));
        assert_eq!(detail.shown(), vec![item_id(TopFilter::Airing, 1)]);
    }

    #[tokio::test]
    async fn test_titles_truncated_with_configured_length() {
        let (_, source) = shared(FakeCatalog::new(1));
        let config = AlbumConfig {
            page_size: 2,
            max_title_len: 6,
            default_filter: TopFilter::Favorite,
            ..Default::default()
        };
        let mut album = Album::new(source, Arc::new(RecordingDetail::default()), &config);
        album.init().await.unwrap();

        assert_eq!(album.active(), &ActiveView::Filter(TopFilter::Favorite));
        assert_eq!(album.pool().slots()[0].caption, "favori...");
    }
}
