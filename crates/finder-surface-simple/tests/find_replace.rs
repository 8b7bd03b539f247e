use std::sync::{Arc, Mutex};

use finder_core::{FindEngine, SearchChangeType, SearchStateChange, TextSurface};
use finder_surface_simple::SimpleSurface;

fn make_engine(text: &str) -> FindEngine<SimpleSurface> {
    FindEngine::new(SimpleSurface::new(text))
}

#[test]
fn test_set_query_materializes_highlights() {
    let mut engine = make_engine("ababab");
    engine.set_query("ab");

    assert_eq!(engine.match_count(), 3);
    assert_eq!(engine.current_index(), None);
    assert_eq!(engine.surface().flattened_text(), "ababab");
    assert_eq!(engine.surface().highlight_count(), 3);
}

#[test]
fn test_set_query_is_idempotent() {
    let rebuilds = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&rebuilds);

    let mut engine = make_engine("ababab");
    engine.subscribe(move |change| {
        if change.change_type == SearchChangeType::HighlightsRebuilt {
            *counter.lock().unwrap() += 1;
        }
    });

    engine.set_query("ab");
    engine.set_query("ab"); // unchanged: no rebuild
    assert_eq!(*rebuilds.lock().unwrap(), 1);

    engine.set_query("ba");
    assert_eq!(*rebuilds.lock().unwrap(), 2);
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut engine = make_engine("cat catcat cat");
    engine.set_query("cat");
    let count = engine.match_count();
    let text = engine.surface().flattened_text();

    engine.rebuild(false);
    assert_eq!(engine.match_count(), count);
    assert_eq!(engine.surface().flattened_text(), text);
}

#[test]
fn test_clear_round_trips_surface_text() {
    let mut engine = make_engine("the cat sat on the mat");
    engine.set_query("at");
    assert_eq!(engine.match_count(), 3);

    engine.clear(false);
    assert_eq!(engine.match_count(), 0);
    assert_eq!(engine.current_index(), None);
    assert_eq!(engine.surface().flattened_text(), "the cat sat on the mat");
    assert_eq!(engine.surface().highlight_count(), 0);
}

#[test]
fn test_empty_query_clears_search() {
    // Scenario: an active search, then the query box is emptied.
    let mut engine = make_engine("ababab");
    engine.set_query("ab");
    engine.find_next();
    assert_eq!(engine.current_index(), Some(0));

    engine.set_query("");
    assert_eq!(engine.match_count(), 0);
    assert_eq!(engine.current_index(), None);
    assert_eq!(engine.surface().flattened_text(), "ababab");
}

#[test]
fn test_replace_all() {
    let mut engine = make_engine("catcat");
    engine.set_query("cat");
    engine.replace_all("dog");

    assert_eq!(engine.surface().flattened_text(), "dogdog");
    assert_eq!(engine.match_count(), 0);

    engine.rebuild(false);
    assert_eq!(engine.match_count(), 0);
}

#[test]
fn test_replace_all_with_no_matches_is_noop() {
    let mut engine = make_engine("dogdog");
    engine.set_query("cat");
    engine.replace_all("bird");
    assert_eq!(engine.surface().flattened_text(), "dogdog");
}

#[test]
fn test_replace_current_rescans_replacement_text() {
    // The replacement participates in the next scan: "a" -> "aa" doubles the match.
    let mut engine = make_engine("xax");
    engine.set_query("a");
    engine.find_next();
    assert_eq!(engine.current_index(), Some(0));

    engine.replace_current("aa");
    assert_eq!(engine.surface().flattened_text(), "xaax");
    assert_eq!(engine.match_count(), 2);
    assert_eq!(engine.current_index(), Some(0));
}

#[test]
fn test_replace_current_with_unset_index_is_noop() {
    let mut engine = make_engine("catcat");
    engine.set_query("cat");

    engine.replace_current("dog");
    assert_eq!(engine.surface().flattened_text(), "catcat");
    assert_eq!(engine.match_count(), 2);
}

#[test]
fn test_replace_preserves_index_by_position_not_identity() {
    // The index survives the rebuild as a raw number, even though the match it lands on
    // (or whether it lands on any match at all) changes.
    let mut engine = make_engine("catcat");
    engine.set_query("cat");
    engine.find_next();
    engine.replace_current("dog");

    // One "cat" remains and index 0 now points at it.
    assert_eq!(engine.surface().flattened_text(), "dogcat");
    assert_eq!(engine.match_count(), 1);
    assert_eq!(engine.current_index(), Some(0));

    // Replacing at index 1 of a fresh pair leaves the numeric index dangling past the new
    // single-element list; selection and replace then degrade to no-ops.
    let mut engine = make_engine("catcat");
    engine.set_query("cat");
    engine.find_next();
    engine.find_next();
    assert_eq!(engine.current_index(), Some(1));

    engine.replace_current("dog");
    assert_eq!(engine.surface().flattened_text(), "catdog");
    assert_eq!(engine.match_count(), 1);
    assert_eq!(engine.current_index(), Some(1));
    assert_eq!(engine.current_highlight(), None);

    engine.replace_current("bird"); // out of range: no-op
    assert_eq!(engine.surface().flattened_text(), "catdog");
}

#[test]
fn test_content_change_rescans_and_resets_index() {
    let mut engine = make_engine("ababab");
    engine.set_query("ab");
    engine.find_next();
    assert_eq!(engine.current_index(), Some(0));

    // Free-form edit: "x" lands inside the first match, breaking it.
    engine.surface_mut().insert(1, "x").unwrap();
    engine.content_changed();

    assert_eq!(engine.surface().flattened_text(), "axbabab");
    assert_eq!(engine.match_count(), 2);
    assert_eq!(engine.current_index(), None);
}

#[test]
fn test_stale_handle_degrades_to_cleared_state() {
    let events: Arc<Mutex<Vec<SearchStateChange>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut engine = make_engine("catcat");
    engine.subscribe(move |change| sink.lock().unwrap().push(*change));
    engine.set_query("cat");
    engine.find_next();

    // The host rips the current marker out from under the engine.
    let handle = engine.current_highlight().unwrap();
    engine.surface_mut().unwrap_highlight(handle).unwrap();

    engine.replace_current("dog");

    // No fault propagates; the engine falls back to a clean slate with the text intact.
    assert_eq!(engine.match_count(), 0);
    assert_eq!(engine.current_index(), None);
    assert_eq!(engine.surface().flattened_text(), "catcat");
    assert!(
        events
            .lock()
            .unwrap()
            .iter()
            .any(|change| change.change_type == SearchChangeType::SearchCleared)
    );
}

#[test]
fn test_subscribers_observe_rebuild_and_navigation() {
    let events: Arc<Mutex<Vec<SearchStateChange>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut engine = make_engine("ababab");
    engine.subscribe(move |change| sink.lock().unwrap().push(*change));

    engine.set_query("ab");
    engine.find_next();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].change_type, SearchChangeType::HighlightsRebuilt);
    assert_eq!(events[0].match_count, 3);
    assert_eq!(events[0].current_index, None);
    assert_eq!(events[1].change_type, SearchChangeType::CurrentChanged);
    assert_eq!(events[1].current_index, Some(0));
}
