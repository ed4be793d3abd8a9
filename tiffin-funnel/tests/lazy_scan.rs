mod support;

use std::time::Duration;

use support::FakeSession;
use tiffin_funnel::LazyListScanner;
use tiffin_session::Locator;

const PAUSE: Duration = Duration::from_millis(1);

fn card_locator() -> Locator {
    Locator::css("[data-testid='restaurant-card']")
}

fn cards() -> Vec<Locator> {
    vec![card_locator(), Locator::css("[class*='card']")]
}

#[tokio::test]
async fn matches_case_insensitively_without_scrolling() {
    let session = FakeSession::new();
    session.place(&card_locator(), "oven-express", "Oven Express - Multicuisine");

    let scanner = LazyListScanner::new(&session, 800, PAUSE);
    let hit = scanner
        .find_by_text(&cards(), "oven express", 8)
        .await
        .unwrap();
    assert_eq!(
        hit.unwrap().text().await.unwrap(),
        "Oven Express - Multicuisine"
    );
    assert_eq!(session.scroll_count(), 0);
}

#[tokio::test]
async fn scrolls_until_the_card_renders() {
    let session = FakeSession::new();
    session.place(&card_locator(), "pizza", "Pizza Palace");
    session.place_at_depth(&card_locator(), "oven-express", "Oven Express", 3);

    let scanner = LazyListScanner::new(&session, 800, PAUSE);
    let hit = scanner
        .find_by_text(&cards(), "oven express", 8)
        .await
        .unwrap();
    assert!(hit.is_some());
    assert_eq!(session.scroll_count(), 3);
}

#[tokio::test]
async fn respects_the_attempt_budget() {
    let session = FakeSession::new();
    session.place(&card_locator(), "pizza", "Pizza Palace");

    let scanner = LazyListScanner::new(&session, 800, PAUSE);
    let hit = scanner
        .find_by_text(&cards(), "oven express", 8)
        .await
        .unwrap();
    assert!(hit.is_none());
    assert_eq!(session.scroll_count(), 8);
    // The very last query is the link fallback.
    assert_eq!(session.finds().last().unwrap(), "css:a");
}

#[tokio::test]
async fn fallback_finds_a_link_when_no_card_matches() {
    let session = FakeSession::new();
    session.place(&card_locator(), "pizza", "Pizza Palace");
    session.place(&Locator::css("a"), "oven-link", "Order from Oven Express");

    let scanner = LazyListScanner::new(&session, 800, PAUSE);
    let hit = scanner
        .find_by_text(&cards(), "oven express", 2)
        .await
        .unwrap();
    assert_eq!(
        hit.unwrap().text().await.unwrap(),
        "Order from Oven Express"
    );
    // The budget was spent on the cards before the fallback ran.
    assert_eq!(session.scroll_count(), 2);
}

#[tokio::test]
async fn skips_candidates_whose_text_cannot_be_read() {
    let session = FakeSession::new();
    session.place_unreadable(&card_locator(), "ghost");
    session.place(&card_locator(), "oven-express", "Oven Express");

    let scanner = LazyListScanner::new(&session, 800, PAUSE);
    let hit = scanner
        .find_by_text(&cards(), "oven express", 8)
        .await
        .unwrap();
    assert_eq!(hit.unwrap().text().await.unwrap(), "Oven Express");
    assert_eq!(session.scroll_count(), 0);
}

#[tokio::test]
async fn rescanning_a_static_page_is_idempotent() {
    let session = FakeSession::new();
    session.place(&card_locator(), "oven-express", "Oven Express");

    let scanner = LazyListScanner::new(&session, 800, PAUSE);
    let first = scanner
        .find_by_text(&cards(), "oven express", 8)
        .await
        .unwrap()
        .unwrap();
    let second = scanner
        .find_by_text(&cards(), "oven express", 8)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.text().await.unwrap(), second.text().await.unwrap());
    assert_eq!(session.scroll_count(), 0);
}
