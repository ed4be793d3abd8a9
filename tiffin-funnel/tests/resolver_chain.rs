mod support;

use support::{FakeSession, SHORT};
use tiffin_funnel::{ElementResolver, FunnelError, StrategySet};
use tiffin_session::{BrowserSession, Locator, SessionError};

fn dining_chain() -> StrategySet {
    StrategySet::new(
        "dining entry",
        vec![
            Locator::xpath("//a[contains(.,'Dining')]"),
            Locator::css("a[href*='dineout']"),
            Locator::xpath("//button[contains(.,'Dining')]"),
        ],
    )
}

#[tokio::test]
async fn stops_at_first_matching_strategy() {
    let session = FakeSession::new();
    session.place(&Locator::css("a[href*='dineout']"), "dining-link", "Dining Out");

    let resolver = ElementResolver::new(&session);
    let found = resolver.resolve(&dining_chain(), SHORT).await.unwrap();
    assert_eq!(found.text().await.unwrap(), "Dining Out");

    // The second strategy hit, so the first was tried and the third
    // never was.
    assert_eq!(
        session.waits(),
        vec![
            "xpath://a[contains(.,'Dining')]".to_string(),
            "css:a[href*='dineout']".to_string(),
        ]
    );
}

#[tokio::test]
async fn exhausted_chain_is_not_found() {
    let session = FakeSession::new();
    let resolver = ElementResolver::new(&session);

    let err = resolver.resolve(&dining_chain(), SHORT).await.unwrap_err();
    assert!(matches!(err, FunnelError::NotFound { ref target } if target == "dining entry"));
    assert_eq!(session.waits().len(), 3);
}

#[tokio::test]
async fn empty_set_is_not_found_without_session_calls() {
    let session = FakeSession::new();
    let resolver = ElementResolver::new(&session);

    let err = resolver
        .resolve(&StrategySet::new("switched off", vec![]), SHORT)
        .await
        .unwrap_err();
    assert!(matches!(err, FunnelError::NotFound { .. }));
    assert!(session.waits().is_empty());
}

#[tokio::test]
async fn peek_probes_without_waiting() {
    let session = FakeSession::new();
    session.place(&Locator::css("a[href*='dineout']"), "dining-link", "Dining Out");

    let resolver = ElementResolver::new(&session);
    let hit = resolver.peek(&dining_chain()).await;
    assert!(hit.is_some());

    // Probes go through find_elements, never through wait_for_element,
    // and stop at the first locator that matches.
    assert!(session.waits().is_empty());
    assert_eq!(session.finds().len(), 2);
}

#[tokio::test]
async fn peek_on_an_empty_page_is_none() {
    let session = FakeSession::new();
    let resolver = ElementResolver::new(&session);
    assert!(resolver.peek(&dining_chain()).await.is_none());
}

#[tokio::test]
async fn screenshot_capability_defaults_to_unsupported() {
    let session = FakeSession::new();
    let err = session.screenshot().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Unsupported {
            operation: "screenshot"
        }
    ));
}
