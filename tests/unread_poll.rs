//! Unread-notification poll integration tests

mod common;

use std::time::Duration;

use common::Harness;
use serde_json::json;
use society_portal::portal::UnreadPoller;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_count(harness: &Harness, count: u64) {
    Mock::given(method("GET"))
        .and(path("/api/notifications/unread-count"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": count })))
        .mount(&harness.server)
        .await;
}

#[tokio::test]
async fn test_poll_publishes_count() {
    let harness = Harness::start().await;
    harness.login_as(false).await;
    mount_count(&harness, 3).await;

    let poller = UnreadPoller::new(harness.api.clone());
    let mut rx = poller.subscribe();

    assert_eq!(poller.poll_now().await, Some(3));
    assert_eq!(poller.count(), 3);
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), 3);
}

#[tokio::test]
async fn test_failed_poll_keeps_last_count() {
    let harness = Harness::start().await;
    harness.login_as(false).await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/unread-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 5 })))
        .up_to_n_times(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/unread-count"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&harness.server)
        .await;

    let poller = UnreadPoller::new(harness.api.clone());
    assert_eq!(poller.poll_now().await, Some(5));
    assert_eq!(poller.poll_now().await, None);
    assert_eq!(poller.count(), 5);
    assert!(harness.bridge.store().is_authenticated());
}

#[tokio::test]
async fn test_mark_all_read_zeroes_count() {
    let harness = Harness::start().await;
    harness.login_as(false).await;
    mount_count(&harness, 2).await;
    Mock::given(method("PATCH"))
        .and(path("/api/notifications/mark-all-read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let poller = UnreadPoller::new(harness.api.clone());
    poller.poll_now().await;
    poller.mark_all_read().await.unwrap();
    assert_eq!(poller.count(), 0);
}

#[tokio::test]
async fn test_spawned_poller_resets_on_logout() {
    let harness = Harness::start().await;
    harness.login_as(false).await;
    mount_count(&harness, 4).await;

    let poller = UnreadPoller::new(harness.api.clone()).with_interval(Duration::from_secs(3600));
    let mut rx = poller.subscribe();
    let handle = poller.spawn();

    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|count| *count == 4))
        .await
        .expect("first poll never landed")
        .unwrap();

    harness.bridge.clear().await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|count| *count == 0))
        .await
        .expect("count was not reset on logout")
        .unwrap();
    handle.stop();
}

#[tokio::test]
async fn test_count_arriving_after_logout_is_dropped() {
    let harness = Harness::start().await;
    harness.login_as(false).await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/unread-count"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "count": 9 }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&harness.server)
        .await;

    let poller = UnreadPoller::new(harness.api.clone());
    let mut rx = poller.subscribe();
    let in_flight = tokio::spawn({
        let poller = poller.clone();
        async move { poller.poll_now().await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    harness.bridge.clear().await.unwrap();

    assert_eq!(in_flight.await.unwrap(), None);
    assert_eq!(poller.count(), 0);
    assert!(!rx.has_changed().unwrap());
}
