//! Integration tests for live-update fan-out.

use fleet::server::ReportBroadcaster;

#[tokio::test]
async fn test_one_write_reaches_every_subscriber_exactly_once() {
    let broadcaster = ReportBroadcaster::new();

    // Three connected live subscribers
    let mut receivers: Vec<_> = (0..3).map(|_| broadcaster.subscribe().1).collect();

    broadcaster.broadcast(r#"{"id":"car_1","latitude":45.75}"#);

    for rx in &mut receivers {
        let payload = rx.recv().await.unwrap();
        assert!(payload.contains("car_1"));
        // Exactly one delivery per subscriber
        assert!(rx.try_recv().is_err());
    }
}

#[tokio::test]
async fn test_broken_subscriber_does_not_block_the_rest() {
    let broadcaster = ReportBroadcaster::new();

    let (_id1, mut rx1) = broadcaster.subscribe();
    let (_id2, rx2) = broadcaster.subscribe();
    let (_id3, mut rx3) = broadcaster.subscribe();

    // One subscriber's connection is already gone
    drop(rx2);

    broadcaster.broadcast("payload");

    assert_eq!(rx1.recv().await.unwrap(), "payload");
    assert_eq!(rx3.recv().await.unwrap(), "payload");
    assert_eq!(broadcaster.subscriber_count(), 2);
}

#[tokio::test]
async fn test_unsubscribed_peer_hears_nothing_further() {
    let broadcaster = ReportBroadcaster::new();

    let (id, mut rx) = broadcaster.subscribe();
    broadcaster.broadcast("first");
    broadcaster.unsubscribe(id);
    broadcaster.broadcast("second");

    assert_eq!(rx.recv().await.unwrap(), "first");
    // Channel closed after unsubscribe, no further deliveries
    assert!(rx.recv().await.is_none());
}
