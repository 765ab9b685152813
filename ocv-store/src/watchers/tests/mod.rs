use assertables::*;
use futures::stream;
use kube::runtime::watcher::Event;
use ocv_testutils::*;
use rstest::*;

use super::*;

fn pod(name: &str) -> DynamicObject {
    test_pod(name, &[])
}

async fn collect(events: Vec<Event<DynamicObject>>) -> Vec<WatchEvent> {
    from_kube_events(stream::iter(events.into_iter().map(Ok)))
        .map(|res| res.unwrap())
        .collect()
        .await
}

#[rstest]
#[tokio::test]
async fn test_initial_list_becomes_snapshot() {
    let events = collect(vec![
        Event::Init,
        Event::InitApply(pod("a")),
        Event::InitApply(pod("b")),
        Event::InitDone,
        Event::Apply(pod("c")),
        Event::Delete(pod("a")),
    ])
    .await;

    assert_eq!(
        events,
        vec![
            WatchEvent::Snapshot(vec![pod("a"), pod("b")]),
            WatchEvent::Upsert(pod("c")),
            WatchEvent::Delete("a".into()),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn test_relist_replaces_buffer() {
    let events = collect(vec![
        Event::Init,
        Event::InitApply(pod("a")),
        Event::InitDone,
        Event::Init,
        Event::InitApply(pod("b")),
        Event::InitDone,
    ])
    .await;

    assert_eq!(events, vec![WatchEvent::Snapshot(vec![pod("a")]), WatchEvent::Snapshot(vec![pod("b")])]);
}

#[rstest]
#[tokio::test]
async fn test_empty_initial_list() {
    let events = collect(vec![Event::Init, Event::InitDone]).await;
    assert_eq!(events, vec![WatchEvent::Snapshot(vec![])]);
}

#[rstest]
fn test_snapshot_buffer_state() {
    let mut buffer = SnapshotBuffer::default();
    assert!(!buffer.is_buffering());
    assert_none!(buffer.push(Event::Init));
    assert_none!(buffer.push(Event::InitApply(pod("a"))));
    assert!(buffer.is_buffering());
    assert_some!(buffer.push(Event::InitDone));
    assert!(!buffer.is_buffering());

    let mut nameless = pod("a");
    nameless.metadata.name = None;
    assert_none!(buffer.push(Event::Delete(nameless)));
}

#[rstest]
#[tokio::test]
async fn test_watch_errors_are_passed_through() {
    let events = vec![Ok(Event::Init), Err(watcher::Error::NoResourceVersion), Ok(Event::InitDone)];
    let results: Vec<_> = from_kube_events(stream::iter(events)).collect().await;

    assert_eq!(results.len(), 2);
    assert_err!(&results[0]);
    assert_ok!(&results[1]);
}
