//! Read loop lifecycle: opening, classification of raw events and graceful
//! shutdown.

use gatecast::{
    Dispatcher, GatewayEvent, LifecycleError,
    event::{
        ChannelUpdateEvent, GuildJoinEvent, GuildReadyEvent, MessageCreateEvent, ReadyEvent,
    },
    gateway::{ChannelUpdate, Close},
    model::{Channel, ChannelId},
    testing::{MemoryStore, Recorder, raw_guild_create, raw_message_create, raw_ready},
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::{Notify, mpsc};

mod common;
use common::{Bot, dispatcher};

#[tokio::test]
async fn raw_events_flow_from_the_channel_to_handlers() {
    let (dispatcher, reports) = dispatcher();
    let seen = Recorder::new();
    dispatcher.add_handler(seen.handler::<Bot, MessageCreateEvent>("message"));
    dispatcher.add_handler(seen.handler::<Bot, GuildJoinEvent>("join"));

    let (tx, rx) = mpsc::channel(8);
    dispatcher.open(rx).unwrap();

    tx.send(raw_message_create("hi").into()).await.unwrap();
    tx.send(raw_guild_create(1).into()).await.unwrap();
    tx.send(GatewayEvent::Unknown {
        name: "SOMETHING_NEW".into(),
    })
    .await
    .unwrap();
    drop(tx);

    // The read loop ends once the channel is drained and closed.
    tokio::time::sleep(Duration::from_millis(50)).await;
    dispatcher.close().await;

    let mut entries = seen.entries();
    entries.sort();
    assert_eq!(entries, vec!["join", "message"]);
    assert!(reports.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn guild_bookkeeping_follows_arrival_order() {
    let (dispatcher, reports) = dispatcher();
    let seen = Recorder::new();
    dispatcher.add_middleware(|_: Bot, _: ReadyEvent| async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });
    dispatcher.add_handler(seen.handler::<Bot, GuildReadyEvent>("ready"));
    dispatcher.add_handler(seen.handler::<Bot, GuildJoinEvent>("join"));

    let (tx, rx) = mpsc::channel(8);
    dispatcher.open(rx).unwrap();
    tx.send(raw_ready(&[1]).into()).await.unwrap();
    tx.send(raw_guild_create(1).into()).await.unwrap();
    drop(tx);

    tokio::time::sleep(Duration::from_millis(100)).await;
    dispatcher.close().await;

    assert_eq!(seen.entries(), vec!["ready"]);
    assert!(reports.is_empty());
}

#[tokio::test]
async fn close_waits_for_in_flight_handlers() {
    let (dispatcher, _) = dispatcher();
    let release = Arc::new(Notify::new());
    let started = Arc::new(Notify::new());
    let finished = Arc::new(AtomicBool::new(false));

    {
        let release = release.clone();
        let started = started.clone();
        let finished = finished.clone();
        dispatcher.add_handler(move |_: Bot, _: MessageCreateEvent| {
            let release = release.clone();
            let started = started.clone();
            let finished = finished.clone();
            async move {
                started.notify_one();
                release.notified().await;
                finished.store(true, Ordering::SeqCst);
            }
        });
    }

    let (tx, rx) = mpsc::channel(1);
    dispatcher.open(rx).unwrap();
    tx.send(raw_message_create("slow").into()).await.unwrap();
    started.notified().await;

    let closing = tokio::spawn({
        let dispatcher = dispatcher.clone();
        async move { dispatcher.close().await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!closing.is_finished());
    assert!(!finished.load(Ordering::SeqCst));

    release.notify_one();
    closing.await.unwrap();
    assert!(finished.load(Ordering::SeqCst));
    assert!(!dispatcher.is_open());
}

#[tokio::test]
async fn events_after_close_are_not_read() {
    let (dispatcher, _) = dispatcher();
    let seen = Recorder::new();
    dispatcher.add_handler(seen.handler::<Bot, MessageCreateEvent>("message"));

    let (tx, rx) = mpsc::channel(4);
    dispatcher.open(rx).unwrap();
    dispatcher.close().await;

    // The receiver was dropped together with the read loop.
    assert!(tx.send(raw_message_create("late").into()).await.is_err());
    assert!(seen.is_empty());
}

#[tokio::test]
async fn a_closed_dispatcher_can_be_reopened() {
    let (dispatcher, _) = dispatcher();
    let (_tx, rx) = mpsc::channel(1);
    let (_tx2, rx2) = mpsc::channel(1);
    let (_tx3, rx3) = mpsc::channel(1);

    dispatcher.open(rx).unwrap();
    assert_eq!(dispatcher.open(rx2), Err(LifecycleError::AlreadyOpen));

    dispatcher.close().await;
    dispatcher.open(rx3).unwrap();
    assert!(dispatcher.is_open());
    dispatcher.close().await;
}

#[tokio::test]
async fn updates_carry_the_cached_entity() {
    let store = MemoryStore::new();
    store.insert_channel(Channel {
        id: ChannelId(7),
        name: "general".into(),
        ..Default::default()
    });

    let dispatcher = Dispatcher::builder(Bot::default())
        .store(store.clone())
        .build();
    let (names_tx, mut names_rx) = mpsc::unbounded_channel();
    dispatcher.add_handler(move |_: Bot, e: ChannelUpdateEvent| {
        let old = e.old.as_ref().map(|c| c.name.clone());
        names_tx.send((old, e.name.clone())).unwrap();
        async {}
    });

    let (tx, rx) = mpsc::channel(1);
    dispatcher.open(rx).unwrap();
    tx.send(
        ChannelUpdate(Channel {
            id: ChannelId(7),
            name: "off-topic".into(),
            ..Default::default()
        })
        .into(),
    )
    .await
    .unwrap();

    let (old, new) = names_rx.recv().await.unwrap();
    dispatcher.close().await;

    assert_eq!(old.as_deref(), Some("general"));
    assert_eq!(new, "off-topic");
}

#[tokio::test]
async fn close_events_are_dispatched() {
    let (dispatcher, _) = dispatcher();
    let (codes_tx, mut codes_rx) = mpsc::unbounded_channel();
    dispatcher.add_handler(move |_: Bot, e: gatecast::event::CloseEvent| {
        codes_tx.send(e.code).unwrap();
        async {}
    });

    let (tx, rx) = mpsc::channel(1);
    dispatcher.open(rx).unwrap();
    tx.send(
        Close {
            code: Some(4004),
            reason: "authentication failed".into(),
        }
        .into(),
    )
    .await
    .unwrap();

    assert_eq!(codes_rx.recv().await.unwrap(), Some(4004));
    dispatcher.close().await;
}
