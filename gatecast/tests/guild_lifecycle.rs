//! Situational guild events derived from Ready, GuildCreate and GuildDelete.

use gatecast::{
    Context, Event, Filtered,
    event::{
        GuildAvailableEvent, GuildCreateEvent, GuildDeleteEvent, GuildJoinEvent, GuildLeaveEvent,
        GuildReadyEvent, GuildUnavailableEvent,
    },
    model::GuildId,
    testing::{Recorder, guild_create, guild_delete, ready},
};

mod common;
use common::{Bot, dispatcher};

fn watch_situational(dispatcher: &gatecast::Dispatcher<Bot>, seen: &Recorder) {
    dispatcher.add_handler(seen.handler::<Bot, GuildReadyEvent>("ready"));
    dispatcher.add_handler(seen.handler::<Bot, GuildAvailableEvent>("available"));
    dispatcher.add_handler(seen.handler::<Bot, GuildJoinEvent>("join"));
    dispatcher.add_handler(seen.handler::<Bot, GuildLeaveEvent>("leave"));
    dispatcher.add_handler(seen.handler::<Bot, GuildUnavailableEvent>("unavailable"));
}

#[tokio::test]
async fn guilds_announced_in_ready_arrive_as_guild_ready() {
    let (dispatcher, _) = dispatcher();
    let seen = Recorder::new();
    watch_situational(&dispatcher, &seen);

    dispatcher.call(ready(&[1])).await;
    dispatcher.call(guild_create(1)).await;
    dispatcher.close().await;

    assert_eq!(seen.entries(), vec!["ready"]);
    assert!(!dispatcher.guilds().is_pending_sync(GuildId(1)));
}

#[tokio::test]
async fn unknown_guilds_arrive_as_joins() {
    let (dispatcher, _) = dispatcher();
    let seen = Recorder::new();
    watch_situational(&dispatcher, &seen);

    dispatcher.call(guild_create(2)).await;
    dispatcher.close().await;

    assert_eq!(seen.entries(), vec!["join"]);
}

#[tokio::test]
async fn outages_go_unavailable_and_come_back_available() {
    let (dispatcher, _) = dispatcher();
    let seen = Recorder::new();
    watch_situational(&dispatcher, &seen);

    dispatcher.call(guild_delete(3, true)).await;
    dispatcher.close().await;
    assert!(dispatcher.guilds().is_unavailable(GuildId(3)));

    dispatcher.call(guild_create(3)).await;
    dispatcher.close().await;

    assert_eq!(seen.entries(), vec!["unavailable", "available"]);
    assert!(!dispatcher.guilds().is_unavailable(GuildId(3)));
}

#[tokio::test]
async fn leaving_is_a_leave() {
    let (dispatcher, _) = dispatcher();
    let seen = Recorder::new();
    watch_situational(&dispatcher, &seen);

    dispatcher.call(guild_delete(4, false)).await;
    dispatcher.close().await;

    assert_eq!(seen.entries(), vec!["leave"]);
}

#[tokio::test]
async fn raw_events_are_still_delivered() {
    let (dispatcher, _) = dispatcher();
    let seen = Recorder::new();
    dispatcher.add_handler(seen.handler::<Bot, GuildCreateEvent>("create"));
    dispatcher.add_handler(seen.handler::<Bot, GuildDeleteEvent>("delete"));
    dispatcher.add_handler(seen.handler::<Bot, GuildJoinEvent>("join"));

    dispatcher.call(guild_create(5)).await;
    dispatcher.close().await;
    dispatcher.call(guild_delete(5, false)).await;
    dispatcher.close().await;

    let mut entries = seen.entries();
    entries.sort();
    assert_eq!(entries, vec!["create", "delete", "join"]);
}

#[tokio::test]
async fn catch_all_handlers_see_only_the_raw_event() {
    let (dispatcher, _) = dispatcher();
    let seen = Recorder::new();

    let rec = seen.clone();
    dispatcher.add_handler(move |_: Bot, e: Event| {
        rec.record(e.kind().name());
        async {}
    });
    dispatcher.add_handler(seen.handler::<Bot, Context>("context"));

    dispatcher.call(guild_create(6)).await;
    dispatcher.close().await;

    let mut entries = seen.entries();
    entries.sort();
    assert_eq!(entries, vec!["GuildCreate", "context"]);
}

#[tokio::test]
async fn filtering_skips_the_situational_event_but_not_the_bookkeeping() {
    let (dispatcher, reports) = dispatcher();
    let seen = Recorder::new();
    watch_situational(&dispatcher, &seen);

    dispatcher.add_middleware(|_: Bot, _: GuildDeleteEvent| async { Err::<(), _>(Filtered) });

    dispatcher.call(guild_delete(7, true)).await;
    dispatcher.close().await;
    assert!(seen.is_empty());
    assert!(dispatcher.guilds().is_unavailable(GuildId(7)));

    dispatcher.call(guild_create(7)).await;
    dispatcher.close().await;
    assert_eq!(seen.entries(), vec!["available"]);
    assert!(reports.is_empty());
}

#[tokio::test]
async fn situational_events_share_the_raw_event_context() {
    let (dispatcher, _) = dispatcher();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    dispatcher.add_middleware(|_: Bot, e: GuildCreateEvent| async move {
        e.ctx.set("source", "middleware");
    });
    dispatcher.add_handler(move |_: Bot, e: GuildJoinEvent| {
        tx.send(e.context().get::<&'static str>("source")).unwrap();
        async {}
    });

    dispatcher.call(guild_create(8)).await;
    dispatcher.close().await;

    assert_eq!(rx.recv().await.unwrap(), Some("middleware"));
}

#[tokio::test]
async fn a_new_ready_forgets_the_previous_session() {
    let (dispatcher, _) = dispatcher();
    let seen = Recorder::new();
    watch_situational(&dispatcher, &seen);

    for event in [
        Event::from(guild_delete(9, true)),
        ready(&[10]).into(),
        guild_create(9).into(),
        guild_create(10).into(),
    ] {
        dispatcher.call(event).await;
        dispatcher.close().await;
    }

    assert_eq!(seen.entries(), vec!["unavailable", "join", "ready"]);
}
