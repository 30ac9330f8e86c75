use anyhow::Result;
use hostconnect::{
    db::{connect_pool, run_migrations},
    listings::{ListingStore, ListingUpdate, NewListing, SqliteListingStore},
    messages::{
        build_conversations, compose_message_at, Interaction, InteractionStore, NewInteraction,
        SqliteInteractionStore,
    },
    users::{ProfileUpdate, UserDirectory},
};
use sqlx::SqlitePool;
use time::{macros::datetime, OffsetDateTime};

// One connection, or every checkout would see a different in-memory database.
async fn memory_pool() -> Result<SqlitePool> {
    let pool = connect_pool("sqlite::memory:", 1).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

fn at(hour: u8, minute: u8) -> OffsetDateTime {
    datetime!(2024-06-01 00:00 UTC)
        .replace_hour(hour)
        .and_then(|t| t.replace_minute(minute))
        .expect("valid time of day")
}

fn listing(title: &str, price: f64, availability: bool) -> NewListing {
    NewListing {
        title: title.to_owned(),
        description: "Quiet street, big windows, fast wifi.".to_owned(),
        price,
        location: "Lisbon".to_owned(),
        availability,
    }
}

#[tokio::test]
async fn migrations_create_tables_and_are_idempotent() -> Result<()> {
    let pool = memory_pool().await?;
    run_migrations(&pool).await?;

    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master \
         WHERE type='table' AND name IN ('users','listings','interactions')",
    )
    .fetch_all(&pool)
    .await?;

    for expected in ["users", "listings", "interactions"] {
        assert!(names.contains(&expected.to_string()), "missing table {expected}");
    }
    Ok(())
}

#[tokio::test]
async fn interactions_are_queried_by_participant_in_insertion_order() -> Result<()> {
    let store = SqliteInteractionStore::new(memory_pool().await?);

    let first = compose_message_at(&store, "guest", "host", "Hello!", at(10, 0)).await?;
    let reply = compose_message_at(&store, "host", "guest", "Hi there", at(10, 5)).await?;
    let other = compose_message_at(&store, "guest", "host2", "Is it free?", at(9, 0)).await?;
    compose_message_at(&store, "host", "host2", "Unrelated", at(11, 0)).await?;

    let ids = |rows: Vec<Interaction>| rows.into_iter().map(|r| r.id).collect::<Vec<_>>();

    let everything = store.query_by_participant("guest", None).await?;
    assert_eq!(ids(everything), vec![first.id, reply.id, other.id]);
    let as_guest = store.query_by_participant("guest", Some("host")).await?;
    assert_eq!(ids(as_guest), vec![first.id, reply.id]);
    let as_host = store.query_by_participant("host", Some("guest")).await?;
    assert_eq!(ids(as_host), vec![first.id, reply.id]);
    assert!(store.query_by_participant("nobody", None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn stored_interaction_round_trips() -> Result<()> {
    let store = SqliteInteractionStore::new(memory_pool().await?);
    let sent_at = datetime!(2024-06-01 10:00:00.125 UTC);

    let stored = store
        .insert(NewInteraction {
            sender_id: "guest".to_owned(),
            counterpart_id: "host".to_owned(),
            message: "Can I check in early?".to_owned(),
            timestamp: sent_at,
        })
        .await?;

    let loaded = store.query_by_participant("host", None).await?;
    assert_eq!(loaded, vec![stored.clone()]);
    assert_eq!(stored.timestamp, sent_at);
    Ok(())
}

#[tokio::test]
async fn store_rejects_self_addressed_rows() -> Result<()> {
    let store = SqliteInteractionStore::new(memory_pool().await?);
    let result = store
        .insert(NewInteraction {
            sender_id: "host".to_owned(),
            counterpart_id: "host".to_owned(),
            message: "note to self".to_owned(),
            timestamp: datetime!(2024-06-01 10:00 UTC),
        })
        .await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn stored_history_aggregates_into_threads() -> Result<()> {
    let store = SqliteInteractionStore::new(memory_pool().await?);

    compose_message_at(&store, "guest", "host", "t1", at(10, 0)).await?;
    compose_message_at(&store, "host", "guest", "t2", at(10, 1)).await?;
    compose_message_at(&store, "carol", "guest", "t0", at(8, 0)).await?;
    compose_message_at(&store, "guest", "host", "t3", at(10, 2)).await?;

    let history = store.query_by_participant("guest", None).await?;
    let threads = build_conversations(history, "guest");
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0].counterpart_id(), "host");
    assert_eq!(threads[0].last_message().message, "t3");
    let texts: Vec<_> = threads[0].messages().iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["t1", "t2", "t3"]);
    assert_eq!(threads[1].counterpart_id(), "carol");
    Ok(())
}

#[tokio::test]
async fn listing_store_round_trip() -> Result<()> {
    let store = SqliteListingStore::new(memory_pool().await?);

    let loft = store.insert("host", listing("Sunny loft", 120.0, true)).await?;
    let cabin = store.insert("host", listing("Hidden cabin", 80.0, false)).await?;
    let studio = store.insert("other", listing("Tiny studio", 60.0, true)).await?;

    assert_eq!(store.get_by_id(loft.id).await?, Some(loft.clone()));
    assert!(loft.created_at <= cabin.created_at);

    let owned: Vec<_> = store.query_by_owner("host").await?.into_iter().map(|l| l.id).collect();
    assert_eq!(owned, vec![cabin.id, loft.id]);

    let available: Vec<_> = store.query_available().await?.into_iter().map(|l| l.id).collect();
    assert_eq!(available, vec![studio.id, loft.id]);
    Ok(())
}

#[tokio::test]
async fn listing_partial_update_keeps_other_fields() -> Result<()> {
    let store = SqliteListingStore::new(memory_pool().await?);
    let loft = store.insert("host", listing("Sunny loft", 120.0, true)).await?;

    let update = ListingUpdate {
        price: Some(99.5),
        ..ListingUpdate::default()
    };
    let updated = store
        .update_by_id(loft.id, update)
        .await?
        .expect("listing exists");

    assert_eq!(updated.price, 99.5);
    assert_eq!(updated.title, loft.title);
    assert_eq!(updated.availability, loft.availability);
    assert_eq!(updated.created_at, loft.created_at);
    assert!(updated.updated_at >= loft.updated_at);

    let missing = store.update_by_id(uuid::Uuid::now_v7(), ListingUpdate::default()).await?;
    assert!(missing.is_none());
    Ok(())
}

#[tokio::test]
async fn listing_delete_reports_whether_anything_went() -> Result<()> {
    let store = SqliteListingStore::new(memory_pool().await?);
    let loft = store.insert("host", listing("Sunny loft", 120.0, true)).await?;

    assert!(store.delete_by_id(loft.id).await?);
    assert!(!store.delete_by_id(loft.id).await?);
    assert_eq!(store.get_by_id(loft.id).await?, None);
    Ok(())
}

#[tokio::test]
async fn user_directory_creates_once_and_updates() -> Result<()> {
    let users = UserDirectory::new(memory_pool().await?);

    let created = users.ensure("u-1234567890", Some("guest@example.com")).await?;
    assert_eq!(created.email.as_deref(), Some("guest@example.com"));
    assert!(!created.verified);

    let again = users.ensure("u-1234567890", None).await?;
    assert_eq!(again, created);

    let update = ProfileUpdate {
        name: Some("  Ana  ".to_owned()),
        verified: Some(true),
    };
    let updated = users
        .update_profile("u-1234567890", update)
        .await?
        .expect("user exists");
    assert_eq!(updated.name, "Ana");
    assert!(updated.verified);

    assert_eq!(users.label("u-1234567890").await?, "Ana");
    assert_eq!(users.label("stranger-id").await?, "User stranger...");
    Ok(())
}
