use domains::{Change, ForumRepository, MockForumRepository, ThreadId};
use integration_tests::*;
use services::{spawn_persistence, ForumStore, ManualClock, Outbox};
use std::sync::Arc;
use storage_adapters::{JsonFileRepository, MemoryRepository};

#[tokio::test]
async fn accepted_mutations_reach_the_repository() {
    let repo = Arc::new(MemoryRepository::with_snapshot(demo()));
    let (outbox, rx) = Outbox::channel();
    let worker = spawn_persistence(repo.clone(), rx);

    let snapshot = repo.load_all().await.unwrap();
    let clock = Arc::new(ManualClock::new(start()));
    let mut store = ForumStore::from_snapshot(snapshot, clock).with_outbox(outbox);

    let admin = michael(&store);
    store.toggle_lock(&admin, &ThreadId::from("thread1")).unwrap();
    store.delete_thread(&admin, &ThreadId::from("thread5")).unwrap();
    drop(store);
    worker.await.unwrap();

    let persisted = repo.load_all().await.unwrap();
    assert_eq!(persisted.threads.len(), 4);
    assert!(persisted.threads.iter().any(|t| t.id.as_str() == "thread1" && t.is_locked));
    let rp_general = persisted
        .categories
        .iter()
        .find(|c| c.id.as_str() == "rp-general-s2")
        .unwrap();
    assert_eq!(rp_general.stats.threads_count, 0);
}

#[tokio::test]
async fn rejected_intents_emit_nothing() {
    let mut repo = MockForumRepository::new();
    repo.expect_persist().never();

    let (outbox, rx) = Outbox::channel();
    let worker = spawn_persistence(Arc::new(repo), rx);
    let (store, _) = demo_store();
    let mut store = store.with_outbox(outbox);

    let franklin = franklin(&store);
    assert!(store.toggle_lock(&franklin, &ThreadId::from("thread1")).is_err());
    assert!(store.delete_thread(&franklin, &ThreadId::from("thread1")).is_err());
    drop(store);
    worker.await.unwrap();
}

#[tokio::test]
async fn reply_emits_thread_then_category() {
    let mut repo = MockForumRepository::new();
    let mut seq = mockall::Sequence::new();
    repo.expect_persist()
        .withf(|c| matches!(c, Change::ThreadSaved(t) if t.posts.len() == 2))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    repo.expect_persist()
        .withf(|c| matches!(c, Change::CategorySaved(cat) if cat.stats.posts_count == 2))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let (outbox, rx) = Outbox::channel();
    let worker = spawn_persistence(Arc::new(repo), rx);
    let (store, _) = demo_store();
    let mut store = store.with_outbox(outbox);

    let lester = lester(&store);
    store
        .add_post(&lester, &ThreadId::from("thread3"), "Mic ready, sending a request now.")
        .unwrap();
    drop(store);
    worker.await.unwrap();
}

#[tokio::test]
async fn json_file_round_trip_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forum.json");
    let repo = Arc::new(JsonFileRepository::new(&path));
    repo.write_snapshot(&demo()).await.unwrap();

    let (outbox, rx) = Outbox::channel();
    let worker = spawn_persistence(repo.clone(), rx);
    let clock = Arc::new(ManualClock::new(start()));
    let mut store =
        ForumStore::from_snapshot(repo.load_all().await.unwrap(), clock).with_outbox(outbox);
    let admin = michael(&store);
    let lester_id = domains::UserId::from("user4");
    store.ban_user(&admin, &lester_id).unwrap();
    drop(store);
    worker.await.unwrap();

    let reloaded = JsonFileRepository::new(&path).load_all().await.unwrap();
    let (store, _) = store_from(reloaded);
    assert!(store.get_user(&lester_id).unwrap().is_banned);
    assert_eq!(store.list_threads().len(), 5);
}
