use domains::{Thread, ThreadId};
use integration_tests::*;
use services::{SearchRequest, StatusFilter};

fn ids(threads: Vec<&Thread>) -> Vec<&str> {
    threads.into_iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn moderation_search_looks_at_every_post() {
    let (store, _) = demo_store();
    let found = store.search_threads(&SearchRequest::moderation("HEIST"));
    // thread1 mentions heists only in replies; thread3 in its title
    assert_eq!(ids(found), ["thread1", "thread3"]);
}

#[test]
fn thread_management_only_looks_at_the_opening_post() {
    let (store, _) = demo_store();
    let found = store.search_threads(&SearchRequest::thread_management("heist"));
    assert_eq!(ids(found), ["thread3"]);

    let found = store.search_threads(&SearchRequest::thread_management("kuruma"));
    assert_eq!(ids(found), ["thread2"]);
}

#[test]
fn blank_queries_differ_by_call_site() {
    let (store, _) = demo_store();
    assert!(store.search_threads(&SearchRequest::search_page("   ")).is_empty());
    assert_eq!(
        store
            .search_threads(&SearchRequest::thread_management(""))
            .len(),
        5
    );
}

#[test]
fn status_filter_narrows_text_matches() {
    let (store, _) = demo_store();
    let locked = store.search_threads(
        &SearchRequest::thread_management("").with_status(StatusFilter::Locked),
    );
    assert_eq!(ids(locked), ["thread4"]);

    let status: StatusFilter = "not-important".parse().unwrap();
    let found = store.search_threads(&SearchRequest::moderation("heist").with_status(status));
    assert_eq!(ids(found), ["thread3"]);

    let resolved = store.search_threads(
        &SearchRequest::search_page("armored").with_status(StatusFilter::Unresolved),
    );
    assert!(resolved.is_empty());
}

#[test]
fn results_follow_edits() {
    let (mut store, _) = demo_store();
    let franklin = franklin(&store);
    store
        .edit_thread(&franklin, &ThreadId::from("thread3"), "Pacific Standard crew wanted")
        .unwrap();
    let found = store.search_threads(&SearchRequest::thread_management("heist"));
    assert!(found.is_empty());
}

#[test]
fn user_search_matches_name_or_email() {
    let (store, _) = demo_store();
    let names: Vec<&str> = store
        .search_users("FRANKLIN@")
        .into_iter()
        .map(|u| u.username.as_str())
        .collect();
    assert_eq!(names, ["FranklinClinton"]);
    assert_eq!(store.search_users("").len(), 4);
}
