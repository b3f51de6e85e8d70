//! Session cache staleness around bulk updates, against a real SQLite store

use roster_core::application::{CacheInvalidation, MemberSession};
use roster_core::domain::{MemberMutation, MemberPredicate};
use roster_core::port::MemberRepository;
use roster_integration_tests::Store;

#[tokio::test]
async fn test_manual_invalidation_stale_window() {
    let store = Store::in_memory().await.unwrap();
    let saved = store.save_ages(&[10, 19, 20, 24, 40]).await.unwrap();
    let target = saved[4].id;

    let mut session = MemberSession::new(store.members.clone(), CacheInvalidation::Manual);
    assert_eq!(session.find(target).await.unwrap().unwrap().age, 40);

    let affected = session
        .bulk_update(
            &MemberPredicate::AgeAtLeast(20),
            &MemberMutation::IncrementAge(1),
        )
        .await
        .unwrap();
    assert_eq!(affected, 3);

    // The store has moved on, the session has not
    assert_eq!(
        store.members.find_by_id(target).await.unwrap().unwrap().age,
        41
    );
    assert_eq!(session.find(target).await.unwrap().unwrap().age, 40);

    session.clear();
    assert_eq!(session.find(target).await.unwrap().unwrap().age, 41);
}

#[tokio::test]
async fn test_evict_refreshes_single_entry() {
    let store = Store::in_memory().await.unwrap();
    let saved = store.save_ages(&[30, 31]).await.unwrap();

    let mut session = MemberSession::new(store.members.clone(), CacheInvalidation::Manual);
    session.find(saved[0].id).await.unwrap();
    session.find(saved[1].id).await.unwrap();

    store
        .members
        .bulk_update(&MemberPredicate::All, &MemberMutation::SetAge(50))
        .await
        .unwrap();

    assert!(session.evict(saved[0].id));
    assert_eq!(session.find(saved[0].id).await.unwrap().unwrap().age, 50);
    // Not evicted: still the pre-update value
    assert_eq!(session.find(saved[1].id).await.unwrap().unwrap().age, 31);
}

#[tokio::test]
async fn test_automatic_invalidation_has_no_stale_window() {
    let store = Store::in_memory().await.unwrap();
    let saved = store.save_ages(&[10, 19, 20, 24, 40]).await.unwrap();
    let target = saved[4].id;

    let mut session = MemberSession::new(store.members.clone(), CacheInvalidation::Automatic);
    assert_eq!(session.find(target).await.unwrap().unwrap().age, 40);

    session
        .bulk_update(
            &MemberPredicate::AgeAtLeast(20),
            &MemberMutation::IncrementAge(1),
        )
        .await
        .unwrap();

    assert_eq!(session.cached_len(), 0);
    assert_eq!(session.find(target).await.unwrap().unwrap().age, 41);
}

#[tokio::test]
async fn test_session_writes_go_through() {
    let store = Store::in_memory().await.unwrap();
    let saved = store.save_ages(&[10]).await.unwrap().remove(0);

    let mut session = MemberSession::new(store.members.clone(), CacheInvalidation::Manual);
    let mut member = session.find(saved.id).await.unwrap().unwrap();
    member.age = 11;

    let updated = session.update(&member).await.unwrap();
    assert_eq!(session.find(saved.id).await.unwrap(), Some(updated.clone()));
    assert_eq!(store.members.find_by_id(saved.id).await.unwrap(), Some(updated.clone()));

    session.delete(&updated).await.unwrap();
    assert!(session.find(saved.id).await.unwrap().is_none());
    assert_eq!(store.members.count().await.unwrap(), 0);
}
