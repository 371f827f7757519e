//! Service-level tests over a real on-disk SQLite store.
//!
//! The commit path is deliberately exercised concurrently: the whole point
//! of the upsert-based aggregator is that two sessions committing for the
//! same user and day can never lose an update.

use chrono::{Duration, Local, NaiveDate};
use tempfile::TempDir;

use repcount::{Database, LeaderboardKind, ServiceError, WorkoutService};

fn open_service(dir: &TempDir) -> WorkoutService {
    let db = Database::new(dir.path().join("test.sqlite3")).expect("database should open");
    WorkoutService::new(db)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tokio::test]
async fn commits_merge_additively_regardless_of_order() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    service.submit_repetitions(Some("alice"), 5).await.unwrap();
    let first = service.submit_repetitions(Some("alice"), 3).await.unwrap();
    assert_eq!(first.count, 8);

    service.submit_repetitions(Some("bob"), 3).await.unwrap();
    let second = service.submit_repetitions(Some("bob"), 5).await.unwrap();
    assert_eq!(second.count, 8);
}

#[tokio::test]
async fn concurrent_commits_never_lose_an_update() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    let (a, b) = tokio::join!(
        service.submit_repetitions(Some("alice"), 4),
        service.submit_repetitions(Some("alice"), 6),
    );
    a.unwrap();
    b.unwrap();

    let stats = service.get_stats(Some("alice")).await.unwrap();
    assert_eq!(stats.today, 10);
}

#[tokio::test]
async fn unresolved_identity_short_circuits_every_operation() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    assert!(matches!(
        service.submit_repetitions(None, 5).await,
        Err(ServiceError::Unauthorized)
    ));
    assert!(matches!(
        service.get_stats(None).await,
        Err(ServiceError::Unauthorized)
    ));
    assert!(matches!(
        service.list_records(None, None).await,
        Err(ServiceError::Unauthorized)
    ));
    assert!(matches!(
        service.get_leaderboard(None, LeaderboardKind::Daily).await,
        Err(ServiceError::Unauthorized)
    ));
}

#[tokio::test]
async fn zero_count_is_rejected_without_touching_storage() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    assert!(matches!(
        service.submit_repetitions(Some("alice"), 0).await,
        Err(ServiceError::InvalidInput(_))
    ));

    let records = service.list_records(Some("alice"), None).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn user_with_no_records_gets_a_zeroed_week() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    let stats = service.get_stats(Some("nobody")).await.unwrap();
    assert_eq!(stats.today, 0);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.week.len(), 7);
    assert!(stats.week.iter().all(|entry| entry.count == 0));
    assert_eq!(stats.week[0].day, "Sun");
    assert_eq!(stats.week[6].day, "Sat");
}

#[tokio::test]
async fn stats_combine_today_week_and_total() {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path().join("test.sqlite3")).unwrap();
    let service = WorkoutService::new(db.clone());

    // A record from a previous week only shows up in the total.
    db.commit_repetitions("alice", today() - Duration::days(30), 100)
        .await
        .unwrap();
    service.submit_repetitions(Some("alice"), 25).await.unwrap();

    let stats = service.get_stats(Some("alice")).await.unwrap();
    assert_eq!(stats.today, 25);
    assert_eq!(stats.total, 125);
    let week_sum: u64 = stats.week.iter().map(|entry| u64::from(entry.count)).sum();
    assert_eq!(week_sum, 25);
}

#[tokio::test]
async fn daily_leaderboard_ranks_by_count_descending() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    service.upsert_profile(Some("a"), "Ana").await.unwrap();
    service.upsert_profile(Some("b"), "Ben").await.unwrap();
    service.upsert_profile(Some("c"), "Cal").await.unwrap();
    service.submit_repetitions(Some("a"), 10).await.unwrap();
    service.submit_repetitions(Some("b"), 20).await.unwrap();
    service.submit_repetitions(Some("c"), 5).await.unwrap();

    let board = service
        .get_leaderboard(Some("a"), LeaderboardKind::Daily)
        .await
        .unwrap();

    assert_eq!(board.len(), 3);
    assert_eq!(
        (board[0].rank, board[0].display_name.as_str(), board[0].count),
        (1, "Ben", 20)
    );
    assert_eq!(
        (board[1].rank, board[1].display_name.as_str(), board[1].count),
        (2, "Ana", 10)
    );
    assert_eq!(
        (board[2].rank, board[2].display_name.as_str(), board[2].count),
        (3, "Cal", 5)
    );
}

#[tokio::test]
async fn ties_break_on_user_id_ascending() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    service.submit_repetitions(Some("zoe"), 15).await.unwrap();
    service.submit_repetitions(Some("amy"), 15).await.unwrap();

    let board = service
        .get_leaderboard(Some("amy"), LeaderboardKind::Daily)
        .await
        .unwrap();

    assert_eq!(board[0].user_id, "amy");
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[1].user_id, "zoe");
    assert_eq!(board[1].rank, 2);
}

#[tokio::test]
async fn overall_leaderboard_sums_days_and_counts_active_ones() {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path().join("test.sqlite3")).unwrap();
    let service = WorkoutService::new(db.clone());

    service.upsert_profile(Some("alice"), "Alice").await.unwrap();
    db.commit_repetitions("alice", today() - Duration::days(2), 30)
        .await
        .unwrap();
    db.commit_repetitions("alice", today() - Duration::days(1), 20)
        .await
        .unwrap();
    service.submit_repetitions(Some("alice"), 10).await.unwrap();

    let board = service
        .get_leaderboard(Some("alice"), LeaderboardKind::Overall)
        .await
        .unwrap();

    assert_eq!(board.len(), 1);
    assert_eq!(board[0].count, 60);
    assert_eq!(board[0].days_active, Some(3));
}

#[tokio::test]
async fn list_records_orders_newest_first_and_filters_by_day() {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path().join("test.sqlite3")).unwrap();
    let service = WorkoutService::new(db.clone());

    db.commit_repetitions("alice", today() - Duration::days(3), 12)
        .await
        .unwrap();
    service.submit_repetitions(Some("alice"), 7).await.unwrap();

    let all = service.list_records(Some("alice"), None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].date, today());
    assert_eq!(all[1].date, today() - Duration::days(3));

    let filtered = service
        .list_records(Some("alice"), Some(today()))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].count, 7);

    let empty = service
        .list_records(Some("alice"), Some(today() - Duration::days(9)))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn profile_upsert_validates_and_renames() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    assert!(matches!(
        service.upsert_profile(Some("alice"), "   ").await,
        Err(ServiceError::InvalidInput(_))
    ));

    let created = service.upsert_profile(Some("alice"), "Alice").await.unwrap();
    assert_eq!(created.display_name, "Alice");

    let renamed = service
        .upsert_profile(Some("alice"), "Alice B.")
        .await
        .unwrap();
    assert_eq!(renamed.display_name, "Alice B.");
    assert_eq!(renamed.id, "alice");
}
