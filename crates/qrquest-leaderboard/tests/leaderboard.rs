//! Integration tests for the leaderboard actor and its results file.

use std::path::Path;

use chrono::Timelike;
use qrquest_leaderboard::{LeaderboardConfig, LeaderboardError, LeaderboardHandle};
use qrquest_protocol::{Completion, GameResult, PlayerId};

// =========================================================================
// Helpers
// =========================================================================

fn completion(id: &str, completion_time: u64) -> Completion {
    Completion {
        player_id: PlayerId::from(id),
        name: format!("Name-{id}"),
        family_name: format!("Family-{id}"),
        completion_time,
    }
}

fn spawn(path: &Path) -> LeaderboardHandle {
    LeaderboardHandle::spawn(LeaderboardConfig::with_path(path))
}

async fn read_file(path: &Path) -> Vec<GameResult> {
    let bytes = tokio::fs::read(path).await.expect("results file exists");
    serde_json::from_slice(&bytes).expect("results file is valid JSON")
}

fn ranks(results: &[GameResult]) -> Vec<u32> {
    results.iter().map(|r| r.rank).collect()
}

// =========================================================================
// submit()
// =========================================================================

#[tokio::test]
async fn test_submit_first_result_gets_rank_one() {
    let dir = tempfile::tempdir().unwrap();
    let board = spawn(&dir.path().join("results.json"));

    let stored = board.submit(completion("p1", 120)).await.unwrap();

    assert_eq!(stored.rank, 1);
    assert_eq!(stored.completion_time, 120);
    assert_eq!(stored.name, "Name-p1");
}

#[tokio::test]
async fn test_submit_persists_whole_ranked_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    let board = spawn(&path);

    board.submit(completion("slow", 300)).await.unwrap();
    board.submit(completion("fast", 100)).await.unwrap();

    let on_disk = read_file(&path).await;
    let ids: Vec<&str> = on_disk.iter().map(|r| r.player_id.as_str()).collect();
    assert_eq!(ids, vec!["fast", "slow"]);
    assert_eq!(ranks(&on_disk), vec![1, 2]);
}

#[tokio::test]
async fn test_submit_file_is_pretty_printed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    let board = spawn(&path);

    board.submit(completion("p1", 1)).await.unwrap();

    let text = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(text.starts_with("[\n  {"), "got {text}");
}

#[tokio::test]
async fn test_submit_timestamp_has_microsecond_precision() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    let board = spawn(&path);

    let stored = board.submit(completion("p1", 1)).await.unwrap();

    assert_eq!(stored.timestamp.nanosecond() % 1_000, 0);
    let raw: serde_json::Value =
        serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
    let timestamp = raw[0]["timestamp"].as_str().unwrap();
    let fraction = timestamp.split_once('.').map_or("", |(_, f)| f);
    assert!(fraction.len() <= 6, "got {timestamp}");
}

#[tokio::test]
async fn test_submit_same_player_twice_creates_two_entries() {
    let dir = tempfile::tempdir().unwrap();
    let board = spawn(&dir.path().join("results.json"));

    board.submit(completion("p1", 50)).await.unwrap();
    board.submit(completion("p1", 50)).await.unwrap();

    assert_eq!(board.snapshot().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_submit_concurrent_submissions_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    let board = spawn(&path);

    let mut tasks = Vec::new();
    for i in 0..20u64 {
        let board = board.clone();
        tasks.push(tokio::spawn(async move {
            board.submit(completion(&format!("p{i}"), 1000 - i)).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let on_disk = read_file(&path).await;
    assert_eq!(on_disk.len(), 20, "no submission may be lost");
    let expected: Vec<u32> = (1..=20).collect();
    assert_eq!(ranks(&on_disk), expected);
}

#[tokio::test]
async fn test_submit_unwritable_file_returns_storage_error_and_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let board = spawn(&dir.path().join("missing").join("results.json"));

    let result = board.submit(completion("p1", 10)).await;

    assert!(matches!(result, Err(LeaderboardError::Storage(_))), "got {result:?}");
    assert!(board.snapshot().await.unwrap().is_empty());
}

// =========================================================================
// query()
// =========================================================================

#[tokio::test]
async fn test_query_unknown_player_returns_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let board = spawn(&dir.path().join("results.json"));
    board.submit(completion("p1", 10)).await.unwrap();

    let result = board.query(&PlayerId::from("nobody")).await;

    assert!(matches!(result, Err(LeaderboardError::NotFound(_))));
}

#[tokio::test]
async fn test_query_returns_current_player_and_top_ten() {
    let dir = tempfile::tempdir().unwrap();
    let board = spawn(&dir.path().join("results.json"));
    for i in 0..12u64 {
        board.submit(completion(&format!("p{i}"), 100 + i)).await.unwrap();
    }

    let standings = board.query(&PlayerId::from("p11")).await.unwrap();

    assert_eq!(standings.current_player.rank, 12);
    assert_eq!(standings.leaderboard.len(), 10);
    assert_eq!(standings.leaderboard[0].player_id.as_str(), "p0");
    assert_eq!(standings.leaderboard[9].rank, 10);
}

#[tokio::test]
async fn test_query_small_board_returns_all_entries() {
    let dir = tempfile::tempdir().unwrap();
    let board = spawn(&dir.path().join("results.json"));
    board.submit(completion("p1", 10)).await.unwrap();
    board.submit(completion("p2", 5)).await.unwrap();

    let standings = board.query(&PlayerId::from("p1")).await.unwrap();

    assert_eq!(standings.current_player.rank, 2);
    assert_eq!(standings.leaderboard.len(), 2);
}

#[tokio::test]
async fn test_query_respects_configured_top_n() {
    let dir = tempfile::tempdir().unwrap();
    let board = LeaderboardHandle::spawn(LeaderboardConfig {
        results_path: dir.path().join("results.json"),
        top_n: 3,
    });
    for i in 0..5u64 {
        board.submit(completion(&format!("p{i}"), i)).await.unwrap();
    }

    let standings = board.query(&PlayerId::from("p0")).await.unwrap();

    assert_eq!(standings.leaderboard.len(), 3);
}

// =========================================================================
// Startup loading
// =========================================================================

#[tokio::test]
async fn test_startup_loads_existing_results() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    {
        let board = spawn(&path);
        board.submit(completion("p1", 42)).await.unwrap();
    }

    let reopened = spawn(&path);
    let standings = reopened.query(&PlayerId::from("p1")).await.unwrap();

    assert_eq!(standings.current_player.completion_time, 42);
}

#[tokio::test]
async fn test_startup_corrupt_file_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    tokio::fs::write(&path, b"{ this is not json").await.unwrap();

    let board = spawn(&path);
    assert!(board.snapshot().await.unwrap().is_empty());

    // The next submission overwrites the corrupt file.
    board.submit(completion("p1", 7)).await.unwrap();
    assert_eq!(read_file(&path).await.len(), 1);
}

#[tokio::test]
async fn test_startup_unreadable_file_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    // A directory in place of the file makes every read fail with an I/O
    // error that isn't "not found".
    tokio::fs::create_dir(&path).await.unwrap();
    tokio::fs::write(path.join("keep.txt"), b"history").await.unwrap();

    let board = spawn(&path);

    let submitted = board.submit(completion("p1", 10)).await;
    assert!(matches!(submitted, Err(LeaderboardError::Storage(_))), "got {submitted:?}");
    let queried = board.query(&PlayerId::from("p1")).await;
    assert!(matches!(queried, Err(LeaderboardError::Storage(_))), "got {queried:?}");
    assert!(matches!(board.snapshot().await, Err(LeaderboardError::Storage(_))));

    let kept = tokio::fs::read(path.join("keep.txt")).await.unwrap();
    assert_eq!(kept, b"history");
}

#[tokio::test]
async fn test_startup_read_failure_is_retried_on_next_command() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    tokio::fs::create_dir(&path).await.unwrap();

    let board = spawn(&path);
    assert!(board.snapshot().await.is_err());

    // The file becomes readable; the existing history is picked up and
    // the next submission is ranked against it.
    tokio::fs::remove_dir(&path).await.unwrap();
    let json = r#"[{"player_id": "old", "name": "O", "family_name": "L",
        "completion_time": 50, "timestamp": "2024-05-01T10:00:00", "rank": 1}]"#;
    tokio::fs::write(&path, json).await.unwrap();

    let stored = board.submit(completion("new", 20)).await.unwrap();

    assert_eq!(stored.rank, 1);
    let on_disk = read_file(&path).await;
    let ids: Vec<&str> = on_disk.iter().map(|r| r.player_id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[tokio::test]
async fn test_startup_reads_file_written_by_hand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    let json = r#"[
  {"player_id": "b", "name": "B", "family_name": "X", "completion_time": 90,
   "timestamp": "2024-05-01T10:00:00.000001", "rank": 1},
  {"player_id": "a", "name": "A", "family_name": "Y", "completion_time": 30,
   "timestamp": "2024-05-01T09:00:00", "rank": 1}
]"#;
    tokio::fs::write(&path, json).await.unwrap();

    let board = spawn(&path);
    let standings = board.query(&PlayerId::from("a")).await.unwrap();

    assert_eq!(standings.current_player.rank, 1);
    assert_eq!(ranks(&standings.leaderboard), vec![1, 2]);
}
