//! Race repository tests - filtering, ordering, status and initialization

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{DateTime, Duration, Utc};
use sportsbook::catalog::{Race, RaceFilter, Status};
use sportsbook::db::{Repository, FIXTURE_COUNT};
use sportsbook::types::ListRequest;

fn repo() -> Repository<Race> {
  let repo = Repository::in_memory().unwrap();
  repo.init(false).unwrap();
  repo
}

fn race(id: i64, meeting_id: i64, name: &str, number: i64, visible: bool, hours: i64) -> Race {
  Race::new(
    id,
    meeting_id,
    name,
    number,
    visible,
    Utc::now() + Duration::hours(hours),
  )
}

fn ids(races: &[Race]) -> Vec<i64> {
  races.iter().map(|r| r.id).collect()
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_is_idempotent() {
  let repo = Repository::<Race>::in_memory().unwrap();
  repo.init(false).unwrap();
  repo.init(false).unwrap();
  assert!(repo.is_initialized());
}

#[test]
fn test_new_repo_is_empty() {
  let repo = repo();
  assert!(repo.list_all().unwrap().is_empty());
  assert!(repo.list(&ListRequest::new()).unwrap().is_empty());
}

#[test]
fn test_seed_inserts_fixtures() {
  let repo = Repository::<Race>::in_memory().unwrap();
  repo.init(true).unwrap();

  let races = repo.list_all().unwrap();
  assert_eq!(races.len() as i64, FIXTURE_COUNT);
  let now = Utc::now();
  for race in &races {
    assert!((1..=10).contains(&race.meeting_id));
    assert!(race.advertised_start_time > now - Duration::days(1) - Duration::minutes(1));
    assert!(race.advertised_start_time < now + Duration::days(2) + Duration::minutes(1));
  }
}

#[test]
fn test_seed_runs_once_per_repository() {
  let repo = Repository::<Race>::in_memory().unwrap();
  repo.init(true).unwrap();
  assert_eq!(repo.clear().unwrap() as i64, FIXTURE_COUNT);

  // Reseeding would repopulate the cleared table
  repo.init(true).unwrap();
  assert!(repo.list_all().unwrap().is_empty());
}

type Snapshot = Vec<(i64, String, DateTime<Utc>)>;

fn snapshot(races: Vec<Race>) -> Snapshot {
  races
    .into_iter()
    .map(|r| (r.id, r.name, r.advertised_start_time))
    .collect()
}

#[test]
fn test_concurrent_init_seeds_once() {
  let repo = Arc::new(Repository::<Race>::in_memory().unwrap());
  let barrier = Arc::new(Barrier::new(8));

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let repo = repo.clone();
      let barrier = barrier.clone();
      thread::spawn(move || {
        barrier.wait();
        repo.init(true).unwrap();
        snapshot(repo.list_all().unwrap())
      })
    })
    .collect();

  let snapshots: Vec<Snapshot> = handles.into_iter().map(|h| h.join().unwrap()).collect();
  assert_eq!(snapshots[0].len() as i64, FIXTURE_COUNT);
  assert!(snapshots.iter().all(|s| s == &snapshots[0]));

  assert_eq!(repo.clear().unwrap() as i64, FIXTURE_COUNT);
  let handles: Vec<_> = (0..8)
    .map(|_| {
      let repo = repo.clone();
      thread::spawn(move || repo.init(true).unwrap())
    })
    .collect();
  for handle in handles {
    handle.join().unwrap();
  }
  assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn test_file_backed_repository() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("racing").join("data.db");

  {
    let repo = Repository::<Race>::open(&path).unwrap();
    repo.init(false).unwrap();
    repo.insert(&race(1, 4, "Caulfield Hawks", 2, true, 3)).unwrap();
  }

  let repo = Repository::<Race>::open(&path).unwrap();
  repo.init(false).unwrap();
  let races = repo.list_all().unwrap();
  assert_eq!(ids(&races), vec![1]);
  assert_eq!(races[0].meeting_id, 4);
}

// =============================================================================
// Insert / Clear / Get
// =============================================================================

#[test]
fn test_insert_and_fetch() {
  let repo = repo();
  let inserted = race(7, 3, "Randwick Storm", 5, true, 1);
  repo.insert(&inserted).unwrap();

  let fetched = repo.get(7).unwrap();
  assert_eq!(fetched.meeting_id, 3);
  assert_eq!(fetched.name, "Randwick Storm");
  assert_eq!(fetched.number, 5);
  assert!(fetched.visible);
  assert_eq!(
    fetched.advertised_start_time.timestamp_millis(),
    inserted.advertised_start_time.timestamp_millis()
  );
}

#[test]
fn test_insert_duplicate_id_fails() {
  let repo = repo();
  repo.insert(&race(1, 1, "a", 1, true, 1)).unwrap();
  assert!(repo.insert(&race(1, 2, "b", 2, true, 1)).is_err());
}

#[test]
fn test_get_missing_is_not_found() {
  let repo = repo();
  repo.insert(&race(1, 1, "a", 1, true, 1)).unwrap();
  let err = repo.get(99).unwrap_err();
  assert!(err.is_not_found());
  assert_eq!(err.to_string(), "race 99 not found");
}

#[test]
fn test_clear() {
  let repo = repo();
  repo.insert(&race(1, 1, "a", 1, true, 1)).unwrap();
  repo.insert(&race(2, 1, "b", 2, true, 1)).unwrap();
  assert_eq!(repo.clear().unwrap(), 2);
  assert!(repo.list_all().unwrap().is_empty());
}

// =============================================================================
// Status
// =============================================================================

#[test]
fn test_status_derived_immediately_after_insert() {
  let repo = repo();
  repo.insert(&race(1, 1, "past", 1, true, -2)).unwrap();
  repo.insert(&race(2, 1, "future", 2, true, 2)).unwrap();

  let races = repo.list(&ListRequest::new()).unwrap();
  assert_eq!(ids(&races), vec![1, 2]);
  assert_eq!(races[0].status, Status::Closed);
  assert_eq!(races[1].status, Status::Open);

  assert_eq!(repo.get(1).unwrap().status, Status::Closed);
  assert_eq!(repo.get(2).unwrap().status, Status::Open);
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_default_order_is_start_time_ascending() {
  let repo = repo();
  repo.insert(&race(1, 1, "c", 1, true, 5)).unwrap();
  repo.insert(&race(2, 1, "a", 2, false, -3)).unwrap();
  repo.insert(&race(3, 1, "b", 3, true, 1)).unwrap();

  let races = repo.list(&ListRequest::new()).unwrap();
  assert_eq!(ids(&races), vec![2, 3, 1]);
}

#[test]
fn test_filter_visible() {
  let repo = repo();
  repo.insert(&race(1, 1, "a", 1, true, 1)).unwrap();
  repo.insert(&race(2, 1, "b", 2, false, 2)).unwrap();
  repo.insert(&race(3, 2, "c", 3, true, 3)).unwrap();

  let request = ListRequest::new().with_filter(RaceFilter {
    visible: Some(true),
    ..Default::default()
  });
  let races = repo.list(&request).unwrap();
  assert_eq!(ids(&races), vec![1, 3]);
  assert!(races.iter().all(|r| r.visible));

  let request = ListRequest::new().with_filter(RaceFilter {
    visible: Some(false),
    ..Default::default()
  });
  assert_eq!(ids(&repo.list(&request).unwrap()), vec![2]);
}

#[test]
fn test_filter_meeting_ids() {
  let repo = repo();
  repo.insert(&race(1, 1, "a", 1, true, 1)).unwrap();
  repo.insert(&race(2, 2, "b", 2, false, 2)).unwrap();
  repo.insert(&race(3, 3, "c", 3, true, 3)).unwrap();

  let request = ListRequest::new().with_filter(RaceFilter {
    meeting_ids: vec![3, 1],
    ..Default::default()
  });
  assert_eq!(ids(&repo.list(&request).unwrap()), vec![1, 3]);
}

#[test]
fn test_filter_visible_and_meeting_ids_intersect() {
  let repo = repo();
  repo.insert(&race(1, 1, "a", 1, true, 1)).unwrap();
  repo.insert(&race(2, 1, "b", 2, false, 2)).unwrap();
  repo.insert(&race(3, 2, "c", 3, true, 3)).unwrap();
  repo.insert(&race(4, 3, "d", 4, true, 4)).unwrap();

  let request = ListRequest::new().with_filter(RaceFilter {
    visible: Some(true),
    meeting_ids: vec![1, 2],
  });
  assert_eq!(ids(&repo.list(&request).unwrap()), vec![1, 3]);
}

#[test]
fn test_empty_meeting_ids_matches_everything() {
  let repo = repo();
  repo.insert(&race(1, 1, "a", 1, true, 1)).unwrap();
  repo.insert(&race(2, 2, "b", 2, false, 2)).unwrap();

  let request = ListRequest::new().with_filter(RaceFilter::default());
  assert_eq!(ids(&repo.list(&request).unwrap()), vec![1, 2]);
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_order_by_single_desc() {
  let repo = repo();
  repo.insert(&race(1, 1, "Bravo", 1, true, 1)).unwrap();
  repo.insert(&race(2, 1, "Charlie", 2, true, 2)).unwrap();
  repo.insert(&race(3, 1, "Alpha", 3, true, 3)).unwrap();

  let request = ListRequest::new().with_order_by("name desc");
  assert_eq!(ids(&repo.list(&request).unwrap()), vec![2, 1, 3]);
}

#[test]
fn test_order_by_multi_key_tie_break() {
  let repo = repo();
  repo.insert(&race(1, 1, "Alpha", 2, true, 1)).unwrap();
  repo.insert(&race(2, 1, "Zulu", 2, true, 2)).unwrap();
  repo.insert(&race(3, 1, "Mike", 1, true, 3)).unwrap();

  let request = ListRequest::new().with_order_by("number asc,\t name   desc");
  assert_eq!(ids(&repo.list(&request).unwrap()), vec![3, 2, 1]);

  let request = ListRequest::new().with_order_by("number desc, name asc");
  assert_eq!(ids(&repo.list(&request).unwrap()), vec![1, 2, 3]);
}

#[test]
fn test_invalid_order_by_falls_back_to_default() {
  let repo = repo();
  repo.insert(&race(1, 1, "Alpha", 1, true, 5)).unwrap();
  repo.insert(&race(2, 1, "Bravo", 2, true, 1)).unwrap();

  for order_by in ["", "name desc extra", "1name", "name sideways", "name; DROP TABLE races"] {
    let request = ListRequest::new().with_order_by(order_by);
    assert_eq!(ids(&repo.list(&request).unwrap()), vec![2, 1], "{}", order_by);
  }
  assert_eq!(repo.list_all().unwrap().len(), 2);
}

#[test]
fn test_order_by_unknown_column_is_store_error() {
  let repo = repo();
  repo.insert(&race(1, 1, "Alpha", 1, true, 5)).unwrap();

  let request = ListRequest::new().with_order_by("colour");
  let err = repo.list(&request).unwrap_err();
  assert!(!err.is_not_found());
}

#[test]
fn test_filter_and_order_combined() {
  let repo = repo();
  repo.insert(&race(1, 1, "Alpha", 1, true, 1)).unwrap();
  repo.insert(&race(2, 1, "Bravo", 2, false, 2)).unwrap();
  repo.insert(&race(3, 1, "Charlie", 3, true, 3)).unwrap();

  let request = ListRequest::new()
    .with_filter(RaceFilter {
      visible: Some(true),
      meeting_ids: vec![1],
    })
    .with_order_by("number desc");
  assert_eq!(ids(&repo.list(&request).unwrap()), vec![3, 1]);
}
