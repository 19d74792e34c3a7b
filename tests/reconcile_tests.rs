//! Episode reconciliation through the public API, fed TVMaze-shaped JSON.

use lundflix::domain::{EpisodeType, ShowId};
use lundflix::models::episode::EpisodeRecord;
use lundflix::sync::{SyncError, build_episode_records, reconcile};
use serde_json::{Value, json};

fn tvmaze_episode(id: i64, season: u32, number: Option<u32>, kind: &str, airdate: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Episode {id}"),
        "season": season,
        "number": number,
        "type": kind,
        "airdate": airdate,
        "airtime": "",
        "runtime": 30,
        "rating": {"average": null},
        "image": null,
        "summary": null
    })
}

fn numbering(episodes: &[EpisodeRecord]) -> Vec<(i64, u32, Option<u32>)> {
    episodes
        .iter()
        .map(|e| (e.source_id, e.season, e.number))
        .collect()
}

fn build(show: i64, payload: &[Value]) -> Vec<EpisodeRecord> {
    build_episode_records(ShowId::new(show), payload).expect("valid payload")
}

#[test]
fn specials_numbered_by_airdate_with_undated_last() {
    let payload = [
        tvmaze_episode(10, 1, None, "significant_special", ""),
        tvmaze_episode(9, 1, None, "significant_special", "2020-01-01"),
        tvmaze_episode(11, 1, None, "significant_special", "2020-02-01"),
    ];
    let out = reconcile(build(5, &payload));
    assert_eq!(
        numbering(&out),
        [(9, 1, Some(1)), (11, 1, Some(2)), (10, 1, Some(3))]
    );
}

#[test]
fn mixed_season_keeps_regular_numbers_and_drops_insignificant() {
    let payload = [
        tvmaze_episode(1, 1, Some(1), "regular", "2020-01-01"),
        tvmaze_episode(2, 1, None, "insignificant_special", "2020-01-03"),
        tvmaze_episode(3, 1, Some(2), "regular", "2020-01-08"),
        tvmaze_episode(4, 1, None, "significant_special", "2020-01-10"),
        tvmaze_episode(5, 1, Some(3), "regular", "2020-01-15"),
    ];
    let out = reconcile(build(5, &payload));

    assert_eq!(
        numbering(&out),
        [(1, 1, Some(1)), (3, 1, Some(2)), (5, 1, Some(3)), (4, 1, Some(1))]
    );
    assert!(
        out.iter()
            .all(|e| e.episode_type != EpisodeType::InsignificantSpecial)
    );
}

#[test]
fn specials_of_different_shows_never_share_numbering() {
    let mut records = build(
        1,
        &[tvmaze_episode(100, 1, None, "significant_special", "2020-05-01")],
    );
    records.extend(build(
        2,
        &[
            tvmaze_episode(50, 1, None, "significant_special", "2020-01-01"),
            tvmaze_episode(200, 1, None, "significant_special", "2020-06-01"),
        ],
    ));

    let out = reconcile(records);
    let by_id = |id: i64| out.iter().find(|e| e.source_id == id).unwrap().number;
    assert_eq!(by_id(100), Some(1));
    assert_eq!(by_id(50), Some(1));
    assert_eq!(by_id(200), Some(2));
}

#[test]
fn reconcile_is_idempotent() {
    let payload = [
        tvmaze_episode(7, 2, None, "significant_special", ""),
        tvmaze_episode(3, 2, Some(1), "regular", "2021-01-01"),
        tvmaze_episode(8, 2, None, "significant_special", "2021-03-01"),
        tvmaze_episode(6, 2, None, "significant_special", "2021-03-01"),
        tvmaze_episode(9, 3, None, "significant_special", "2022-01-01"),
    ];
    let once = reconcile(build(4, &payload));
    let twice = reconcile(once.clone());

    let mut a = numbering(&once);
    let mut b = numbering(&twice);
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
}

#[test]
fn renumbering_ignores_source_numbers() {
    let payload = [
        tvmaze_episode(1, 1, Some(40), "significant_special", "2020-02-01"),
        tvmaze_episode(2, 1, Some(2), "significant_special", "2020-01-01"),
    ];
    let out = reconcile(build(1, &payload));
    assert_eq!(numbering(&out), [(2, 1, Some(1)), (1, 1, Some(2))]);
}

#[test]
fn batch_without_specials_is_unchanged() {
    let payload = [
        tvmaze_episode(2, 1, Some(2), "regular", "2020-01-08"),
        tvmaze_episode(1, 1, Some(1), "regular", "2020-01-01"),
    ];
    let records = build(1, &payload);
    assert_eq!(reconcile(records.clone()), records);
}

#[test]
fn empty_batch_is_not_an_error() {
    let records = build(1, &[]);
    assert!(records.is_empty());
    assert!(reconcile(records).is_empty());
}

#[test]
fn invalid_entry_rejects_whole_batch() {
    let payload = [
        tvmaze_episode(1, 1, Some(1), "regular", "2020-01-01"),
        json!({"id": "not-a-number", "season": 1}),
    ];
    let err = build_episode_records(ShowId::new(1), &payload).unwrap_err();
    assert!(matches!(err, SyncError::Validation { .. }));
}
