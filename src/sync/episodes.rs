//! Episode batch normalisation.
//!
//! TVMaze reports specials with a null `number` and a type of either
//! `significant_special` or `insignificant_special`. Insignificant specials
//! never reach the catalog. Significant specials get their own gapless
//! numbering per (show, season), ordered by airdate and then source id, so
//! that repeated syncs assign the same numbers.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use super::SyncError;
use crate::domain::{EpisodeType, ShowId};
use crate::models::episode::EpisodeRecord;

const ENTITY: &str = "episode";

/// Converts raw TVMaze episode objects into records owned by `show_id`.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] for the first entry that is not an
/// object, has no integer `id`, or carries a malformed `season`.
pub fn build_episode_records(
    show_id: ShowId,
    payload: &[Value],
) -> Result<Vec<EpisodeRecord>, SyncError> {
    payload
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let fields = value
                .as_object()
                .ok_or_else(|| SyncError::validation(ENTITY, index, "expected an object"))?;
            build_one(show_id, index, fields)
        })
        .collect()
}

fn build_one(
    show_id: ShowId,
    index: usize,
    fields: &Map<String, Value>,
) -> Result<EpisodeRecord, SyncError> {
    let source_id = fields
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| SyncError::validation(ENTITY, index, "missing or non-integer id"))?;

    let season = match fields.get("season") {
        None | Some(Value::Null) => 0,
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                SyncError::validation(ENTITY, index, format!("malformed season {value}"))
            })?,
    };

    let number = fields
        .get("number")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());

    Ok(EpisodeRecord {
        source_id,
        show_id,
        season,
        number,
        name: string_field(fields, "name").unwrap_or_default(),
        episode_type: EpisodeType::from_upstream(fields.get("type").and_then(Value::as_str)),
        airdate: parse_airdate(source_id, fields.get("airdate")),
        airtime: string_field(fields, "airtime"),
        runtime: fields.get("runtime").and_then(Value::as_i64),
        rating: object_field(fields, "rating"),
        image: object_field(fields, "image"),
        summary: string_field(fields, "summary"),
    })
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn object_field(fields: &Map<String, Value>, key: &str) -> Option<Value> {
    fields.get(key).filter(|v| !v.is_null()).cloned()
}

fn parse_airdate(source_id: i64, value: Option<&Value>) -> Option<NaiveDate> {
    let raw = value.and_then(Value::as_str).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(source_id, airdate = raw, error = %e, "Ignoring unparseable airdate");
            None
        }
    }
}

/// Applies the special-episode policy to a batch.
///
/// Regular episodes keep their order and numbers. Significant specials follow
/// them, grouped by (show, season) in first-seen order, and numbered from 1
/// within each group.
#[must_use]
pub fn reconcile(episodes: Vec<EpisodeRecord>) -> Vec<EpisodeRecord> {
    let total = episodes.len();

    let (specials, mut regular): (Vec<_>, Vec<_>) = episodes
        .into_iter()
        .filter(|e| e.episode_type != EpisodeType::InsignificantSpecial)
        .partition(EpisodeRecord::is_significant_special);

    let discarded = total - regular.len() - specials.len();
    if specials.is_empty() {
        debug!(total, discarded, "No significant specials in batch");
        return regular;
    }

    let special_count = specials.len();
    let groups = group_by_season(specials);
    let group_count = groups.len();

    for mut group in groups {
        group.sort_by(compare_specials);
        for (index, episode) in group.iter_mut().enumerate() {
            episode.number = Some(u32::try_from(index + 1).unwrap_or(u32::MAX));
        }
        regular.extend(group);
    }

    debug!(
        total,
        discarded,
        specials = special_count,
        groups = group_count,
        "Renumbered significant specials"
    );
    regular
}

fn group_by_season(specials: Vec<EpisodeRecord>) -> Vec<Vec<EpisodeRecord>> {
    let mut positions: HashMap<(ShowId, u32), usize> = HashMap::new();
    let mut groups: Vec<Vec<EpisodeRecord>> = Vec::new();

    for episode in specials {
        let slot = *positions
            .entry((episode.show_id, episode.season))
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push(episode);
    }

    groups
}

/// Airdate ascending with undated specials last, then source id.
fn compare_specials(a: &EpisodeRecord, b: &EpisodeRecord) -> Ordering {
    let by_date = match (a.airdate, b.airdate) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.source_id.cmp(&b.source_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn special(id: i64, season: u32, airdate: Option<&str>) -> EpisodeRecord {
        EpisodeRecord {
            source_id: id,
            show_id: ShowId::new(5),
            season,
            number: None,
            name: format!("Special {id}"),
            episode_type: EpisodeType::SignificantSpecial,
            airdate: airdate.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            airtime: None,
            runtime: None,
            rating: None,
            image: None,
            summary: None,
        }
    }

    fn regular(id: i64, season: u32, number: u32) -> EpisodeRecord {
        EpisodeRecord {
            number: Some(number),
            episode_type: EpisodeType::Regular,
            ..special(id, season, Some("2020-01-01"))
        }
    }

    #[test]
    fn undated_special_sorts_last() {
        let out = reconcile(vec![
            special(10, 1, None),
            special(9, 1, Some("2020-01-01")),
            special(11, 1, Some("2020-02-01")),
        ]);
        let numbers: Vec<(i64, Option<u32>)> =
            out.iter().map(|e| (e.source_id, e.number)).collect();
        assert_eq!(numbers, [(9, Some(1)), (11, Some(2)), (10, Some(3))]);
    }

    #[test]
    fn equal_airdates_break_on_source_id() {
        let out = reconcile(vec![
            special(30, 2, Some("2021-05-05")),
            special(7, 2, Some("2021-05-05")),
            special(20, 2, None),
            special(3, 2, None),
        ]);
        let ids: Vec<i64> = out.iter().map(|e| e.source_id).collect();
        assert_eq!(ids, [7, 30, 3, 20]);
        assert_eq!(out[3].number, Some(4));
    }

    #[test]
    fn regular_episodes_keep_order_and_numbers() {
        let out = reconcile(vec![
            regular(3, 1, 3),
            special(100, 1, None),
            regular(1, 1, 1),
        ]);
        assert_eq!(out[0].source_id, 3);
        assert_eq!(out[0].number, Some(3));
        assert_eq!(out[1].source_id, 1);
        assert_eq!(out[2].source_id, 100);
        assert_eq!(out[2].number, Some(1));
    }

    #[test]
    fn insignificant_specials_are_dropped() {
        let mut dropped = special(4, 1, None);
        dropped.episode_type = EpisodeType::InsignificantSpecial;
        let out = reconcile(vec![regular(1, 1, 1), dropped]);
        assert_eq!(out.len(), 1);
        assert!(
            out.iter()
                .all(|e| e.episode_type != EpisodeType::InsignificantSpecial)
        );
    }

    #[test]
    fn seasons_are_numbered_independently() {
        let out = reconcile(vec![
            special(1, 1, Some("2020-01-01")),
            special(2, 2, Some("2019-01-01")),
            special(3, 1, Some("2020-06-01")),
        ]);
        let season_two: Vec<_> = out.iter().filter(|e| e.season == 2).collect();
        assert_eq!(season_two.len(), 1);
        assert_eq!(season_two[0].number, Some(1));
        let season_one: Vec<_> = out
            .iter()
            .filter(|e| e.season == 1)
            .map(|e| (e.source_id, e.number))
            .collect();
        assert_eq!(season_one, [(1, Some(1)), (3, Some(2))]);
    }

    #[test]
    fn empty_batch() {
        assert!(reconcile(Vec::new()).is_empty());
    }

    #[test]
    fn build_reads_tvmaze_fields() {
        let payload = vec![json!({
            "id": 42,
            "season": 2,
            "number": 5,
            "name": "Pilot",
            "type": "regular",
            "airdate": "2019-03-04",
            "airtime": "21:00",
            "runtime": 60,
            "rating": {"average": 7.9},
            "image": null,
            "summary": "<p>Hi</p>"
        })];
        let records = build_episode_records(ShowId::new(1), &payload).unwrap();
        let ep = &records[0];
        assert_eq!(ep.source_id, 42);
        assert_eq!(ep.season, 2);
        assert_eq!(ep.number, Some(5));
        assert_eq!(ep.airdate, NaiveDate::from_ymd_opt(2019, 3, 4));
        assert_eq!(ep.airtime.as_deref(), Some("21:00"));
        assert_eq!(ep.rating, Some(json!({"average": 7.9})));
        assert_eq!(ep.image, None);
    }

    #[test]
    fn build_defaults_optional_fields() {
        let payload = vec![json!({"id": 1, "airdate": "", "type": "mystery"})];
        let records = build_episode_records(ShowId::new(1), &payload).unwrap();
        assert_eq!(records[0].season, 0);
        assert_eq!(records[0].number, None);
        assert_eq!(records[0].airdate, None);
        assert_eq!(records[0].name, "");
        assert_eq!(records[0].episode_type, EpisodeType::Regular);
    }

    #[test]
    fn build_fails_whole_batch_on_missing_id() {
        let payload = vec![json!({"id": 1}), json!({"name": "no id"})];
        let err = build_episode_records(ShowId::new(1), &payload).unwrap_err();
        assert!(matches!(err, SyncError::Validation { ref position, .. } if position == "1"));
    }

    #[test]
    fn build_rejects_negative_season() {
        let payload = vec![json!({"id": 1, "season": -1})];
        assert!(build_episode_records(ShowId::new(1), &payload).is_err());
    }

    #[test]
    fn season_error_reports_batch_index() {
        let payload = vec![
            json!({"id": 10, "season": 1}),
            json!({"id": 77, "season": "two"}),
        ];
        match build_episode_records(ShowId::new(1), &payload) {
            Err(SyncError::Validation { position, .. }) => assert_eq!(position, "1"),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
