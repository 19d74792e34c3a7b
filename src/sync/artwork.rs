//! FanArt response to artwork rows, with one active image per group.
//!
//! A FanArt response maps image-type names (`movieposter`, `hdtvlogo`,
//! `seasonposter`, ...) to arrays of image descriptors, alongside scalar
//! metadata such as `name` and `tmdb_id`. Every descriptor becomes a row;
//! within each (image type, season bucket) group the most liked image is
//! flagged active.

use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

use super::SyncError;
use crate::domain::{Mediable, SeasonBucket};
use crate::models::media::ArtworkRecord;

const ENTITY: &str = "image";

/// Builds one record per image descriptor in `response` for `owner`.
///
/// # Errors
///
/// Returns [`SyncError::Payload`] if the response is not a JSON object, and
/// [`SyncError::Validation`] if any descriptor lacks an `id` or a valid
/// `url`. Other fields fall back to defaults.
pub fn build_media_records(
    owner: Mediable,
    response: &Value,
) -> Result<Vec<ArtworkRecord>, SyncError> {
    let groups = response
        .as_object()
        .ok_or_else(|| SyncError::payload("artwork response is not an object"))?;

    let mut records = Vec::new();
    for (image_type, images) in groups {
        let Some(images) = images.as_array() else {
            continue;
        };

        for (index, image) in images.iter().enumerate() {
            let position = format!("{image_type}[{index}]");
            let fields = image
                .as_object()
                .ok_or_else(|| SyncError::validation(ENTITY, &position, "expected an object"))?;
            records.push(build_one(owner, image_type, &position, fields)?);
        }
    }

    flag_best_per_group(&mut records);
    Ok(records)
}

fn build_one(
    owner: Mediable,
    image_type: &str,
    position: &str,
    fields: &Map<String, Value>,
) -> Result<ArtworkRecord, SyncError> {
    let external_image_id = scalar_string(fields.get("id"))
        .ok_or_else(|| SyncError::validation(ENTITY, position, "missing id"))?;

    let url = fields
        .get("url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SyncError::validation(ENTITY, position, "missing url"))?;
    let parsed = Url::parse(url).map_err(|e| {
        SyncError::validation(ENTITY, position, format!("invalid url {url}: {e}"))
    })?;

    Ok(ArtworkRecord {
        mediable_type: owner.mediable_type().to_string(),
        mediable_id: owner.mediable_id(),
        external_image_id,
        image_type: image_type.to_string(),
        url: url.to_string(),
        path: parsed.path().to_string(),
        lang: scalar_string(fields.get("lang")),
        likes: parse_likes(fields.get("likes")),
        season: SeasonBucket::from_value(fields.get("season")),
        disc: scalar_string(fields.get("disc")),
        disc_type: scalar_string(fields.get("disc_type")),
        is_active: false,
    })
}

/// FanArt sends most numbers as strings; accept either.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_likes(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Position of the most liked candidate; the earliest wins a tie.
fn best_position<'a, I>(candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a ArtworkRecord>,
{
    candidates
        .into_iter()
        .enumerate()
        .reduce(|best, candidate| {
            if candidate.1.likes > best.1.likes {
                candidate
            } else {
                best
            }
        })
        .map(|(position, _)| position)
}

/// The image to show by default out of `candidates`.
///
/// ```rust
/// # use lundflix::sync::best_image;
/// # use lundflix::sync::build_media_records;
/// # use lundflix::domain::{Mediable, MovieId};
/// # let response = serde_json::json!({"movieposter": [
/// #     {"id": "1", "url": "https://assets.fanart.tv/1.jpg", "likes": "5"},
/// #     {"id": "2", "url": "https://assets.fanart.tv/2.jpg", "likes": "9"},
/// #     {"id": "3", "url": "https://assets.fanart.tv/3.jpg", "likes": "9"},
/// # ]});
/// let records = build_media_records(Mediable::Movie(MovieId::new(1)), &response).unwrap();
/// assert_eq!(best_image(&records).unwrap().external_image_id, "2");
/// ```
#[must_use]
pub fn best_image(candidates: &[ArtworkRecord]) -> Option<&ArtworkRecord> {
    best_position(candidates).map(|position| &candidates[position])
}

fn flag_best_per_group(records: &mut [ArtworkRecord]) {
    let mut groups: HashMap<(&str, Option<i32>), Vec<usize>> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        groups
            .entry((record.image_type.as_str(), record.season.to_storage()))
            .or_default()
            .push(index);
    }

    let winners: Vec<usize> = groups
        .into_values()
        .filter_map(|members| {
            best_position(members.iter().map(|&i| &records[i])).map(|position| members[position])
        })
        .collect();

    debug!(
        records = records.len(),
        groups = winners.len(),
        "Selected best image per group"
    );

    for index in winners {
        records[index].is_active = true;
    }
}
