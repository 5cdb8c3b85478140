use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

use crate::error::ImportError;

/// Format the kanban side stores dates in.
pub const KANBAN_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Zone that exported timestamps are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timezone {
    #[default]
    Utc,
    Local,
}

pub fn format_timestamp(raw: &str, tz: Timezone) -> Result<String, chrono::ParseError> {
    let parsed = DateTime::parse_from_rfc3339(raw)?;
    Ok(match tz {
        Timezone::Utc => parsed.with_timezone(&Utc).format(KANBAN_DATE_FORMAT).to_string(),
        Timezone::Local => parsed
            .with_timezone(&Local)
            .format(KANBAN_DATE_FORMAT)
            .to_string(),
    })
}

/// Format an optional card timestamp, naming the card and field on failure.
pub fn card_timestamp(
    card_id: &str,
    field: &'static str,
    raw: Option<&str>,
    tz: Timezone,
) -> Result<Option<String>, ImportError> {
    raw.map(|value| {
        format_timestamp(value, tz).map_err(|source| ImportError::InvalidTimestamp {
            card: card_id.to_string(),
            field,
            value: value.to_string(),
            source,
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_trello_timestamp() {
        let out = format_timestamp("2024-03-01T09:15:42.123Z", Timezone::Utc).unwrap();
        assert_eq!(out, "2024-03-01 09:15");
    }

    #[test]
    fn converts_offsets_to_utc() {
        let out = format_timestamp("2024-03-01T23:30:00+02:00", Timezone::Utc).unwrap();
        assert_eq!(out, "2024-03-01 21:30");
    }

    #[test]
    fn local_zone_follows_host() {
        let raw = "2024-04-10T17:00:00.000Z";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .format(KANBAN_DATE_FORMAT)
            .to_string();
        assert_eq!(format_timestamp(raw, Timezone::Local).unwrap(), expected);
        assert_eq!(
            card_timestamp("c1", "due", Some(raw), Timezone::Local).unwrap(),
            Some(expected)
        );
    }

    #[test]
    fn absent_timestamp_stays_absent() {
        assert_eq!(card_timestamp("c1", "due", None, Timezone::Utc).unwrap(), None);
    }

    #[test]
    fn garbage_timestamp_names_card_and_field() {
        let err = card_timestamp("c9", "due", Some("next tuesday"), Timezone::Utc).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("c9"));
        assert!(msg.contains("due"));
        assert!(msg.contains("next tuesday"));
    }
}
