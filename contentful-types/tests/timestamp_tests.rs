use chrono::{TimeZone, Utc};
use contentful_types::timestamp;
use proptest::prelude::*;

// ── Parsing ─────────────────────────────────────────────────────

#[test]
fn parses_api_timestamp_with_millis() {
    let parsed = timestamp::parse("2013-09-02T14:56:34.240Z").unwrap();
    assert_eq!(parsed.timestamp(), 1_378_133_794);
    assert_eq!(parsed.timestamp_subsec_millis(), 240);
}

#[test]
fn parses_bare_date_as_midnight_utc() {
    let parsed = timestamp::parse("2015-01-01").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn parses_offset_timestamp() {
    let parsed = timestamp::parse("2013-09-02T16:56:34+02:00").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2013, 9, 2, 14, 56, 34).unwrap());
}

#[test]
fn rejects_garbage() {
    let err = timestamp::parse("next tuesday").unwrap_err();
    assert!(format!("{err}").contains("invalid timestamp"));
    assert!(format!("{err}").contains("next tuesday"));
}

// ── Formatting ──────────────────────────────────────────────────

#[test]
fn formats_with_millis_when_present() {
    let parsed = timestamp::parse("2013-09-02T14:56:34.240Z").unwrap();
    assert_eq!(timestamp::format(&parsed), "2013-09-02T14:56:34.240Z");
}

#[test]
fn formats_without_fraction_when_zero() {
    let at = Utc.with_ymd_and_hms(2013, 6, 27, 22, 46, 19).unwrap();
    assert_eq!(timestamp::format(&at), "2013-06-27T22:46:19Z");
}

#[test]
fn pads_small_millis() {
    let parsed = timestamp::parse("2013-09-02T14:56:34.007Z").unwrap();
    assert_eq!(timestamp::format(&parsed), "2013-09-02T14:56:34.007Z");
}

proptest! {
    /// Any millisecond-precision instant survives format → parse unchanged.
    #[test]
    fn format_then_parse_is_identity(millis in 0i64..4_102_444_800_000) {
        let at = Utc.timestamp_millis_opt(millis).unwrap();
        let text = timestamp::format(&at);
        prop_assert_eq!(timestamp::parse(&text).unwrap(), at);
    }
}
