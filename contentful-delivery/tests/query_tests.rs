use chrono::{TimeZone, Utc};
use contentful_delivery::{DeliveryError, Operator, Query};
use pretty_assertions::assert_eq;

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ── Paging and shape ────────────────────────────────────────────

#[test]
fn empty_query_has_no_params() {
    assert!(Query::new().to_params().is_empty());
}

#[test]
fn paging_and_include_render_in_order() {
    let query = Query::new()
        .content_type("cat")
        .locale("tlh")
        .limit(10)
        .unwrap()
        .skip(20)
        .include(2)
        .unwrap();

    assert_eq!(
        query.to_params(),
        params(&[
            ("content_type", "cat"),
            ("locale", "tlh"),
            ("limit", "10"),
            ("skip", "20"),
            ("include", "2"),
        ])
    );
}

#[test]
fn limit_out_of_range_is_invalid_query() {
    assert!(matches!(Query::new().limit(0), Err(DeliveryError::InvalidQuery(_))));
    assert!(Query::new().limit(1001).is_err());
    assert!(Query::new().limit(1000).is_ok());
}

#[test]
fn include_deeper_than_ten_is_invalid_query() {
    assert!(Query::new().include(10).is_ok());
    assert!(matches!(Query::new().include(11), Err(DeliveryError::InvalidQuery(_))));
}

#[test]
fn order_supports_reverse_and_multiple_fields() {
    let query = Query::new()
        .order_by("sys.createdAt", true)
        .order_by("fields.name", false);
    assert_eq!(query.to_params(), params(&[("order", "-sys.createdAt,fields.name")]));
}

#[test]
fn mime_type_group_is_validated() {
    let query = Query::new().mime_type_group("image").unwrap();
    assert_eq!(query.to_params(), params(&[("mimetype_group", "image")]));
    assert!(Query::new().mime_type_group("hologram").is_err());
}

#[test]
fn select_always_includes_sys() {
    let query = Query::new()
        .content_type("cat")
        .select(["fields.name", "fields.lives", "fields.name"])
        .unwrap();
    assert_eq!(
        query.to_params(),
        params(&[("content_type", "cat"), ("select", "sys,fields.name,fields.lives")])
    );
    assert!(Query::new().select(["fields.image.url"]).is_err());
}

// ── Filters ─────────────────────────────────────────────────────

#[test]
fn equality_and_operator_filters() {
    let query = Query::new()
        .content_type("cat")
        .where_eq("fields.color", "rainbow")
        .where_op("fields.lives", Operator::Gte, 3i64)
        .where_op("fields.likes", Operator::In, &["lasagna", "rainbows"][..])
        .where_op("fields.bestFriend", Operator::Exists, true);

    assert_eq!(
        query.to_params(),
        params(&[
            ("content_type", "cat"),
            ("fields.color", "rainbow"),
            ("fields.lives[gte]", "3"),
            ("fields.likes[in]", "lasagna,rainbows"),
            ("fields.bestFriend[exists]", "true"),
        ])
    );
}

#[test]
fn date_filters_use_api_timestamp_format() {
    let at = Utc.with_ymd_and_hms(2013, 9, 2, 14, 56, 34).unwrap();
    let query = Query::new().where_op("sys.updatedAt", Operator::Lte, at);
    assert_eq!(
        query.to_params(),
        params(&[("sys.updatedAt[lte]", "2013-09-02T14:56:34Z")])
    );
}

#[test]
fn full_text_and_geo_operators() {
    let query = Query::new()
        .where_op("query", Operator::Match, "nyan")
        .where_op("fields.center", Operator::Near, "38,-122")
        .where_op("fields.center", Operator::Within, "40,-124,36,-120");
    let rendered = query.to_params();
    assert_eq!(rendered[0], ("query[match]".to_string(), "nyan".to_string()));
    assert_eq!(rendered[1].0, "fields.center[near]");
    assert_eq!(rendered[2].0, "fields.center[within]");
}
