use contentful_types::{Link, LinkType, ResourceType, SystemProperties};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── ResourceType ────────────────────────────────────────────────

#[test]
fn resource_type_parses_wire_names() {
    assert_eq!("Entry".parse::<ResourceType>().unwrap(), ResourceType::Entry);
    assert_eq!(
        "DeletedContentType".parse::<ResourceType>().unwrap(),
        ResourceType::DeletedContentType
    );
}

#[test]
fn resource_type_rejects_unknown() {
    let err = "Webhook".parse::<ResourceType>().unwrap_err();
    assert!(format!("{err}").contains("Webhook"));
}

#[test]
fn deleted_types_are_flagged() {
    assert!(ResourceType::DeletedAsset.is_deleted());
    assert!(ResourceType::DeletedEntry.is_deleted());
    assert!(!ResourceType::Entry.is_deleted());
    assert!(!ResourceType::Array.is_deleted());
}

// ── Link ────────────────────────────────────────────────────────

#[test]
fn link_decodes_from_sys_block() {
    let link = Link::from_json(&json!({
        "sys": { "type": "Link", "linkType": "Entry", "id": "garfield" }
    }))
    .unwrap();

    assert_eq!(link.id(), "garfield");
    assert_eq!(link.link_type(), &LinkType::Entry);
}

#[test]
fn link_rejects_non_link_sys() {
    let err = Link::from_json(&json!({
        "sys": { "type": "Entry", "linkType": "Entry", "id": "garfield" }
    }))
    .unwrap_err();
    assert!(format!("{err}").contains("malformed link"));
}

#[test]
fn link_serializes_to_sys_block() {
    let link = Link::new("nyancat", LinkType::Asset);
    assert_eq!(
        serde_json::to_value(&link).unwrap(),
        json!({ "sys": { "type": "Link", "linkType": "Asset", "id": "nyancat" } })
    );
}

#[test]
fn links_compare_by_id_and_type() {
    assert_eq!(
        Link::new("a", LinkType::Entry),
        Link::new("a", LinkType::Entry)
    );
    assert_ne!(
        Link::new("a", LinkType::Entry),
        Link::new("a", LinkType::Asset)
    );
}

// ── SystemProperties ────────────────────────────────────────────

#[test]
fn sys_decodes_full_entry_block() {
    let sys = SystemProperties::from_json(&json!({
        "space": { "sys": { "type": "Link", "linkType": "Space", "id": "cfexampleapi" } },
        "id": "nyancat",
        "type": "Entry",
        "createdAt": "2013-06-27T22:46:19.513Z",
        "updatedAt": "2013-09-04T09:19:39.027Z",
        "revision": 5,
        "contentType": { "sys": { "type": "Link", "linkType": "ContentType", "id": "cat" } },
        "locale": "en-US"
    }))
    .unwrap();

    assert_eq!(sys.id(), "nyancat");
    assert_eq!(sys.resource_type(), ResourceType::Entry);
    assert_eq!(sys.space().map(Link::id), Some("cfexampleapi"));
    assert_eq!(sys.content_type().map(Link::id), Some("cat"));
    assert_eq!(sys.revision(), Some(5));
    assert_eq!(sys.locale(), Some("en-US"));
    assert!(sys.deleted_at().is_none());
}

#[test]
fn sys_ignores_unknown_keys() {
    let sys = SystemProperties::from_json(&json!({
        "id": "x",
        "type": "Asset",
        "environment": { "sys": { "type": "Link", "linkType": "Environment", "id": "master" } }
    }))
    .unwrap();
    assert_eq!(sys.id(), "x");
}

#[test]
fn sys_serializes_only_present_keys() {
    let created = contentful_types::timestamp::parse("2013-09-02T14:56:34.240Z").unwrap();
    let sys = SystemProperties::new("nyancat", ResourceType::Asset)
        .with_space("cfexampleapi")
        .with_revision(1)
        .with_created_at(created)
        .with_updated_at(created);

    assert_eq!(
        serde_json::to_value(&sys).unwrap(),
        json!({
            "space": { "sys": { "type": "Link", "linkType": "Space", "id": "cfexampleapi" } },
            "type": "Asset",
            "id": "nyancat",
            "revision": 1,
            "createdAt": "2013-09-02T14:56:34.240Z",
            "updatedAt": "2013-09-02T14:56:34.240Z"
        })
    );
}

#[test]
fn sys_rejects_bad_timestamp() {
    let result = SystemProperties::from_json(&json!({
        "id": "x",
        "type": "Entry",
        "createdAt": "yesterday"
    }));
    assert!(result.is_err());
}
