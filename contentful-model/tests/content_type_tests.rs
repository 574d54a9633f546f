use contentful_model::{ContentType, ContentTypeField, FieldType, ModelError};
use contentful_types::LinkType;
use pretty_assertions::assert_eq;
use serde_json::json;

fn cat_json() -> serde_json::Value {
    json!({
        "sys": { "id": "cat", "type": "ContentType", "revision": 2 },
        "name": "Cat",
        "description": "Meow.",
        "displayField": "name",
        "fields": [
            { "id": "name", "name": "Name", "type": "Text", "required": true, "localized": true },
            { "id": "likes", "name": "Likes", "type": "Array", "items": { "type": "Symbol" } },
            { "id": "bestFriend", "name": "Best Friend", "type": "Link", "linkType": "Entry" },
            { "id": "birthday", "name": "Birthday", "type": "Date" },
            { "id": "image", "name": "Image", "type": "Link", "linkType": "Asset", "disabled": true },
            { "id": "friends", "name": "Friends", "type": "Array",
              "items": { "type": "Link", "linkType": "Entry" } }
        ]
    })
}

// ── Decoding ────────────────────────────────────────────────────

#[test]
fn content_type_decodes_fields_in_order() {
    let content_type = ContentType::from_json(&cat_json()).unwrap();

    assert_eq!(content_type.id(), "cat");
    assert_eq!(content_type.name, "Cat");
    let ids: Vec<_> = content_type.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["name", "likes", "bestFriend", "birthday", "image", "friends"]);
    assert_eq!(content_type.display_field().unwrap().name, "Name");
}

#[test]
fn field_flags_and_link_targets_are_kept() {
    let content_type = ContentType::from_json(&cat_json()).unwrap();

    let name = content_type.field("name").unwrap();
    assert!(name.required && name.localized && !name.disabled);

    let best_friend = content_type.field("bestFriend").unwrap();
    assert_eq!(best_friend.field_type, FieldType::Link);
    assert_eq!(best_friend.link_type, Some(LinkType::Entry));

    let friends = content_type.field("friends").unwrap();
    assert_eq!(friends.items_type, Some(FieldType::Link));
    assert_eq!(friends.items_link_type, Some(LinkType::Entry));

    assert!(content_type.field("image").unwrap().disabled);
}

#[test]
fn array_without_items_type_is_schema_error() {
    let err = ContentTypeField::from_json(&json!({
        "id": "likes", "name": "Likes", "type": "Array", "items": {}
    }))
    .unwrap_err();
    assert!(matches!(err, ModelError::Schema(_)));
}

#[test]
fn array_of_links_without_link_type_is_schema_error() {
    let err = ContentTypeField::from_json(&json!({
        "id": "friends", "name": "Friends", "type": "Array", "items": { "type": "Link" }
    }))
    .unwrap_err();
    assert!(format!("{err}").contains("items.linkType"));
}

#[test]
fn link_without_link_type_is_schema_error() {
    let err = ContentTypeField::from_json(&json!({
        "id": "bestFriend", "name": "Best Friend", "type": "Link"
    }))
    .unwrap_err();
    assert!(matches!(err, ModelError::Schema(_)));
}

#[test]
fn unknown_field_type_is_schema_error() {
    let err = ContentTypeField::from_json(&json!({
        "id": "mood", "name": "Mood", "type": "Emotion"
    }))
    .unwrap_err();
    assert!(format!("{err}").contains("Emotion"));
}

// ── Serialization ───────────────────────────────────────────────

#[test]
fn plain_field_serializes_without_optional_keys() {
    let field = ContentTypeField::new("name", "Name", FieldType::Text).required();
    assert_eq!(
        serde_json::to_value(&field).unwrap(),
        json!({ "name": "Name", "id": "name", "type": "Text", "required": true, "localized": false })
    );
}

#[test]
fn array_of_links_serializes_items() {
    let field = ContentTypeField::new("friends", "Friends", FieldType::Array)
        .array_of(FieldType::Link, Some(LinkType::Entry))
        .disabled();
    assert_eq!(
        serde_json::to_value(&field).unwrap(),
        json!({
            "name": "Friends", "id": "friends", "type": "Array",
            "required": false, "localized": false,
            "items": { "type": "Link", "linkType": "Entry" },
            "disabled": true
        })
    );
}

#[test]
fn content_type_reserializes_its_definition() {
    let raw = cat_json();
    let content_type = ContentType::from_json(&raw).unwrap();
    let value = serde_json::to_value(&content_type).unwrap();

    assert_eq!(value["sys"], raw["sys"]);
    assert_eq!(value["displayField"], json!("name"));
    assert_eq!(value["fields"][2], json!({
        "name": "Best Friend", "id": "bestFriend", "type": "Link",
        "required": false, "localized": false, "linkType": "Entry"
    }));
}
