//! The schema contract consumed by `ColumnSelector::resolve`, and its
//! implementation for Arrow schemas.
//!
//! The schema is the authority on which names exist and which columns carry
//! which tags. Selectors never build or validate a schema themselves.

use std::collections::HashMap;

use arrow_schema::{Field, Schema};
use serde_json::Value;

use super::tags::Tag;
use super::ColumnSelector;

/// Field metadata key holding a column's tags as a JSON array of strings.
pub const TAGS_METADATA_KEY: &str = "tags";

/// **CONTRACT:** what a selector needs from a schema to resolve against it.
pub trait SchemaLike {
    /// Column names in the schema's canonical order.
    fn column_names(&self) -> Vec<String>;

    /// The schema restricted to the columns `selector` matches by name or by
    /// tag, in canonical order. Unmatched names and tags are ignored.
    fn apply(&self, selector: &ColumnSelector) -> Self
    where
        Self: Sized;
}

impl SchemaLike for Schema {
    fn column_names(&self) -> Vec<String> {
        self.fields().iter().map(|field| field.name().clone()).collect()
    }

    fn apply(&self, selector: &ColumnSelector) -> Self {
        if selector.is_all() {
            return self.clone();
        }
        let names = selector.names();
        let tags = selector.tags();
        let fields: Vec<Field> = self
            .fields()
            .iter()
            .filter(|field| {
                names.iter().any(|name| name == field.name())
                    || field_tags(field).iter().any(|tag| tags.contains(tag))
            })
            .map(|field| Field::clone(field))
            .collect();
        Schema::new_with_metadata(fields, self.metadata().clone())
    }
}

/// Reads the tags stored in a field's metadata.
///
/// Values that aren't a JSON array are read as a comma separated list, which
/// is how hand-written metadata usually spells them.
pub fn field_tags(field: &Field) -> Vec<Tag> {
    let Some(raw) = field.metadata().get(TAGS_METADATA_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<Tag>>(raw) {
        Ok(tags) => tags,
        Err(_) => raw
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(Tag::from)
            .collect(),
    }
}

/// Returns `field` with `tags` written into its metadata, replacing any tags
/// it had.
pub fn with_field_tags<I, T>(field: Field, tags: I) -> Field
where
    I: IntoIterator<Item = T>,
    T: Into<Tag>,
{
    let encoded = Value::Array(
        tags.into_iter()
            .map(|tag| {
                let tag: Tag = tag.into();
                Value::String(tag.into())
            })
            .collect(),
    );
    let mut metadata: HashMap<String, String> = field.metadata().clone();
    metadata.insert(TAGS_METADATA_KEY.to_string(), encoded.to_string());
    field.with_metadata(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_schema::DataType;

    fn tagged_schema() -> Schema {
        Schema::new(vec![
            with_field_tags(Field::new("col1", DataType::Int64, false), ["a", "b", "c"]),
            with_field_tags(Field::new("col2", DataType::Float32, true), ["b", "c", "d"]),
            Field::new("col3", DataType::Utf8, true),
        ])
    }

    #[test]
    fn test_field_tags_roundtrip() {
        let field = with_field_tags(Field::new("x", DataType::Int32, true), [Tag::Categorical]);
        assert_eq!(field_tags(&field), vec![Tag::Categorical]);
        assert!(field_tags(&Field::new("y", DataType::Int32, true)).is_empty());
    }

    #[test]
    fn test_tags_containing_commas_survive_metadata() {
        let field = with_field_tags(
            Field::new("x", DataType::Int32, true),
            [Tag::from("a,b"), Tag::Continuous],
        );
        assert_eq!(field.metadata()[TAGS_METADATA_KEY], r#"["a,b","continuous"]"#);
        assert_eq!(
            field_tags(&field),
            vec![Tag::Custom("a,b".to_string()), Tag::Continuous]
        );
    }

    #[test]
    fn test_hand_written_comma_list_is_still_read() {
        let metadata = HashMap::from([(TAGS_METADATA_KEY.to_string(), "categorical, user_id".to_string())]);
        let field = Field::new("x", DataType::Int32, true).with_metadata(metadata);
        assert_eq!(field_tags(&field), vec![Tag::Categorical, Tag::UserId]);
    }

    #[test]
    fn test_apply_by_name_and_tag() {
        let schema = tagged_schema();

        let by_name = schema.apply(&ColumnSelector::new(["col3", "col1"]));
        assert_eq!(by_name.column_names(), vec!["col1", "col3"]);

        let by_tag = schema.apply(&ColumnSelector::from_tags(["d"]));
        assert_eq!(by_tag.column_names(), vec!["col2"]);

        let both = schema.apply(&ColumnSelector::from_tags(["c"]));
        assert_eq!(both.column_names(), vec!["col1", "col2"]);

        let neither = schema.apply(&ColumnSelector::from_tags(["e"]));
        assert!(neither.column_names().is_empty());

        let missing = schema.apply(&ColumnSelector::new(["col9"]));
        assert!(missing.column_names().is_empty());
    }

    #[test]
    fn test_apply_wildcard_keeps_everything() {
        let schema = tagged_schema();
        assert_eq!(schema.apply(&ColumnSelector::all()), schema);
    }
}
