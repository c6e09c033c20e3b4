//! Tags used for tag-based column selection.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A column tag. Well-known tags have their own variant; anything else is kept
/// verbatim in `Custom`.
///
/// Parsing is normalizing: `"categorical".parse::<Tag>()` yields
/// `Tag::Categorical`, so a well-known tag never ends up in `Custom`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    Categorical,
    Continuous,
    List,
    Sequence,
    Text,
    Tokenized,
    Time,
    Embedding,
    Id,
    User,
    Item,
    Session,
    Context,
    Target,
    Binary,
    Regression,
    MultiClass,
    UserId,
    ItemId,
    SessionId,
    Custom(String),
}

impl Tag {
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Categorical => "categorical",
            Tag::Continuous => "continuous",
            Tag::List => "list",
            Tag::Sequence => "sequence",
            Tag::Text => "text",
            Tag::Tokenized => "tokenized",
            Tag::Time => "time",
            Tag::Embedding => "embedding",
            Tag::Id => "id",
            Tag::User => "user",
            Tag::Item => "item",
            Tag::Session => "session",
            Tag::Context => "context",
            Tag::Target => "target",
            Tag::Binary => "binary",
            Tag::Regression => "regression",
            Tag::MultiClass => "multi_class",
            Tag::UserId => "user_id",
            Tag::ItemId => "item_id",
            Tag::SessionId => "session_id",
            Tag::Custom(name) => name,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s {
            "categorical" => Tag::Categorical,
            "continuous" => Tag::Continuous,
            "list" => Tag::List,
            "sequence" => Tag::Sequence,
            "text" => Tag::Text,
            "tokenized" => Tag::Tokenized,
            "time" => Tag::Time,
            "embedding" => Tag::Embedding,
            "id" => Tag::Id,
            "user" => Tag::User,
            "item" => Tag::Item,
            "session" => Tag::Session,
            "context" => Tag::Context,
            "target" => Tag::Target,
            "binary" => Tag::Binary,
            "regression" => Tag::Regression,
            "multi_class" => Tag::MultiClass,
            "user_id" => Tag::UserId,
            "item_id" => Tag::ItemId,
            "session_id" => Tag::SessionId,
            other => Tag::Custom(other.to_string()),
        };
        Ok(tag)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        match s.parse::<Tag>() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag::from(s.as_str())
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_parse_to_variants() {
        assert_eq!(Tag::from("categorical"), Tag::Categorical);
        assert_eq!(Tag::from("multi_class"), Tag::MultiClass);
        assert_eq!(Tag::from("my-tag"), Tag::Custom("my-tag".to_string()));
        assert_eq!(Tag::ItemId.to_string(), "item_id");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![Tag::Continuous, Tag::from("custom")]).unwrap();
        assert_eq!(json, r#"["continuous","custom"]"#);
        let back: Vec<Tag> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Tag::Continuous, Tag::Custom("custom".into())]);
    }
}
