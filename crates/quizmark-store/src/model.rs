//! Tag and question records.
//!
//! Everything here round-trips through JSON in camelCase, which is the format
//! of both the on-disk store and import/export snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a tag's values are entered and filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagType {
    #[default]
    None,
    Text,
    Number,
    Boolean,
    Select,
    MultiSelect,
}

impl TagType {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            TagType::None => "None",
            TagType::Text => "Text",
            TagType::Number => "Number",
            TagType::Boolean => "Yes/No",
            TagType::Select => "Single choice",
            TagType::MultiSelect => "Multiple choice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default)]
    pub tag_type: TagType,
    /// Choices for select and multi-select tags.
    #[serde(default)]
    pub options: Vec<String>,
}

/// A stored tag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl TagValue {
    /// Numeric reading of the value. Text is parsed; other shapes have none.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TagValue::Number(n) => Some(*n),
            TagValue::Text(t) => t.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A question's entry for one tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagEntry {
    #[serde(default)]
    pub value: Option<TagValue>,
}

impl From<TagValue> for TagEntry {
    fn from(value: TagValue) -> Self {
        Self { value: Some(value) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Formula markup, possibly prose with `$...$` segments.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub answers: Vec<String>,
    /// Keyed by tag id.
    #[serde(default)]
    pub tags: BTreeMap<String, TagEntry>,
    /// Image data URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Question {
    pub fn value_of(&self, tag_id: &str) -> Option<&TagValue> {
        self.tags.get(tag_id).and_then(|entry| entry.value.as_ref())
    }
}

/// Partial update for a [`Tag`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub required: Option<bool>,
    #[serde(rename = "type")]
    pub tag_type: Option<TagType>,
    pub options: Option<Vec<String>>,
}

impl TagPatch {
    pub fn apply(self, tag: &mut Tag) {
        if let Some(name) = self.name {
            tag.name = name;
        }
        if let Some(color) = self.color {
            tag.color = color;
        }
        if let Some(required) = self.required {
            tag.required = required;
        }
        if let Some(tag_type) = self.tag_type {
            tag.tag_type = tag_type;
        }
        if let Some(options) = self.options {
            tag.options = options;
        }
    }
}

/// Partial update for a [`Question`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub answers: Option<Vec<String>>,
    pub tags: Option<BTreeMap<String, TagEntry>>,
    pub images: Option<Vec<String>>,
}

impl QuestionPatch {
    pub fn apply(self, question: &mut Question) {
        if let Some(title) = self.title {
            question.title = title;
        }
        if let Some(content) = self.content {
            question.content = content;
        }
        if let Some(answers) = self.answers {
            question.answers = answers;
        }
        if let Some(tags) = self.tags {
            question.tags = tags;
        }
        if let Some(images) = self.images {
            question.images = images;
        }
    }
}

/// Full repository contents, used for persistence and import/export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_question_from_json() {
        let json = r#"{
            "id": "q1",
            "title": "Quadratic",
            "content": "x^2 = 4",
            "answers": ["2", "-2"],
            "tags": {
                "t1": { "value": 3 },
                "t2": { "value": ["a", "b"] },
                "t3": { "value": true },
                "t4": {}
            }
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.value_of("t1"), Some(&TagValue::Number(3.0)));
        assert_eq!(
            q.value_of("t2"),
            Some(&TagValue::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(q.value_of("t3"), Some(&TagValue::Bool(true)));
        assert_eq!(q.value_of("t4"), None);
        assert_eq!(q.value_of("missing"), None);
        assert!(q.images.is_empty());
    }

    #[test]
    fn test_tag_type_field() {
        let tag: Tag =
            serde_json::from_str(r#"{"id":"t","name":"Level","type":"multiSelect"}"#).unwrap();
        assert_eq!(tag.tag_type, TagType::MultiSelect);
        assert_eq!(tag.tag_type.label(), "Multiple choice");

        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["type"], "multiSelect");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(TagValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(TagValue::Text(" 7 ".into()).as_number(), Some(7.0));
        assert_eq!(TagValue::Text("seven".into()).as_number(), None);
        assert_eq!(TagValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_patches_apply_only_set_fields() {
        let mut tag = Tag {
            id: "t".into(),
            name: "Old".into(),
            color: "red".into(),
            required: false,
            tag_type: TagType::Text,
            options: vec![],
        };
        TagPatch {
            name: Some("New".into()),
            required: Some(true),
            ..Default::default()
        }
        .apply(&mut tag);
        assert_eq!(tag.name, "New");
        assert_eq!(tag.color, "red");
        assert!(tag.required);

        let mut q = Question {
            id: "q".into(),
            title: "T".into(),
            content: "x".into(),
            answers: vec!["1".into()],
            tags: BTreeMap::new(),
            images: vec![],
        };
        QuestionPatch {
            content: Some("y".into()),
            ..Default::default()
        }
        .apply(&mut q);
        assert_eq!(q.title, "T");
        assert_eq!(q.content, "y");
    }
}
