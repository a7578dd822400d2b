//! Question filtering by tag selectors.

use crate::model::{Question, Tag, TagType, TagValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-tag filter criterion.
///
/// Deserialized untagged, so `true`, `3`, `"text"`, `[1, 5]` and
/// `["a", "b"]` are all valid selectors. `null` is accepted and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    Unset,
    Bool(bool),
    Number(f64),
    Text(String),
    Range([f64; 2]),
    Options(Vec<String>),
}

impl Selector {
    /// Selectors that constrain nothing are skipped.
    pub fn is_empty(&self) -> bool {
        match self {
            Selector::Unset => true,
            Selector::Text(t) => t.is_empty(),
            Selector::Options(o) => o.is_empty(),
            _ => false,
        }
    }
}

/// Selectors keyed by tag id.
pub type Selectors = BTreeMap<String, Selector>;

/// Questions matching every non-empty selector, in repository order.
pub fn filter_questions<'a>(
    tags: &[Tag],
    questions: &'a [Question],
    selectors: &Selectors,
) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| matches_all(tags, q, selectors))
        .collect()
}

fn matches_all(tags: &[Tag], question: &Question, selectors: &Selectors) -> bool {
    for (tag_id, selector) in selectors {
        if selector.is_empty() {
            continue;
        }
        let Some(value) = question.value_of(tag_id) else {
            return false;
        };
        let Some(tag) = tags.iter().find(|t| &t.id == tag_id) else {
            continue;
        };
        if !matches(tag.tag_type, value, selector) {
            return false;
        }
    }
    true
}

fn matches(tag_type: TagType, value: &TagValue, selector: &Selector) -> bool {
    match tag_type {
        TagType::Text => contains(value, selector),
        TagType::Select | TagType::Boolean => loosely_equal(value, selector),
        TagType::MultiSelect => overlaps(value, selector),
        TagType::Number => in_range(value, selector),
        TagType::None => true,
    }
}

fn contains(value: &TagValue, selector: &Selector) -> bool {
    let needle = match selector {
        Selector::Text(t) => t.clone(),
        Selector::Number(n) => format_number(*n),
        Selector::Bool(b) => b.to_string(),
        _ => return false,
    };
    match value {
        TagValue::Text(t) => t.contains(&needle),
        TagValue::List(items) => items.iter().any(|item| *item == needle),
        _ => false,
    }
}

fn loosely_equal(value: &TagValue, selector: &Selector) -> bool {
    match (value, selector) {
        (TagValue::Bool(a), Selector::Bool(b)) => a == b,
        (TagValue::Number(a), Selector::Number(b)) => a == b,
        (TagValue::Text(a), Selector::Text(b)) => a == b,
        (TagValue::Text(a), Selector::Bool(b)) => *a == b.to_string(),
        (TagValue::Bool(a), Selector::Text(b)) => a.to_string() == *b,
        (TagValue::Number(a), Selector::Text(b)) | (TagValue::Text(b), Selector::Number(a)) => {
            b.trim().parse::<f64>().is_ok_and(|b| b == *a)
        }
        _ => false,
    }
}

fn overlaps(value: &TagValue, selector: &Selector) -> bool {
    match (value, selector) {
        (TagValue::List(have), Selector::Options(want)) => have.iter().any(|v| want.contains(v)),
        _ => false,
    }
}

/// Inclusive range check. `[0, 0]` means unconstrained, as does any
/// non-range selector.
fn in_range(value: &TagValue, selector: &Selector) -> bool {
    let (min, max) = match selector {
        Selector::Range([min, max]) => (*min, *max),
        Selector::Options(bounds) if bounds.len() == 2 => (parse_bound(&bounds[0]), parse_bound(&bounds[1])),
        _ => return true,
    };
    if min == 0.0 && max == 0.0 {
        return true;
    }
    let Some(n) = value.as_number() else {
        return false;
    };
    // Unparseable bounds never exclude.
    !(min > n || n > max)
}

fn parse_bound(text: &str) -> f64 {
    text.trim().parse().unwrap_or(f64::NAN)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
