//! Filter expressions understood by every [`DocumentStore`](super::DocumentStore).
//!
//! A filter is a conjunction of conditions. It renders to a MongoDB query document
//! for the real store and evaluates directly against documents for the in-memory one.

use crate::models::RecordId;
use mongodb::bson::{doc, Bson, Document};

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    /// Field equals the value exactly.
    Eq { field: String, value: Bson },
    /// String field contains `text`, ignoring case.
    ContainsIgnoreCase { field: String, text: String },
}

impl Condition {
    fn field(&self) -> &str {
        match self {
            Condition::Eq { field, .. } | Condition::ContainsIgnoreCase { field, .. } => field,
        }
    }

    fn to_bson(&self) -> Bson {
        match self {
            Condition::Eq { value, .. } => value.clone(),
            Condition::ContainsIgnoreCase { text, .. } => Bson::Document(doc! {
                "$regex": regex::escape(text),
                "$options": "i",
            }),
        }
    }

    fn matches(&self, document: &Document) -> bool {
        match self {
            Condition::Eq { field, value } => document.get(field) == Some(value),
            Condition::ContainsIgnoreCase { field, text } => document
                .get_str(field)
                .map(|s| s.to_lowercase().contains(&text.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: RecordId) -> Self {
        Self::new().eq("_id", id.as_object_id())
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn contains_ignore_case(
        mut self,
        field: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.conditions.push(Condition::ContainsIgnoreCase {
            field: field.into(),
            text: text.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn to_document(&self) -> Document {
        let mut query = Document::new();
        let repeats_field = self
            .conditions
            .iter()
            .enumerate()
            .any(|(i, c)| self.conditions[..i].iter().any(|p| p.field() == c.field()));

        if repeats_field {
            let clauses: Vec<Bson> = self
                .conditions
                .iter()
                .map(|c| {
                    let mut clause = Document::new();
                    clause.insert(c.field(), c.to_bson());
                    Bson::Document(clause)
                })
                .collect();
            query.insert("$and", clauses);
        } else {
            for condition in &self.conditions {
                query.insert(condition.field(), condition.to_bson());
            }
        }
        query
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}
