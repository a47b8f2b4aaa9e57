use super::RecordId;
use crate::services::{Filter, StoreError};
use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const FURNITURE_COLLECTION: &str = "furniture";

/// Request body for create and full replacement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct FurnitureInput {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub material: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: i64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "width_cm must not be negative"))]
    pub width_cm: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "depth_cm must not be negative"))]
    pub depth_cm: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "height_cm must not be negative"))]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl FurnitureInput {
    /// All record fields as BSON; absent optionals are stored as `null` so that a
    /// `$set` overwrites every field.
    fn to_fields(&self) -> Result<Document, StoreError> {
        bson::to_document(self).map_err(|e| StoreError::Encode(e.to_string()))
    }

    /// Document for a fresh insert, stamped with `created_at`.
    pub fn to_insert_document(&self, now: DateTime<Utc>) -> Result<Document, StoreError> {
        let mut document = self.to_fields()?;
        document.insert("created_at", BsonDateTime::from_chrono(now));
        Ok(document)
    }

    /// `$set` payload replacing every field, stamped with `updated_at`.
    pub fn to_update_document(&self, now: DateTime<Utc>) -> Result<Document, StoreError> {
        let mut document = self.to_fields()?;
        document.insert("updated_at", BsonDateTime::from_chrono(now));
        Ok(document)
    }
}

/// Stored shape as read back from the collection.
#[derive(Debug, Clone, Deserialize)]
pub struct FurnitureDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub material: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub width_cm: Option<f64>,
    #[serde(default)]
    pub depth_cm: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TryFrom<Document> for FurnitureDocument {
    type Error = StoreError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        bson::from_document(document).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Response shape. Optional fields serialize as `null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FurnitureRecord {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub material: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub width_cm: Option<f64>,
    pub depth_cm: Option<f64>,
    pub height_cm: Option<f64>,
    pub image_url: Option<String>,
}

impl From<FurnitureDocument> for FurnitureRecord {
    fn from(d: FurnitureDocument) -> Self {
        Self {
            id: RecordId::from(d.id),
            name: d.name,
            category: d.category,
            material: d.material,
            price: d.price,
            stock: d.stock,
            width_cm: d.width_cm,
            depth_cm: d.depth_cm,
            height_cm: d.height_cm,
            image_url: d.image_url,
        }
    }
}

impl TryFrom<Document> for FurnitureRecord {
    type Error = StoreError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        FurnitureDocument::try_from(document).map(Self::from)
    }
}

/// Query string of `GET /api/furniture`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FurnitureQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

impl FurnitureQuery {
    /// Exact `category` match AND case-insensitive `name` substring; empty
    /// parameters are ignored.
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            filter = filter.eq("category", category);
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            filter = filter.contains_ignore_case("name", q);
        }
        filter
    }
}
