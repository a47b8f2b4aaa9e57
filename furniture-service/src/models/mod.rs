pub mod furniture;
pub mod record_id;

pub use furniture::{
    FurnitureDocument, FurnitureInput, FurnitureQuery, FurnitureRecord, FURNITURE_COLLECTION,
};
pub use record_id::{InvalidRecordId, RecordId};
