pub mod extract;
pub mod validation;

pub use extract::{item_not_found, ItemPath, QueryParams};
pub use validation::ValidatedJson;
