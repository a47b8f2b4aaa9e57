//! HTTP handlers for furniture-service.

pub mod diagnostics;
pub mod furniture;
pub mod health;

pub use diagnostics::test_database;
pub use furniture::{
    create_furniture, delete_furniture, get_furniture, list_furniture, update_furniture,
};
pub use health::{health_check, hello, metrics_endpoint, root};
