pub mod attributes;
pub mod types;

pub use attributes::{OCCI_CORE_ID, SERVICE_STATE};
pub use types::*;
