pub mod database_url;
pub mod errors;
pub mod types;

pub use database_url::*;
pub use errors::*;
pub use types::*;
