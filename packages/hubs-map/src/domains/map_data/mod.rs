//! Generated map data module
//!
//! Joins the scraped collections with the coordinate table and renders
//! the TypeScript module the map client imports.

pub mod generate;
pub mod models;
pub mod render;

pub use generate::*;
pub use models::*;
pub use render::*;
