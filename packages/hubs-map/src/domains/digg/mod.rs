//! DIGG connection tables: scraping and change detection

pub mod compare;
pub mod table_scraper;

pub use compare::*;
pub use table_scraper::*;
