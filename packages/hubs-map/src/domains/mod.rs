pub mod digg;
pub mod hubs_policy;
pub mod map_data;
pub mod seeding;
pub mod status_patch;
