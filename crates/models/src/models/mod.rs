pub mod alcohol;
pub mod auth;
pub mod banner;
pub mod curation;
pub mod distillery;
pub mod help;
pub mod page;
pub mod region;
pub mod tasting_tag;
