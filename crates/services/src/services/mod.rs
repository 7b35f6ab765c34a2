pub mod admin;
pub mod alcohol;
pub mod api_client;
pub mod api_error;
pub mod auth;
pub mod banner;
pub mod config;
pub mod curation;
pub mod distillery;
pub mod form_state;
pub mod help;
pub mod image_upload;
pub mod infinite_query;
pub mod membership;
pub mod mutation;
pub mod notification;
pub mod query_cache;
pub mod query_key;
pub mod region;
pub mod reorder;
pub mod resource;
pub mod tasting_tag;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;
