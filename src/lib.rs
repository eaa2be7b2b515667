// Library exports for blogfeed
// The binary and the integration tests both build on these modules

pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod permalink;
pub mod render;
pub mod routes;
pub mod state;
pub mod timezone;
