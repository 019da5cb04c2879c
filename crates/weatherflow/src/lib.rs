pub mod api;
pub mod collector;
pub mod config;
pub mod db;
pub mod jobs;
pub mod query;
pub mod weather;
