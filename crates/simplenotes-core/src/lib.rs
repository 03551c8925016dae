pub mod app;
pub mod codec;
pub mod colors;
pub mod config;
pub mod db;
pub mod highlight;
pub mod notes;
pub mod render;
pub mod store;
