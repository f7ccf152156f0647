pub mod config;
pub mod console;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod matrix;
pub mod models;
pub mod navigation;
pub mod store;
pub mod sync;
pub mod validate;
