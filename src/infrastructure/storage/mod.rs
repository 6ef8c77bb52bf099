pub mod cache;
pub mod db;
pub mod model_store;
