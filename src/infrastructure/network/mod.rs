pub mod connectivity;
pub mod download;
pub mod http;
