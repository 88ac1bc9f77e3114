pub mod mail;
pub mod rowstore;
pub mod store;
