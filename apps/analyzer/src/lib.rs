pub mod config;
pub mod document;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod presenter;
pub mod store;
pub mod workflow;

#[cfg(test)]
mod test_support;
