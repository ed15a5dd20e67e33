// Library exports for the binary, integration tests and embedding hosts

pub mod app_data;
pub mod cli;
pub mod config;
pub mod errors;
pub mod providers;
pub mod services;
pub mod stores;
pub mod types;

#[cfg(test)]
mod test;
