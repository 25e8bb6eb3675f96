pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod handle;
pub mod model;
pub mod responses;
pub mod router;
pub mod state;
pub mod templates;
pub mod training;

#[cfg(test)]
mod tests;
