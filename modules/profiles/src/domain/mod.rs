pub mod error;
pub mod geo;
pub mod repo;
pub mod service;
