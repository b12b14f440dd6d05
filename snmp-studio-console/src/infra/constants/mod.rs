//! Constants module for centralized configuration values

pub mod routes;
