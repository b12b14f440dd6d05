//! Service ports the screens and the bootstrap talk through.

pub mod api;
