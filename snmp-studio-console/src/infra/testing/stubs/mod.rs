pub mod api;
pub mod fragments;

pub use api::{StubFailure, TestApiService};
pub use fragments::StaticFragmentSource;
