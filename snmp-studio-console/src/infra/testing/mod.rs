//! In-process doubles for the console's service ports.

pub mod stubs;
