//! Port contracts for the code host.

pub mod code_host;

pub use code_host::{CodeHost, CodeHostError, CodeHostResult, PULL_REQUEST_PAGE_SIZE};
