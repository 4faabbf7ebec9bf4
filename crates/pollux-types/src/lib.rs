//! Foundation types for Pollux: addresses, responses, and errors.
//!
//! Everything here is plain data with no I/O; the networking, rendering,
//! and session crates all build on these definitions.

pub mod error;
pub mod response;
pub mod url;

pub use error::{PolluxError, Result};
pub use response::{Response, Status, StatusClass};
pub use url::{Address, Scheme};
