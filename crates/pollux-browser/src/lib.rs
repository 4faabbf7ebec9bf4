//! Session layer for Pollux.
//!
//! Sits between the networking and gemtext crates below and the
//! terminal front end above: [`config`] loads runtime settings,
//! [`source`] serves local content, and [`session`] holds the one
//! current document together with the command interpreter that moves
//! between documents.

pub mod config;
pub mod session;
pub mod source;

pub use config::Config;
pub use session::{Command, Fetcher, Session, parse_command};
pub use source::{LocalPage, load_local};
