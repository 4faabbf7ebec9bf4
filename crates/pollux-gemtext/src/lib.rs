//! Gemtext parsing and rendering for Pollux.
//!
//! [`parse`] classifies a response body line by line into [`LineKind`]
//! variants and collects an ordered [`LinkTable`]; [`render`] applies a
//! terminal viewport (hard wrap, scroll offset, row budget) on top and
//! produces the [`Document`] the frame painter draws.

pub mod parser;
pub mod render;

pub use parser::{Link, LinkTable, LineKind, ParsedDoc, ParsedLine, parse};
pub use render::{Document, STATUS_ROWS, StyledLine, Viewport, render};
