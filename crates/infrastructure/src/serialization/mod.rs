//! JSON helpers for files written by the client.
//!
//! Output is pretty-printed with 2-space indentation and a trailing
//! newline, so the files stay readable when inspected by hand.

mod json;

pub use json::*;
