//! Content generators for The Empty World.
//!
//! The binary wires these together; each module owns one command.

pub mod config;
pub mod cores;
pub mod cosmetic;
pub mod dump;
pub mod flags;
pub mod refresh;
pub mod upgrade;

use std::fmt;

/// Runs `body` against an empty string and returns what it wrote.
pub(crate) fn render(body: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    body(&mut out).expect("formatting into a String cannot fail");
    out
}
