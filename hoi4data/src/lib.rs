//! Readers and writers for Hearts of Iron IV mod data.
//!
//! Everything here works on plain text files with regex passes; there is no
//! general parser for the scripting language.

pub mod color;
pub mod countries;
pub mod error;
pub mod files;
pub mod flags;
pub mod history;
pub mod ideologies;
pub mod localisation;
pub mod map;
pub mod path;

pub use color::Rgb;
pub use error::{DataError, Result};
pub use path::detect_game_path;
