#![warn(missing_docs)]
//! # PCL soft fonts and symbol sets
//!
//! This crate implements the binary formats that HP printers use for downloaded
//! ("soft") TrueType fonts and user-defined symbol sets:
//!
//! - download symbol set definitions (`ESC * c # R` / `ESC ( f # W`), see [`symset::file`]
//! - PCL 5 font headers and Format 15/16 character records, see [`font::PclFraming`]
//! - PCL XL font headers and class 0/1/2 characters, see [`font::PclXlFraming`]
//!
//! Glyph outlines are supplied by a [`font::GlyphSource`], which is usually backed by a
//! TrueType file (see the `ttf2pcl` crate).

pub mod escape;
pub mod font;
pub mod symset;
pub mod util;
pub mod xl;
