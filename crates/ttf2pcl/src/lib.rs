//! # TrueType fonts as PCL soft fonts
//!
//! [`TrueTypeSource`] reads the glyphs of a TrueType font with `ttf-parser`
//! and provides them to the encoders of [`pcl::font`]. Character codes are
//! mapped to Unicode through a [`pcl::symset::SymbolSetMap`] for bound fonts,
//! or used as code points directly for unbound fonts.

mod meta;
mod sfnt;
mod source;

pub use meta::{font_metadata, panose, stroke_weight};
pub use sfnt::{table_checksum, SfntBuilder};
pub use source::{global_truetype_data, CharMapping, TrueTypeSource};
