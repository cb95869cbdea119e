use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{self, Context};
use pcl::{
    font::GlyphSource,
    symset::{MapVariant, SymbolSetId, SymbolSetRegistry, SymbolSetType},
};
use ttf2pcl::{font_metadata, CharMapping, TrueTypeSource};

#[derive(Parser)]
/// Print the metrics a TrueType font would have as a PCL soft font
pub struct Opts {
    /// The font file
    font_file: PathBuf,

    /// Symbol set of the characters to list, unbound if not given
    #[clap(short, long)]
    symset: Option<SymbolSetId>,

    /// Index of the font in a collection
    #[clap(short, long, default_value = "0")]
    index: u32,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opt: Opts = Opts::parse();
    let data = std::fs::read(&opt.font_file)
        .wrap_err_with(|| format!("Failed to read {}", opt.font_file.display()))?;

    let registry = SymbolSetRegistry::new()?;
    let (mapping, id, kind) = match opt.symset {
        Some(id) => {
            let entry = registry
                .get(id)
                .ok_or_else(|| eyre::eyre!("Symbol set {} is not built in", id))?;
            (
                CharMapping::Bound(&entry.map, MapVariant::Standard),
                id,
                entry.kind,
            )
        }
        None => (
            CharMapping::Unbound,
            SymbolSetId::UNBOUND,
            SymbolSetType::Unbound,
        ),
    };

    let source = TrueTypeSource::new(&data, opt.index, mapping)?;
    let meta = font_metadata(source.face(), id, kind);
    println!("{:#?}", source.basic_metrics());
    println!("{:#?}", meta);

    let metrics = source.basic_metrics();
    for code in metrics.first_code..=metrics.last_code {
        let char_data = source.char_data(code);
        if !char_data.exists {
            continue;
        }
        let glyph = source.glyph_data(char_data.glyph_id)?;
        println!(
            "0x{:04X} U+{:04X} glyph {:5} advance {:5} lsb {:5} outline {:5}{}",
            code,
            char_data.codepoint,
            glyph.glyph_id,
            glyph.advance_width,
            glyph.left_side_bearing,
            glyph.outline_length,
            if glyph.is_composite { " composite" } else { "" }
        );
    }
    Ok(())
}
