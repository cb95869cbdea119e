use color_eyre::eyre::{self, eyre, WrapErr};
use log::{info, warn};
use pcl::{
    font::{generate_font_file, Diagnostic, FontMetadata, GenerationReport, OutputFormat},
    symset::{MapVariant, SymbolSetId, SymbolSetMap, SymbolSetRegistry, SymbolSetType},
};
use prettytable::{format, row, Table};
use ttf2pcl::{font_metadata, CharMapping, TrueTypeSource};

use super::opt::FontOptions;

/// Point size for the pitch column of the report
const REPORT_POINT_SIZE: f64 = 12.0;

fn print_report(report: &GenerationReport, meta: &FontMetadata, units_per_em: u16) {
    let mut missing = 0;
    let mut reused = 0;
    let mut invalid = 0;
    for diagnostic in &report.diagnostics {
        match diagnostic {
            Diagnostic::MissingCharacter { .. } => missing += 1,
            Diagnostic::ReusedGlyph { .. } => reused += 1,
            Diagnostic::InvalidComponentGlyph { .. } => invalid += 1,
        }
    }
    let components = report.records.iter().filter(|r| r.depth > 0).count();

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row![
        "header",
        "characters",
        "components",
        "missing",
        "reused",
        "invalid",
        "cpi @ 12pt"
    ]);
    table.add_row(row![
        report.header_length,
        report.top_level().count(),
        components,
        missing,
        reused,
        invalid,
        format!(
            "{:.2}",
            meta.characters_per_inch(units_per_em, REPORT_POINT_SIZE)
        )
    ]);
    table.printstd();
}

pub fn run(opt: FontOptions) -> eyre::Result<()> {
    let options = opt
        .generate_options()
        .wrap_err_with(|| match &opt.config {
            Some(path) => format!("Failed to load config `{}`", path.display()),
            None => String::from("Invalid options"),
        })?;

    let mut registry = SymbolSetRegistry::new()?;
    let mut symset = opt.symset;
    if let Some(path) = &opt.symset_file {
        let set = registry
            .load_user_defined(path)
            .wrap_err_with(|| format!("Failed to load symbol set `{}`", path.display()))?;
        symset = set.id;
    }

    let resolved: Option<(SymbolSetType, &SymbolSetMap)> = if opt.unbound {
        None
    } else {
        Some(
            registry
                .resolve(symset)
                .ok_or_else(|| eyre!("Unknown symbol set {}", symset))?,
        )
    };
    let (mapping, id, kind, map) = match resolved {
        Some((kind, map)) => (
            CharMapping::Bound(map, MapVariant::Standard),
            symset,
            kind,
            Some(map),
        ),
        None => (
            CharMapping::Unbound,
            SymbolSetId::UNBOUND,
            SymbolSetType::Unbound,
            None,
        ),
    };

    let data = std::fs::read(&opt.font_file)
        .wrap_err_with(|| format!("Failed to read `{}`", opt.font_file.display()))?;
    let source = TrueTypeSource::new(&data, opt.index, mapping)
        .wrap_err_with(|| format!("Failed to load `{}`", opt.font_file.display()))?;

    let mut meta = font_metadata(source.face(), id, kind);
    options.overrides.apply(&mut meta);
    if meta.font_name.is_empty() {
        warn!("The font has no name");
    }
    info!("Generating '{}' for symbol set {} ({})", meta.font_name, id, kind);

    let format = if opt.xl {
        OutputFormat::PclXl
    } else {
        OutputFormat::Pcl
    };
    let report = generate_font_file(&source, &opt.out, format, &meta, map, &options)
        .wrap_err_with(|| format!("Failed to generate `{}`", opt.out.display()))?;
    print_report(&report, &meta, source.face().units_per_em());
    Ok(())
}
