use std::path::Path;

use color_eyre::eyre::{self, eyre, WrapErr};
use log::info;
use pcl::{
    symset::{
        file::{check_symbol_set_file, write_symbol_set_file},
        MapVariant, SymbolSetId, SymbolSetRegistry,
    },
    util::Buf,
};
use prettytable::{format, row, Cell, Row, Table};

use super::opt::SymsetCommand;

fn variant(pcl: bool) -> MapVariant {
    if pcl {
        MapVariant::Pcl
    } else {
        MapVariant::Standard
    }
}

pub fn run(command: SymsetCommand) -> eyre::Result<()> {
    let registry = SymbolSetRegistry::new()?;
    match command {
        SymsetCommand::List => list(&registry),
        SymsetCommand::Check { file, dump } => check(&file, dump),
        SymsetCommand::Show { id, pcl } => show(&registry, id, variant(pcl)),
        SymsetCommand::Write { id, out, pcl } => write(&registry, id, &out, variant(pcl)),
    }
}

fn list(registry: &SymbolSetRegistry) -> eyre::Result<()> {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["kind", "id", "name", "type", "codes", "mapped", "pcl"]);
    for entry in registry.entries() {
        let map = &entry.map;
        table.add_row(Row::new(vec![
            Cell::new(&entry.id.to_string()),
            Cell::new(&format!("{:5}", entry.id.0)),
            Cell::new(&entry.name),
            Cell::new(&entry.kind.to_string()),
            Cell::new(&format!("{:02X}..{:02X}", map.code_min(), map.code_max())),
            Cell::new(&format!("{:3}", map.mapped_count(MapVariant::Standard))),
            Cell::new(if map.has_difference() { "differs" } else { "" }),
        ]));
    }
    table.printstd();
    Ok(())
}

fn check(file: &Path, dump: bool) -> eyre::Result<()> {
    let set = check_symbol_set_file(file)?;
    let desc = &set.descriptor;
    println!("Symbol set {} ({})", set.id, set.id.0);
    println!("  type: {} ({})", set.kind, desc.type_id);
    println!("  format: {}", desc.format);
    println!(
        "  codes: 0x{:04X}..=0x{:04X}",
        set.first_code(),
        set.last_code()
    );
    if desc.requirements.iter().any(|&b| b != 0) {
        println!("  requirements: {:02X?}", desc.requirements);
    }

    let mut registry = SymbolSetRegistry::new()?;
    registry.install(&set)?;
    let map = registry.user_defined().map();
    println!("  mapped: {}", map.mapped_count(MapVariant::Standard));
    if dump {
        println!("{:#?}", Buf(&desc.to_bytes()));
        print!("{}", map.formatted_dump(MapVariant::Standard));
    }
    Ok(())
}

fn show(registry: &SymbolSetRegistry, id: SymbolSetId, variant: MapVariant) -> eyre::Result<()> {
    let entry = registry
        .get(id)
        .ok_or_else(|| eyre!("Symbol set {} is not built in", id))?;
    let map = &entry.map;
    println!("{} {} ({}), {} variant", entry.id, entry.name, entry.kind, variant);
    if !map.has_variant(variant) {
        info!("{} has no {} variant, showing the other one", entry.id, variant);
    }
    println!(
        "  PCL variant differs: {}",
        if map.has_difference() { "yes" } else { "no" }
    );
    print!("{}", map.formatted_dump(variant));
    Ok(())
}

fn write(
    registry: &SymbolSetRegistry,
    id: SymbolSetId,
    out: &Path,
    variant: MapVariant,
) -> eyre::Result<()> {
    let entry = registry
        .get(id)
        .ok_or_else(|| eyre!("Symbol set {} is not built in", id))?;
    write_symbol_set_file(out, entry.id, entry.kind, &entry.map, variant)
        .wrap_err_with(|| format!("Failed to write symbol set {}", id))?;
    Ok(())
}
