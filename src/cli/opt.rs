use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use pcl::{font::GenerateOptions, symset::SymbolSetId};
use thiserror::Error;

#[derive(Parser, Debug)]
/// Convert TrueType fonts and symbol sets for PCL printers
pub struct Options {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect and write symbol sets
    #[clap(subcommand)]
    Symset(SymsetCommand),
    /// Convert a TrueType font into a soft font
    Font(FontOptions),
}

#[derive(Subcommand, Debug)]
pub enum SymsetCommand {
    /// List the built-in symbol sets
    List,
    /// Parse and validate a download symbol set file
    Check {
        /// The symbol set file
        file: PathBuf,
        /// Print the raw descriptor and the mapping table
        #[clap(long)]
        dump: bool,
    },
    /// Print the mapping of a built-in symbol set
    Show {
        /// Symbol set id, e.g. `19U` or `629`
        id: SymbolSetId,
        /// Use the PCL variant of the mapping
        #[clap(long)]
        pcl: bool,
    },
    /// Write a built-in symbol set as a download symbol set file
    Write {
        /// Symbol set id, e.g. `19U` or `629`
        id: SymbolSetId,
        /// The output file
        out: PathBuf,
        /// Use the PCL variant of the mapping
        #[clap(long)]
        pcl: bool,
    },
}

#[derive(Parser, Debug)]
pub struct FontOptions {
    /// The TrueType font
    pub font_file: PathBuf,

    /// The output file
    pub out: PathBuf,

    /// Write PCL XL instead of PCL 5
    #[clap(long)]
    pub xl: bool,

    /// The symbol set the font is bound to
    #[clap(long, short, default_value = "19U")]
    pub symset: SymbolSetId,

    /// Create an unbound font addressed by Unicode code points
    #[clap(long)]
    pub unbound: bool,

    /// Download symbol set file to use as the user-defined set
    #[clap(long)]
    pub symset_file: Option<PathBuf>,

    /// Generation options as a RON file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Write vertical metrics if the font has them
    #[clap(long)]
    pub vertical: bool,

    /// Always use the Format 16 font header
    #[clap(long)]
    pub format16: bool,

    /// Embed the symbol set mapping into the font header
    #[clap(long)]
    pub embed_map: bool,

    /// Font name in the header
    #[clap(long)]
    pub name: Option<String>,

    /// Typeface family id
    #[clap(long)]
    pub typeface: Option<u16>,

    /// Index of the font in a collection
    #[clap(long, default_value = "0")]
    pub index: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error")]
    Io(#[from] io::Error),
    #[error("Deserialize Error")]
    Ron(#[from] ron::error::Error),
}

impl FontOptions {
    /// The options from the config file, with the command line flags applied
    pub fn generate_options(&self) -> Result<GenerateOptions, ConfigError> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                ron::from_str(&text)?
            }
            None => GenerateOptions::default(),
        };
        if self.vertical {
            options.vertical_metrics = true;
        }
        if self.format16 {
            options.format16 = true;
        }
        if self.embed_map {
            options.embed_symbol_set_map = true;
        }
        if let Some(name) = &self.name {
            options.overrides.font_name = Some(name.clone());
        }
        if let Some(typeface) = self.typeface {
            options.overrides.typeface = Some(typeface);
        }
        Ok(options)
    }
}
