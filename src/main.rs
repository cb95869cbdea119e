//! # PCL soft font tool
#![warn(missing_docs)]

use color_eyre::eyre;
use pcl_tool::cli::{
    self,
    opt::{Command, Options},
};

fn main() -> eyre::Result<()> {
    let opt: Options = cli::init()?;
    match opt.command {
        Command::Symset(command) => cli::symset::run(command),
        Command::Font(font) => cli::font::run(font),
    }
}
