pub mod diff;
pub mod search;
pub mod set;
pub mod show;

use miette::{Context, IntoDiagnostic, Result};
use rose_stl::StringTable;
use std::path::Path;

#[derive(clap::Subcommand)]
pub enum StlCommands {
    /// Compare two STL files
    Diff(diff::DiffArgs),
    /// Look up the display text of string ids
    Search(search::SearchArgs),
    /// Replace the text of an entry
    Set(set::SetArgs),
    /// Print the entries of a STL file
    Show(show::ShowArgs),
}

impl StlCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            StlCommands::Diff(diff) => diff.handle(),
            StlCommands::Search(search) => search.handle(),
            StlCommands::Set(set) => set.handle(),
            StlCommands::Show(show) => show.handle(),
        }
    }
}

/// Read a STL file, failing if it can't be read at all
fn read_table(path: &Path) -> Result<StringTable> {
    let data = std::fs::read(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;

    let mut stl = StringTable::decode(&data);
    stl.set_path(path);
    Ok(stl)
}
