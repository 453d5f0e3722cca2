pub mod check;
pub mod scan;

#[derive(clap::Subcommand)]
pub enum DataCommands {
    /// Load the tables the drop editor needs from a data directory
    Check(check::CheckArgs),
    /// Load every table found below a directory and report failures
    Scan(scan::ScanArgs),
}

impl DataCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            DataCommands::Check(check) => check.handle(),
            DataCommands::Scan(scan) => scan.handle(),
        }
    }
}
