pub mod get;
pub mod info;
pub mod set;

#[derive(clap::Subcommand)]
pub enum StbCommands {
    /// Print a row or a single cell
    Get(get::GetArgs),
    /// Print the layout of a STB file
    Info(info::InfoArgs),
    /// Replace a cell
    Set(set::SetArgs),
}

impl StbCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            StbCommands::Get(get) => get.handle(),
            StbCommands::Info(info) => info.handle(),
            StbCommands::Set(set) => set.handle(),
        }
    }
}
