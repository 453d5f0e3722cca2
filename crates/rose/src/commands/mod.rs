pub mod data;
pub mod stb;
pub mod stl;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle STL string tables
    Stl {
        #[command(subcommand)]
        command: stl::StlCommands,
    },
    /// Handle STB data tables
    Stb {
        #[command(subcommand)]
        command: stb::StbCommands,
    },
    /// Handle a client data directory
    Data {
        #[command(subcommand)]
        command: data::DataCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Stl { command } => command.handle(),
            Commands::Stb { command } => command.handle(),
            Commands::Data { command } => command.handle(),
        }
    }
}
