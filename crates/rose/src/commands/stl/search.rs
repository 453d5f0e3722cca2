use clap::Args;
use miette::Result;
use std::path::PathBuf;

#[derive(Args)]
pub struct SearchArgs {
    /// An input STL file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// String ids to look up, compared case-insensitively
    #[arg(required = true)]
    ids: Vec<String>,
}

impl SearchArgs {
    pub fn handle(&self) -> Result<()> {
        let stl = super::read_table(&self.file)?;

        for id in &self.ids {
            println!("{id}\t{}", stl.search(id));
        }

        Ok(())
    }
}
