use clap::Args;
use miette::{Context, Result};
use rose_stb::DataTable;
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// An input STB file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let stb = DataTable::load(&self.file).context(format!("path: {}", self.file.display()))?;

        println!("rows:       {}", stb.row_count());
        println!("columns:    {}", stb.column_count());
        println!("row height: {}", stb.row_height());
        println!("encoding:   {}", stb.encoding());
        println!("id column:  {}", stb.id_column_title());
        for (column, title) in stb.header().iter().enumerate() {
            let width = stb.column_widths().get(column).copied().unwrap_or_default();
            println!("  [{column}] {title} ({width})");
        }

        Ok(())
    }
}
