use clap::Args;
use miette::{miette, Context, Result};
use rose_stb::DataTable;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct SetArgs {
    /// An input STB file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Row of the cell, 0 is the header row
    #[arg(short, long)]
    row: usize,

    /// Column of the cell, 0 is the row name
    #[arg(short, long)]
    column: usize,

    /// The new value
    value: String,

    /// Write the result here instead of replacing the input
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl SetArgs {
    pub fn handle(&self) -> Result<()> {
        let mut stb =
            DataTable::load(&self.file).context(format!("path: {}", self.file.display()))?;

        if !stb.set(self.row, self.column, self.value.as_str()) {
            return Err(miette!(
                "row {} is out of range, the table has {}",
                self.row,
                stb.row_count()
            ));
        }

        match &self.output {
            Some(output) => stb.save_as(output)?,
            None => stb.save()?,
        }
        info!("set row {} column {}", self.row, self.column);

        Ok(())
    }
}
