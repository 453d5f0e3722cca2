use clap::Args;
use miette::{miette, Context, Result};
use rose_stb::DataTable;
use std::path::PathBuf;

#[derive(Args)]
pub struct GetArgs {
    /// An input STB file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Row to print, 0 is the header row
    #[arg(short, long)]
    row: usize,

    /// Only print this column, 0 is the row name
    #[arg(short, long)]
    column: Option<usize>,
}

impl GetArgs {
    pub fn handle(&self) -> Result<()> {
        let stb = DataTable::load(&self.file).context(format!("path: {}", self.file.display()))?;

        let cells = stb.rows().get(self.row).ok_or_else(|| {
            miette!(
                "row {} is out of range, the table has {}",
                self.row,
                stb.row_count()
            )
        })?;

        match self.column {
            Some(column) => println!("{}", stb.get(self.row, column).unwrap_or_default()),
            None => {
                for (column, cell) in cells.iter().enumerate() {
                    let title = stb.get(0, column).unwrap_or_default();
                    println!("[{column}] {title}: {cell}");
                }
            }
        }

        Ok(())
    }
}
