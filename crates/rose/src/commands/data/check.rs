use clap::Args;
use miette::Result;
use rose_data::DataSet;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// The 3DDATA directory of the client
    #[arg(short, long, value_name = "DIR", env = "ROSE_DATA_DIR")]
    data_dir: PathBuf,
}

impl CheckArgs {
    pub fn handle(&self) -> Result<()> {
        DataSet::validate(&self.data_dir)?;

        let mut data = DataSet::new();
        data.load(&self.data_dir)?;

        for (key, stb) in data.stbs() {
            println!(
                "{key}: {} rows, {} columns ({})",
                stb.row_count(),
                stb.column_count(),
                stb.encoding()
            );
        }
        for (key, stl) in data.stls() {
            println!(
                "{key}: {} entries, {} languages ({})",
                stl.len(),
                stl.language_count(),
                stl.encoding()
            );
        }

        Ok(())
    }
}
