use clap::Args;
use miette::{miette, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct SetArgs {
    /// An input STL file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// String id of the entry to change
    #[arg(short, long)]
    id: String,

    /// Language to change
    #[arg(short, long, default_value_t = rose_stl::types::DISPLAY_LANGUAGE)]
    language: usize,

    /// The new text
    #[arg(short, long)]
    text: String,

    /// Write the result here instead of replacing the input
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl SetArgs {
    pub fn handle(&self) -> Result<()> {
        let mut stl = super::read_table(&self.file)?;

        let entry = stl
            .index_of(&self.id)
            .ok_or_else(|| miette!("no entry {} in {}", self.id, self.file.display()))?;

        if !stl.set_text(self.language, entry, self.text.as_str()) {
            return Err(miette!(
                "language {} is out of range, the table has {}",
                self.language,
                stl.language_count()
            ));
        }

        match &self.output {
            Some(output) => stl.save_as(output)?,
            None => stl.save()?,
        }
        info!("set {} in language {}", self.id, self.language);

        Ok(())
    }
}
