use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct ShowArgs {
    /// An input STL file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only print this language
    #[arg(short, long)]
    language: Option<usize>,
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let stl = super::read_table(&self.file)?;

        info!(
            "{} entries in {} languages, type {:?} read as {}",
            stl.len(),
            stl.language_count(),
            stl.type_tag(),
            stl.encoding()
        );

        for (i, entry) in stl.entries().iter().enumerate() {
            match self.language {
                Some(language) => println!(
                    "{}\t{}",
                    entry.string_id,
                    stl.text(language, i).unwrap_or_default()
                ),
                None => {
                    println!("{} ({})", entry.string_id.bold(), entry.numeric_id);
                    for language in 0..stl.language_count() {
                        println!(
                            "  [{language}] {}",
                            stl.text(language, i).unwrap_or_default()
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
