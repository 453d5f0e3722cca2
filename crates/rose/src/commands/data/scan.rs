use clap::Args;
use itertools::Itertools;
use miette::{miette, Result};
use owo_colors::OwoColorize;
use rose_record::TextEncoding;
use rose_stb::DataTable;
use rose_stl::StringTable;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Args)]
pub struct ScanArgs {
    /// A directory to search for tables
    #[arg(short, long, value_name = "DIR", env = "ROSE_DATA_DIR")]
    directory: PathBuf,
}

impl ScanArgs {
    fn load(path: &Path) -> std::result::Result<TextEncoding, String> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_uppercase())
            .unwrap_or_default();

        match extension.as_str() {
            "STB" => DataTable::load(path)
                .map(|stb| stb.encoding())
                .map_err(|e| e.to_string()),
            "STL" => {
                let stl = StringTable::load(path);
                // A parsed table always has at least one language
                if stl.language_count() == 0 {
                    Err("unable to parse string table with any encoding".into())
                } else {
                    Ok(stl.encoding())
                }
            }
            _ => Err(format!("unsupported file type {extension:?}")),
        }
    }

    pub fn handle(&self) -> Result<()> {
        let files = WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path().extension().is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("stb") || ext.eq_ignore_ascii_case("stl")
                })
            })
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("no tables found in {}", self.directory.display()));
        }

        let (loaded, failed): (Vec<_>, Vec<_>) = files
            .iter()
            .map(|file| (file.path(), ScanArgs::load(file.path())))
            .partition(|(_, result)| result.is_ok());

        for (path, result) in &failed {
            if let Err(e) = result {
                warn!("{}: {e}", path.display());
                println!("❌ {}", path.display().red());
            }
        }

        let encodings = loaded
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
            .counts()
            .into_iter()
            .sorted_by_key(|(encoding, _)| encoding.to_string())
            .map(|(encoding, count)| format!("{count} {encoding}"))
            .join(", ");
        info!(
            "{} tables loaded ({encodings}), {} failed",
            loaded.len(),
            failed.len()
        );

        if failed.is_empty() {
            Ok(())
        } else {
            Err(miette!("{} tables failed to load", failed.len()))
        }
    }
}
