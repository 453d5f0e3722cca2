//! Registry of loaded tables

use indexmap::IndexMap;
use rose_stb::DataTable;
use rose_stl::StringTable;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

use crate::error::{Error, Result};

/// Folder of the data directory holding the tables
pub const STB_DIRECTORY: &str = "STB";

/// Drop table edited by the tools
pub const ITEM_DROP: &str = "ITEM_DROP";

/// NPC data table
pub const LIST_NPC: &str = "LIST_NPC";

/// NPC names
pub const LIST_NPC_S: &str = "LIST_NPC_S";

/// Item category tables, each with a `_S` string table of names
pub const ITEM_CATEGORIES: [&str; 13] = [
    "LIST_FACEITEM",
    "LIST_CAP",
    "LIST_BODY",
    "LIST_ARMS",
    "LIST_FOOT",
    "LIST_BACK",
    "LIST_JEWEL",
    "LIST_WEAPON",
    "LIST_SUBWPN",
    "LIST_USEITEM",
    "LIST_JEMITEM",
    "LIST_NATURAL",
    "LIST_PAT",
];

/// Tables loaded from a data directory, keyed by short names
///
/// Both collections keep the order in which tables were added.
///
/// ```no_run
/// # fn doit() -> rose_data::error::Result<()> {
/// use rose_data::DataSet;
///
/// let mut data = DataSet::default();
/// data.load("3DDATA")?;
///
/// let drops = data.stb("ITEM_DROP").map(|stb| stb.row_count()).unwrap_or_default();
/// println!("{drops} drop tables, first NPC is {:?}", data.search("LIST_NPC_S", "NPC_001"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DataSet {
    stbs: IndexMap<String, DataTable>,
    stls: IndexMap<String, StringTable>,
}

impl DataSet {
    /// Create an empty set
    pub fn new() -> DataSet {
        DataSet::default()
    }

    /// Check that `data_path` looks like a client data directory.
    pub fn validate(data_path: impl AsRef<Path>) -> Result<()> {
        let stb_path = data_path.as_ref().join(STB_DIRECTORY);
        if !stb_path.is_dir() {
            return Err(Error::StbDirectoryMissing(data_path.as_ref().to_path_buf()));
        }

        let item_drop = stb_path.join(format!("{ITEM_DROP}.STB"));
        if !item_drop.is_file() {
            return Err(Error::MissingFile(item_drop));
        }

        Ok(())
    }

    /// Paths of the tables [`DataSet::load`] reads, with their keys, in load order
    pub fn required_files(data_path: impl AsRef<Path>) -> Vec<(String, PathBuf)> {
        let stb_path = data_path.as_ref().join(STB_DIRECTORY);
        let stb = |key: &str| (key.to_string(), stb_path.join(format!("{key}.STB")));
        let stl = |key: String| {
            let path = stb_path.join(format!("{key}.STL"));
            (key, path)
        };

        [ITEM_DROP, LIST_NPC]
            .into_iter()
            .chain(ITEM_CATEGORIES)
            .map(stb)
            .chain(
                std::iter::once(LIST_NPC_S.to_string())
                    .chain(ITEM_CATEGORIES.iter().map(|key| format!("{key}_S")))
                    .map(stl),
            )
            .collect()
    }

    /// Replace the contents of the set with the tables of a data directory.
    ///
    /// The first missing or unreadable file aborts the load. Tables loaded before the
    /// failure stay in the set.
    #[instrument(skip_all, err, fields(path = %data_path.as_ref().display()))]
    pub fn load(&mut self, data_path: impl AsRef<Path>) -> Result<()> {
        self.reset();

        for (key, path) in DataSet::required_files(data_path) {
            self.add(key, path)?;
        }

        info!(
            stbs = self.stbs.len(),
            stls = self.stls.len(),
            "file loading complete"
        );
        Ok(())
    }

    /// Load one table and store it under `key`, replacing any table with the same key.
    ///
    /// The kind of table is chosen by the extension of `path`.
    #[instrument(skip_all, err, fields(key = %key.as_ref(), path = %path.as_ref().display()))]
    pub fn add(&mut self, key: impl AsRef<str>, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.is_file() {
            error!("missing file: {}", path.display());
            return Err(Error::MissingFile(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .map(|extension| extension.to_string_lossy().to_uppercase())
            .unwrap_or_default();

        info!("loading {} [{}]", path.display(), key.as_ref());
        match extension.as_str() {
            "STB" => {
                self.stbs
                    .insert(key.as_ref().to_string(), DataTable::load(path)?);
            }
            "STL" => {
                self.stls
                    .insert(key.as_ref().to_string(), StringTable::load(path));
            }
            _ => {
                return Err(Error::UnsupportedFileType {
                    path: path.to_path_buf(),
                    extension,
                })
            }
        }

        Ok(())
    }

    /// Data table stored under `key`
    pub fn stb(&self, key: &str) -> Option<&DataTable> {
        self.stbs.get(key)
    }

    /// Mutable data table stored under `key`
    pub fn stb_mut(&mut self, key: &str) -> Option<&mut DataTable> {
        self.stbs.get_mut(key)
    }

    /// String table stored under `key`
    pub fn stl(&self, key: &str) -> Option<&StringTable> {
        self.stls.get(key)
    }

    /// Mutable string table stored under `key`
    pub fn stl_mut(&mut self, key: &str) -> Option<&mut StringTable> {
        self.stls.get_mut(key)
    }

    /// Every data table, in load order
    pub fn stbs(&self) -> &IndexMap<String, DataTable> {
        &self.stbs
    }

    /// Every string table, in load order
    pub fn stls(&self) -> &IndexMap<String, StringTable> {
        &self.stls
    }

    /// Display text of `string_id` in the string table stored under `stl_key`
    ///
    /// Returns `None` only when no such string table is loaded. See [`StringTable::search`]
    /// for how a missing id is handled.
    pub fn search<'a>(&'a self, stl_key: &str, string_id: &'a str) -> Option<&'a str> {
        self.stls
            .get(stl_key)
            .map(|stl| stl.search(string_id))
    }

    /// Remove every table
    pub fn reset(&mut self) {
        self.stbs.clear();
        self.stls.clear();
    }
}
