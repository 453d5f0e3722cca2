use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use rose_stl::StringTable;
use similar::{ChangeTag, TextDiff};
use std::{collections::HashMap, fmt::Display, path::PathBuf};
use tracing::info;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// List which entries changed
    #[default]
    Semantic,
    /// Also show an inline diff of every changed text
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(String),
    Removed(String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, Vec<Change>),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(v) => writeln!(f, "✅ {}", v.green()),
            Change::Removed(v) => writeln!(f, "❌ {}", v.red()),
            Change::Comparison(key, old, new) => {
                writeln!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(lines) => {
                writeln!(f, "{}", lines.iter().map(|l| format!(" {l}")).join("\n"))
            }
            Change::Modified(v, children) => {
                writeln!(f, "🔃 {}", v.blue())?;
                let body = children.iter().map(|c| c.to_string()).join("");
                writeln!(
                    f,
                    "{}",
                    body.split('\n')
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| format!("  {l}"))
                        .join("\n")
                )
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input STL file
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input STL file
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,
}

impl DiffArgs {
    fn inline_diff(&self, old: &str, new: &str) -> Vec<String> {
        let diff = TextDiff::from_chars(old, new);

        let mut context = String::new();
        for op in diff.ops() {
            for change in diff.iter_inline_changes(op) {
                for (emphasized, value) in change.iter_strings_lossy() {
                    let value = match (emphasized, change.tag()) {
                        (false, _) | (_, ChangeTag::Equal) => value.dimmed().to_string(),
                        (true, ChangeTag::Insert) => value.green().underline().to_string(),
                        (true, ChangeTag::Delete) => value.red().underline().to_string(),
                    };
                    context.push_str(&value);
                }
            }
        }

        vec![context]
    }

    fn diff_entry(
        &self,
        left: &StringTable,
        left_index: usize,
        right: &StringTable,
        right_index: usize,
    ) -> Vec<Change> {
        let mut changes = Vec::new();

        let left_numeric = left.entries()[left_index].numeric_id;
        let right_numeric = right.entries()[right_index].numeric_id;
        if left_numeric != right_numeric {
            changes.push(Change::Comparison(
                "numeric id".into(),
                left_numeric.to_string(),
                right_numeric.to_string(),
            ));
        }

        for language in 0..left.language_count().max(right.language_count()) {
            let old = left.text(language, left_index).unwrap_or_default();
            let new = right.text(language, right_index).unwrap_or_default();
            if old == new {
                continue;
            }

            changes.push(Change::Comparison(
                format!("language {language}"),
                old.into(),
                new.into(),
            ));
            if self.mode == Mode::Full {
                changes.push(Change::Context(self.inline_diff(old, new)));
            }
        }

        changes
    }

    fn diff_tables(&self, left: &StringTable, right: &StringTable) -> Vec<Change> {
        let mut result = Vec::new();

        if left.type_tag() != right.type_tag() {
            result.push(Change::Comparison(
                "type".into(),
                left.type_tag().into(),
                right.type_tag().into(),
            ));
        }

        if left.language_count() != right.language_count() {
            result.push(Change::Comparison(
                "languages".into(),
                left.language_count().to_string(),
                right.language_count().to_string(),
            ));
        }

        let left_ids = index_by_id(left);
        let right_ids = index_by_id(right);

        // Find Added Entries
        right
            .entries()
            .iter()
            .filter(|e| !left_ids.contains_key(e.string_id.as_str()))
            .map(|e| Change::Added(e.string_id.clone()))
            .for_each(|c| result.push(c));

        // Find Removed Entries
        left.entries()
            .iter()
            .filter(|e| !right_ids.contains_key(e.string_id.as_str()))
            .map(|e| Change::Removed(e.string_id.clone()))
            .for_each(|c| result.push(c));

        // Find Differences
        left.entries()
            .iter()
            .enumerate()
            .filter_map(|(i, e)| {
                right_ids
                    .get(e.string_id.as_str())
                    .map(|j| (e.string_id.as_str(), i, *j))
            })
            .filter_map(|(id, i, j)| {
                let changes = self.diff_entry(left, i, right, j);
                (!changes.is_empty()).then(|| Change::Modified(id.into(), changes))
            })
            .for_each(|c| result.push(c));

        result
    }

    pub fn handle(&self) -> Result<()> {
        let left = super::read_table(&self.left)?;
        let right = super::read_table(&self.right)?;

        let changes = self.diff_tables(&left, &right);
        if changes.is_empty() {
            info!("no differences");
        }

        for change in changes {
            print!("{change}");
        }

        Ok(())
    }
}

/// Ordinal of every string id, keeping the first of duplicated ids
fn index_by_id(table: &StringTable) -> HashMap<&str, usize> {
    let mut ids = HashMap::with_capacity(table.len());
    for (i, entry) in table.entries().iter().enumerate() {
        ids.entry(entry.string_id.as_str()).or_insert(i);
    }
    ids
}
