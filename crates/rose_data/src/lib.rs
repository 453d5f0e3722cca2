//! Registry of the tables loaded from a *ROSE Online* data directory.
//!
//! The client keeps its tables under `3DDATA/STB/`. A [`DataSet`] loads the set the drop
//! editor works with (`ITEM_DROP`, `LIST_NPC`, the item category tables and their `_S` name
//! tables) and hands them out by short key, the file name without its extension.
//!
//! A [`DataSet`] is an ordinary value: several sets, for example from two client versions,
//! can be loaded side by side.

pub mod dataset;
pub mod error;

pub use dataset::DataSet;
