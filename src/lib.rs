//! Load Order Core Library
//!
//! Template-driven load order sorting and validation for game plugin managers.
//!
//! # Architecture
//!
//! The engine is consumed as a library by the plugin manager frontend, either
//! directly from Rust or through the C ABI in [`ffi`]. The frontend supplies the
//! installed plugin names with their active/corrupt flags and declared masters;
//! the engine returns orderings, verdicts and a diagnostic report.
//!
//! # Modules
//!
//! ## Template (`template` module)
//! - `MasterList::parse()` - Parse the community load order template
//! - `MasterList::load()` - Read a template from disk, tolerating a missing file
//!
//! ## Ranking (`ranking` module)
//! - `build_ranks()` - Fractional sort keys that keep unknown plugins next to their neighbours
//!
//! ## Engine (`sorter` module)
//! - `LoadOrderSorter::sort()` - Template order, returned as a new list
//! - `LoadOrderSorter::is_sorted()` - Whether a list already follows the template
//! - `LoadOrderSorter::insertion_index()` - Where a new plugin belongs
//! - `LoadOrderSorter::reload()` - Pick up template changes on demand
//!
//! ## Report (`report` module)
//! - `LoadOrderSorter::generate_report()` - Masters, order, requires/conflicts and template notes
//!
//! ## Data Structures (`plugin` module)
//! - `TemplateRecord` - Ordinal, requirements, conflicts and comments of a known plugin
//! - `RankedPlugin` - A plugin with its computed sort key
//! - `PluginEntry` - One row of the installed load order

pub mod config;
pub mod error;
pub mod ffi;
pub mod plugin;
pub mod ranking;
pub mod report;
pub mod sorter;
pub mod template;

pub use config::SorterConfig;
pub use error::{Result, SorterError};
pub use plugin::{PluginEntry, RankedPlugin, TemplateRecord};
pub use report::{LoadOrderReport, Note, PluginReport};
pub use sorter::{LoadOrderSorter, ReloadOutcome};
pub use template::MasterList;
