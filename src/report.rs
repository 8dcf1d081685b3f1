//! Load order diagnostics.
//!
//! The report is built as data first ([`LoadOrderReport`]) and rendered to the
//! familiar text form through `Display`, so hosts can either show the text or
//! inspect individual findings.

use crate::error::{Result, SorterError};
use crate::plugin::{normalize_name, PluginEntry, TemplateRecord};
use crate::sorter::LoadOrderSorter;
use serde::Serialize;
use std::fmt;

const TITLE: &str = "Mod load order report";
const SUGGESTION_HEADER: &str = "The order that the current template suggests is as follows:";

/// A single finding about one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Note {
    Corrupt,
    /// A declared master is active, but only later in the list.
    MasterLoadsAfter(String),
    /// A declared master is not active anywhere in the list.
    MasterNotLoading(String),
    /// The plugin sits before a plugin the template places ahead of it.
    OrderMismatch,
    MissingRequirement(String),
    Conflict(String),
    /// Template comment, verbatim.
    Comment(String),
    /// The template has no entry for this plugin.
    Unrecognized,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::Corrupt => write!(f, "! This plugin is unreadable, and probably corrupt"),
            Note::MasterLoadsAfter(master) => write!(
                f,
                "! This plugin depends on master '{}', which is loading after it in the load order",
                master
            ),
            Note::MasterNotLoading(master) => write!(
                f,
                "! This plugin depends on master '{}', which is not loading",
                master
            ),
            Note::OrderMismatch => write!(
                f,
                "* The current load order of this mod does not match the current template"
            ),
            Note::MissingRequirement(name) => {
                write!(f, "! This plugin requires '{}', which was not found", name)
            }
            Note::Conflict(name) => write!(f, "! This plugin conflicts with '{}'", name),
            Note::Comment(text) => write!(f, "  {}", text),
            Note::Unrecognized => write!(
                f,
                "* The auto-sorter doesn't recognize this mod. It is probably safe to put it \
                 anywhere, depending on how you want the various plugins to override one another."
            ),
        }
    }
}

/// Findings for one plugin, in load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginReport {
    pub name: String,
    pub active: bool,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOrderReport {
    /// Duplicate entries in the template the report was built against.
    pub duplicate_count: usize,
    pub plugins: Vec<PluginReport>,
    /// The template order, present only when the current order disagrees with it.
    pub suggested_order: Option<Vec<String>>,
}

impl LoadOrderReport {
    pub fn is_load_order_wrong(&self) -> bool {
        self.suggested_order.is_some()
    }

    /// Iterates over every note of every plugin.
    pub fn notes(&self) -> impl Iterator<Item = (&str, &Note)> {
        self.plugins
            .iter()
            .flat_map(|plugin| plugin.notes.iter().map(move |note| (plugin.name.as_str(), note)))
    }
}

impl fmt::Display for LoadOrderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", TITLE)?;
        if self.duplicate_count > 0 {
            writeln!(
                f,
                "! Warning: current load order template contains {} duplicate entries. \
                 This warning can be ignored.",
                self.duplicate_count
            )?;
        }
        writeln!(f)?;

        for plugin in &self.plugins {
            if plugin.active {
                writeln!(f, "{}", plugin.name)?;
            } else {
                writeln!(f, "{} (Inactive)", plugin.name)?;
            }
            for note in &plugin.notes {
                writeln!(f, "{}", note)?;
            }
            writeln!(f)?;
        }

        if let Some(order) = &self.suggested_order {
            writeln!(f, "{}", SUGGESTION_HEADER)?;
            for name in order {
                writeln!(f, "{}", name)?;
            }
        }
        Ok(())
    }
}

/// Pairs up the parallel vectors the host keeps into report rows.
pub(crate) fn zip_entries<S: AsRef<str>>(
    plugins: &[S],
    active: &[bool],
    corrupt: &[bool],
    masters: &[Option<Vec<String>>],
) -> Result<Vec<PluginEntry>> {
    let expected = plugins.len();
    for (field, actual) in [
        ("active", active.len()),
        ("corrupt", corrupt.len()),
        ("masters", masters.len()),
    ] {
        if actual != expected {
            return Err(SorterError::MismatchedInputs {
                field,
                expected,
                actual,
            });
        }
    }

    Ok(plugins
        .iter()
        .zip(active)
        .zip(corrupt)
        .zip(masters)
        .map(|(((name, &active), &corrupt), masters)| PluginEntry {
            name: name.as_ref().to_string(),
            active,
            corrupt,
            masters: masters.clone().unwrap_or_default(),
        })
        .collect())
}

/// Case-folded view of the load order used for every name comparison.
struct LoadOrderView<'a> {
    plugins: &'a [PluginEntry],
    keys: Vec<String>,
}

impl<'a> LoadOrderView<'a> {
    fn new(plugins: &'a [PluginEntry]) -> Self {
        Self {
            plugins,
            keys: plugins.iter().map(|p| normalize_name(&p.name)).collect(),
        }
    }

    fn is_active(&self, index: usize, key: &str) -> bool {
        self.plugins[index].active && self.keys[index] == key
    }

    /// Whether the first entry named `key` is active.
    fn first_is_active(&self, key: &str) -> bool {
        self.keys
            .iter()
            .position(|k| k == key)
            .is_some_and(|j| self.plugins[j].active)
    }

    fn check_masters(&self, index: usize, notes: &mut Vec<Note>) {
        for master in &self.plugins[index].masters {
            let key = normalize_name(master);
            if (0..index).any(|j| self.is_active(j, &key)) {
                continue;
            }
            if (index + 1..self.plugins.len()).any(|j| self.is_active(j, &key)) {
                notes.push(Note::MasterLoadsAfter(master.clone()));
            } else {
                notes.push(Note::MasterNotLoading(master.clone()));
            }
        }
    }

    fn check_relations(&self, record: &TemplateRecord, notes: &mut Vec<Note>) {
        for required in &record.requires {
            if !self.first_is_active(required) {
                notes.push(Note::MissingRequirement(required.clone()));
            }
        }
        for conflict in &record.conflicts {
            if self.first_is_active(conflict) {
                notes.push(Note::Conflict(conflict.clone()));
            }
        }
    }
}

pub(crate) fn generate(sorter: &LoadOrderSorter, plugins: &[PluginEntry]) -> LoadOrderReport {
    let masters = sorter.masters();
    let view = LoadOrderView::new(plugins);
    let mut latest_position = 0;
    let mut load_order_wrong = false;
    let mut reports = Vec::with_capacity(plugins.len());

    for (index, plugin) in plugins.iter().enumerate() {
        let mut notes = Vec::new();

        if plugin.corrupt {
            notes.push(Note::Corrupt);
        }
        if plugin.active {
            view.check_masters(index, &mut notes);
        }

        match masters.get(&view.keys[index]) {
            Some(record) => {
                if record.ordinal < latest_position {
                    notes.push(Note::OrderMismatch);
                    load_order_wrong = true;
                } else {
                    latest_position = record.ordinal;
                }
                if plugin.active {
                    view.check_relations(record, &mut notes);
                }
                notes.extend(record.comments.iter().cloned().map(Note::Comment));
            }
            None => notes.push(Note::Unrecognized),
        }

        reports.push(PluginReport {
            name: plugin.name.clone(),
            active: plugin.active,
            notes,
        });
    }

    let suggested_order = load_order_wrong.then(|| {
        let names: Vec<&str> = plugins.iter().map(|p| p.name.as_str()).collect();
        sorter.sort(&names)
    });
    if load_order_wrong {
        tracing::debug!("load order does not match the template");
    }

    LoadOrderReport {
        duplicate_count: masters.duplicate_count(),
        plugins: reports,
        suggested_order,
    }
}
