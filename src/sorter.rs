//! The load order engine.
//!
//! [`LoadOrderSorter`] owns the parsed template and answers every ordering
//! question against it. All queries take the caller's plugin list by
//! reference and return new values; the template is only replaced wholesale
//! by [`LoadOrderSorter::load_list`] or [`LoadOrderSorter::reload`].

use crate::config::SorterConfig;
use crate::error::Result;
use crate::plugin::PluginEntry;
use crate::ranking::build_ranks;
use crate::report::{self, LoadOrderReport};
use crate::template::MasterList;
use std::path::{Path, PathBuf};

/// Outcome of re-reading the template from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Template content is identical to what was loaded before.
    Unchanged,
    /// Template was added or its content changed.
    Updated,
    /// Template no longer exists; the sorter is now running without one.
    Missing,
}

/// Without a template the master list is empty and `has_template` is unset;
/// every plugin is then unknown.
#[derive(Debug, Clone, Default)]
pub struct LoadOrderSorter {
    template_path: Option<PathBuf>,
    master_list: MasterList,
    has_template: bool,
}

impl LoadOrderSorter {
    /// Creates a sorter reading the template at `path`. A missing file is
    /// not an error; the sorter simply has no master list.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut sorter = Self {
            template_path: Some(path.into()),
            ..Self::default()
        };
        sorter.load_list()?;
        Ok(sorter)
    }

    /// Creates a sorter for the template resolved by `config`.
    pub fn from_config(config: &SorterConfig) -> Result<Self> {
        Self::open(config.template_path.clone())
    }

    /// Creates a sorter from template text already in memory.
    pub fn from_template_str(text: &str) -> Self {
        Self {
            template_path: None,
            master_list: MasterList::parse(text),
            has_template: true,
        }
    }

    /// Creates a sorter with no template at all.
    pub fn without_template() -> Self {
        Self::default()
    }

    /// Re-reads the template from its path, replacing the master list.
    pub fn load_list(&mut self) -> Result<()> {
        if let Some(path) = &self.template_path {
            let fresh = MasterList::load(path)?;
            self.replace_list(fresh);
        }
        Ok(())
    }

    /// Re-reads the template and reports whether anything changed.
    pub fn reload(&mut self) -> Result<ReloadOutcome> {
        let Some(path) = &self.template_path else {
            return Ok(ReloadOutcome::Unchanged);
        };

        let fresh = MasterList::load(path)?;
        let outcome = match &fresh {
            None => ReloadOutcome::Missing,
            Some(new)
                if self.has_template
                    && self.master_list.fingerprint() == new.fingerprint() =>
            {
                ReloadOutcome::Unchanged
            }
            Some(_) => ReloadOutcome::Updated,
        };
        tracing::debug!(?outcome, path = %path.display(), "reloaded load order template");

        self.replace_list(fresh);
        Ok(outcome)
    }

    fn replace_list(&mut self, fresh: Option<MasterList>) {
        self.has_template = fresh.is_some();
        self.master_list = fresh.unwrap_or_default();
    }

    pub fn has_master_list(&self) -> bool {
        self.has_template
    }

    /// The loaded template, if any.
    pub fn master_list(&self) -> Option<&MasterList> {
        self.has_template.then_some(&self.master_list)
    }

    pub fn template_path(&self) -> Option<&Path> {
        self.template_path.as_deref()
    }

    /// Template version, `0` when there is no template or it has no version line.
    pub fn file_version(&self) -> i32 {
        self.master_list.file_version()
    }

    /// The master list used for ranking; empty when there is no template.
    pub(crate) fn masters(&self) -> &MasterList {
        &self.master_list
    }

    /// Returns `plugins` ordered by template rank.
    ///
    /// The sort is stable, and sorting an already sorted list returns it unchanged.
    pub fn sort<S: AsRef<str>>(&self, plugins: &[S]) -> Vec<String> {
        let mut ranked = build_ranks(plugins, self.masters());
        ranked.sort_by(|a, b| a.rank.total_cmp(&b.rank));
        tracing::debug!(plugins = ranked.len(), "sorted load order");
        ranked.into_iter().map(|plugin| plugin.name.to_string()).collect()
    }

    /// Whether `plugins` is already in template order.
    ///
    /// Always `false` without a template, since nothing can be verified.
    pub fn is_sorted<S: AsRef<str>>(&self, plugins: &[S]) -> bool {
        if !self.has_template {
            return false;
        }
        build_ranks(plugins, &self.master_list)
            .windows(2)
            .all(|pair| pair[0].rank <= pair[1].rank)
    }

    /// Index at which `plugin` should be inserted into `plugins`.
    ///
    /// Plugins the template doesn't know are appended.
    pub fn insertion_index<S: AsRef<str>>(&self, plugins: &[S], plugin: &str) -> usize {
        let Some(target) = self.masters().ordinal(plugin) else {
            return plugins.len();
        };
        let target = target as f64;
        build_ranks(plugins, self.masters())
            .iter()
            .position(|ranked| ranked.rank >= target)
            .unwrap_or(plugins.len())
    }

    /// Builds the diagnostic report for an installed load order.
    pub fn generate_report(&self, plugins: &[PluginEntry]) -> LoadOrderReport {
        report::generate(self, plugins)
    }

    /// Builds the report from the parallel vectors the host keeps.
    ///
    /// All slices must be as long as `plugins`. A `None` masters entry means
    /// the plugin declares none.
    pub fn generate_report_from_parts<S: AsRef<str>>(
        &self,
        plugins: &[S],
        active: &[bool],
        corrupt: &[bool],
        masters: &[Option<Vec<String>>],
    ) -> Result<LoadOrderReport> {
        let entries = report::zip_entries(plugins, active, corrupt, masters)?;
        Ok(self.generate_report(&entries))
    }
}
