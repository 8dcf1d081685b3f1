use serde::{Deserialize, Serialize};

/// One known plugin in the load order template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Position of the entry in the template, counted over headers in file order.
    pub ordinal: usize,
    /// Case-folded names that must be present and active alongside this plugin.
    pub requires: Vec<String>,
    /// Case-folded names that must not be active alongside this plugin.
    pub conflicts: Vec<String>,
    /// Free-text notes, kept in their original case.
    pub comments: Vec<String>,
}

/// A plugin together with the sort key computed for one sort/validate/report call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedPlugin<'a> {
    pub name: &'a str,
    pub rank: f64,
    pub had_template_entry: bool,
}

/// A row of the installed load order as supplied by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub corrupt: bool,
    /// Master files declared in the plugin header.
    #[serde(default)]
    pub masters: Vec<String>,
}

impl PluginEntry {
    /// An active, readable plugin with no declared masters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            corrupt: false,
            masters: Vec::new(),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn corrupt(mut self) -> Self {
        self.corrupt = true;
        self
    }

    pub fn with_masters<I, S>(mut self, masters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.masters = masters.into_iter().map(Into::into).collect();
        self
    }
}

fn default_active() -> bool {
    true
}

/// Case-folds and trims a plugin name into its lookup key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
