//! Rank assignment for an installed plugin list.
//!
//! Known plugins are ranked by their template ordinal. Unknown plugins get a
//! fractional rank just after the nearest known plugin before them, so they
//! stay next to their neighbours when the list is sorted. Unknown plugins with
//! no known plugin after them are lifted above every known ordinal.

use crate::plugin::RankedPlugin;
use crate::template::MasterList;

/// Rank offset between consecutive unknown plugins.
pub const UNKNOWN_RANK_STEP: f64 = 0.001;

/// Longest run of unknown plugins that still fits strictly between two
/// consecutive template ordinals. Longer runs start to tie with, or overtake,
/// the next known plugin.
pub const UNKNOWN_RUN_CAPACITY: usize = 999;

/// Computes ranks for `plugins`, preserving input order.
pub fn build_ranks<'a, S: AsRef<str>>(
    plugins: &'a [S],
    masters: &MasterList,
) -> Vec<RankedPlugin<'a>> {
    let mut ranked = Vec::with_capacity(plugins.len());
    let mut last_known: f64 = -1.0;
    let mut max_ordinal: usize = 0;
    let mut run: usize = 1;
    let mut longest_run: usize = 0;

    for plugin in plugins {
        let name = plugin.as_ref();
        match masters.ordinal(name) {
            Some(ordinal) => {
                last_known = ordinal as f64;
                max_ordinal = max_ordinal.max(ordinal);
                run = 1;
                ranked.push(RankedPlugin {
                    name,
                    rank: last_known,
                    had_template_entry: true,
                });
            }
            None => {
                ranked.push(RankedPlugin {
                    name,
                    rank: last_known + run as f64 * UNKNOWN_RANK_STEP,
                    had_template_entry: false,
                });
                longest_run = longest_run.max(run);
                run += 1;
            }
        }
    }

    // Trailing unknowns have nothing to anchor to; keep them after all known
    // plugins, in their current order.
    let ceiling = (max_ordinal + 1) as f64;
    for (offset, plugin) in ranked
        .iter_mut()
        .rev()
        .take_while(|plugin| !plugin.had_template_entry)
        .enumerate()
    {
        plugin.rank = ceiling - (offset + 1) as f64 * UNKNOWN_RANK_STEP;
        longest_run = longest_run.max(offset + 1);
    }

    if longest_run > UNKNOWN_RUN_CAPACITY {
        tracing::warn!(
            run = longest_run,
            capacity = UNKNOWN_RUN_CAPACITY,
            "too many consecutive unknown plugins; their relative order may not be preserved"
        );
    }

    ranked
}
