use std::collections::HashSet;

use crate::error::{HeatmapError, Result};

// ---------------------------------------------------------------------------
// Label selection: which rows / columns are visible
// ---------------------------------------------------------------------------

/// Map each selected name to its index in `all`, keeping the selection order.
///
/// Fails on unknown or repeated names. An empty selection is valid and
/// resolves to no indices.
pub fn resolve_names(all: &[String], selected: &[String], what: &str) -> Result<Vec<usize>> {
    let mut seen = HashSet::with_capacity(selected.len());
    selected
        .iter()
        .map(|name| {
            if !seen.insert(name.as_str()) {
                return Err(HeatmapError::invalid_input(format!(
                    "{what} '{name}' selected more than once"
                )));
            }
            all.iter()
                .position(|n| n == name)
                .ok_or_else(|| HeatmapError::invalid_input(format!("unknown {what} '{name}'")))
        })
        .collect()
}

/// Names of `all` that are not in `visible`, in their original order.
pub fn hidden_names(all: &[String], visible: &[String]) -> Vec<String> {
    let visible: HashSet<&str> = visible.iter().map(String::as_str).collect();
    all.iter()
        .filter(|n| !visible.contains(n.as_str()))
        .cloned()
        .collect()
}
