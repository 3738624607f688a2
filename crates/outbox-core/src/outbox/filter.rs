// ── Extension filter ─────────────────────────────────────────────────────────

use std::collections::HashSet;

/// Which discovered files get processed. Exactly one variant is active per
/// run; when both an include and an exclude list are supplied, include wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPolicy {
    Unrestricted,
    Include(HashSet<String>),
    Exclude(HashSet<String>),
}

impl FilterPolicy {
    /// Build a policy from the pipe-delimited settings strings
    /// (e.g. `".csv|.xml"`). Entries are lower-cased and normalised to carry
    /// the leading `.`; blank entries are dropped.
    pub fn from_lists(include: Option<&str>, exclude: Option<&str>) -> Self {
        if let Some(set) = parse_list(include) {
            return FilterPolicy::Include(set);
        }
        if let Some(set) = parse_list(exclude) {
            return FilterPolicy::Exclude(set);
        }
        FilterPolicy::Unrestricted
    }

    /// Pure predicate over a candidate's lower-cased extension. A file with
    /// no extension is never processed, regardless of policy.
    pub fn should_process(&self, extension: &str) -> bool {
        if extension.is_empty() {
            return false;
        }
        match self {
            FilterPolicy::Unrestricted => true,
            FilterPolicy::Include(set) => set.contains(extension),
            FilterPolicy::Exclude(set) => !set.contains(extension),
        }
    }
}

fn parse_list(raw: Option<&str>) -> Option<HashSet<String>> {
    let raw = raw?;
    let set: HashSet<String> = raw
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let s = s.to_lowercase();
            if s.starts_with('.') {
                s
            } else {
                format!(".{s}")
            }
        })
        .collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}
