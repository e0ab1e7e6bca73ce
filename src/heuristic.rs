//! Default role assignment for a freshly previewed column list.
//!
//! Each role (input, expected, metadata) claims at most one column. A role is
//! matched by name first, trying progressively looser comparisons against its
//! label, and otherwise falls back to a fixed position. Picks never overlap: a
//! column claimed by an earlier role is invisible to later ones.

use heck::ToSnakeCase;
use similar::TextDiff;

use crate::bucket::Bucket;

const FUZZY_MATCH_THRESHOLD: f32 = 0.8;

/// Role picks produced by [`default_assignment`]. `None` means the role
/// stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultPicks {
    pub input: Option<String>,
    pub expected: Option<String>,
    pub metadata: Option<String>,
}

impl DefaultPicks {
    pub fn get(&self, bucket: Bucket) -> Option<&str> {
        match bucket {
            Bucket::Input => self.input.as_deref(),
            Bucket::Expected => self.expected.as_deref(),
            Bucket::Metadata => self.metadata.as_deref(),
            Bucket::Unmapped => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        Bucket::ROLES
            .iter()
            .any(|role| self.get(*role) == Some(name))
    }
}

fn fallback_index(role: Bucket) -> usize {
    match role {
        Bucket::Input => 0,
        Bucket::Expected => 1,
        _ => 2,
    }
}

pub fn default_assignment(columns: &[&str]) -> DefaultPicks {
    let mut picks = DefaultPicks::default();
    if columns.is_empty() {
        return picks;
    }

    for role in Bucket::ROLES {
        let claimed = |name: &str| picks.contains(name);
        let pick = find_by_name(columns, role.title(), &claimed).or_else(|| {
            let idx = fallback_index(role).min(columns.len() - 1);
            let candidate = columns[idx];
            (!claimed(candidate)).then_some(candidate)
        });
        let pick = pick.map(str::to_string);
        match role {
            Bucket::Input => picks.input = pick,
            Bucket::Expected => picks.expected = pick,
            _ => picks.metadata = pick,
        }
    }

    picks
}

fn find_by_name<'a>(
    columns: &[&'a str],
    label: &str,
    claimed: &dyn Fn(&str) -> bool,
) -> Option<&'a str> {
    let label = label.to_lowercase();
    let open = move || columns.iter().copied().filter(move |name| !claimed(*name));

    if let Some(hit) = open().find(|name| name.trim().to_lowercase() == label) {
        return Some(hit);
    }
    if let Some(hit) = open().find(|name| name_tokens(name).contains(&label)) {
        return Some(hit);
    }

    let mut best: Option<(&str, f32)> = None;
    for name in open() {
        let ratio = similarity(&compact(name), &label);
        if ratio >= FUZZY_MATCH_THRESHOLD && best.is_none_or(|(_, top)| ratio > top) {
            best = Some((name, ratio));
        }
    }
    best.map(|(name, _)| name)
}

fn name_tokens(name: &str) -> Vec<String> {
    name.to_snake_case()
        .split('_')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn compact(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    TextDiff::from_chars(a, b).ratio()
}
