//! Single-column sort stage

use super::value::Row;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// The one active sort key and its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

/// Next sort state after a sort request on `key`.
///
/// Same key flips the direction, a different key starts ascending.
pub fn toggle(current: Option<&SortState>, key: &str) -> SortState {
    match current {
        Some(state) if state.key == key => SortState::new(key, state.direction.flipped()),
        _ => SortState::new(key, SortDirection::Asc),
    }
}

/// Order row indices by the sort state. Stable: ties keep their relative order.
pub fn sort_indices(rows: &[Row], indices: &mut [usize], sort: Option<&SortState>) {
    let Some(sort) = sort else {
        return;
    };
    indices.sort_by(|&a, &b| {
        let ordering = rows[a].get(&sort.key).compare(rows[b].get(&sort.key));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
