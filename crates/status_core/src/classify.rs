use std::fmt;

use crate::{RecipeStatus, Snapshot};

/// Named record subsets used by the views.
///
/// `UpdatableAll` keeps deprecated recipes; `UpdatableEligible` drops them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterPreset {
    Unsupported,
    Inconsistent,
    UpdatableAll,
    UpdatableEligible,
    UpToDate,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 5] = [
        FilterPreset::Unsupported,
        FilterPreset::Inconsistent,
        FilterPreset::UpdatableAll,
        FilterPreset::UpdatableEligible,
        FilterPreset::UpToDate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterPreset::Unsupported => "unsupported",
            FilterPreset::Inconsistent => "inconsistent",
            FilterPreset::UpdatableAll => "updatable-all",
            FilterPreset::UpdatableEligible => "updatable-eligible",
            FilterPreset::UpToDate => "up-to-date",
        }
    }

    /// Flags other than `supported` are only read for supported records, with
    /// one exception: the producer marks deprecated updatable recipes as
    /// unsupported, and those still count as updatable.
    pub fn matches(self, record: &RecipeStatus) -> bool {
        match self {
            FilterPreset::Unsupported => !record.supported,
            FilterPreset::Inconsistent => record.supported && record.inconsistent_versioning,
            FilterPreset::UpdatableAll => {
                record.updatable && (record.supported || record.deprecated)
            }
            FilterPreset::UpdatableEligible => {
                record.supported && record.updatable && !record.deprecated
            }
            FilterPreset::UpToDate => record.supported && record.up_to_date,
        }
    }

    /// Matching records in snapshot order.
    pub fn apply(self, snapshot: &Snapshot) -> Vec<&RecipeStatus> {
        snapshot.records().filter(|r| self.matches(r)).collect()
    }

    pub fn count(self, snapshot: &Snapshot) -> usize {
        snapshot.records().filter(|r| self.matches(r)).count()
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn unsupported(snapshot: &Snapshot) -> Vec<&RecipeStatus> {
    FilterPreset::Unsupported.apply(snapshot)
}

pub fn inconsistent(snapshot: &Snapshot) -> Vec<&RecipeStatus> {
    FilterPreset::Inconsistent.apply(snapshot)
}

pub fn updatable_all(snapshot: &Snapshot) -> Vec<&RecipeStatus> {
    FilterPreset::UpdatableAll.apply(snapshot)
}

pub fn updatable_eligible(snapshot: &Snapshot) -> Vec<&RecipeStatus> {
    FilterPreset::UpdatableEligible.apply(snapshot)
}

pub fn up_to_date(snapshot: &Snapshot) -> Vec<&RecipeStatus> {
    FilterPreset::UpToDate.apply(snapshot)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotCounts {
    pub total: usize,
    pub up_to_date: usize,
    pub updatable: usize,
    pub inconsistent: usize,
    pub unsupported: usize,
    pub deprecated: usize,
}

impl SnapshotCounts {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            total: snapshot.len(),
            up_to_date: FilterPreset::UpToDate.count(snapshot),
            updatable: FilterPreset::UpdatableAll.count(snapshot),
            inconsistent: FilterPreset::Inconsistent.count(snapshot),
            unsupported: FilterPreset::Unsupported.count(snapshot),
            deprecated: snapshot.records().filter(|r| r.deprecated).count(),
        }
    }
}
