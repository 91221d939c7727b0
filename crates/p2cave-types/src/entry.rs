use serde::Serialize;

use crate::category::Category;
use crate::object_info::ObjectInfo;
use crate::spawn::{SpawnLocation, SpawnMethod};

/// 1-based entry number, unique within a sublevel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub u32);

impl EntryId {
    /// Position of this entry in its sublevel's entry list; `None` for the
    /// unused id 0.
    pub const fn index(self) -> Option<usize> {
        match self.0.checked_sub(1) {
            Some(index) => Some(index as usize),
            None => None,
        }
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a derived entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntrySource {
    Teki,
    Item,
    Gate,
    Cap,
    /// Synthesized for an object named after a carrier's `_`.
    Carried,
    /// Synthesized from a class that always holds fixed objects.
    Cargo,
}

/// One spawn entry after classification and carrying resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedEntry {
    pub id: EntryId,
    /// Internal class name. Gate entries use their keyword.
    pub class: String,
    pub category: Category,
    pub source: EntrySource,
    pub info: ObjectInfo,
    pub spawn_method: Option<SpawnMethod>,
    pub min_amount: u32,
    pub weight: u32,
    pub spawn_type: Option<i32>,
    pub cap_type: Option<i32>,
    pub gate_health: Option<f32>,
    /// Entry synthesized for the object named after this entry's `_`.
    pub carrying: Option<EntryId>,
    pub carried_by: Option<EntryId>,
}

impl DerivedEntry {
    pub fn is_filler(&self) -> bool {
        self.weight > 0
    }

    pub fn is_carried(&self) -> bool {
        self.carried_by.is_some()
    }

    /// Named spawn point family, for entries that pick one via spawn type.
    pub fn spawn_location(&self) -> Option<SpawnLocation> {
        match self.category {
            Category::Main | Category::Decorative => {
                self.spawn_type.and_then(SpawnLocation::from_spawn_type)
            }
            _ => None,
        }
    }
}

/// Running `minAmount` and `weight` sums over one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryTotals {
    pub min_total: u32,
    pub weights_sum: u32,
}

/// Per-category totals of a sublevel, filled once by the derivation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Aggregates {
    pub main: CategoryTotals,
    pub treasure: CategoryTotals,
    pub gate: CategoryTotals,
    pub dead_end: CategoryTotals,
}

impl Aggregates {
    pub fn get(&self, category: Category) -> Option<&CategoryTotals> {
        match category {
            Category::Main => Some(&self.main),
            Category::Treasure => Some(&self.treasure),
            Category::Gate => Some(&self.gate),
            Category::DeadEnd => Some(&self.dead_end),
            Category::Decorative => None,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> Option<&mut CategoryTotals> {
        match category {
            Category::Main => Some(&mut self.main),
            Category::Treasure => Some(&mut self.treasure),
            Category::Gate => Some(&mut self.gate),
            Category::DeadEnd => Some(&mut self.dead_end),
            Category::Decorative => None,
        }
    }
}

/// Upper bound on how many objects of a class can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MaxSpawns {
    Finite(u32),
    /// Depends on how many dead ends the generator produces.
    Indeterminate,
}

impl MaxSpawns {
    pub const fn finite(self) -> Option<u32> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Indeterminate => None,
        }
    }
}

impl std::fmt::Display for MaxSpawns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Indeterminate => f.write_str("?"),
        }
    }
}
