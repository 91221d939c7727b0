//! Turns a parsed sublevel into a flat, cross-referenced entry list and
//! answers spawn-count questions about it.
//!
//! The pass runs in a fixed order: materialize file entries, resolve
//! file-declared carrying, add intrinsic cargo, then sum per-category totals.
//! Entry ids are assigned in that same order, so a carried entry always has
//! a larger id than its carrier.

use p2cave_types::{
    Aggregates, Cave, Category, DerivedEntry, EntryId, EntrySource, MaxSpawns, ObjectInfo,
    ObjectKind, RawObjectEntry, SpawnLocation, Sublevel, SublevelInfo,
};

use crate::catalog::ObjectLookup;
use crate::diagnostics::{self, Diagnostic};

/// Derived view of one sublevel.
#[derive(Debug, Clone, PartialEq)]
pub struct SublevelAnalysis {
    /// 1-based sublevel number.
    pub number: usize,
    pub info: SublevelInfo,
    pub entries: Vec<DerivedEntry>,
    pub aggregates: Aggregates,
    /// Entries whose class is missing from the catalog.
    pub unresolved: Vec<EntryId>,
}

/// Accumulates entries while keeping ids contiguous.
struct EntryBuilder<'l, L: ObjectLookup + ?Sized> {
    lookup: &'l L,
    number: usize,
    entries: Vec<DerivedEntry>,
    unresolved: Vec<EntryId>,
}

impl<'l, L: ObjectLookup + ?Sized> EntryBuilder<'l, L> {
    fn next_id(&self) -> EntryId {
        EntryId(self.entries.len() as u32 + 1)
    }

    fn push(&mut self, class: &str, category: Category, source: EntrySource) -> &mut DerivedEntry {
        let id = self.next_id();
        let lookup = self.lookup;
        let info = match lookup.resolve(class) {
            Some(info) => info.clone(),
            None => {
                log::warn!(
                    "sublevel {}: entry {id}: unknown class `{class}`",
                    self.number
                );
                self.unresolved.push(id);
                ObjectInfo::placeholder(class)
            }
        };
        self.entries.push(DerivedEntry {
            id,
            class: class.to_string(),
            category,
            source,
            info,
            spawn_method: None,
            min_amount: 0,
            weight: 0,
            spawn_type: None,
            cap_type: None,
            gate_health: None,
            carrying: None,
            carried_by: None,
        });
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    fn push_raw(&mut self, raw: &RawObjectEntry, category: Category, source: EntrySource) -> EntryId {
        let entry = self.push(&raw.class, category, source);
        entry.spawn_method = raw.spawn_method;
        entry.min_amount = raw.min_amount;
        entry.weight = raw.weight;
        entry.spawn_type = raw.spawn_type;
        entry.cap_type = raw.cap_type;
        entry.id
    }

    fn get_mut(&mut self, id: EntryId) -> Option<&mut DerivedEntry> {
        self.entries.get_mut(id.index()?)
    }

    /// Add an entry for `class` held inside `carrier`.
    fn push_carried(
        &mut self,
        carrier: EntryId,
        class: &str,
        source: EntrySource,
    ) -> Option<EntryId> {
        let parent = self.get_mut(carrier)?;
        let (parent_category, min_amount) = (parent.category, parent.min_amount);
        let entry = self.push(class, parent_category, source);
        if entry.info.kind == ObjectKind::Treasure {
            entry.category = Category::Treasure;
        }
        entry.min_amount = min_amount;
        entry.carried_by = Some(carrier);
        Some(entry.id)
    }
}

/// Run the derivation pass over one parsed sublevel.
pub fn derive_sublevel<L>(number: usize, sublevel: &Sublevel, lookup: &L) -> SublevelAnalysis
where
    L: ObjectLookup + ?Sized,
{
    let mut builder = EntryBuilder {
        lookup,
        number,
        entries: Vec::new(),
        unresolved: Vec::new(),
    };
    let mut declared: Vec<(EntryId, &str)> = Vec::new();

    for raw in &sublevel.teki {
        let category = if raw.spawn_type == Some(SpawnLocation::PLANT_SPAWN_TYPE) {
            Category::Decorative
        } else {
            Category::Main
        };
        let id = builder.push_raw(raw, category, EntrySource::Teki);
        if let Some(carried) = &raw.carrying {
            declared.push((id, carried.as_str()));
        }
    }
    for raw in &sublevel.items {
        builder.push_raw(raw, Category::Treasure, EntrySource::Item);
    }
    for raw in &sublevel.gates {
        let entry = builder.push(&raw.keyword, Category::Gate, EntrySource::Gate);
        entry.min_amount = raw.min_amount;
        entry.weight = raw.weight;
        entry.gate_health = Some(raw.health);
    }
    for raw in &sublevel.caps {
        let id = builder.push_raw(raw, Category::DeadEnd, EntrySource::Cap);
        if let Some(carried) = &raw.carrying {
            declared.push((id, carried.as_str()));
        }
    }
    let file_entries = builder.entries.len();

    for (carrier, class) in declared {
        let child = builder.push_carried(carrier, class, EntrySource::Carried);
        if let Some(parent) = builder.get_mut(carrier) {
            parent.carrying = child;
        }
    }

    for index in 0..file_entries {
        let carrier = builder.entries[index].id;
        let cargo = builder.entries[index].info.cargo.clone();
        for class in &cargo {
            builder.push_carried(carrier, class, EntrySource::Cargo);
        }
    }

    let mut aggregates = Aggregates::default();
    for entry in &builder.entries {
        if let Some(totals) = aggregates.get_mut(entry.category) {
            totals.min_total = totals.min_total.saturating_add(entry.min_amount);
            totals.weights_sum = totals.weights_sum.saturating_add(entry.weight);
        }
    }
    log::debug!(
        "sublevel {number}: {} entries, main {}/{}, treasure {}/{}, gate {}/{}, dead end {}/{}",
        builder.entries.len(),
        aggregates.main.min_total,
        aggregates.main.weights_sum,
        aggregates.treasure.min_total,
        aggregates.treasure.weights_sum,
        aggregates.gate.min_total,
        aggregates.gate.weights_sum,
        aggregates.dead_end.min_total,
        aggregates.dead_end.weights_sum,
    );

    SublevelAnalysis {
        number,
        info: sublevel.info.clone(),
        entries: builder.entries,
        aggregates,
        unresolved: builder.unresolved,
    }
}

impl SublevelAnalysis {
    pub fn entry(&self, id: EntryId) -> Option<&DerivedEntry> {
        self.entries.get(id.index()?)
    }

    /// Entries of `class`, matched case-insensitively.
    pub fn entries_of_class<'s>(&'s self, class: &'s str) -> impl Iterator<Item = &'s DerivedEntry> {
        self.entries
            .iter()
            .filter(move |e| e.class.eq_ignore_ascii_case(class))
    }

    pub fn entries_in(&self, category: Category) -> impl Iterator<Item = &DerivedEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Entries competing for the category's free slots.
    pub fn filler_entries(&self, category: Category) -> impl Iterator<Item = &DerivedEntry> {
        self.entries_in(category).filter(|e| e.is_filler())
    }

    /// Ideal max of a capped category; an unset parameter counts as 0.
    pub fn ideal_max(&self, category: Category) -> Option<u32> {
        category
            .has_ideal_max()
            .then(|| self.info.ideal_max(category).unwrap_or(0))
    }

    /// Slots left for weighted picks once every minimum is placed.
    pub fn filler_slots(&self, category: Category) -> Option<u32> {
        let ideal = self.ideal_max(category)?;
        let totals = self.aggregates.get(category)?;
        Some(ideal.saturating_sub(totals.min_total))
    }

    /// Percentage chance that a filler pick lands on this entry.
    pub fn filler_chance(&self, id: EntryId) -> Option<f64> {
        let entry = self.entry(id)?;
        let totals = self.aggregates.get(entry.category)?;
        if totals.weights_sum == 0 {
            return None;
        }
        Some(f64::from(entry.weight) * 100.0 / f64::from(totals.weights_sum))
    }

    /// True when every weighted entry of `category` is of `class`.
    pub fn is_sole_filler(&self, category: Category, class: &str) -> bool {
        let mut fillers = self.filler_entries(category).peekable();
        fillers.peek().is_some() && fillers.all(|e| e.class.eq_ignore_ascii_case(class))
    }

    /// Guaranteed number of `class` objects on this sublevel.
    pub fn min_spawns(&self, class: &str) -> u32 {
        let explicit = saturating_sum(self.entries_of_class(class).map(|e| e.min_amount));
        let sole_filler = saturating_sum(
            Category::CAPPED
                .into_iter()
                .filter(|&category| self.is_sole_filler(category, class))
                .filter_map(|category| self.filler_slots(category)),
        );
        explicit.saturating_add(sole_filler)
    }

    /// Most `class` objects that can spawn on this sublevel.
    pub fn max_spawns(&self, class: &str) -> MaxSpawns {
        if self
            .entries_of_class(class)
            .any(|e| e.category == Category::DeadEnd && e.is_filler())
        {
            return MaxSpawns::Indeterminate;
        }

        let deterministic = saturating_sum(self.entries_of_class(class).map(|e| e.min_amount));
        let mut with_filler: u32 = 0;
        for category in [
            Category::Main,
            Category::Decorative,
            Category::Treasure,
            Category::Gate,
            Category::DeadEnd,
        ] {
            let own: Vec<&DerivedEntry> = self
                .entries_of_class(class)
                .filter(|e| e.category == category)
                .collect();
            let own_min = saturating_sum(own.iter().map(|e| e.min_amount));
            let weighted = own.iter().any(|e| e.is_filler());
            let bound = match (weighted, self.ideal_max(category), self.aggregates.get(category)) {
                (true, Some(ideal), Some(totals)) => {
                    ideal.saturating_sub(totals.min_total.saturating_sub(own_min))
                }
                _ => own_min,
            };
            with_filler = with_filler.saturating_add(bound);
        }
        MaxSpawns::Finite(deterministic.max(with_filler))
    }

    /// True when `class` entries disagree on what carries them: different
    /// carrier classes, or some carried and some loose.
    pub fn has_mixed_carrying(&self, class: &str) -> bool {
        let mut parents = self.entries_of_class(class).map(|e| {
            self.carrier_of(e.id)
                .map(|carrier| carrier.class.to_ascii_lowercase())
        });
        match parents.next() {
            Some(first) => parents.any(|p| p != first),
            None => false,
        }
    }

    pub fn carrier_of(&self, id: EntryId) -> Option<&DerivedEntry> {
        self.entry(id)?.carried_by.and_then(|c| self.entry(c))
    }

    /// Distinct classes in first-appearance order.
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !classes.iter().any(|c| c.eq_ignore_ascii_case(&entry.class)) {
                classes.push(&entry.class);
            }
        }
        classes
    }

    /// Distinct classes whose catalog kind is `kind`.
    pub fn classes_of_kind(&self, kind: ObjectKind) -> Vec<&str> {
        self.classes()
            .into_iter()
            .filter(|class| {
                self.entries_of_class(class)
                    .next()
                    .is_some_and(|e| e.info.kind == kind)
            })
            .collect()
    }

    /// Mitite sources present on this sublevel, in [`MititeSource::ALL`] order.
    pub fn mitite_sources(&self) -> Vec<MititeSource> {
        MititeSource::ALL
            .into_iter()
            .filter(|source| self.entries_of_class(source.class()).next().is_some())
            .collect()
    }

    /// Most Mitite groups the last present source can release. Only
    /// meaningful when there is a single source.
    pub fn max_mitites(&self) -> Option<(MititeSource, MaxSpawns)> {
        let source = self.mitite_sources().pop()?;
        let max = match self.max_spawns(source.class()) {
            MaxSpawns::Finite(n) => MaxSpawns::Finite(n.saturating_mul(source.groups_per_object())),
            MaxSpawns::Indeterminate => MaxSpawns::Indeterminate,
        };
        Some((source, max))
    }
}

/// Objects that release Mitite groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MititeSource {
    Eggs,
    Honeywisps,
    RagingLongLegs,
}

impl MititeSource {
    pub const ALL: [Self; 3] = [Self::Eggs, Self::Honeywisps, Self::RagingLongLegs];

    pub const fn class(self) -> &'static str {
        match self {
            Self::Eggs => "egg",
            Self::Honeywisps => "qurione",
            Self::RagingLongLegs => "bigfoot",
        }
    }

    pub const fn groups_per_object(self) -> u32 {
        match self {
            Self::RagingLongLegs => 3,
            Self::Eggs | Self::Honeywisps => 1,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Eggs => "from eggs",
            Self::Honeywisps => "from Honeywisps",
            Self::RagingLongLegs => "inside the Raging Long Legs",
        }
    }
}

fn saturating_sum(values: impl IntoIterator<Item = u32>) -> u32 {
    values.into_iter().fold(0, u32::saturating_add)
}

/// Every sublevel's analysis plus the anomalies found along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct CaveAnalysis {
    pub sublevels: Vec<SublevelAnalysis>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn analyze_cave<L>(cave: &Cave, lookup: &L) -> CaveAnalysis
where
    L: ObjectLookup + ?Sized,
{
    let mut sublevels = Vec::with_capacity(cave.sublevels.len());
    let mut diagnostics = Vec::new();
    for (index, sublevel) in cave.sublevels.iter().enumerate() {
        let analysis = derive_sublevel(index + 1, sublevel, lookup);
        diagnostics.extend(
            diagnostics::check_sublevel(&analysis)
                .into_iter()
                .map(|anomaly| Diagnostic {
                    sublevel: analysis.number,
                    anomaly,
                }),
        );
        sublevels.push(analysis);
    }
    CaveAnalysis {
        sublevels,
        diagnostics,
    }
}
