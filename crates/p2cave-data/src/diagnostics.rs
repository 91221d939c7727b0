//! Non-fatal anomalies found while analyzing a sublevel.

use std::fmt;

use p2cave_types::{Category, EntryId, ObjectKind};

use crate::derivation::{MititeSource, SublevelAnalysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// A layout that consumers cannot present automatically.
    Unsupported,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unsupported => "unsupported",
            Self::Note => "note",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    UnknownClass { id: EntryId, class: String },
    GateWithoutWeight { id: EntryId },
    GateWithMinimum { id: EntryId, min_amount: u32 },
    NoMinimumObjects,
    NoFillerRoom { category: Category },
    FillerRoomWithoutWeights { category: Category },
    MinimumsExceedIdealMax {
        category: Category,
        min_total: u32,
        ideal_max: u32,
    },
    GatesWithoutIdealMax { count: usize },
    MixedCarrying { class: String },
    TreasureNeverSpawns { class: String },
    TreasureInWeightedCarrier { class: String, carrier: String },
    IndeterminateMaximum { class: String },
    UnknownSpawnType { id: EntryId, spawn_type: i32 },
    MultipleMititeSources { sources: Vec<MititeSource> },
}

impl Anomaly {
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnknownClass { .. }
            | Self::GateWithoutWeight { .. }
            | Self::GateWithMinimum { .. }
            | Self::NoMinimumObjects
            | Self::MixedCarrying { .. }
            | Self::TreasureNeverSpawns { .. }
            | Self::TreasureInWeightedCarrier { .. }
            | Self::MultipleMititeSources { .. } => Severity::Unsupported,
            Self::NoFillerRoom { .. }
            | Self::FillerRoomWithoutWeights { .. }
            | Self::MinimumsExceedIdealMax { .. }
            | Self::GatesWithoutIdealMax { .. }
            | Self::IndeterminateMaximum { .. }
            | Self::UnknownSpawnType { .. } => Severity::Note,
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownClass { id, class } => write!(f, "entry {id}: unknown class `{class}`"),
            Self::GateWithoutWeight { id } => write!(f, "entry {id}: gate with 0 weight"),
            Self::GateWithMinimum { id, min_amount } => {
                write!(f, "entry {id}: gate with min amount {min_amount}")
            }
            Self::NoMinimumObjects => f.write_str("no main or treasure objects are guaranteed"),
            Self::NoFillerRoom { category } => write!(
                f,
                "no filler room in the {category} category, but some {category} entries have weight"
            ),
            Self::FillerRoomWithoutWeights { category } => write!(
                f,
                "filler room in the {category} category, but no {category} entries have weight"
            ),
            Self::MinimumsExceedIdealMax {
                category,
                min_total,
                ideal_max,
            } => write!(
                f,
                "{min_total} minimum {category} objects exceed the ideal max of {ideal_max}"
            ),
            Self::GatesWithoutIdealMax { count } => {
                write!(f, "{count} gates found, but the gate ideal max is 0")
            }
            Self::MixedCarrying { class } => {
                write!(f, "treasure `{class}` has mixed carrying information")
            }
            Self::TreasureNeverSpawns { class } => write!(f, "treasure `{class}` spawns 0 times"),
            Self::TreasureInWeightedCarrier { class, carrier } => write!(
                f,
                "treasure `{class}` is inside `{carrier}`, which has weight"
            ),
            Self::IndeterminateMaximum { class } => write!(
                f,
                "`{class}` has dead-end weight; its maximum depends on generated dead ends"
            ),
            Self::UnknownSpawnType { id, spawn_type } => {
                write!(f, "entry {id}: spawn type {spawn_type} has no known location")
            }
            Self::MultipleMititeSources { sources } => {
                f.write_str("Mitites come from several sources (")?;
                for (i, source) in sources.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(source.class())?;
                }
                f.write_str("); their number cannot be worked out")
            }
        }
    }
}

/// An anomaly tagged with its 1-based sublevel number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub sublevel: usize,
    pub anomaly: Anomaly,
}

impl Diagnostic {
    pub const fn severity(&self) -> Severity {
        self.anomaly.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sublevel {}: {}: {}",
            self.sublevel,
            self.severity(),
            self.anomaly
        )
    }
}

/// Every anomaly on one analyzed sublevel, in a stable order.
pub fn check_sublevel(analysis: &SublevelAnalysis) -> Vec<Anomaly> {
    let mut found = Vec::new();

    for &id in &analysis.unresolved {
        if let Some(entry) = analysis.entry(id) {
            found.push(Anomaly::UnknownClass {
                id,
                class: entry.class.clone(),
            });
        }
    }

    for entry in analysis.entries_in(Category::Gate) {
        if entry.weight == 0 {
            found.push(Anomaly::GateWithoutWeight { id: entry.id });
        }
        if entry.min_amount != 0 {
            found.push(Anomaly::GateWithMinimum {
                id: entry.id,
                min_amount: entry.min_amount,
            });
        }
    }

    let totals = &analysis.aggregates;
    if totals.main.min_total == 0 && totals.treasure.min_total == 0 {
        found.push(Anomaly::NoMinimumObjects);
    }

    for category in Category::CAPPED {
        let (Some(ideal_max), Some(sums)) =
            (analysis.ideal_max(category), totals.get(category))
        else {
            continue;
        };
        if sums.min_total >= ideal_max && sums.weights_sum > 0 {
            found.push(Anomaly::NoFillerRoom { category });
        }
        if sums.min_total < ideal_max && sums.weights_sum == 0 {
            found.push(Anomaly::FillerRoomWithoutWeights { category });
        }
        if sums.min_total > ideal_max {
            found.push(Anomaly::MinimumsExceedIdealMax {
                category,
                min_total: sums.min_total,
                ideal_max,
            });
        }
    }

    let gates = analysis.entries_in(Category::Gate).count();
    if gates > 0 && analysis.ideal_max(Category::Gate) == Some(0) {
        found.push(Anomaly::GatesWithoutIdealMax { count: gates });
    }

    for class in analysis.classes_of_kind(ObjectKind::Treasure) {
        if analysis.has_mixed_carrying(class) {
            found.push(Anomaly::MixedCarrying {
                class: class.to_string(),
            });
        }
        if analysis.min_spawns(class) == 0 {
            found.push(Anomaly::TreasureNeverSpawns {
                class: class.to_string(),
            });
        }
        let weighted_carrier = analysis
            .entries_of_class(class)
            .filter_map(|e| analysis.carrier_of(e.id))
            .find(|carrier| carrier.is_filler());
        if let Some(carrier) = weighted_carrier {
            found.push(Anomaly::TreasureInWeightedCarrier {
                class: class.to_string(),
                carrier: carrier.class.clone(),
            });
        }
    }

    for class in analysis.classes() {
        if analysis
            .entries_of_class(class)
            .any(|e| e.category == Category::DeadEnd && e.is_filler())
        {
            found.push(Anomaly::IndeterminateMaximum {
                class: class.to_string(),
            });
        }
    }

    for entry in &analysis.entries {
        if !matches!(entry.category, Category::Main | Category::Decorative) {
            continue;
        }
        if let (Some(spawn_type), None) = (entry.spawn_type, entry.spawn_location()) {
            found.push(Anomaly::UnknownSpawnType {
                id: entry.id,
                spawn_type,
            });
        }
    }

    let sources = analysis.mitite_sources();
    if sources.len() > 1 {
        found.push(Anomaly::MultipleMititeSources { sources });
    }

    found
}

#[cfg(test)]
mod tests {
    use p2cave_types::{RawGateEntry, RawObjectEntry, Sublevel, SublevelInfo};

    use super::*;
    use crate::catalog::Catalog;
    use crate::derivation::derive_sublevel;

    fn raw(class: &str, min_amount: u32, weight: u32, spawn_type: Option<i32>) -> RawObjectEntry {
        RawObjectEntry {
            class: class.into(),
            min_amount,
            weight,
            spawn_type,
            ..Default::default()
        }
    }

    fn check(sublevel: &Sublevel) -> Vec<Anomaly> {
        check_sublevel(&derive_sublevel(1, sublevel, &Catalog::builtin()))
    }

    fn info(main: u32, treasure: u32, gate: u32) -> SublevelInfo {
        SublevelInfo {
            main_ideal_max: Some(main),
            treasure_ideal_max: Some(treasure),
            gate_ideal_max: Some(gate),
            ..Default::default()
        }
    }

    #[test]
    fn gate_without_weight_and_with_minimum() {
        let sublevel = Sublevel {
            info: info(4, 1, 1),
            teki: vec![raw("Kochappy", 3, 1, Some(0))],
            items: vec![raw("bane", 1, 0, None)],
            gates: vec![RawGateEntry {
                keyword: "gate".into(),
                health: 300.0,
                min_amount: 2,
                weight: 0,
            }],
            ..Default::default()
        };
        let found = check(&sublevel);
        assert!(found.contains(&Anomaly::GateWithoutWeight { id: EntryId(3) }));
        assert!(found.contains(&Anomaly::GateWithMinimum {
            id: EntryId(3),
            min_amount: 2
        }));
        assert!(found.contains(&Anomaly::MinimumsExceedIdealMax {
            category: Category::Gate,
            min_total: 2,
            ideal_max: 1
        }));
        assert!(
            found
                .iter()
                .filter(|a| matches!(a, Anomaly::GateWithoutWeight { .. } | Anomaly::GateWithMinimum { .. }))
                .all(|a| a.severity() == Severity::Unsupported)
        );
    }

    #[test]
    fn empty_sublevel_has_no_minimums() {
        let found = check(&Sublevel::default());
        assert_eq!(found, vec![Anomaly::NoMinimumObjects]);
    }

    #[test]
    fn filler_room_notes() {
        let sublevel = Sublevel {
            info: info(2, 5, 0),
            teki: vec![raw("Kochappy", 2, 1, Some(0))],
            items: vec![raw("bane", 1, 0, None)],
            ..Default::default()
        };
        let found = check(&sublevel);
        assert!(found.contains(&Anomaly::NoFillerRoom {
            category: Category::Main
        }));
        assert!(found.contains(&Anomaly::FillerRoomWithoutWeights {
            category: Category::Treasure
        }));
        assert!(!found.iter().any(|a| matches!(
            a,
            Anomaly::NoFillerRoom {
                category: Category::Gate
            } | Anomaly::FillerRoomWithoutWeights {
                category: Category::Gate
            }
        )));
    }

    #[test]
    fn gates_with_zero_ideal_max() {
        let sublevel = Sublevel {
            info: info(1, 0, 0),
            teki: vec![raw("Kochappy", 1, 0, Some(0))],
            gates: vec![RawGateEntry {
                keyword: "gate".into(),
                health: 300.0,
                min_amount: 0,
                weight: 5,
            }],
            ..Default::default()
        };
        let found = check(&sublevel);
        assert!(found.contains(&Anomaly::GatesWithoutIdealMax { count: 1 }));
        assert!(found.contains(&Anomaly::NoFillerRoom {
            category: Category::Gate
        }));
    }

    #[test]
    fn treasure_anomalies() {
        let mut carrier = raw("Chappy", 0, 4, Some(0));
        carrier.carrying = Some("ahiru".into());
        let sublevel = Sublevel {
            info: info(8, 2, 0),
            teki: vec![carrier],
            items: vec![raw("ahiru", 1, 0, None), raw("bane", 0, 0, None)],
            ..Default::default()
        };
        let found = check(&sublevel);
        assert!(found.contains(&Anomaly::MixedCarrying {
            class: "ahiru".into()
        }));
        assert!(found.contains(&Anomaly::TreasureNeverSpawns {
            class: "bane".into()
        }));
        assert!(found.contains(&Anomaly::TreasureInWeightedCarrier {
            class: "ahiru".into(),
            carrier: "Chappy".into()
        }));
    }

    #[test]
    fn unknown_class_and_spawn_type() {
        let sublevel = Sublevel {
            info: info(2, 0, 0),
            teki: vec![raw("Mystery", 1, 0, Some(3)), raw("Clover", 2, 0, Some(6))],
            caps: vec![raw("Kogane", 0, 1, Some(0))],
            ..Default::default()
        };
        let found = check(&sublevel);
        assert_eq!(
            found[0],
            Anomaly::UnknownClass {
                id: EntryId(1),
                class: "Mystery".into()
            }
        );
        assert!(found.contains(&Anomaly::UnknownSpawnType {
            id: EntryId(1),
            spawn_type: 3
        }));
        assert!(found.contains(&Anomaly::IndeterminateMaximum {
            class: "Kogane".into()
        }));
        // Cap spawn types pick among dead ends, not named locations.
        assert!(!found.contains(&Anomaly::UnknownSpawnType {
            id: EntryId(3),
            spawn_type: 0
        }));
    }

    #[test]
    fn several_mitite_sources() {
        let sublevel = Sublevel {
            info: info(6, 0, 0),
            teki: vec![
                raw("Egg", 2, 0, Some(1)),
                raw("Qurione", 0, 2, Some(0)),
                raw("Kochappy", 1, 1, Some(0)),
            ],
            ..Default::default()
        };
        let found = check(&sublevel);
        let anomaly = Anomaly::MultipleMititeSources {
            sources: vec![MititeSource::Eggs, MititeSource::Honeywisps],
        };
        assert!(found.contains(&anomaly), "{found:?}");
        assert_eq!(anomaly.severity(), Severity::Unsupported);
        assert_eq!(
            anomaly.to_string(),
            "Mitites come from several sources (egg, qurione); their number cannot be worked out"
        );
    }

    #[test]
    fn single_mitite_source_is_fine() {
        let sublevel = Sublevel {
            info: info(4, 0, 0),
            teki: vec![raw("BigFoot", 1, 0, Some(0))],
            ..Default::default()
        };
        let found = check(&sublevel);
        assert!(
            !found
                .iter()
                .any(|a| matches!(a, Anomaly::MultipleMititeSources { .. }))
        );
    }

    #[test]
    fn diagnostic_display() {
        let diagnostic = Diagnostic {
            sublevel: 3,
            anomaly: Anomaly::GatesWithoutIdealMax { count: 2 },
        };
        assert_eq!(
            diagnostic.to_string(),
            "sublevel 3: note: 2 gates found, but the gate ideal max is 0"
        );
    }
}
