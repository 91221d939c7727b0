//! Built-in table of internal class names found in cave files.
//!
//! Keys are lowercase; cave files capitalize teki names but not treasures.

use p2cave_types::{ObjectFlags, ObjectInfo, ObjectKind};

/// One class in the built-in table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRow {
    pub class: &'static str,
    pub display_name: &'static str,
    pub kind: ObjectKind,
    pub disambiguator: &'static str,
    pub flags: ObjectFlags,
    pub cargo: &'static [&'static str],
}

impl ObjectRow {
    const fn new(class: &'static str, display_name: &'static str, kind: ObjectKind) -> Self {
        Self {
            class,
            display_name,
            kind,
            disambiguator: "",
            flags: ObjectFlags::empty(),
            cargo: &[],
        }
    }

    const fn disambiguated(self, disambiguator: &'static str) -> Self {
        Self {
            disambiguator,
            ..self
        }
    }

    const fn flagged(self, flags: ObjectFlags) -> Self {
        Self { flags, ..self }
    }

    const fn holding(self, cargo: &'static [&'static str]) -> Self {
        Self { cargo, ..self }
    }

    pub fn info(&self) -> ObjectInfo {
        ObjectInfo {
            display_name: self.display_name.to_string(),
            kind: self.kind,
            disambiguator: self.disambiguator.to_string(),
            flags: self.flags,
            cargo: self.cargo.iter().map(|c| c.to_string()).collect(),
        }
    }
}

const fn enemy(class: &'static str, name: &'static str) -> ObjectRow {
    ObjectRow::new(class, name, ObjectKind::Enemy)
}

const fn treasure(class: &'static str, name: &'static str) -> ObjectRow {
    ObjectRow::new(class, name, ObjectKind::Treasure)
}

const fn obstacle(class: &'static str, name: &'static str) -> ObjectRow {
    ObjectRow::new(class, name, ObjectKind::Obstacle)
}

const fn plant(class: &'static str, name: &'static str) -> ObjectRow {
    ObjectRow::new(class, name, ObjectKind::Plant)
}

const fn other(class: &'static str, name: &'static str) -> ObjectRow {
    ObjectRow::new(class, name, ObjectKind::Other)
}

const PARTIAL: ObjectFlags = ObjectFlags::PARTIALLY_BURIED;
const FULL: ObjectFlags = ObjectFlags::FULLY_BURIED;
const REGIONAL: ObjectFlags = ObjectFlags::REGIONAL;

/// Weapons the Titan Dweevil always carries.
pub const TITAN_DWEEVIL_CARGO: &[&str] = &["gas", "elec", "water", "fire", "loozy"];

pub static OBJECTS: &[ObjectRow] = &[
    // Enemies
    enemy("kochappy", "Dwarf Red Bulborb"),
    enemy("chappy", "Red Bulborb"),
    enemy("bluechappy", "Orange Bulborb"),
    enemy("yellowchappy", "Hairy Bulborb"),
    enemy("bluekochappy", "Dwarf Orange Bulborb"),
    enemy("yellowkochappy", "Snow Bulborb"),
    enemy("kumachappy", "Spotty Bulbear"),
    enemy("kumakochappy", "Dwarf Bulbear"),
    enemy("firechappy", "Fiery Bulblax"),
    enemy("baby", "Bulborb Larva"),
    enemy("kingchappy", "Emperor Bulblax"),
    enemy("queen", "Empress Bulblax"),
    enemy("tobi", "Shearwig"),
    enemy("ujia", "Female Sheargrub"),
    enemy("ujib", "Male Sheargrub"),
    enemy("armor", "Cloaking Burrow-nit"),
    enemy("fart", "Doodlebug"),
    enemy("tank", "Fiery Blowhog"),
    enemy("wtank", "Watery Blowhog"),
    enemy("mar", "Puffy Blowhog"),
    enemy("hanachirashi", "Withering Blowhog"),
    enemy("frog", "Yellow Wollyhop"),
    enemy("marofrog", "Wollywog"),
    enemy("tadpole", "Wogpole"),
    enemy("catfish", "Water Dumple"),
    enemy("kogane", "Iridescent Flint Beetle"),
    enemy("wealthy", "Iridescent Glint Beetle"),
    enemy("elecbug", "Anode Beetle"),
    enemy("fuefuki", "Antenna Beetle"),
    enemy("kabuto", "Armored Cannon Beetle Larva"),
    enemy("rkabuto", "Decorated Cannon Beetle"),
    enemy("dangomushi", "Segmented Crawbster"),
    enemy("qurione", "Honeywisp"),
    enemy("shijimichou", "Unmarked Spectralids"),
    enemy("sarai", "Swooping Snitchbug"),
    enemy("demon", "Bumbling Snitchbug"),
    enemy("sokkuri", "Skitter Leaf"),
    enemy("hana", "Creeping Chrysanthemum"),
    enemy("kurage", "Lesser Spotted Jellyfloat"),
    enemy("onikurage", "Greater Spotted Jellyfloat"),
    enemy("miulin", "Mamuta"),
    enemy("jigumo", "Arachnode"),
    enemy("imomushi", "Ravenous Whiskerpillar"),
    enemy("panmodoki", "Breadbug"),
    enemy("oopanmodoki", "Giant Breadbug"),
    enemy("tamagomushi", "Mitite"),
    enemy("snakecrow", "Burrowing Snagret"),
    enemy("snakewhole", "Pileated Snagret"),
    enemy("umimushi", "Ranging Bloyster"),
    enemy("fireotakara", "Fiery Dweevil"),
    enemy("waterotakara", "Hydro Dweevil"),
    enemy("gasotakara", "Munge Dweevil"),
    enemy("elecotakara", "Anode Dweevil"),
    enemy("bombotakara", "Volatile Dweevil"),
    enemy("minihoudai", "Gatling Groink"),
    enemy("damagumo", "Beady Long Legs"),
    enemy("bigfoot", "Raging Long Legs"),
    enemy("houdai", "Man-at-Legs"),
    enemy("blackman", "Waterwraith"),
    enemy("bigtreasure", "Titan Dweevil").holding(TITAN_DWEEVIL_CARGO),
    // Obstacles
    obstacle("rock", "Falling boulder"),
    obstacle("bomb", "Bomb-rock").disambiguated("cave"),
    obstacle("hiba", "Fire geyser"),
    obstacle("gashiba", "Gas pipe"),
    obstacle("elechiba", "Electrical wire"),
    // Plants
    plant("clover", "Clover"),
    plant("ooinu_s", "Figwort").disambiguated("small"),
    plant("ooinu_l", "Figwort").disambiguated("large"),
    plant("tanpopo", "Dandelion"),
    plant("watage", "Seeding Dandelion"),
    plant("tukushi", "Horsetail"),
    plant("zenmai", "Fiddlehead"),
    plant("magaret", "Margaret"),
    plant("hikarikinoko", "Glowcap"),
    // Other
    other("egg", "Egg"),
    other("pelplant", "Pellet Posy"),
    other("kinokochappy", "Bulborb mushroom"),
    // Treasures
    treasure("ahiru", "Dream Material"),
    treasure("kinoko_doku", "Toxic Toadstool").flagged(PARTIAL),
    treasure("bane", "Spouse Alert").flagged(FULL),
    treasure("drink_cap_a", "Drone Supplies").flagged(REGIONAL),
    treasure("gas", "Comedy Bomb"),
    treasure("elec", "Shock Therapist"),
    treasure("water", "Monster Pump"),
    treasure("fire", "Flare Cannon"),
    treasure("loozy", "Justice Alloy"),
    // Gates
    ObjectRow::new("gate", "Gate", ObjectKind::Gate),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn classes_are_unique_and_lowercase() {
        let mut seen = HashSet::new();
        for row in OBJECTS {
            assert_eq!(row.class, row.class.to_ascii_lowercase(), "{}", row.class);
            assert!(seen.insert(row.class), "duplicate class {}", row.class);
            assert!(!row.display_name.is_empty(), "{} has no name", row.class);
        }
    }

    #[test]
    fn shared_names_are_disambiguated() {
        let rows: Vec<_> = OBJECTS
            .iter()
            .filter(|row| row.display_name == "Figwort")
            .collect();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].disambiguator, rows[1].disambiguator);
    }

    #[test]
    fn cargo_classes_are_treasures() {
        for row in OBJECTS.iter().filter(|row| !row.cargo.is_empty()) {
            for class in row.cargo {
                let cargo = OBJECTS
                    .iter()
                    .find(|r| r.class == *class)
                    .unwrap_or_else(|| panic!("{} holds unknown {class}", row.class));
                assert_eq!(cargo.kind, ObjectKind::Treasure, "{class}");
            }
        }
    }

    #[test]
    fn row_info_copies_everything() {
        let row = treasure("kinoko_doku", "Toxic Toadstool").flagged(PARTIAL);
        let info = row.info();
        assert_eq!(info.display_name, "Toxic Toadstool");
        assert_eq!(info.kind, ObjectKind::Treasure);
        assert_eq!(info.flags, ObjectFlags::PARTIALLY_BURIED);
        assert!(info.cargo.is_empty());
    }
}
