use serde::Serialize;
use strum::FromRepr;

use crate::category::Category;
use crate::spawn::SpawnMethod;

/// A whole cave file: one entry per sublevel declared by `{c000}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Cave {
    pub sublevels: Vec<Sublevel>,
}

/// One sublevel as read from the file, with values kept close to verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Sublevel {
    pub info: SublevelInfo,
    /// `TekiInfo` entries.
    pub teki: Vec<RawObjectEntry>,
    /// `ItemInfo` entries.
    pub items: Vec<RawObjectEntry>,
    /// `GateInfo` entries.
    pub gates: Vec<RawGateEntry>,
    /// `CapInfo` entries.
    pub caps: Vec<RawObjectEntry>,
}

/// `FloorInfo` parameters. Every field stays `None` until its tag is read.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SublevelInfo {
    /// `{f000}`: seems to always be the zero-based sublevel number.
    pub sublevel_number_f000: Option<i32>,
    /// `{f001}`: same as `{f000}`.
    pub sublevel_number_f001: Option<i32>,
    /// `{f002}`
    pub main_ideal_max: Option<u32>,
    /// `{f003}`
    pub treasure_ideal_max: Option<u32>,
    /// `{f004}`
    pub gate_ideal_max: Option<u32>,
    /// `{f005}`: number of room cave units.
    pub room_units: Option<i32>,
    /// `{f006}`
    pub corridor_room_ratio: Option<f32>,
    /// `{f007}`: whether the sublevel has an exit geyser.
    pub has_geyser: Option<bool>,
    /// `{f008}`
    pub unit_list_filename: Option<String>,
    /// `{f009}`
    pub lighting_filename: Option<String>,
    /// `{f00A}`
    pub skybox: Option<String>,
    /// `{f010}`: whether the hole to the next sublevel is clogged.
    pub has_clog: Option<bool>,
    /// `{f011}`: meaning unknown, kept as text.
    pub unknown_f011: Option<String>,
    /// `{f012}`, see [`MusicType`].
    pub music_type: Option<i32>,
    /// `{f013}`: whether there is an invisible floor plane under the map.
    pub has_floor: Option<bool>,
    /// `{f014}`: 0-100 chance of an open doorway becoming a dead end.
    pub dead_end_chance: Option<i32>,
    /// `{f015}`: file format version. With 0 the game ignores `CapInfo`.
    pub file_format: Option<i32>,
    /// `{f016}`: seconds until the Waterwraith appears.
    pub waterwraith_time: Option<f32>,
    /// `{f017}`: unused by the game.
    pub has_seesaw_blocks: Option<bool>,
}

impl SublevelInfo {
    /// Ideal max for a capped category; `None` for uncapped categories or when
    /// the file never set the parameter.
    pub fn ideal_max(&self, category: Category) -> Option<u32> {
        match category {
            Category::Main => self.main_ideal_max,
            Category::Treasure => self.treasure_ideal_max,
            Category::Gate => self.gate_ideal_max,
            Category::Decorative | Category::DeadEnd => None,
        }
    }

    pub fn music(&self) -> Option<MusicType> {
        self.music_type
            .and_then(|m| u8::try_from(m).ok())
            .and_then(MusicType::from_repr)
    }
}

/// Background music selection from `{f012}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, FromRepr)]
#[repr(u8)]
pub enum MusicType {
    Normal = 0,
    Boss = 1,
    Rest = 2,
}

/// A `TekiInfo`, `ItemInfo` or `CapInfo` record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RawObjectEntry {
    /// Class name with the file's capitalization.
    pub class: String,
    /// Class of the object nested inside this one, if the name had one.
    pub carrying: Option<String>,
    pub spawn_method: Option<SpawnMethod>,
    pub min_amount: u32,
    pub weight: u32,
    /// Absent for `ItemInfo` records.
    pub spawn_type: Option<i32>,
    /// Only present for `CapInfo` records.
    pub cap_type: Option<i32>,
}

/// A `GateInfo` record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawGateEntry {
    /// Always `gate` in shipped data.
    pub keyword: String,
    pub health: f32,
    /// Ignored by the game.
    pub min_amount: u32,
    pub weight: u32,
}

/// Which game mode a cave file belongs to, inferred from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CaveKind {
    #[default]
    Story,
    Challenge,
    Battle,
}

impl CaveKind {
    /// `ch_*` files are challenge mode, `vs_*` files are 2-player battle.
    pub fn from_file_stem(stem: &str) -> Self {
        if stem.starts_with("ch_") {
            Self::Challenge
        } else if stem.starts_with("vs_") {
            Self::Battle
        } else {
            Self::Story
        }
    }
}
