use serde::Serialize;
use strum::{EnumCount, EnumIter, FromRepr};

/// Non-default spawn trigger from a `$`/`$N` class prefix.
///
/// `Bare` is a `$` with no digit; the game treats it like `$1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum SpawnMethod {
    Bare = 0,
    FromSky = 1,
    NearPikmin = 2,
    NearLeaders = 3,
    NearCarrying = 4,
    NearPurpleAction = 5,
}

impl SpawnMethod {
    /// Digit that follows the `$`, if any.
    pub const fn code(self) -> Option<u8> {
        match self {
            Self::Bare => None,
            other => Some(other as u8),
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Bare | Self::FromSky => "Falls from the sky",
            Self::NearPikmin => "Falls when Pikmin are nearby",
            Self::NearLeaders => "Falls when leaders are nearby",
            Self::NearCarrying => "Falls when Pikmin are carrying nearby",
            Self::NearPurpleAction => "Falls if a Purple Pikmin pounds nearby",
        }
    }
}

/// Spawn point family selected by a teki entry's spawn type number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum SpawnLocation {
    EasyEnemy = 0,
    HardEnemy = 1,
    Treasure = 2,
    HoleOrGeyser = 4,
    UnitSeam = 5,
    Plant = 6,
    LeaderSpawn = 7,
    SpecialEnemy = 8,
}

impl SpawnLocation {
    /// Spawn type that marks a teki entry as decoration rather than main.
    pub const PLANT_SPAWN_TYPE: i32 = Self::Plant as i32;

    pub fn from_spawn_type(spawn_type: i32) -> Option<Self> {
        u8::try_from(spawn_type).ok().and_then(Self::from_repr)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::EasyEnemy => "\"Easy\" enemy spots",
            Self::HardEnemy => "\"Hard\" enemy spots",
            Self::Treasure => "Treasure spots",
            Self::HoleOrGeyser => "Hole/geyser spots",
            Self::UnitSeam => "Cave unit seams",
            Self::Plant => "Plant spots",
            Self::LeaderSpawn => "Leader spawn spots",
            Self::SpecialEnemy => "\"Special\" enemy spots",
        }
    }
}
