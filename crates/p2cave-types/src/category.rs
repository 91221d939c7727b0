use serde::Serialize;
use strum::{EnumCount, EnumIter, FromRepr};

/// Spawn category of a derived sublevel entry.
///
/// Each category has its own slot budget in the generator: main, treasure and
/// gate objects fill up to an ideal max, decorations spawn exactly their
/// minimum, and dead-end objects depend on how many dead ends get generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum Category {
    Main = 0,
    Decorative = 1,
    Treasure = 2,
    Gate = 3,
    DeadEnd = 4,
}

impl Category {
    /// Categories that keep running min/weight totals on a sublevel.
    pub const AGGREGATED: [Category; 4] = [
        Category::Main,
        Category::Treasure,
        Category::Gate,
        Category::DeadEnd,
    ];

    /// Categories whose size is capped by a `{f002}`..`{f004}` ideal max.
    pub const CAPPED: [Category; 3] = [Category::Main, Category::Treasure, Category::Gate];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Decorative => "decorative",
            Self::Treasure => "treasure",
            Self::Gate => "gate",
            Self::DeadEnd => "dead end",
        }
    }

    pub const fn has_ideal_max(self) -> bool {
        matches!(self, Self::Main | Self::Treasure | Self::Gate)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
