use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Display family of an object class, matching the wiki's type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Enemy,
    Treasure,
    Obstacle,
    Plant,
    Other,
    Gate,
}

impl ObjectKind {
    /// Three-letter wiki type tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Enemy => "ene",
            Self::Treasure => "tre",
            Self::Obstacle => "obs",
            Self::Plant => "pla",
            Self::Other => "oth",
            Self::Gate => "gat",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ene" => Some(Self::Enemy),
            "tre" => Some(Self::Treasure),
            "obs" => Some(Self::Obstacle),
            "pla" => Some(Self::Plant),
            "oth" => Some(Self::Other),
            "gat" => Some(Self::Gate),
            _ => None,
        }
    }
}

bitflags! {
    /// Extra facts about an object class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectFlags: u8 {
        const PARTIALLY_BURIED = 0x01;
        const FULLY_BURIED     = 0x02;
        /// Differs between game regions/versions.
        const REGIONAL         = 0x04;
    }
}

/// How deep a treasure sits in the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Burial {
    #[default]
    None,
    Partial,
    Full,
}

/// Display metadata for one internal class name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    pub display_name: String,
    pub kind: ObjectKind,
    /// Shown in parentheses after the name when two classes share it.
    pub disambiguator: String,
    pub flags: ObjectFlags,
    /// Classes this object always holds, independent of the cave file.
    pub cargo: Vec<String>,
}

impl ObjectInfo {
    pub fn new(display_name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            display_name: display_name.into(),
            kind,
            disambiguator: String::new(),
            flags: ObjectFlags::empty(),
            cargo: Vec::new(),
        }
    }

    /// Stand-in used when a class is missing from the catalog.
    pub fn placeholder(class: &str) -> Self {
        Self::new(format!("UNKNOWN!{class}"), ObjectKind::Enemy)
    }

    pub fn burial(&self) -> Burial {
        if self.flags.contains(ObjectFlags::FULLY_BURIED) {
            Burial::Full
        } else if self.flags.contains(ObjectFlags::PARTIALLY_BURIED) {
            Burial::Partial
        } else {
            Burial::None
        }
    }

    pub fn is_regional(&self) -> bool {
        self.flags.contains(ObjectFlags::REGIONAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in [
            ObjectKind::Enemy,
            ObjectKind::Treasure,
            ObjectKind::Obstacle,
            ObjectKind::Plant,
            ObjectKind::Other,
            ObjectKind::Gate,
        ] {
            assert_eq!(ObjectKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ObjectKind::from_tag("xyz"), None);
    }

    #[test]
    fn burial_prefers_full() {
        let mut info = ObjectInfo::new("Toxic Toadstool", ObjectKind::Treasure);
        assert_eq!(info.burial(), Burial::None);
        info.flags = ObjectFlags::PARTIALLY_BURIED;
        assert_eq!(info.burial(), Burial::Partial);
        info.flags |= ObjectFlags::FULLY_BURIED;
        assert_eq!(info.burial(), Burial::Full);
    }

    #[test]
    fn placeholder_is_enemy() {
        let info = ObjectInfo::placeholder("Foo");
        assert_eq!(info.display_name, "UNKNOWN!Foo");
        assert_eq!(info.kind, ObjectKind::Enemy);
        assert!(info.disambiguator.is_empty());
        assert!(!info.is_regional());
    }
}
