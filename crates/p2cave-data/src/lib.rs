pub mod block;
pub mod catalog;
pub mod cave_parser;
pub mod cursor;
pub mod derivation;
pub mod diagnostics;
pub mod fields;
pub mod objects;

#[cfg(test)]
mod tests {
    use p2cave_types::*;

    use crate::catalog::{Catalog, ObjectLookup};
    use crate::objects::{OBJECTS, TITAN_DWEEVIL_CARGO};

    #[test]
    fn object_count() {
        assert_eq!(OBJECTS.len(), Catalog::builtin().len());
    }

    #[test]
    fn every_kind_is_represented() {
        for kind in [
            ObjectKind::Enemy,
            ObjectKind::Treasure,
            ObjectKind::Obstacle,
            ObjectKind::Plant,
            ObjectKind::Other,
            ObjectKind::Gate,
        ] {
            assert!(
                OBJECTS.iter().any(|row| row.kind == kind),
                "no {} rows",
                kind.tag()
            );
        }
    }

    #[test]
    fn titan_dweevil_cargo_resolves() {
        let catalog = Catalog::builtin();
        let titan = catalog.lookup("bigtreasure").expect("titan dweevil");
        assert_eq!(titan.cargo, TITAN_DWEEVIL_CARGO);
        for class in TITAN_DWEEVIL_CARGO {
            let info = catalog.lookup(class).expect("cargo class");
            assert_eq!(info.kind, ObjectKind::Treasure, "{class}");
        }
    }

    #[test]
    fn plant_spawn_type_is_a_location() {
        use strum::IntoEnumIterator;
        assert!(
            SpawnLocation::iter()
                .any(|loc| loc as i32 == SpawnLocation::PLANT_SPAWN_TYPE)
        );
    }

    #[test]
    fn gate_keyword_is_cataloged() {
        let info = Catalog::builtin()
            .resolve("gate")
            .cloned()
            .expect("gate row");
        assert_eq!(info.kind, ObjectKind::Gate);
    }
}
