//! Parser for cave definition files (`caveinfo/*.txt`).
//!
//! A file is a `CaveInfo` header followed by five blocks per sublevel:
//! `FloorInfo`, `TekiInfo`, `ItemInfo`, `GateInfo` and `CapInfo`. All of them
//! are read off one shared [`LineCursor`] in that fixed order.

use std::fmt;

use p2cave_types::{Cave, RawGateEntry, RawObjectEntry, SpawnLocation, Sublevel, SublevelInfo};

use crate::block::{BlockKind, BlockScanner, LineRole, Record};
use crate::catalog::ObjectLookup;
use crate::cursor::{Line, LineCursor};
use crate::fields::{self, FieldError};

/// Where in the file a fatal error was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// 1-based line number.
    pub line: usize,
    pub block: BlockKind,
    /// Zero-based sublevel index; `None` inside the `CaveInfo` header.
    pub sublevel: Option<usize>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, {} block", self.line, self.block)?;
        if let Some(index) = self.sublevel {
            write!(f, ", sublevel {}", index + 1)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaveParseError {
    #[error("{at}: expected `{{` to open the block")]
    MissingOpenBrace { at: Location },
    #[error("{at}: found a {found} header before the block's `{{`")]
    BlockMismatch { at: Location, found: BlockKind },
    #[error("{at}: input ended inside the block")]
    UnexpectedEof { at: Location },
    #[error("{at}: {field} `{text}` is not a valid {expected}")]
    InvalidNumber {
        at: Location,
        field: String,
        expected: &'static str,
        text: String,
    },
    #[error("{at}: {msg}")]
    Malformed { at: Location, msg: String },
    #[error("{at}: {kind}")]
    Field { at: Location, kind: FieldError },
}

impl CaveParseError {
    pub fn location(&self) -> Location {
        match self {
            Self::MissingOpenBrace { at }
            | Self::BlockMismatch { at, .. }
            | Self::UnexpectedEof { at }
            | Self::InvalidNumber { at, .. }
            | Self::Malformed { at, .. }
            | Self::Field { at, .. } => *at,
        }
    }
}

const TEKI_ROLES: &[LineRole] = &[LineRole::ClassAndWeight, LineRole::SpawnType];
const ITEM_ROLES: &[LineRole] = &[LineRole::ClassAndWeight];
const GATE_ROLES: &[LineRole] = &[LineRole::KeywordAndHealth, LineRole::GateWeight];
const CAP_ROLES: &[LineRole] = &[
    LineRole::CapType,
    LineRole::ClassAndWeight,
    LineRole::SpawnType,
];

/// Reads a cave file one sublevel at a time.
///
/// The header is read by [`CaveReader::new`]; each call to `next` reads the
/// five blocks of the following sublevel. Iteration stops after the first
/// error.
pub struct CaveReader<'a, 'l, L: ObjectLookup + ?Sized> {
    cursor: LineCursor<'a>,
    lookup: &'l L,
    sublevel_count: usize,
    next: usize,
    failed: bool,
}

impl<'a, 'l, L: ObjectLookup + ?Sized> CaveReader<'a, 'l, L> {
    pub fn new(input: &'a str, lookup: &'l L) -> Result<Self, CaveParseError> {
        let mut cursor = LineCursor::new(input);
        let mut count = None;
        let eof = BlockScanner::open(&mut cursor, BlockKind::CaveInfo, None)?.read_fields(
            |line, at| {
                if line.first_token() == "{c000}" {
                    count = Some(sublevel_count(line, at)?);
                } else {
                    log::debug!("{at}: skipped header field `{}`", line.text);
                }
                Ok(())
            },
        )?;
        let Some(sublevel_count) = count else {
            return Err(CaveParseError::Malformed {
                at: Location {
                    line: eof.number,
                    block: BlockKind::CaveInfo,
                    sublevel: None,
                },
                msg: "header ended without a `{c000}` sublevel count".into(),
            });
        };
        log::debug!("cave declares {sublevel_count} sublevels");

        Ok(Self {
            cursor,
            lookup,
            sublevel_count,
            next: 0,
            failed: false,
        })
    }

    /// Sublevel count declared by `{c000}`.
    pub fn sublevel_count(&self) -> usize {
        self.sublevel_count
    }

    fn read_sublevel(&mut self, index: usize) -> Result<Sublevel, CaveParseError> {
        let lookup = self.lookup;
        let sublevel = Some(index);

        let mut info = SublevelInfo::default();
        BlockScanner::open(&mut self.cursor, BlockKind::FloorInfo, sublevel)?
            .read_fields(|line, at| read_floor_field(&mut info, line, at))?;

        let teki = BlockScanner::open(&mut self.cursor, BlockKind::TekiInfo, sublevel)?
            .read_records(TEKI_ROLES, |record| teki_entry(record, lookup))?;
        let items = BlockScanner::open(&mut self.cursor, BlockKind::ItemInfo, sublevel)?
            .read_records(ITEM_ROLES, item_entry)?;
        let gates = BlockScanner::open(&mut self.cursor, BlockKind::GateInfo, sublevel)?
            .read_records(GATE_ROLES, gate_entry)?;
        let caps = BlockScanner::open(&mut self.cursor, BlockKind::CapInfo, sublevel)?
            .read_records(CAP_ROLES, |record| cap_entry(record, lookup))?;

        log::debug!(
            "sublevel {}: {} teki, {} items, {} gates, {} caps",
            index + 1,
            teki.len(),
            items.len(),
            gates.len(),
            caps.len()
        );
        Ok(Sublevel {
            info,
            teki,
            items,
            gates,
            caps,
        })
    }
}

impl<L: ObjectLookup + ?Sized> Iterator for CaveReader<'_, '_, L> {
    type Item = Result<Sublevel, CaveParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next >= self.sublevel_count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let result = self.read_sublevel(index);
        self.failed = result.is_err();
        Some(result)
    }
}

/// Parse a whole cave file.
pub fn parse_cave<L>(input: &str, lookup: &L) -> Result<Cave, CaveParseError>
where
    L: ObjectLookup + ?Sized,
{
    let sublevels = CaveReader::new(input, lookup)?.collect::<Result<Vec<_>, _>>()?;
    Ok(Cave { sublevels })
}

/// `{c000} <label> <N>`; older files omit the label.
fn sublevel_count(line: &Line<'_>, at: Location) -> Result<usize, CaveParseError> {
    let tokens: Vec<&str> = line.tokens().collect();
    let text = match tokens.as_slice() {
        [_, _, value, ..] | [_, value] => *value,
        _ => {
            return Err(CaveParseError::Malformed {
                at,
                msg: "`{c000}` has no sublevel count".into(),
            });
        }
    };
    text.parse().map_err(|_| CaveParseError::InvalidNumber {
        at,
        field: "sublevel count".into(),
        expected: "non-negative integer",
        text: text.into(),
    })
}

/// Third token of a `{fNNN} <label> <value>` line.
struct FieldValue<'a> {
    tag: &'a str,
    text: &'a str,
    at: Location,
}

impl<'a> FieldValue<'a> {
    fn of(line: &Line<'a>, at: Location) -> Result<Self, CaveParseError> {
        let tag = line.first_token();
        match line.tokens().nth(2) {
            Some(text) => Ok(Self { tag, text, at }),
            None => Err(CaveParseError::Malformed {
                at,
                msg: format!("`{tag}` has no value"),
            }),
        }
    }

    fn number<T: std::str::FromStr>(&self, expected: &'static str) -> Result<T, CaveParseError> {
        self.text.parse().map_err(|_| CaveParseError::InvalidNumber {
            at: self.at,
            field: self.tag.into(),
            expected,
            text: self.text.into(),
        })
    }

    fn int(&self) -> Result<i32, CaveParseError> {
        self.number("integer")
    }

    fn uint(&self) -> Result<u32, CaveParseError> {
        self.number("non-negative integer")
    }

    fn float(&self) -> Result<f32, CaveParseError> {
        self.number("float")
    }

    fn flag(&self) -> Result<bool, CaveParseError> {
        Ok(self.int()? != 0)
    }

    fn string(&self) -> String {
        self.text.to_string()
    }
}

fn read_floor_field(
    info: &mut SublevelInfo,
    line: &Line<'_>,
    at: Location,
) -> Result<(), CaveParseError> {
    let value = || FieldValue::of(line, at);
    match line.first_token() {
        "{f000}" => info.sublevel_number_f000 = Some(value()?.int()?),
        "{f001}" => info.sublevel_number_f001 = Some(value()?.int()?),
        "{f002}" => info.main_ideal_max = Some(value()?.uint()?),
        "{f003}" => info.treasure_ideal_max = Some(value()?.uint()?),
        "{f004}" => info.gate_ideal_max = Some(value()?.uint()?),
        "{f005}" => info.room_units = Some(value()?.int()?),
        "{f006}" => info.corridor_room_ratio = Some(value()?.float()?),
        "{f007}" => info.has_geyser = Some(value()?.flag()?),
        "{f008}" => info.unit_list_filename = Some(value()?.string()),
        "{f009}" => info.lighting_filename = Some(value()?.string()),
        "{f00A}" => info.skybox = Some(value()?.string()),
        "{f010}" => info.has_clog = Some(value()?.flag()?),
        "{f011}" => info.unknown_f011 = Some(value()?.string()),
        "{f012}" => info.music_type = Some(value()?.int()?),
        "{f013}" => info.has_floor = Some(value()?.flag()?),
        "{f014}" => info.dead_end_chance = Some(value()?.int()?),
        "{f015}" => info.file_format = Some(value()?.int()?),
        "{f016}" => info.waterwraith_time = Some(value()?.float()?),
        "{f017}" => info.has_seesaw_blocks = Some(value()?.flag()?),
        other => log::debug!("{at}: skipped unknown field `{other}`"),
    }
    Ok(())
}

/// Class token and packed weight from a `ClassAndWeight` line.
fn class_and_weight<L>(
    record: &Record<'_>,
    lookup: &L,
    plain_count: bool,
) -> Result<RawObjectEntry, CaveParseError>
where
    L: ObjectLookup + ?Sized,
{
    let role = LineRole::ClassAndWeight;
    let (token, weight_text) = record.pair(role)?;
    let class = fields::class_token(token, lookup).map_err(|e| record.field_error(role, e))?;
    let (min_amount, weight) = if plain_count {
        let count = fields::decode_plain_count(weight_text)
            .map_err(|e| record.field_error(role, e))?;
        (count, 0)
    } else {
        let packed = fields::decode_packed_weight(weight_text)
            .map_err(|e| record.field_error(role, e))?;
        (packed.min_amount, packed.weight)
    };
    Ok(RawObjectEntry {
        class: class.class.into(),
        carrying: class.carrying.map(Into::into),
        spawn_method: class.spawn_method,
        min_amount,
        weight,
        spawn_type: None,
        cap_type: None,
    })
}

fn teki_entry<L>(record: &Record<'_>, lookup: &L) -> Result<RawObjectEntry, CaveParseError>
where
    L: ObjectLookup + ?Sized,
{
    let spawn_type = record.int(LineRole::SpawnType)?;
    let plain_count = spawn_type == SpawnLocation::PLANT_SPAWN_TYPE;
    Ok(RawObjectEntry {
        spawn_type: Some(spawn_type),
        ..class_and_weight(record, lookup, plain_count)?
    })
}

fn item_entry(record: &Record<'_>) -> Result<RawObjectEntry, CaveParseError> {
    let role = LineRole::ClassAndWeight;
    let (class, weight_text) = record.pair(role)?;
    let packed =
        fields::decode_packed_weight(weight_text).map_err(|e| record.field_error(role, e))?;
    Ok(RawObjectEntry {
        class: class.into(),
        min_amount: packed.min_amount,
        weight: packed.weight,
        ..Default::default()
    })
}

fn gate_entry(record: &Record<'_>) -> Result<RawGateEntry, CaveParseError> {
    let role = LineRole::KeywordAndHealth;
    let (keyword, health_text) = record.pair(role)?;
    let health = health_text
        .parse()
        .map_err(|_| CaveParseError::InvalidNumber {
            at: record.at(role),
            field: "gate health".into(),
            expected: "float",
            text: health_text.into(),
        })?;

    let role = LineRole::GateWeight;
    let packed = fields::decode_packed_weight(record.line(role)?.first_token())
        .map_err(|e| record.field_error(role, e))?;
    Ok(RawGateEntry {
        keyword: keyword.into(),
        health,
        min_amount: packed.min_amount,
        weight: packed.weight,
    })
}

fn cap_entry<L>(record: &Record<'_>, lookup: &L) -> Result<RawObjectEntry, CaveParseError>
where
    L: ObjectLookup + ?Sized,
{
    let cap_type = record.int(LineRole::CapType)?;
    let spawn_type = record.int(LineRole::SpawnType)?;
    Ok(RawObjectEntry {
        spawn_type: Some(spawn_type),
        cap_type: Some(cap_type),
        ..class_and_weight(record, lookup, false)?
    })
}

#[cfg(test)]
mod tests {
    use p2cave_types::SpawnMethod;

    use super::*;
    use crate::catalog::Catalog;
    use crate::derivation::derive_sublevel;

    const ONE_SUBLEVEL: &str = "\
# CaveInfo
CaveInfo
{
\t{c000}\t4\t1\t# floor count
\t{_eof}
}
FloorInfo
{
\t{f000}\t4\t0
\t{f002}\t4\t8
\t{f003}\t4\t2
\t{f004}\t4\t1
\t{f006}\t5\t0.250000
\t{f007}\t4\t1
\t{f008}\t-1\tunits_1.txt
\t{f00A}\t-1\tsoil
\t{f015}\t4\t1
\t{f999}\t4\t3\t# not a known tag
\t{_eof}
}
TekiInfo
{
\t3
\t$3Kochappy_ahiru\t32
\t0
\tClover\t15
\t6
\tTobi\t4
\t1
}
ItemInfo
{
\t1
\tbane\t11
}
GateInfo
{
\t1
\tgate\t750.000000
\t5
}
CapInfo
{
\t1
\t0
\tKogane\t1
\t0
}
";

    fn parse(input: &str) -> Result<Cave, CaveParseError> {
        parse_cave(input, &Catalog::builtin())
    }

    #[test]
    fn parses_all_blocks() {
        let cave = parse(ONE_SUBLEVEL).expect("valid cave");
        assert_eq!(cave.sublevels.len(), 1);
        let sub = &cave.sublevels[0];

        assert_eq!(sub.info.sublevel_number_f000, Some(0));
        assert_eq!(sub.info.main_ideal_max, Some(8));
        assert_eq!(sub.info.treasure_ideal_max, Some(2));
        assert_eq!(sub.info.gate_ideal_max, Some(1));
        assert_eq!(sub.info.corridor_room_ratio, Some(0.25));
        assert_eq!(sub.info.has_geyser, Some(true));
        assert_eq!(sub.info.unit_list_filename.as_deref(), Some("units_1.txt"));
        assert_eq!(sub.info.skybox.as_deref(), Some("soil"));
        assert_eq!(sub.info.file_format, Some(1));
        assert_eq!(sub.info.has_clog, None);

        assert_eq!(sub.teki.len(), 3);
        let kochappy = &sub.teki[0];
        assert_eq!(kochappy.class, "Kochappy");
        assert_eq!(kochappy.carrying.as_deref(), Some("ahiru"));
        assert_eq!(kochappy.spawn_method, Some(SpawnMethod::NearLeaders));
        assert_eq!((kochappy.min_amount, kochappy.weight), (3, 2));
        assert_eq!(kochappy.spawn_type, Some(0));

        let clover = &sub.teki[1];
        assert_eq!((clover.min_amount, clover.weight), (15, 0));
        assert_eq!(clover.spawn_type, Some(6));

        assert_eq!(sub.items.len(), 1);
        assert_eq!(sub.items[0].class, "bane");
        assert_eq!((sub.items[0].min_amount, sub.items[0].weight), (1, 1));
        assert_eq!(sub.items[0].spawn_type, None);

        assert_eq!(sub.gates.len(), 1);
        assert_eq!(sub.gates[0].keyword, "gate");
        assert_eq!(sub.gates[0].health, 750.0);
        assert_eq!((sub.gates[0].min_amount, sub.gates[0].weight), (0, 5));

        assert_eq!(sub.caps.len(), 1);
        assert_eq!(sub.caps[0].class, "Kogane");
        assert_eq!(sub.caps[0].cap_type, Some(0));
        assert_eq!((sub.caps[0].min_amount, sub.caps[0].weight), (0, 1));
    }

    #[test]
    fn reader_reports_count_and_yields_sublevels() {
        let catalog = Catalog::builtin();
        let reader = CaveReader::new(ONE_SUBLEVEL, &catalog).expect("header");
        assert_eq!(reader.sublevel_count(), 1);
        let sublevels: Vec<_> = reader.collect();
        assert_eq!(sublevels.len(), 1);
        assert!(sublevels[0].is_ok());
    }

    #[test]
    fn count_with_only_two_tokens() {
        let input = "CaveInfo\n{\n{c000} 0\n{_eof}\n}\n";
        let cave = parse(input).expect("empty cave");
        assert!(cave.sublevels.is_empty());
    }

    #[test]
    fn missing_sublevel_count_is_fatal() {
        let err = parse("CaveInfo\n{\n{_eof}\n").expect_err("no {c000}");
        assert!(matches!(err, CaveParseError::Malformed { .. }), "{err}");
        assert_eq!(err.location().line, 3);
        assert_eq!(err.location().sublevel, None);
    }

    #[test]
    fn declared_sublevel_missing_is_fatal() {
        let input = "CaveInfo\n{\n{c000} 4 2\n{_eof}\n}\n";
        let err = parse(input).expect_err("no FloorInfo");
        assert!(matches!(err, CaveParseError::MissingOpenBrace { .. }), "{err}");
        assert_eq!(err.location().block, BlockKind::FloorInfo);
        assert_eq!(err.location().sublevel, Some(0));
    }

    #[test]
    fn bad_floor_number_names_the_tag() {
        let input = ONE_SUBLEVEL.replace("{f002}\t4\t8", "{f002}\t4\teight");
        let err = parse(&input).expect_err("non-numeric ideal max");
        match err {
            CaveParseError::InvalidNumber { at, field, text, .. } => {
                assert_eq!(field, "{f002}");
                assert_eq!(text, "eight");
                assert_eq!(at.block, BlockKind::FloorInfo);
                assert_eq!(at.line, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_spawn_prefix_is_fatal() {
        let input = ONE_SUBLEVEL.replace("$3Kochappy", "$8Kochappy");
        let err = parse(&input).expect_err("bad spawn method");
        match &err {
            CaveParseError::Field { at, kind } => {
                assert_eq!(*kind, FieldError::SpawnMethod('8'));
                assert_eq!(at.block, BlockKind::TekiInfo);
                assert_eq!(at.sublevel, Some(0));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("sublevel 1"), "{err}");
    }

    #[test]
    fn bad_gate_health() {
        let input = ONE_SUBLEVEL.replace("750.000000", "lots");
        let err = parse(&input).expect_err("non-numeric health");
        assert!(
            matches!(&err, CaveParseError::InvalidNumber { field, .. } if field == "gate health"),
            "{err}"
        );
    }

    #[test]
    fn record_missing_weight_is_malformed() {
        let input = ONE_SUBLEVEL.replace("\tbane\t11", "\tbane");
        let err = parse(&input).expect_err("item without weight");
        assert!(matches!(err, CaveParseError::Malformed { .. }), "{err}");
        assert_eq!(err.location().block, BlockKind::ItemInfo);
    }

    #[test]
    fn cap_with_prefixed_carrying_token() {
        let input = ONE_SUBLEVEL.replace("\tKogane\t1\n", "\t$2Dangomushi_bane\t21\n");
        let cave = parse(&input).expect("valid cave");
        let cap = &cave.sublevels[0].caps[0];
        assert_eq!(cap.class, "Dangomushi");
        assert_eq!(cap.carrying.as_deref(), Some("bane"));
        assert_eq!(cap.spawn_method, Some(SpawnMethod::NearPikmin));
        assert_eq!((cap.min_amount, cap.weight), (2, 1));
        assert_eq!((cap.cap_type, cap.spawn_type), (Some(0), Some(0)));

        let analysis = derive_sublevel(1, &cave.sublevels[0], &Catalog::builtin());
        let carried = analysis
            .entries_of_class("bane")
            .find(|e| e.is_carried())
            .expect("bane inside the cap entry");
        assert_eq!(carried.category, p2cave_types::Category::Treasure);
        assert_eq!(carried.min_amount, 2);
        assert_eq!(
            analysis.carrier_of(carried.id).map(|e| e.class.as_str()),
            Some("Dangomushi")
        );
    }

    #[test]
    fn huge_packed_minimums_parse_and_derive() {
        let input = ONE_SUBLEVEL
            .replace("$3Kochappy_ahiru\t32", "Kochappy\t42949672950")
            .replace("Tobi\t4", "Tobi\t42949672950");
        let cave = parse(&input).expect("valid cave");
        assert_eq!(cave.sublevels[0].teki[0].min_amount, u32::MAX);

        let analysis = derive_sublevel(1, &cave.sublevels[0], &Catalog::builtin());
        assert_eq!(analysis.aggregates.main.min_total, u32::MAX);
        assert_eq!(analysis.min_spawns("Kochappy"), u32::MAX);
    }

    #[test]
    fn location_display() {
        let at = Location {
            line: 12,
            block: BlockKind::TekiInfo,
            sublevel: Some(2),
        };
        assert_eq!(at.to_string(), "line 12, TekiInfo block, sublevel 3");
        let header = Location {
            line: 3,
            block: BlockKind::CaveInfo,
            sublevel: None,
        };
        assert_eq!(header.to_string(), "line 3, CaveInfo block");
    }
}
