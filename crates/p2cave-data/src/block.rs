//! Generic reader for the `{`-opened blocks of a cave file.
//!
//! Every block starts the same way: lines are skipped until a lone `{`. After
//! that, entry blocks hold a count followed by that many fixed-shape records,
//! and tagged blocks hold `{tag} ...` lines up to a `{_eof}` sentinel. Neither
//! kind has a closing delimiter, so the reader stops exactly after the last
//! line it needs and leaves the rest of the cursor to the next block.

use std::fmt;

use crate::cave_parser::{CaveParseError, Location};
use crate::cursor::{Line, LineCursor};
use crate::fields::FieldError;

/// The six block kinds, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    CaveInfo,
    FloorInfo,
    TekiInfo,
    ItemInfo,
    GateInfo,
    CapInfo,
}

impl BlockKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CaveInfo => "CaveInfo",
            Self::FloorInfo => "FloorInfo",
            Self::TekiInfo => "TekiInfo",
            Self::ItemInfo => "ItemInfo",
            Self::GateInfo => "GateInfo",
            Self::CapInfo => "CapInfo",
        }
    }

    /// Recognize a bare block header line.
    pub fn from_label(text: &str) -> Option<Self> {
        match text {
            "CaveInfo" => Some(Self::CaveInfo),
            "FloorInfo" => Some(Self::FloorInfo),
            "TekiInfo" => Some(Self::TekiInfo),
            "ItemInfo" => Some(Self::ItemInfo),
            "GateInfo" => Some(Self::GateInfo),
            "CapInfo" => Some(Self::CapInfo),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What one line of a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Class token (maybe `$`-prefixed, maybe `carrier_carried`) and packed weight.
    ClassAndWeight,
    SpawnType,
    /// `gate` keyword and float health.
    KeywordAndHealth,
    /// Packed weight on its own line.
    GateWeight,
    CapType,
}

impl LineRole {
    pub const fn description(self) -> &'static str {
        match self {
            Self::ClassAndWeight => "class and weight",
            Self::SpawnType => "spawn type",
            Self::KeywordAndHealth => "gate keyword and health",
            Self::GateWeight => "gate weight",
            Self::CapType => "cap type",
        }
    }
}

/// The lines of one record, labelled by role.
#[derive(Debug)]
pub struct Record<'a> {
    index: usize,
    roles: &'static [LineRole],
    lines: Vec<Line<'a>>,
    block: BlockKind,
    sublevel: Option<usize>,
}

impl<'a> Record<'a> {
    /// Zero-based position of the record inside its block.
    pub fn index(&self) -> usize {
        self.index
    }

    fn find(&self, role: LineRole) -> Option<&Line<'a>> {
        let pos = self.roles.iter().position(|r| *r == role)?;
        self.lines.get(pos)
    }

    /// The line playing `role`; asking for a role outside the block's record
    /// shape is reported as a malformed record.
    pub fn line(&self, role: LineRole) -> Result<&Line<'a>, CaveParseError> {
        self.find(role).ok_or_else(|| CaveParseError::Malformed {
            at: self.at(role),
            msg: format!(
                "{} records have no {} line",
                self.block,
                role.description()
            ),
        })
    }

    /// Location of the `role` line, or of the record's first line when the
    /// record has no such line.
    pub fn at(&self, role: LineRole) -> Location {
        let line = self
            .find(role)
            .or(self.lines.first())
            .map_or(0, |line| line.number);
        Location {
            line,
            block: self.block,
            sublevel: self.sublevel,
        }
    }

    /// First token of the line as an integer.
    pub fn int(&self, role: LineRole) -> Result<i32, CaveParseError> {
        let text = self.line(role)?.first_token();
        text.parse().map_err(|_| CaveParseError::InvalidNumber {
            at: self.at(role),
            field: role.description().into(),
            expected: "integer",
            text: text.into(),
        })
    }

    /// First two tokens of the line.
    pub fn pair(&self, role: LineRole) -> Result<(&'a str, &'a str), CaveParseError> {
        let line = self.line(role)?;
        let mut tokens = line.tokens();
        match (tokens.next(), tokens.next()) {
            (Some(first), Some(second)) => Ok((first, second)),
            _ => Err(CaveParseError::Malformed {
                at: self.at(role),
                msg: format!(
                    "expected {}, got `{}`",
                    role.description(),
                    line.text
                ),
            }),
        }
    }

    pub fn field_error(&self, role: LineRole, kind: FieldError) -> CaveParseError {
        CaveParseError::Field {
            at: self.at(role),
            kind,
        }
    }
}

/// Scanner states after the opening brace has been found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingCount,
    ReadingEntry {
        index: usize,
        role: usize,
        count: usize,
    },
    Done,
}

/// One block being read from the shared cursor.
pub struct BlockScanner<'c, 'a> {
    cursor: &'c mut LineCursor<'a>,
    kind: BlockKind,
    sublevel: Option<usize>,
}

impl<'c, 'a> BlockScanner<'c, 'a> {
    /// Skip ahead to the block's `{`.
    ///
    /// A header line naming some other block means the cursor is out of step
    /// with the file, which is reported instead of silently reading the wrong
    /// block.
    pub fn open(
        cursor: &'c mut LineCursor<'a>,
        kind: BlockKind,
        sublevel: Option<usize>,
    ) -> Result<Self, CaveParseError> {
        while let Some(line) = cursor.next() {
            if line.text == "{" {
                return Ok(Self {
                    cursor,
                    kind,
                    sublevel,
                });
            }
            match BlockKind::from_label(line.text) {
                Some(found) if found != kind => {
                    return Err(CaveParseError::BlockMismatch {
                        at: Location {
                            line: line.number,
                            block: kind,
                            sublevel,
                        },
                        found,
                    });
                }
                _ => log::trace!("line {}: skipped before {kind}: {}", line.number, line.text),
            }
        }
        Err(CaveParseError::MissingOpenBrace {
            at: Location {
                line: cursor.consumed(),
                block: kind,
                sublevel,
            },
        })
    }

    pub fn location(&self, line: &Line<'_>) -> Location {
        Location {
            line: line.number,
            block: self.kind,
            sublevel: self.sublevel,
        }
    }

    fn next_line(&mut self) -> Result<Line<'a>, CaveParseError> {
        self.cursor.next().ok_or(CaveParseError::UnexpectedEof {
            at: Location {
                line: self.cursor.consumed(),
                block: self.kind,
                sublevel: self.sublevel,
            },
        })
    }

    /// Read a counted block whose records span `roles.len()` lines each,
    /// handing every completed record to `build`.
    pub fn read_records<T, F>(
        mut self,
        roles: &'static [LineRole],
        mut build: F,
    ) -> Result<Vec<T>, CaveParseError>
    where
        F: FnMut(&Record<'a>) -> Result<T, CaveParseError>,
    {
        let mut entries = Vec::new();
        let mut pending = Vec::with_capacity(roles.len());
        let mut state = ScanState::SeekingCount;

        loop {
            state = match state {
                ScanState::SeekingCount => {
                    let line = self.next_line()?;
                    let count: usize =
                        line.first_token()
                            .parse()
                            .map_err(|_| CaveParseError::InvalidNumber {
                                at: self.location(&line),
                                field: "entry count".into(),
                                expected: "non-negative integer",
                                text: line.text.into(),
                            })?;
                    if count == 0 || roles.is_empty() {
                        ScanState::Done
                    } else {
                        entries.reserve(count);
                        ScanState::ReadingEntry {
                            index: 0,
                            role: 0,
                            count,
                        }
                    }
                }
                ScanState::ReadingEntry { index, role, count } => {
                    pending.push(self.next_line()?);
                    if role + 1 < roles.len() {
                        ScanState::ReadingEntry {
                            index,
                            role: role + 1,
                            count,
                        }
                    } else {
                        let record = Record {
                            index,
                            roles,
                            lines: std::mem::take(&mut pending),
                            block: self.kind,
                            sublevel: self.sublevel,
                        };
                        entries.push(build(&record)?);
                        if index + 1 == count {
                            ScanState::Done
                        } else {
                            ScanState::ReadingEntry {
                                index: index + 1,
                                role: 0,
                                count,
                            }
                        }
                    }
                }
                ScanState::Done => return Ok(entries),
            };
        }
    }

    /// Feed every line up to `{_eof}` to `on_field`, returning the sentinel line.
    pub fn read_fields<F>(mut self, mut on_field: F) -> Result<Line<'a>, CaveParseError>
    where
        F: FnMut(&Line<'a>, Location) -> Result<(), CaveParseError>,
    {
        loop {
            let line = self.next_line()?;
            if line.first_token() == "{_eof}" {
                return Ok(line);
            }
            let at = self.location(&line);
            on_field(&line, at)?;
        }
    }
}
