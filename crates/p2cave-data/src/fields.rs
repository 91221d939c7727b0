//! Token-level parsers for record fields: packed weights, `$` spawn prefixes
//! and `carrier_carried` class names.

use p2cave_types::SpawnMethod;
use winnow::ascii::digit1;
use winnow::combinator::{opt, preceded};
use winnow::prelude::*;
use winnow::token::one_of;

use crate::catalog::ObjectLookup;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("`{0}` is not a packed weight (expected digits)")]
    PackedWeight(String),
    #[error("`{0}` is not a valid count")]
    Count(String),
    #[error("unknown spawn method `${0}` (expected `$` or `$1`..`$5`)")]
    SpawnMethod(char),
    #[error("`{0}` has no class name")]
    EmptyClass(String),
}

/// Guaranteed minimum and random-fill weight from a packed weight token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedWeight {
    pub min_amount: u32,
    pub weight: u32,
}

/// The last digit is the weight; any digits before it are the minimum.
fn split_packed(digits: &str) -> Result<PackedWeight, std::num::ParseIntError> {
    let (lead, last) = digits.split_at(digits.len() - 1);
    let weight = last.parse()?;
    let min_amount = if lead.is_empty() { 0 } else { lead.parse()? };
    Ok(PackedWeight { min_amount, weight })
}

fn packed_weight(input: &mut &str) -> winnow::Result<PackedWeight> {
    digit1.try_map(split_packed).parse_next(input)
}

fn plain_count(input: &mut &str) -> winnow::Result<u32> {
    digit1.try_map(str::parse::<u32>).parse_next(input)
}

/// `None` for no prefix, `Some(None)` for a bare `$`, `Some(Some(d))` for `$d`.
fn spawn_prefix(input: &mut &str) -> winnow::Result<Option<Option<char>>> {
    opt(preceded('$', opt(one_of(|c: char| c.is_ascii_digit())))).parse_next(input)
}

pub fn decode_packed_weight(token: &str) -> Result<PackedWeight, FieldError> {
    packed_weight
        .parse(token)
        .map_err(|_| FieldError::PackedWeight(token.into()))
}

/// Decoration entries (spawn type 6) store a plain count instead of min+weight.
pub fn decode_plain_count(token: &str) -> Result<u32, FieldError> {
    plain_count
        .parse(token)
        .map_err(|_| FieldError::Count(token.into()))
}

/// A class token split into its spawn method, class and carried class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassToken<'a> {
    pub spawn_method: Option<SpawnMethod>,
    pub class: &'a str,
    pub carrying: Option<&'a str>,
}

/// Peel off a `$`/`$N` prefix.
pub fn strip_spawn_method(token: &str) -> Result<(Option<SpawnMethod>, &str), FieldError> {
    let mut rest = token;
    let prefix = spawn_prefix
        .parse_next(&mut rest)
        .map_err(|_| FieldError::EmptyClass(token.into()))?;
    let method = match prefix {
        None => None,
        Some(None) => Some(SpawnMethod::Bare),
        Some(Some(digit)) => {
            let code = digit.to_digit(10).and_then(|d| u8::try_from(d).ok());
            match code.and_then(SpawnMethod::from_repr) {
                Some(method) if method != SpawnMethod::Bare => Some(method),
                _ => return Err(FieldError::SpawnMethod(digit)),
            }
        }
    };
    Ok((method, rest))
}

/// Split `carrier_carried` at the first `_` whose left side is a known class.
///
/// Some real class names contain underscores themselves, so a split is only
/// taken when the catalog recognizes the left side; otherwise the whole token
/// is one class.
pub fn split_carrying<'a, L>(token: &'a str, lookup: &L) -> (&'a str, Option<&'a str>)
where
    L: ObjectLookup + ?Sized,
{
    for (pos, _) in token.match_indices('_') {
        let (carrier, rest) = (&token[..pos], &token[pos + 1..]);
        if rest.is_empty() {
            break;
        }
        if lookup.contains(&carrier.to_ascii_lowercase()) {
            return (carrier, Some(rest));
        }
    }
    (token, None)
}

/// Parse a teki/cap class token: optional spawn prefix, then carrier/carried.
pub fn class_token<'a, L>(token: &'a str, lookup: &L) -> Result<ClassToken<'a>, FieldError>
where
    L: ObjectLookup + ?Sized,
{
    let (spawn_method, rest) = strip_spawn_method(token)?;
    if rest.is_empty() {
        return Err(FieldError::EmptyClass(token.into()));
    }
    let (class, carrying) = split_carrying(rest, lookup);
    Ok(ClassToken {
        spawn_method,
        class,
        carrying,
    })
}
