use std::str::FromStr;

use super::super::domain::{CharacterClass, GearItem, ItemId, Slot};
use super::super::profile::item_id_from_link;
use super::super::table::{Condition, PointRule, SetBonus};

const SPECIAL_MARKER: &str = "special";
const NO_CLASS: &str = "noclass";

/// Reason a rule row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum RowError {
    #[error("expected {expected} field(s), found {found}")]
    Arity { expected: usize, found: usize },
    #[error("special rule count '{0}' is not a number")]
    Count(String),
    #[error("special rule lists no conditions")]
    EmptySpecial,
    #[error("unknown special requirement '{0}'")]
    UnknownCondition(String),
    #[error("unknown class '{0}' in special requirement")]
    UnknownClass(String),
    #[error("category '{0}' is not a number")]
    Category(String),
    #[error("row is not valid delimited text: {0}")]
    Delimited(String),
}

fn skip(section: &'static str, line: u64, raw: &str, error: &RowError) {
    tracing::warn!(section, line, row = raw, %error, "skipping malformed rule row");
}

fn token_rows(text: &str) -> impl Iterator<Item = (u64, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index as u64 + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// One item id per line (banned and penalty lists).
pub(crate) fn parse_item_list(section: &'static str, text: &str) -> Vec<ItemId> {
    let mut items = Vec::new();
    for (line, row) in token_rows(text) {
        let tokens: Vec<&str> = row.split_whitespace().collect();
        if tokens.len() != 1 {
            skip(
                section,
                line,
                row,
                &RowError::Arity {
                    expected: 1,
                    found: tokens.len(),
                },
            );
            continue;
        }
        items.push(ItemId::from(tokens[0]));
    }
    items
}

/// Four whitespace separated item ids per line.
pub(crate) fn parse_set_bonuses(section: &'static str, text: &str) -> Vec<SetBonus> {
    let mut sets = Vec::new();
    for (line, row) in token_rows(text) {
        let tokens: Vec<&str> = row.split_whitespace().collect();
        match <[&str; 4]>::try_from(tokens.as_slice()) {
            Ok(items) => sets.push(SetBonus {
                items: items.map(ItemId::from),
            }),
            Err(_) => skip(
                section,
                line,
                row,
                &RowError::Arity {
                    expected: 4,
                    found: tokens.len(),
                },
            ),
        }
    }
    sets
}

pub(crate) fn parse_point_rules(section: &'static str, text: &str) -> Vec<PointRule> {
    let mut rules = Vec::new();
    for (line, row) in token_rows(text) {
        match parse_point_rule(row) {
            Ok(rule) => rules.push(rule),
            Err(error) => skip(section, line, row, &error),
        }
    }
    rules
}

/// Parses `item` or `special <count> item:<id> class:<name> ...`.
pub(crate) fn parse_point_rule(row: &str) -> Result<PointRule, RowError> {
    let tokens: Vec<&str> = row.split_whitespace().collect();
    match tokens.as_slice() {
        [item] if *item != SPECIAL_MARKER => Ok(PointRule::Simple(ItemId::from(*item))),
        [marker, count, requirements @ ..] if *marker == SPECIAL_MARKER => {
            let required_count = count
                .parse::<usize>()
                .map_err(|_| RowError::Count(count.to_string()))?;
            if requirements.is_empty() {
                return Err(RowError::EmptySpecial);
            }

            let conditions = requirements
                .iter()
                .map(|requirement| parse_condition(requirement))
                .collect::<Result<Vec<_>, _>>()?;

            if required_count != conditions.len() {
                tracing::warn!(
                    row,
                    required_count,
                    listed = conditions.len(),
                    "special rule count differs from its condition list; all conditions are required"
                );
            }

            Ok(PointRule::Special {
                required_count,
                conditions,
            })
        }
        _ => Err(RowError::Arity {
            expected: 1,
            found: tokens.len(),
        }),
    }
}

fn parse_condition(requirement: &str) -> Result<Condition, RowError> {
    match requirement.split_once(':') {
        Some(("item", item)) if !item.is_empty() => Ok(Condition::Item(ItemId::from(item))),
        Some(("class", class)) => CharacterClass::from_str(class)
            .map(Condition::Class)
            .map_err(|_| RowError::UnknownClass(class.to_string())),
        _ => Err(RowError::UnknownCondition(requirement.to_string())),
    }
}

fn caret_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(b'^')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn caret_rows<'a>(
    section: &'static str,
    text: &'a str,
) -> impl Iterator<Item = (u64, csv::StringRecord)> + 'a {
    caret_reader(text)
        .into_records()
        .filter_map(move |record| match record {
            Ok(record) => {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                if record.iter().all(str::is_empty) {
                    None
                } else {
                    Some((line, record))
                }
            }
            Err(error) => {
                let line = error.position().map(|pos| pos.line()).unwrap_or_default();
                skip(section, line, "", &RowError::Delimited(error.to_string()));
                None
            }
        })
}

/// `<icon> ^ <name> ^ <link> ^ <category> ^ <class>` rows.
pub(crate) fn parse_catalog(section: &'static str, text: &str) -> Vec<GearItem> {
    let mut items = Vec::new();
    for (line, record) in caret_rows(section, text) {
        let raw = record.iter().collect::<Vec<_>>().join(" ^ ");
        if record.len() != 5 {
            skip(
                section,
                line,
                &raw,
                &RowError::Arity {
                    expected: 5,
                    found: record.len(),
                },
            );
            continue;
        }

        let (icon, name, link, category, class) =
            (&record[0], &record[1], &record[2], &record[3], &record[4]);

        let slot = match category.parse::<u8>() {
            Ok(category) => Slot::from_category(category),
            Err(_) => {
                skip(section, line, &raw, &RowError::Category(category.to_string()));
                continue;
            }
        };
        if slot.is_none() {
            tracing::debug!(line, item = link, category, "catalog item has no gear slot");
        }

        let class = if class.eq_ignore_ascii_case(NO_CLASS) {
            None
        } else {
            match CharacterClass::from_str(class) {
                Ok(class) => Some(class),
                Err(error) => {
                    tracing::warn!(line, item = link, %error, "catalog item class not recognized");
                    None
                }
            }
        };

        items.push(GearItem {
            id: item_id_from_link(link),
            name: name.to_string(),
            slot,
            class,
            icon: icon.to_string(),
        });
    }
    items
}

/// `<reskin> ^ <canonical>` rows.
pub(crate) fn parse_reskins(section: &'static str, text: &str) -> Vec<(ItemId, ItemId)> {
    let mut pairs = Vec::new();
    for (line, record) in caret_rows(section, text) {
        if record.len() != 2 || record[0].is_empty() || record[1].is_empty() {
            let raw = record.iter().collect::<Vec<_>>().join(" ^ ");
            skip(
                section,
                line,
                &raw,
                &RowError::Arity {
                    expected: 2,
                    found: record.len(),
                },
            );
            continue;
        }
        pairs.push((ItemId::from(&record[0]), ItemId::from(&record[1])));
    }
    pairs
}
