use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One independently fetched part of the rulebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSection {
    SetBonuses,
    Banned,
    Penalties,
    Points5,
    Points3,
    Points2,
    Points1,
    Catalog,
    Reskins,
}

impl RuleSection {
    pub const ALL: [RuleSection; 9] = [
        RuleSection::SetBonuses,
        RuleSection::Banned,
        RuleSection::Penalties,
        RuleSection::Points5,
        RuleSection::Points3,
        RuleSection::Points2,
        RuleSection::Points1,
        RuleSection::Catalog,
        RuleSection::Reskins,
    ];

    /// File name of the section inside a rules directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            RuleSection::SetBonuses => "lh_exa_sets.txt",
            RuleSection::Banned => "banned.txt",
            RuleSection::Penalties => "t11_items.txt",
            RuleSection::Points5 => "points_items5.txt",
            RuleSection::Points3 => "points_items3.txt",
            RuleSection::Points2 => "points_items2.txt",
            RuleSection::Points1 => "points_items1.txt",
            RuleSection::Catalog => "equipment_with_classes.txt",
            RuleSection::Reskins => "reskins.txt",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RuleSection::SetBonuses => "set_bonuses",
            RuleSection::Banned => "banned",
            RuleSection::Penalties => "penalties",
            RuleSection::Points5 => "points_5",
            RuleSection::Points3 => "points_3",
            RuleSection::Points2 => "points_2",
            RuleSection::Points1 => "points_1",
            RuleSection::Catalog => "catalog",
            RuleSection::Reskins => "reskins",
        }
    }

    /// Tier value for point sections.
    pub const fn tier_points(self) -> Option<i32> {
        match self {
            RuleSection::Points5 => Some(5),
            RuleSection::Points3 => Some(3),
            RuleSection::Points2 => Some(2),
            RuleSection::Points1 => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for RuleSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error raised by a source while retrieving a section.
#[derive(Debug, thiserror::Error)]
pub enum RuleSourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rule source unavailable: {0}")]
    Unavailable(String),
}

/// Provides the raw text of each rule section.
pub trait RuleSource: Send + Sync + 'static {
    fn fetch(&self, section: RuleSection) -> Result<String, RuleSourceError>;
}

/// Reads rule sections from text files in a directory.
#[derive(Debug, Clone)]
pub struct FsRuleSource {
    root: PathBuf,
}

impl FsRuleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RuleSource for FsRuleSource {
    fn fetch(&self, section: RuleSection) -> Result<String, RuleSourceError> {
        let path = self.root.join(section.file_name());
        std::fs::read_to_string(&path).map_err(|source| RuleSourceError::Io { path, source })
    }
}
