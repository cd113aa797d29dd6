use serde::{Deserialize, Serialize};

use super::super::domain::{ItemId, Slot};

/// Outcome of checking one loadout against the exalted requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// First equipped slot holding a banned item.
    Banned { slot: Slot, item: ItemId },
    NoClassSelected { points: i32 },
    Ok {
        points: i32,
        required: i32,
        set_bonus: bool,
    },
    InsufficientPoints { points: i32, required: i32 },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Ok { .. })
    }

    /// Slot index (0 weapon through 3 ring) of a banned verdict.
    pub fn banned_slot_index(&self) -> Option<usize> {
        match self {
            Verdict::Banned { slot, .. } => Some(slot.index()),
            _ => None,
        }
    }

    pub fn points(&self) -> Option<i32> {
        match self {
            Verdict::Banned { .. } => None,
            Verdict::NoClassSelected { points }
            | Verdict::Ok { points, .. }
            | Verdict::InsufficientPoints { points, .. } => Some(*points),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Verdict::Banned { item, .. } => {
                format!("{item} is banned from an exalted lost halls run")
            }
            Verdict::NoClassSelected { points } => format!(
                "currently {points} points for an exalted lost halls run (no class selected)"
            ),
            Verdict::Ok {
                set_bonus: true, ..
            } => "accepted ST set for an exalted lost halls run".to_string(),
            Verdict::Ok {
                points, required, ..
            } => format!("{points}/{required} points for an exalted lost halls run"),
            Verdict::InsufficientPoints { points, required } => format!(
                "{points}/{required} points, short of the exalted lost halls requirement"
            ),
        }
    }
}
