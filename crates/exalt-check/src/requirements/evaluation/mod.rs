mod scoring;
mod verdict;

pub use verdict::Verdict;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{CharacterClass, Loadout, Slot};
use super::table::RuleTable;

/// Stateless evaluator applying a loaded rule table to loadouts.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    table: Arc<RuleTable>,
}

impl EvaluationEngine {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn evaluate(&self, loadout: &Loadout, class: Option<CharacterClass>) -> Verdict {
        self.assess(loadout, class).verdict
    }

    /// Evaluates a loadout and keeps the scoring trail.
    pub fn assess(&self, loadout: &Loadout, class: Option<CharacterClass>) -> EvaluationOutcome {
        let resolved = self.table.reskins().resolve_loadout(loadout);

        let banned = resolved.slots().find_map(|(slot, item)| {
            item.filter(|item| self.table.is_banned(item))
                .map(|item| (slot, item.clone()))
        });
        if let Some((slot, item)) = banned {
            tracing::debug!(%item, slot = slot.label(), "loadout contains a banned item");
            return EvaluationOutcome {
                verdict: Verdict::Banned { slot, item },
                class,
                loadout: resolved,
                components: Vec::new(),
            };
        }

        let set_bonus = self
            .table
            .set_bonuses()
            .iter()
            .position(|set| set.matches(&resolved));

        if let (Some(index), Some(class)) = (set_bonus, class) {
            let required = self.table.threshold(class);
            let component = ScoreComponent {
                source: ScoreSource::SetBonus,
                slots: Slot::ALL.to_vec(),
                points: required,
                notes: format!("loadout completes set bonus #{}", index + 1),
            };
            return EvaluationOutcome {
                verdict: Verdict::Ok {
                    points: required,
                    required,
                    set_bonus: true,
                },
                class: Some(class),
                loadout: resolved,
                components: vec![component],
            };
        }
        if set_bonus.is_some() {
            tracing::debug!("set bonus matched without a class; falling back to points");
        }

        let sheet = scoring::score_loadout(&resolved, class, &self.table);
        let verdict = match class {
            None => Verdict::NoClassSelected {
                points: sheet.points,
            },
            Some(class) => {
                let required = self.table.threshold(class);
                if sheet.points >= required {
                    Verdict::Ok {
                        points: sheet.points,
                        required,
                        set_bonus: false,
                    }
                } else {
                    Verdict::InsufficientPoints {
                        points: sheet.points,
                        required,
                    }
                }
            }
        };

        tracing::debug!(?class, ?verdict, "evaluated loadout");

        EvaluationOutcome {
            verdict,
            class,
            loadout: resolved,
            components: sheet.components,
        }
    }
}

/// Where a score contribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreSource {
    Tier { points: i32 },
    Penalty,
    SetBonus,
}

/// Discrete contribution to a loadout's points, kept for explanations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub source: ScoreSource,
    pub slots: Vec<Slot>,
    pub points: i32,
    pub notes: String,
}

/// Verdict plus the resolved loadout and scoring trail behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub verdict: Verdict,
    pub class: Option<CharacterClass>,
    pub loadout: Loadout,
    pub components: Vec<ScoreComponent>,
}

impl EvaluationOutcome {
    pub fn summary(&self) -> String {
        match self.class {
            Some(class) => format!("{class}: {}", self.verdict.summary()),
            None => self.verdict.summary(),
        }
    }
}
