use serde::{Deserialize, Serialize};

use super::domain::{CharacterClass, Loadout};
use super::evaluation::{EvaluationEngine, Verdict};
use super::profile::CharacterSnapshot;

/// Class and gear of a single character awaiting evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterLoadout {
    pub class: Option<CharacterClass>,
    pub loadout: Loadout,
}

/// Per-character result for a roster. `stats_maxed` is reported beside the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterReport {
    pub index: usize,
    pub class: Option<CharacterClass>,
    pub loadout: Loadout,
    pub verdict: Verdict,
    pub stats_maxed: bool,
    pub summary: String,
}

/// Applies one engine across many characters, keeping input order.
pub struct BatchEvaluator<'a> {
    engine: &'a EvaluationEngine,
}

impl<'a> BatchEvaluator<'a> {
    pub fn new(engine: &'a EvaluationEngine) -> Self {
        Self { engine }
    }

    pub fn evaluate_all(&self, characters: &[CharacterLoadout]) -> Vec<Verdict> {
        characters
            .iter()
            .map(|character| self.engine.evaluate(&character.loadout, character.class))
            .collect()
    }

    pub fn evaluate_snapshots(&self, characters: &[CharacterSnapshot]) -> Vec<CharacterReport> {
        characters
            .iter()
            .enumerate()
            .map(|(index, snapshot)| {
                let class = snapshot.character_class();
                let outcome = self.engine.assess(&snapshot.loadout(), class);
                CharacterReport {
                    index,
                    class,
                    summary: outcome.summary(),
                    loadout: outcome.loadout,
                    verdict: outcome.verdict,
                    stats_maxed: snapshot.stats_maxed,
                }
            })
            .collect()
    }
}
