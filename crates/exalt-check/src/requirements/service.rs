use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::batch::{BatchEvaluator, CharacterReport};
use super::domain::{CharacterClass, Loadout};
use super::evaluation::{EvaluationEngine, EvaluationOutcome};
use super::loader::{RuleLoadError, RuleLoadStatus, RuleSource, RuleTableLoader};
use super::profile::{CharacterSnapshot, PlayerName};
use super::table::RuleTable;

/// Single loadout check as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearCheckRequest {
    #[serde(default)]
    pub class: Option<CharacterClass>,
    #[serde(flatten)]
    pub loadout: Loadout,
    /// Take the class from the equipped ability when `class` is absent.
    #[serde(default)]
    pub infer_class: bool,
}

/// Characters fetched from a player's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRequest {
    pub player: PlayerName,
    #[serde(default)]
    pub characters: Vec<CharacterSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterReport {
    pub player: PlayerName,
    pub characters: Vec<CharacterReport>,
}

/// Error raised by the requirement service.
#[derive(Debug, thiserror::Error)]
pub enum RequirementServiceError {
    #[error("exalted rules are not loaded yet")]
    RulesNotLoaded,
    #[error(transparent)]
    Load(#[from] RuleLoadError),
}

/// Service composing the rule loader and the evaluation engine.
pub struct ExaltedRequirementService<S> {
    loader: RuleTableLoader<S>,
}

impl<S: RuleSource> ExaltedRequirementService<S> {
    pub fn new(source: S) -> Self {
        Self {
            loader: RuleTableLoader::new(source),
        }
    }

    pub async fn ensure_loaded(&self) -> Result<Arc<RuleTable>, RequirementServiceError> {
        Ok(self.loader.ensure_loaded().await?)
    }

    pub fn status(&self) -> RuleLoadStatus {
        self.loader.status()
    }

    fn engine(&self) -> Option<EvaluationEngine> {
        self.loader.table().map(EvaluationEngine::new)
    }

    /// Evaluate one loadout. Fails if the rulebook has not finished loading.
    pub fn check(
        &self,
        request: &GearCheckRequest,
    ) -> Result<EvaluationOutcome, RequirementServiceError> {
        let engine = self
            .engine()
            .ok_or(RequirementServiceError::RulesNotLoaded)?;

        let class = match request.class {
            Some(class) => Some(class),
            None if request.infer_class => class_for_ability(engine.table(), &request.loadout),
            None => None,
        };

        Ok(engine.assess(&request.loadout, class))
    }

    /// Evaluate every character of a roster. Yields nothing until the rulebook is loaded.
    pub fn evaluate_roster(&self, request: &RosterRequest) -> RosterReport {
        let characters = match self.engine() {
            Some(engine) if !request.characters.is_empty() => {
                BatchEvaluator::new(&engine).evaluate_snapshots(&request.characters)
            }
            Some(_) => Vec::new(),
            None => {
                tracing::debug!(
                    player = request.player.as_str(),
                    "roster requested before rules loaded"
                );
                Vec::new()
            }
        };

        RosterReport {
            player: request.player.clone(),
            characters,
        }
    }
}

/// Class the equipped ability belongs to, looked up through its canonical item.
pub fn class_for_ability(table: &RuleTable, loadout: &Loadout) -> Option<CharacterClass> {
    let ability = table.reskins().resolve(loadout.ability.as_ref())?;
    table.catalog().class_of(&ability)
}
