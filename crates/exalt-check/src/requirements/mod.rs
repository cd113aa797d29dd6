//! Exalted Lost Halls gear requirements: rulebook loading, loadout evaluation and roster checks.

pub mod batch;
pub mod domain;
pub mod evaluation;
pub mod loader;
pub mod profile;
pub mod reskin;
pub mod router;
pub mod service;
pub mod table;

#[cfg(test)]
mod tests;

pub use batch::{BatchEvaluator, CharacterLoadout, CharacterReport};
pub use domain::{exalted_thresholds, CharacterClass, GearItem, ItemId, Loadout, Slot};
pub use evaluation::{EvaluationEngine, EvaluationOutcome, ScoreComponent, ScoreSource, Verdict};
pub use loader::{
    FsRuleSource, RuleLoadError, RuleLoadStatus, RuleSection, RuleSource, RuleSourceError,
    RuleTableLoader,
};
pub use profile::{item_id_from_link, CharacterSnapshot, PlayerName, PlayerNameError};
pub use reskin::ReskinResolver;
pub use router::requirement_router;
pub use service::{
    class_for_ability, ExaltedRequirementService, GearCheckRequest, RequirementServiceError,
    RosterReport, RosterRequest,
};
pub use table::{Condition, GearCatalog, PointRule, PointTier, RuleTable, SetBonus};
