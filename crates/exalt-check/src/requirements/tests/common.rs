use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::requirements::domain::{CharacterClass, ItemId, Loadout};
use crate::requirements::evaluation::EvaluationEngine;
use crate::requirements::loader::{read_rule_table, RuleSection, RuleSource, RuleSourceError};
use crate::requirements::profile::{CharacterSnapshot, PlayerName};
use crate::requirements::service::{ExaltedRequirementService, RosterRequest};
use crate::requirements::table::RuleTable;

pub(super) const SET_BONUSES: &str = "\
bow-of-the-void quiver-of-the-void hide-of-the-void ring-of-the-void
";

pub(super) const BANNED: &str = "doom-bow\nring-of-decades\n";

pub(super) const PENALTIES: &str = "robe-of-the-grand-sorcerer\nring-of-exalted-dexterity\n";

pub(super) const POINTS_5: &str = "\
staff-of-the-fundamental-core
tome-of-holy-guidance
special 3 item:healing-tome item:ritual-robe item:the-twilight-gemstone
";

pub(super) const POINTS_3: &str = "\
wand-of-recompense
the-twilight-gemstone
special 2 item:prism-of-dancing-swords class:trickster
";

pub(super) const POINTS_2: &str = "ritual-robe\nsword-of-acclaim\n";

pub(super) const POINTS_1: &str = "\
staff-of-the-fundamental-core
ring-of-unbound-attack
mystery-relic
";

pub(super) const CATALOG: &str = "\
icons/1.png ^ Staff of the Fundamental Core ^ /wiki/staff-of-the-fundamental-core ^ 1 ^ noclass
icons/2.png ^ Wand of Recompense ^ /wiki/wand-of-recompense ^ 1 ^ noclass
icons/3.png ^ Sword of Acclaim ^ /wiki/sword-of-acclaim ^ 1 ^ noclass
icons/4.png ^ Doom Bow ^ /wiki/doom-bow ^ 1 ^ noclass
icons/5.png ^ Bow of the Void ^ /wiki/bow-of-the-void ^ 1 ^ noclass
icons/6.png ^ Tome of Holy Guidance ^ /wiki/tome-of-holy-guidance ^ 2 ^ priest
icons/7.png ^ Healing Tome ^ /wiki/healing-tome ^ 2 ^ priest
icons/8.png ^ Prism of Dancing Swords ^ /wiki/prism-of-dancing-swords ^ 2 ^ trickster
icons/9.png ^ Quiver of the Void ^ /wiki/quiver-of-the-void ^ 2 ^ archer
icons/10.png ^ Ritual Robe ^ /wiki/ritual-robe ^ 3 ^ noclass
icons/11.png ^ Robe of the Grand Sorcerer ^ /wiki/robe-of-the-grand-sorcerer ^ 3 ^ noclass
icons/12.png ^ Hide of the Void ^ /wiki/hide-of-the-void ^ 3 ^ noclass
icons/13.png ^ The Twilight Gemstone ^ /wiki/the-twilight-gemstone ^ 4 ^ noclass
icons/14.png ^ Ring of Unbound Attack ^ /wiki/ring-of-unbound-attack ^ 4 ^ noclass
icons/15.png ^ Ring of Exalted Dexterity ^ /wiki/ring-of-exalted-dexterity ^ 4 ^ noclass
icons/16.png ^ Ring of Decades ^ /wiki/ring-of-decades ^ 4 ^ noclass
icons/17.png ^ Ring of the Void ^ /wiki/ring-of-the-void ^ 4 ^ noclass
";

pub(super) const RESKINS: &str = "\
bone-staff-of-the-core ^ staff-of-the-fundamental-core
void-bow-skin ^ bow-of-the-void
cursed-doom-bow ^ doom-bow
";

/// In-memory rule source counting every fetch.
pub(super) struct MemorySource {
    sections: HashMap<RuleSection, String>,
    fetches: Arc<AtomicUsize>,
    failures_remaining: AtomicUsize,
}

impl MemorySource {
    pub(super) fn fixture() -> Self {
        let sections = [
            (RuleSection::SetBonuses, SET_BONUSES),
            (RuleSection::Banned, BANNED),
            (RuleSection::Penalties, PENALTIES),
            (RuleSection::Points5, POINTS_5),
            (RuleSection::Points3, POINTS_3),
            (RuleSection::Points2, POINTS_2),
            (RuleSection::Points1, POINTS_1),
            (RuleSection::Catalog, CATALOG),
            (RuleSection::Reskins, RESKINS),
        ]
        .into_iter()
        .map(|(section, text)| (section, text.to_string()))
        .collect();

        Self {
            sections,
            fetches: Arc::new(AtomicUsize::new(0)),
            failures_remaining: AtomicUsize::new(0),
        }
    }

    /// Fails the given number of fetches before serving data.
    pub(super) fn failing(mut self, failures: usize) -> Self {
        self.failures_remaining = AtomicUsize::new(failures);
        self
    }

    pub(super) fn with_section(mut self, section: RuleSection, text: &str) -> Self {
        self.sections.insert(section, text.to_string());
        self
    }

    pub(super) fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetches)
    }
}

impl RuleSource for MemorySource {
    fn fetch(&self, section: RuleSection) -> Result<String, RuleSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if should_fail {
            return Err(RuleSourceError::Unavailable(format!(
                "{section} temporarily unreachable"
            )));
        }

        Ok(self.sections.get(&section).cloned().unwrap_or_default())
    }
}

pub(super) fn rule_table() -> Arc<RuleTable> {
    Arc::new(read_rule_table(&MemorySource::fixture()).expect("fixture rules load"))
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::new(rule_table())
}

pub(super) fn item(id: &str) -> ItemId {
    ItemId::from(id)
}

pub(super) fn loadout(
    weapon: Option<&str>,
    ability: Option<&str>,
    armor: Option<&str>,
    ring: Option<&str>,
) -> Loadout {
    Loadout::from_slots([weapon, ability, armor, ring])
}

pub(super) fn void_set() -> Loadout {
    loadout(
        Some("bow-of-the-void"),
        Some("quiver-of-the-void"),
        Some("hide-of-the-void"),
        Some("ring-of-the-void"),
    )
}

pub(super) fn priest_class() -> Option<CharacterClass> {
    Some(CharacterClass::Priest)
}

pub(super) async fn loaded_service() -> Arc<ExaltedRequirementService<MemorySource>> {
    let service = Arc::new(ExaltedRequirementService::new(MemorySource::fixture()));
    service.ensure_loaded().await.expect("fixture rules load");
    service
}

pub(super) fn snapshot(class: &str, equipment: [&str; 4], stats_maxed: bool) -> CharacterSnapshot {
    CharacterSnapshot {
        class: Some(class.to_string()),
        equipment: equipment
            .iter()
            .map(|link| Some(link.to_string()))
            .collect(),
        stats_maxed,
    }
}

pub(super) fn roster_request() -> RosterRequest {
    RosterRequest {
        player: PlayerName::parse("Oryx").expect("valid name"),
        characters: vec![
            snapshot(
                "priest",
                [
                    "/wiki/staff-of-the-fundamental-core",
                    "/wiki/tome-of-holy-guidance",
                    "/wiki/ritual-robe",
                    "/wiki/ring-of-unbound-attack",
                ],
                true,
            ),
            snapshot(
                "wizard",
                [
                    "/wiki/doom-bow",
                    "",
                    "/wiki/ritual-robe",
                    "/wiki/ring-of-unbound-attack",
                ],
                false,
            ),
        ],
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
