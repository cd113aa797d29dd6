use std::collections::BTreeMap;

use super::super::domain::{CharacterClass, ItemId, Loadout, Slot};
use super::super::table::{Condition, PointRule, PointTier, RuleTable};
use super::{ScoreComponent, ScoreSource};

/// Tracks which gear slots already earned points during one evaluation.
struct SlotCredits {
    credited: BTreeMap<Slot, bool>,
}

impl SlotCredits {
    fn new() -> Self {
        Self {
            credited: Slot::ALL.into_iter().map(|slot| (slot, false)).collect(),
        }
    }

    fn is_credited(&self, slot: Slot) -> bool {
        self.credited.get(&slot).copied().unwrap_or(false)
    }

    fn credit(&mut self, slot: Slot) {
        self.credited.insert(slot, true);
    }
}

pub(crate) struct ScoreSheet {
    pub points: i32,
    pub components: Vec<ScoreComponent>,
}

/// Accumulates tier points and penalties for an already resolved loadout.
pub(crate) fn score_loadout(
    loadout: &Loadout,
    class: Option<CharacterClass>,
    table: &RuleTable,
) -> ScoreSheet {
    let mut credits = SlotCredits::new();
    let mut components = Vec::new();
    let mut points = 0;

    for tier in table.tiers() {
        for rule in &tier.rules {
            if let Some(component) = apply_rule(rule, tier, loadout, class, table, &mut credits) {
                points += component.points;
                components.push(component);
            }
        }
    }

    for (slot, item) in loadout.slots() {
        let Some(item) = item else { continue };
        if table.is_penalized(item) {
            points -= 1;
            components.push(ScoreComponent {
                source: ScoreSource::Penalty,
                slots: vec![slot],
                points: -1,
                notes: format!("{item} carries a one point penalty"),
            });
        }
    }

    ScoreSheet { points, components }
}

fn apply_rule(
    rule: &PointRule,
    tier: &PointTier,
    loadout: &Loadout,
    class: Option<CharacterClass>,
    table: &RuleTable,
    credits: &mut SlotCredits,
) -> Option<ScoreComponent> {
    let items: Vec<&ItemId> = match rule {
        PointRule::Simple(item) => vec![item],
        PointRule::Special { conditions, .. } => {
            let mut items = Vec::new();
            for condition in conditions {
                match condition {
                    Condition::Item(item) => items.push(item),
                    Condition::Class(required) if class == Some(*required) => {}
                    Condition::Class(_) => return None,
                }
            }
            items
        }
    };

    let mut slots = Vec::with_capacity(items.len());
    for item in &items {
        match table.catalog().slot_of(item) {
            Some(slot) if loadout.get(slot) != Some(*item) => return None,
            Some(slot) if credits.is_credited(slot) => return None,
            Some(slot) => slots.push(slot),
            None if !loadout.contains(item) => return None,
            None => {
                tracing::warn!(item = %item, "item has no gear slot category; it cannot be credited");
            }
        }
    }

    for slot in &slots {
        credits.credit(*slot);
    }

    Some(ScoreComponent {
        source: ScoreSource::Tier { points: tier.points },
        slots,
        points: tier.points,
        notes: format!("{} qualifies for {} point(s)", rule.describe(), tier.points),
    })
}
