use std::collections::HashMap;

use super::domain::{ItemId, Loadout, Slot};

/// Upper bound on reskin hops followed before giving up on a chain.
const MAX_RESKIN_HOPS: usize = 8;

/// Maps cosmetic item variants to the canonical item they reskin.
#[derive(Debug, Clone, Default)]
pub struct ReskinResolver {
    reskins: HashMap<ItemId, ItemId>,
}

impl ReskinResolver {
    pub fn new(reskins: HashMap<ItemId, ItemId>) -> Self {
        Self { reskins }
    }

    pub fn len(&self) -> usize {
        self.reskins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reskins.is_empty()
    }

    pub fn resolve(&self, raw: Option<&ItemId>) -> Option<ItemId> {
        raw.map(|item| self.canonical(item).clone())
    }

    /// Follows the reskin chain to its canonical item. Cycles stop at the hop bound.
    pub fn canonical<'a>(&'a self, item: &'a ItemId) -> &'a ItemId {
        let mut current = item;
        for _ in 0..MAX_RESKIN_HOPS {
            match self.reskins.get(current) {
                Some(next) if next != current => current = next,
                _ => return current,
            }
        }

        tracing::warn!(item = %item, "reskin chain exceeded hop bound");
        current
    }

    pub fn resolve_loadout(&self, loadout: &Loadout) -> Loadout {
        let mut resolved = Loadout::default();
        for slot in Slot::ALL {
            resolved.set(slot, self.resolve(loadout.get(slot)));
        }
        resolved
    }
}
