//! Node Registry
//!
//! Per-tree bookkeeping keyed by declared node id. An id is either absent
//! (never referenced), pending (claimed as a child by a split that has been
//! materialized, but not yet declared itself) or attached (materialized into
//! the tree arena). The root id is seeded as pending before any line is read.

use crate::ensemble::Position;
use std::collections::HashMap;

/// Declared id of every tree's root.
pub const ROOT_ID: u32 = 0;

/// Where a pending node will be attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Arena index and declared id of the parent; `None` for the root
    pub parent: Option<(usize, u32)>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Pending(Placement),
    Attached { index: usize, parent: Option<u32> },
}

/// Why the registry refused a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryConflict {
    /// Attach of an id no split has claimed
    Unclaimed,
    /// Attach of an id that is already in the arena
    AlreadyAttached,
    /// Claim of an id that already has a parent; carries that parent's id
    AlreadyClaimed { previous_parent: Option<u32> },
}

#[derive(Debug, Clone)]
pub struct NodeRegistry {
    slots: HashMap<u32, Slot>,
}

impl NodeRegistry {
    /// A registry with only the root pending.
    pub fn new() -> Self {
        let mut slots = HashMap::new();
        slots.insert(
            ROOT_ID,
            Slot::Pending(Placement {
                parent: None,
                position: Position::Root,
            }),
        );
        NodeRegistry { slots }
    }

    /// Record that split `parent` expects `child` at `position`.
    pub fn claim(
        &mut self,
        child: u32,
        parent: (usize, u32),
        position: Position,
    ) -> Result<(), RegistryConflict> {
        self.check_claim(child)?;
        self.slots.insert(
            child,
            Slot::Pending(Placement {
                parent: Some(parent),
                position,
            }),
        );
        Ok(())
    }

    /// Whether `child` is still free to be claimed. Does not modify the registry.
    pub fn check_claim(&self, child: u32) -> Result<(), RegistryConflict> {
        match self.slots.get(&child) {
            None => Ok(()),
            Some(Slot::Pending(placement)) => Err(RegistryConflict::AlreadyClaimed {
                previous_parent: placement.parent.map(|(_, id)| id),
            }),
            Some(Slot::Attached { parent, .. }) => Err(RegistryConflict::AlreadyClaimed {
                previous_parent: *parent,
            }),
        }
    }

    /// The placement `id` would be attached at. Does not modify the registry.
    pub fn placement(&self, id: u32) -> Result<Placement, RegistryConflict> {
        match self.slots.get(&id) {
            Some(Slot::Pending(placement)) => Ok(*placement),
            Some(Slot::Attached { .. }) => Err(RegistryConflict::AlreadyAttached),
            None => Err(RegistryConflict::Unclaimed),
        }
    }

    /// Move a pending id into the arena at `index`, returning its placement.
    pub fn attach(&mut self, id: u32, index: usize) -> Result<Placement, RegistryConflict> {
        let placement = self.placement(id)?;
        self.slots.insert(
            id,
            Slot::Attached {
                index,
                parent: placement.parent.map(|(_, parent_id)| parent_id),
            },
        );
        Ok(placement)
    }

    /// Arena index of an attached id.
    pub fn index_of(&self, id: u32) -> Option<usize> {
        match self.slots.get(&id) {
            Some(Slot::Attached { index, .. }) => Some(*index),
            _ => None,
        }
    }

    /// Ids still waiting for their declaration, ascending.
    pub fn unresolved(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Pending(_)))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
