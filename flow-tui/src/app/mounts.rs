use std::collections::HashMap;

use super::View;

/// Something on screen that can own in-flight requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountKey {
    View(View),
    Form,
}

/// Stamp handed to a request, checked again when its result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountId {
    pub key: MountKey,
    pub generation: u64,
}

/// Mount generations of views and overlays. A result stamped with a generation
/// that is no longer current belongs to a view that was left or re-opened.
#[derive(Debug, Default)]
pub struct MountTracker {
    next: u64,
    active: HashMap<MountKey, u64>,
}

impl MountTracker {
    pub fn mount(&mut self, key: MountKey) -> MountId {
        self.next += 1;
        self.active.insert(key, self.next);
        MountId {
            key,
            generation: self.next,
        }
    }

    pub fn unmount(&mut self, key: MountKey) {
        self.active.remove(&key);
    }

    pub fn current(&self, key: MountKey) -> Option<MountId> {
        self.active
            .get(&key)
            .map(|&generation| MountId { key, generation })
    }

    pub fn is_live(&self, id: MountId) -> bool {
        self.active.get(&id.key) == Some(&id.generation)
    }
}
