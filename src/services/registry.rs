//! Run-scoped identity sets deciding which entities still need a node.

use std::collections::HashSet;

/// Entity kinds tracked for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Hashtag,
    User,
    Url,
}

/// Three independent sets of natural keys seen during one run.
///
/// Not shared across threads; the loader processes one record at a time.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    hashtags: HashSet<String>,
    users: HashSet<String>,
    urls: HashSet<String>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as seen for `kind`; true only the first time.
    pub fn register(&mut self, kind: EntityKind, key: &str) -> bool {
        let seen = self.set_mut(kind);
        if seen.contains(key) {
            return false;
        }
        seen.insert(key.to_owned())
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Hashtag => self.hashtags.len(),
            EntityKind::User => self.users.len(),
            EntityKind::Url => self.urls.len(),
        }
    }

    fn set_mut(&mut self, kind: EntityKind) -> &mut HashSet<String> {
        match kind {
            EntityKind::Hashtag => &mut self.hashtags,
            EntityKind::User => &mut self.users,
            EntityKind::Url => &mut self.urls,
        }
    }
}
