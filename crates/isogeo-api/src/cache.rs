// Session-scoped name→id indices
//
// Filled by list and create calls, read by duplicate detection, pruned on
// delete. A hint for avoiding duplicate creates, not a source of truth.

use std::collections::HashMap;

/// Where an index applies: the user's whole view, or one parent entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheScope {
    User,
    Parent(String),
}

/// One name→id index per (entity family, scope).
#[derive(Debug, Default)]
pub struct NameCache {
    indices: HashMap<(&'static str, CacheScope), HashMap<String, String>>,
}

impl NameCache {
    /// Replace the whole index of `scope` with `entries`.
    pub fn replace<I>(&mut self, family: &'static str, scope: CacheScope, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.indices
            .insert((family, scope), entries.into_iter().collect());
    }

    pub fn insert(
        &mut self,
        family: &'static str,
        scope: CacheScope,
        name: impl Into<String>,
        id: impl Into<String>,
    ) {
        self.indices
            .entry((family, scope))
            .or_default()
            .insert(name.into(), id.into());
    }

    pub fn lookup(&self, family: &'static str, scope: &CacheScope, name: &str) -> Option<&str> {
        self.indices
            .get(&(family, scope.clone()))?
            .get(name)
            .map(String::as_str)
    }

    /// True when the index of `scope` is missing or holds no entry.
    pub fn is_empty(&self, family: &'static str, scope: &CacheScope) -> bool {
        self.indices
            .get(&(family, scope.clone()))
            .is_none_or(HashMap::is_empty)
    }

    pub fn len(&self, family: &'static str, scope: &CacheScope) -> usize {
        self.indices
            .get(&(family, scope.clone()))
            .map_or(0, HashMap::len)
    }

    /// Drop `id` from every index of `family`. Returns how many names pointed at it.
    pub fn remove_id(&mut self, family: &'static str, id: &str) -> usize {
        let mut removed = 0;
        for ((fam, _), index) in &mut self.indices {
            if *fam != family {
                continue;
            }
            let before = index.len();
            index.retain(|_, v| v != id);
            removed += before - index.len();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_independent() {
        let mut cache = NameCache::default();
        let wg = CacheScope::Parent("32f7e95ec4e94ca3bc1afda960003882".into());
        cache.insert("Share", CacheScope::User, "Open portal", "a1");
        cache.insert("Share", wg.clone(), "Open portal", "b2");

        assert_eq!(cache.lookup("Share", &CacheScope::User, "Open portal"), Some("a1"));
        assert_eq!(cache.lookup("Share", &wg, "Open portal"), Some("b2"));
        assert_eq!(cache.lookup("License", &wg, "Open portal"), None);
    }

    #[test]
    fn replace_overwrites_previous_listing() {
        let mut cache = NameCache::default();
        cache.insert("License", CacheScope::User, "old", "1");
        cache.replace(
            "License",
            CacheScope::User,
            [("new".to_owned(), "2".to_owned())],
        );
        assert_eq!(cache.lookup("License", &CacheScope::User, "old"), None);
        assert_eq!(cache.len("License", &CacheScope::User), 1);
    }

    #[test]
    fn remove_id_prunes_every_scope_of_family() {
        let mut cache = NameCache::default();
        cache.insert("Share", CacheScope::User, "a", "x");
        cache.insert("Share", CacheScope::Parent("p".into()), "a", "x");
        cache.insert("License", CacheScope::User, "a", "x");

        assert_eq!(cache.remove_id("Share", "x"), 2);
        assert!(cache.is_empty("Share", &CacheScope::User));
        assert!(!cache.is_empty("License", &CacheScope::User));
    }
}
