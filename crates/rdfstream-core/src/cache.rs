//! Bounded node caches, including caches whose values depend on lookup ids.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::lookup::LookupTable;

/// Bounded LRU cache from already-seen host terms to their encoded form.
///
/// A capacity of zero is treated as one.
pub fn node_cache<K: Hash + Eq, V>(capacity: usize) -> LruCache<K, V> {
    LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN))
}

/// Cached value for `key`, computing and caching it on a miss.
///
/// A hit refreshes the entry's recency. The key is only cloned on a miss.
pub(crate) fn get_or_put<K, V, Q>(
    cache: &mut LruCache<K, V>,
    key: &Q,
    make: impl FnOnce() -> V,
) -> V
where
    K: Hash + Eq + Borrow<Q>,
    V: Clone,
    Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
{
    if let Some(value) = cache.get(key) {
        return value.clone();
    }
    let value = make();
    cache.put(key.to_owned(), value.clone());
    value
}

/// A lookup id together with the generation it had when it was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub id: u32,
    pub generation: u32,
}

impl SlotRef {
    pub fn capture(table: &LookupTable, id: u32) -> Self {
        Self {
            id,
            generation: table.generation(id),
        }
    }

    /// True while the slot still holds the value it held at capture time.
    pub fn is_current(&self, table: &LookupTable) -> bool {
        table.generation(self.id) == self.generation
    }
}

/// An encoded term that is only valid while its lookup slots are unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentNode<T> {
    pub encoded: T,
    /// Name slot for IRIs, datatype slot for literals.
    pub primary: SlotRef,
    /// Prefix slot for IRIs.
    pub secondary: Option<SlotRef>,
}

impl<T> DependentNode<T> {
    pub fn is_current(&self, primary: &LookupTable, secondary: Option<&LookupTable>) -> bool {
        if !self.primary.is_current(primary) {
            return false;
        }
        match (self.secondary, secondary) {
            (Some(slot), Some(table)) => slot.is_current(table),
            (None, _) => true,
            (Some(_), None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[test]
    fn cache_evicts_least_recently_used() {
        let mut cache: LruCache<String, u32> = node_cache(2);
        cache.put("a".into(), 1);
        cache.put("b".into(), 2);
        assert_eq!(cache.get("a"), Some(&1));

        cache.put("c".into(), 3);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.get("c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn get_or_put_computes_once_and_refreshes() {
        let mut cache: LruCache<String, String> = node_cache(2);
        let mut calls = 0;
        for _ in 0..3 {
            let value = get_or_put(&mut cache, "x", || {
                calls += 1;
                "X".to_string()
            });
            assert_eq!(value, "X");
        }
        assert_eq!(calls, 1);

        cache.put("y".into(), "Y".into());
        get_or_put(&mut cache, "x", || unreachable!("x is cached"));
        cache.put("z".into(), "Z".into());
        assert!(cache.contains("x"));
        assert!(!cache.contains("y"));
    }

    #[test]
    fn zero_capacity_holds_one_entry() {
        let mut cache: LruCache<String, u32> = node_cache(0);
        assert_eq!(cache.cap().get(), 1);
        cache.put("a".into(), 1);
        cache.put("b".into(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(&2));
    }

    #[test]
    fn dependent_node_goes_stale_on_reassignment() {
        let mut names = LookupTable::new(NonZeroUsize::new(1).unwrap(), true);
        let mut prefixes = LookupTable::new(NonZeroUsize::new(1).unwrap(), true);
        let name = names.get_or_add("a").get_id;
        let prefix = prefixes.get_or_add("http://x/").get_id;

        let node = DependentNode {
            encoded: (),
            primary: SlotRef::capture(&names, name),
            secondary: Some(SlotRef::capture(&prefixes, prefix)),
        };
        assert!(node.is_current(&names, Some(&prefixes)));

        prefixes.get_or_add("http://y/");
        assert!(!node.is_current(&names, Some(&prefixes)));
    }
}
