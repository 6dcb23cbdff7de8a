use std::collections::{HashMap, VecDeque};

/// LRU cache of prepared statements keyed by statement text.
#[derive(Debug)]
pub(super) struct StatementCache<S> {
    capacity: usize,
    map: HashMap<String, S>,
    order: VecDeque<String>,
}

impl<S: Clone> StatementCache<S> {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub(super) fn get(&mut self, key: &str) -> Option<S> {
        let stmt = self.map.get(key).cloned()?;
        self.touch(key);
        Some(stmt)
    }

    pub(super) fn insert(&mut self, key: String, stmt: S) {
        if self.map.insert(key.clone(), stmt).is_some() {
            self.touch(&key);
        } else {
            self.order.push_back(key);
        }
        self.evict_if_needed();
    }

    pub(super) fn len(&self) -> usize {
        self.map.len()
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k.as_str() == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn evict_if_needed(&mut self) {
        if self.capacity == 0 {
            self.map.clear();
            self.order.clear();
            return;
        }

        while self.map.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            let _ = self.map.remove(&oldest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = StatementCache::new(2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        assert_eq!(cache.get("a"), Some(1));

        cache.insert("c".to_string(), 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn zero_capacity_caches_nothing() {
        let mut cache = StatementCache::new(0);
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 0);
    }
}
