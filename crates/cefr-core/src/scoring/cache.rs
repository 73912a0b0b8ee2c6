//! Bounded in-memory cache of AI assessments.
//!
//! Only the raw AI assessment is cached; validation always runs again so a
//! policy change applies to cached answers too.

use crate::model::AiAssessment;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub fn cache_key(model: &str, prompt: &str, max_score: f64) -> String {
    let mut h = Sha256::new();
    h.update(model.as_bytes());
    h.update(b"\n");
    h.update(prompt.as_bytes());
    h.update(b"\n");
    h.update(max_score.to_bits().to_le_bytes());
    hex::encode(h.finalize())
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, AiAssessment>,
    order: VecDeque<String>,
}

/// FIFO-evicting cache shared by clones.
#[derive(Clone)]
pub struct ScoreCache {
    capacity: usize,
    inner: Arc<Mutex<Inner>>,
}

impl ScoreCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<AiAssessment> {
        let guard = self.inner.lock().ok()?;
        guard.entries.get(key).cloned()
    }

    pub fn put(&self, key: String, value: AiAssessment) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut guard) = self.inner.lock() else {
            return;
        };
        if guard.entries.insert(key.clone(), value).is_none() {
            guard.order.push_back(key);
        }
        while guard.entries.len() > self.capacity {
            let Some(oldest) = guard.order.pop_front() else {
                break;
            };
            guard.entries.remove(&oldest);
            tracing::debug!(key = %oldest, "evicted scoring cache entry");
        }
    }
}

impl std::fmt::Debug for ScoreCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::CefrLevel;

    fn assessment(score: f64) -> AiAssessment {
        AiAssessment {
            score,
            suggested_level: CefrLevel::B1.into(),
            feedback: String::new(),
            provider: "fake".into(),
            model: "fake".into(),
        }
    }

    #[test]
    fn key_depends_on_every_component() {
        let base = cache_key("m", "p", 10.0);
        assert_eq!(base, cache_key("m", "p", 10.0));
        assert_ne!(base, cache_key("m2", "p", 10.0));
        assert_ne!(base, cache_key("m", "p2", 10.0));
        assert_ne!(base, cache_key("m", "p", 14.0));
        assert_eq!(base.len(), 64);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let cache = ScoreCache::new(2);
        cache.put("a".into(), assessment(1.0));
        cache.put("b".into(), assessment(2.0));
        cache.put("c".into(), assessment(3.0));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("c").unwrap().score, 3.0);
    }

    #[test]
    fn overwriting_does_not_duplicate_order() {
        let cache = ScoreCache::new(2);
        cache.put("a".into(), assessment(1.0));
        cache.put("a".into(), assessment(5.0));
        cache.put("b".into(), assessment(2.0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().score, 5.0);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = ScoreCache::disabled();
        cache.put("a".into(), assessment(1.0));
        assert!(cache.is_empty());
    }

    #[test]
    fn clones_share_entries() {
        let cache = ScoreCache::new(4);
        let other = cache.clone();
        other.put("k".into(), assessment(2.0));
        assert!(cache.get("k").is_some());
    }
}
