use crate::{PersistenceResult, Watermark, WatermarkStore};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Watermark store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryWatermarkStore {
    value: AtomicU64,
    saves: AtomicUsize,
}

impl MemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that reports `watermark` as previously persisted.
    pub fn with_value(watermark: Watermark) -> Self {
        Self {
            value: AtomicU64::new(watermark.value()),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl WatermarkStore for MemoryWatermarkStore {
    fn load(&self) -> Watermark {
        Watermark::new(self.value.load(Ordering::SeqCst))
    }

    fn save(&self, watermark: Watermark) -> PersistenceResult<()> {
        self.value.store(watermark.value(), Ordering::SeqCst);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_counts_saves() {
        let store = MemoryWatermarkStore::new();
        assert_eq!(store.load(), Watermark::ZERO);

        store.save(Watermark::new(12)).unwrap();
        store.save(Watermark::new(15)).unwrap();
        assert_eq!(store.load(), Watermark::new(15));
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn with_value_is_loaded() {
        let store = MemoryWatermarkStore::with_value(Watermark::new(99));
        assert_eq!(store.load(), Watermark::new(99));
        assert_eq!(store.save_count(), 0);
    }
}
