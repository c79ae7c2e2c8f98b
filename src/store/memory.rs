//! In-process stores for conversion history and favorites.
//!
//! Backed by plain mutex-guarded collections; the capped conversion log is
//! pure FIFO eviction, not LRU. Any storage engine could replace this behind
//! the same methods without touching the conversion logic.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::shared::error::StoreError;
use crate::shared::types::{ConversionRecord, FavoriteRecord, NewConversion, NewFavorite};

/// Conversions kept before the oldest entries are trimmed.
pub const MAX_RECENT_CONVERSIONS: usize = 50;

pub struct MemStore {
    conversions: Mutex<VecDeque<ConversionRecord>>,
    favorites: Mutex<Vec<FavoriteRecord>>,
    conversion_cap: usize,
}

impl MemStore {
    pub fn new() -> Self {
        Self::with_cap(MAX_RECENT_CONVERSIONS)
    }

    pub fn with_cap(conversion_cap: usize) -> Self {
        Self {
            conversions: Mutex::new(VecDeque::new()),
            favorites: Mutex::new(Vec::new()),
            conversion_cap,
        }
    }

    pub fn save_conversion(&self, new: NewConversion) -> Result<ConversionRecord, StoreError> {
        let record = ConversionRecord {
            id: Uuid::new_v4(),
            from_unit: new.from_unit,
            to_unit: new.to_unit,
            from_value: new.from_value,
            to_value: new.to_value,
            category: new.category,
            created_at: Utc::now(),
        };

        let mut conversions = self.lock_conversions()?;
        conversions.push_back(record.clone());
        while conversions.len() > self.conversion_cap {
            conversions.pop_front();
        }
        Ok(record)
    }

    /// Most recent conversions, newest first.
    pub fn recent_conversions(&self, limit: usize) -> Result<Vec<ConversionRecord>, StoreError> {
        let conversions = self.lock_conversions()?;
        Ok(conversions.iter().rev().take(limit).cloned().collect())
    }

    /// Rejects duplicates on (from_unit, to_unit, category).
    pub fn add_favorite(&self, new: NewFavorite) -> Result<FavoriteRecord, StoreError> {
        let mut favorites = self.lock_favorites()?;

        let exists = favorites.iter().any(|fav| {
            fav.from_unit == new.from_unit
                && fav.to_unit == new.to_unit
                && fav.category == new.category
        });
        if exists {
            return Err(StoreError::DuplicateFavorite);
        }

        let record = FavoriteRecord {
            id: Uuid::new_v4(),
            from_unit: new.from_unit,
            to_unit: new.to_unit,
            category: new.category,
            name: new.name,
            created_at: Utc::now(),
        };
        favorites.push(record.clone());
        Ok(record)
    }

    pub fn favorites(&self) -> Result<Vec<FavoriteRecord>, StoreError> {
        Ok(self.lock_favorites()?.clone())
    }

    pub fn remove_favorite(&self, id: Uuid) -> Result<(), StoreError> {
        let mut favorites = self.lock_favorites()?;
        let before = favorites.len();
        favorites.retain(|fav| fav.id != id);
        if favorites.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn lock_conversions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, VecDeque<ConversionRecord>>, StoreError> {
        self.conversions
            .lock()
            .map_err(|_| StoreError::Database("conversion store poisoned".to_string()))
    }

    fn lock_favorites(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<FavoriteRecord>>, StoreError> {
        self.favorites
            .lock()
            .map_err(|_| StoreError::Database("favorite store poisoned".to_string()))
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversion(from: &str, to: &str, value: f64) -> NewConversion {
        NewConversion {
            from_unit: from.to_string(),
            to_unit: to.to_string(),
            from_value: value,
            to_value: value * 2.0,
            category: "length".to_string(),
        }
    }

    fn favorite(from: &str, to: &str) -> NewFavorite {
        NewFavorite {
            from_unit: from.to_string(),
            to_unit: to.to_string(),
            category: "length".to_string(),
            name: None,
        }
    }

    #[test]
    fn test_recent_conversions_newest_first() {
        let store = MemStore::new();
        store.save_conversion(conversion("m", "ft", 1.0)).unwrap();
        store.save_conversion(conversion("m", "ft", 2.0)).unwrap();
        store.save_conversion(conversion("m", "ft", 3.0)).unwrap();

        let recent = store.recent_conversions(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].from_value, 3.0);
        assert_eq!(recent[1].from_value, 2.0);
    }

    #[test]
    fn test_conversion_log_is_fifo_capped() {
        let store = MemStore::with_cap(3);
        for i in 0..5 {
            store.save_conversion(conversion("m", "ft", i as f64)).unwrap();
        }

        let recent = store.recent_conversions(10).unwrap();
        assert_eq!(recent.len(), 3);
        // 0 and 1 evicted in insertion order
        assert_eq!(recent[0].from_value, 4.0);
        assert_eq!(recent[2].from_value, 2.0);
    }

    #[test]
    fn test_duplicate_favorite_is_conflict() {
        let store = MemStore::new();
        store.add_favorite(favorite("m", "ft")).unwrap();

        let err = store.add_favorite(favorite("m", "ft")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateFavorite));
        assert_eq!(store.favorites().unwrap().len(), 1);
    }

    #[test]
    fn test_same_pair_different_category_is_not_duplicate() {
        let store = MemStore::new();
        store.add_favorite(favorite("m", "ft")).unwrap();

        let mut other = favorite("m", "ft");
        other.category = "speed".to_string();
        assert!(store.add_favorite(other).is_ok());
    }

    #[test]
    fn test_remove_favorite() {
        let store = MemStore::new();
        let saved = store.add_favorite(favorite("kg", "lb")).unwrap();

        store.remove_favorite(saved.id).unwrap();
        assert!(store.favorites().unwrap().is_empty());

        let err = store.remove_favorite(saved.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
