//! Menu items persisted as one collection under [`MENU_ITEMS_KEY`].

use std::collections::HashSet;
use std::sync::Arc;

use slice_savvy_core::{MenuItem, MenuItemDraft, MenuItemId};

use crate::error::{Result, StoreError};
use crate::keys::MENU_ITEMS_KEY;
use crate::Storage;

/// Read and write access to the menu collection.
pub struct MenuRepository<S> {
    storage: Arc<S>,
    seed: Vec<MenuItem>,
}

impl<S: Storage> MenuRepository<S> {
    /// Repository over `storage`, seeded with `seed` on first load.
    pub fn new(storage: Arc<S>, seed: Vec<MenuItem>) -> Self {
        Self { storage, seed }
    }

    /// All menu items.
    ///
    /// Writes the seed catalog first if nothing is stored yet. A stored collection
    /// that doesn't parse is replaced by the seed catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails or seeding can't be written.
    pub fn load(&self) -> Result<Vec<MenuItem>> {
        let Some(bytes) = self.storage.get(MENU_ITEMS_KEY)? else {
            tracing::info!(items = self.seed.len(), "Seeding menu items");
            self.write(&self.seed)?;
            return Ok(self.seed.clone());
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(error = %e, "Stored menu items unreadable, reseeding");
                self.write(&self.seed)?;
                Ok(self.seed.clone())
            }
        }
    }

    /// Replace the whole collection. Returns `false` if any item is invalid or the
    /// write failed.
    pub fn save_all(&self, items: &[MenuItem]) -> bool {
        match self.write(items) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Error saving menu items");
                false
            }
        }
    }

    /// The item with `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn get(&self, id: &MenuItemId) -> Result<Option<MenuItem>> {
        Ok(self.load()?.into_iter().find(|item| &item.id == id))
    }

    /// Validate `draft`, give it a fresh id and append it.
    ///
    /// # Errors
    ///
    /// - `StoreError::Domain` if the draft is invalid.
    /// - The storage error if loading or saving fails.
    pub fn create(&self, draft: MenuItemDraft) -> Result<MenuItem> {
        draft.validate()?;
        let mut items = self.load()?;
        let item = draft.into_item(unique_id(&items))?;
        items.push(item.clone());
        self.write(&items)?;

        tracing::info!(menu_item_id = %item.id, name = %item.name, "Menu item created");
        Ok(item)
    }

    /// Replace the item with the same id. Returns `false` if there is none.
    ///
    /// # Errors
    ///
    /// - `StoreError::Domain` if `item` has a blank name or a negative price.
    /// - The storage error if loading or saving fails.
    pub fn update(&self, item: MenuItem) -> Result<bool> {
        let mut items = self.load()?;
        let Some(slot) = items.iter_mut().find(|existing| existing.id == item.id) else {
            return Ok(false);
        };
        *slot = item;
        self.write(&items)?;
        Ok(true)
    }

    /// Remove the item with `id`. Returns `false` if there is none.
    ///
    /// # Errors
    ///
    /// The storage error if loading or saving fails.
    pub fn delete(&self, id: &MenuItemId) -> Result<bool> {
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.write(&items)?;

        tracing::info!(menu_item_id = %id, "Menu item deleted");
        Ok(true)
    }

    fn write(&self, items: &[MenuItem]) -> Result<()> {
        for item in items {
            item.validate()?;
        }
        let mut seen = HashSet::with_capacity(items.len());
        if let Some(dup) = items.iter().find(|item| !seen.insert(&item.id)) {
            return Err(StoreError::DuplicateId(dup.id.to_string()));
        }
        let bytes = serde_json::to_vec(items)?;
        self.storage.set(MENU_ITEMS_KEY, &bytes)
    }
}

/// A fresh id that no existing item uses.
fn unique_id(existing: &[MenuItem]) -> MenuItemId {
    loop {
        let id = MenuItemId::generate();
        if existing.iter().all(|item| item.id != id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use crate::seed::SeedData;
    use slice_savvy_core::DomainError;

    fn repo() -> MenuRepository<MemoryStorage> {
        let seed = SeedData::builtin().unwrap().menu_items;
        MenuRepository::new(Arc::new(MemoryStorage::new()), seed)
    }

    fn draft(name: &str, price_cents: i64) -> MenuItemDraft {
        MenuItemDraft {
            name: name.into(),
            category: "Specialty".into(),
            price_cents,
            description: "Seasonal".into(),
            ingredients: vec!["Mozzarella".into(), " ".into(), "Truffle".into()],
            is_popular: false,
        }
    }

    #[test]
    fn first_load_seeds_once() {
        let repo = repo();
        assert!(repo.storage.get(MENU_ITEMS_KEY).unwrap().is_none());

        let items = repo.load().unwrap();
        assert_eq!(items, repo.seed);
        let stored = repo.storage.get(MENU_ITEMS_KEY).unwrap();
        assert!(stored.is_some());

        assert_eq!(repo.load().unwrap(), items);
        assert_eq!(repo.storage.get(MENU_ITEMS_KEY).unwrap(), stored);

        let mut reordered = items.clone();
        reordered.reverse();
        reordered[0].is_popular = !reordered[0].is_popular;
        assert!(repo.save_all(&reordered));
        assert_eq!(repo.load().unwrap(), reordered);

        // A stored (even empty) collection is never reseeded.
        assert!(repo.save_all(&[]));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn create_get_update_delete() {
        let repo = repo();
        let created = repo.create(draft("Truffle Shuffle", 2199)).unwrap();
        assert_eq!(created.ingredients, vec!["Mozzarella", "Truffle"]);
        assert_eq!(repo.load().unwrap().len(), repo.seed.len() + 1);
        assert_eq!(repo.get(&created.id).unwrap(), Some(created.clone()));

        let mut edited = created.clone();
        edited.price_cents = 2399;
        assert!(repo.update(edited.clone()).unwrap());
        assert_eq!(repo.get(&created.id).unwrap().unwrap().price_cents, 2399);

        assert!(repo.delete(&created.id).unwrap());
        assert!(repo.get(&created.id).unwrap().is_none());
        assert!(!repo.delete(&created.id).unwrap());
        assert!(!repo.update(edited).unwrap());
    }

    #[test]
    fn created_ids_are_unique() {
        let repo = repo();
        let ids: HashSet<_> = (0..20)
            .map(|i| repo.create(draft(&format!("Pie {i}"), 1000)).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 20);
        assert!(repo.load().unwrap().iter().all(|item| !item.id.as_str().is_empty()));
    }

    #[test]
    fn invalid_drafts_are_rejected() {
        let repo = repo();
        let err = repo.create(draft("   ", 1000)).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvalidMenuItem(_))));
        let err = repo.create(draft("Negative", -1)).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvalidMenuItem(_))));

        // Nothing was seeded or written by the failed creates.
        assert!(repo.storage.get(MENU_ITEMS_KEY).unwrap().is_none());
    }

    #[test]
    fn invalid_updates_are_rejected() {
        let repo = repo();
        let original = repo.load().unwrap()[0].clone();

        let mut edited = original.clone();
        edited.price_cents = -500;
        edited.name = "   ".into();
        let err = repo.update(edited.clone()).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvalidMenuItem(_))));
        assert_eq!(repo.get(&original.id).unwrap(), Some(original.clone()));

        edited.name = original.name.clone();
        assert!(repo.update(edited.clone()).is_err());

        let mut items = repo.load().unwrap();
        items[0] = edited;
        assert!(!repo.save_all(&items));
        assert_eq!(repo.load().unwrap()[0], original);
    }

    #[test]
    fn corrupt_collection_is_reseeded() {
        let repo = repo();
        repo.storage.set(MENU_ITEMS_KEY, b"[{\"id\": 1").unwrap();

        assert_eq!(repo.load().unwrap(), repo.seed);
        let stored: Vec<MenuItem> =
            serde_json::from_slice(&repo.storage.get(MENU_ITEMS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, repo.seed);
    }

    #[test]
    fn save_all_reports_failures() {
        let seed = SeedData::builtin().unwrap().menu_items;
        let repo = MenuRepository::new(Arc::new(MemoryStorage::with_quota(16)), seed.clone());
        assert!(!repo.save_all(&seed));

        let duplicated = vec![seed[0].clone(), seed[0].clone()];
        let roomy = MenuRepository::new(Arc::new(MemoryStorage::new()), seed);
        assert!(!roomy.save_all(&duplicated));
    }
}
