//! Menu items.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::MenuItemId;

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Unique item id.
    pub id: MenuItemId,

    /// Display name; orders reference items by this name.
    pub name: String,

    /// Menu section (e.g. "Classic", "Specialty").
    #[serde(default)]
    pub category: String,

    /// Price in cents. Never negative.
    #[serde(default)]
    pub price_cents: i64,

    /// Short description.
    #[serde(default)]
    pub description: String,

    /// Ingredients in display order.
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Highlighted as a popular choice.
    #[serde(default)]
    pub is_popular: bool,
}

impl MenuItem {
    /// Check the stored-item invariants: a non-blank name and a non-negative price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMenuItem` if either is violated.
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.name, self.price_cents)
    }

    /// Case-insensitive match on name and description.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// User-supplied fields for a new or edited menu item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    /// Display name.
    pub name: String,
    /// Menu section.
    pub category: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Short description.
    pub description: String,
    /// Ingredients in display order.
    pub ingredients: Vec<String>,
    /// Highlighted as a popular choice.
    pub is_popular: bool,
}

impl MenuItemDraft {
    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMenuItem` if the name is blank or the price negative.
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.name, self.price_cents)
    }

    /// Validate the draft and turn it into an item with the given id.
    ///
    /// Blank ingredient entries are dropped; order is otherwise kept.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMenuItem` if validation fails.
    pub fn into_item(self, id: MenuItemId) -> Result<MenuItem> {
        self.validate()?;
        Ok(MenuItem {
            id,
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price_cents: self.price_cents,
            description: self.description,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect(),
            is_popular: self.is_popular,
        })
    }
}

fn validate_fields(name: &str, price_cents: i64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidMenuItem("name must not be empty".into()));
    }
    if price_cents < 0 {
        return Err(DomainError::InvalidMenuItem(format!(
            "price must not be negative: {price_cents}"
        )));
    }
    Ok(())
}

impl From<MenuItem> for MenuItemDraft {
    fn from(item: MenuItem) -> Self {
        Self {
            name: item.name,
            category: item.category,
            price_cents: item.price_cents,
            description: item.description,
            ingredients: item.ingredients,
            is_popular: item.is_popular,
        }
    }
}

/// Search and category filter for the menu page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    /// Free-text search over name and description.
    pub search: Option<String>,
    /// Restrict to one category; `None` means all categories.
    pub category: Option<String>,
}

impl MenuFilter {
    /// Whether `item` passes the filter.
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| item.category == c);
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |term| item.matches_search(term));
        category_ok && search_ok
    }

    /// Items passing the filter, in input order.
    #[must_use]
    pub fn apply(&self, items: &[MenuItem]) -> Vec<MenuItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Distinct categories in first-seen order.
#[must_use]
pub fn menu_categories(items: &[MenuItem]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for item in items {
        if !categories.iter().any(|c| c == &item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}
