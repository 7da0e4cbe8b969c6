use async_trait::async_trait;

use super::categories_model::{Category, NewCategory};
use crate::Result;

/// Trait defining the contract for category repository operations.
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn get_by_id(&self, category_id: &str) -> Result<Category>;
    /// Lists global categories plus those owned by `owner_id`.
    fn list_accessible(&self, owner_id: &str) -> Result<Vec<Category>>;
    async fn create(&self, new_category: NewCategory) -> Result<Category>;
    async fn delete(&self, category_id: &str) -> Result<usize>;
}

/// Access check consumed by the ledger when an intent carries a category.
pub trait CategoryAccessTrait: Send + Sync {
    /// True when the category exists and is global or owned by `owner_id`.
    fn is_accessible(&self, category_id: &str, owner_id: &str) -> Result<bool>;
}

/// Trait defining the contract for category service operations.
#[async_trait]
pub trait CategoryServiceTrait: CategoryAccessTrait {
    fn get_category(&self, category_id: &str) -> Result<Category>;
    fn list_categories(&self, owner_id: &str) -> Result<Vec<Category>>;
    async fn create_category(&self, new_category: NewCategory) -> Result<Category>;
    async fn delete_category(&self, owner_id: &str, category_id: &str) -> Result<usize>;
}
