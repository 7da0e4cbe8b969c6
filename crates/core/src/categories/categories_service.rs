use std::sync::Arc;

use super::categories_model::{Category, NewCategory};
use super::categories_traits::{
    CategoryAccessTrait, CategoryRepositoryTrait, CategoryServiceTrait,
};
use crate::{errors::ValidationError, Error, Result};

/// Service for managing categories.
pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    /// Creates a new CategoryService instance.
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl CategoryAccessTrait for CategoryService {
    fn is_accessible(&self, category_id: &str, owner_id: &str) -> Result<bool> {
        match self.repository.get_by_id(category_id) {
            Ok(category) => Ok(category.is_accessible_by(owner_id)),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[async_trait::async_trait]
impl CategoryServiceTrait for CategoryService {
    fn get_category(&self, category_id: &str) -> Result<Category> {
        self.repository.get_by_id(category_id)
    }

    fn list_categories(&self, owner_id: &str) -> Result<Vec<Category>> {
        self.repository.list_accessible(owner_id)
    }

    async fn create_category(&self, new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;
        self.repository.create(new_category).await
    }

    /// Deletes a category the caller owns. Global categories are not
    /// deletable through this path.
    async fn delete_category(&self, owner_id: &str, category_id: &str) -> Result<usize> {
        let category = self.repository.get_by_id(category_id)?;
        if category.owner_id.as_deref() != Some(owner_id) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Category '{}' is not owned by the caller",
                category_id
            ))));
        }
        self.repository.delete(category_id).await
    }
}
