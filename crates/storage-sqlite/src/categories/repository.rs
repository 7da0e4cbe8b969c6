use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::CategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::categories;
use moneta_core::categories::{Category, CategoryRepositoryTrait, NewCategory};
use moneta_core::Result;

/// Repository for managing category data in the database.
pub struct CategoryRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn get_by_id(&self, category_id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;
        let category_db = categories::table
            .find(category_id)
            .select(CategoryDB::as_select())
            .first::<CategoryDB>(&mut conn)
            .into_core()?;
        Ok(Category::from(category_db))
    }

    fn list_accessible(&self, owner_id: &str) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let results = categories::table
            .filter(
                categories::owner_id
                    .is_null()
                    .or(categories::owner_id.eq(owner_id)),
            )
            .select(CategoryDB::as_select())
            .order(categories::name.asc())
            .load::<CategoryDB>(&mut conn)
            .into_core()?;
        Ok(results.into_iter().map(Category::from).collect())
    }

    async fn create(&self, new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;
        let id = new_category
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.writer
            .exec(move |conn| {
                let category_db = CategoryDB::from_new(new_category, id);
                diesel::insert_into(categories::table)
                    .values(&category_db)
                    .execute(conn)
                    .into_core()?;
                Ok(Category::from(category_db))
            })
            .await
    }

    async fn delete(&self, category_id: &str) -> Result<usize> {
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(categories::table.find(&category_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
