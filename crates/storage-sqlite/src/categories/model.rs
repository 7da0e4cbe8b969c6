//! Database models for categories.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::now;
use moneta_core::categories::{Category, NewCategory};

/// Database model for categories.
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryDB {
    pub id: String,
    pub owner_id: Option<String>,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CategoryDB {
    pub fn from_new(new_category: NewCategory, id: String) -> Self {
        let timestamp = now();
        Self {
            id,
            owner_id: new_category.owner_id,
            name: new_category.name,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Category {
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
