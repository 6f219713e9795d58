use sea_orm::entity::prelude::*;

/// One persisted dialogue turn. `id` is the sequence position.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub role: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// DDL for the table. Written by hand so SQLite gets
/// `INTEGER PRIMARY KEY AUTOINCREMENT` and ids are never reused.
pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT,
    role TEXT,
    content TEXT
)";

pub const DROP_TABLE: &str = "DROP TABLE IF EXISTS conversations";
