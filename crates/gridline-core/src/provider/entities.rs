use crate::{
    async_trait,
    schema::{ColumnField, EntityRef, FieldName},
};

use indexmap::IndexMap;
use std::{fmt::Debug, sync::Arc};

/// Stored fields of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub entity: EntityRef,
    pub column_fields: IndexMap<FieldName, ColumnField>,
}

#[async_trait]
pub trait EntityProvider: Debug + Send + Sync + 'static {
    /// Fails with [`Error::unknown_entity`](crate::Error::unknown_entity) when
    /// the entity does not exist.
    async fn get_entity(&self, entity: &EntityRef) -> crate::Result<Arc<EntityInfo>>;
}

impl EntityInfo {
    pub fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            column_fields: IndexMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<FieldName>, field: ColumnField) -> Self {
        self.column_fields.insert(name.into(), field);
        self
    }
}
