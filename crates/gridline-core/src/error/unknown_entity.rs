use super::Error;
use crate::schema::EntityRef;

/// Error when entity metadata is requested for an entity the provider does not know.
#[derive(Debug)]
pub(super) struct UnknownEntityError {
    entity: EntityRef,
}

impl std::error::Error for UnknownEntityError {}

impl core::fmt::Display for UnknownEntityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown entity: {}", self.entity)
    }
}

impl Error {
    pub fn unknown_entity(entity: &EntityRef) -> Error {
        Error::from(super::ErrorKind::UnknownEntity(UnknownEntityError {
            entity: entity.clone(),
        }))
    }

    pub fn is_unknown_entity(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownEntity(_))
    }
}
