use crate::application::app_error::AppError;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// Typed entity identifier. The marker keeps a user id from being passed
/// where a reset token id is expected.
pub struct Id<T> {
    pub value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: Uuid) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn generate() -> Id<T> {
        Id::new(Uuid::now_v7())
    }
}

// Manual impls: deriving would put bounds on `T`.
impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Id::new(self.value)
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let uuid = Uuid::from_str(&value).map_err(|e| AppError::InvalidId(format!("Invalid UUID: {}", e)))?;
        Ok(Id::new(uuid))
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::entities::id::Id;
    use uuid::Uuid;

    struct Marker;

    #[test]
    fn test_id_generate_is_unique() {
        let id1: Id<Marker> = Id::generate();
        let id2: Id<Marker> = Id::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_try_from_valid_uuid() {
        let uuid = Uuid::now_v7();
        let id: Id<Marker> = uuid.to_string().try_into().unwrap();
        assert_eq!(id.value, uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_id_try_from_invalid_uuid() {
        let result: Result<Id<Marker>, _> = "invalid".to_owned().try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_clone_without_clone_marker() {
        let id: Id<Marker> = Id::generate();
        assert_eq!(id.clone(), id);
    }
}
