use kernel::id::Id;

/// Marker for identifiers assigned by the identity provider
pub struct UserMarker;
pub type UserId = Id<UserMarker>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::ValidationError;

    #[test]
    fn test_user_id_from_provider_string() {
        let user_id = UserId::new("Xc7hQz0pL1aWd9sNvB2mRt4yKe83").unwrap();
        assert_eq!(user_id.as_str(), "Xc7hQz0pL1aWd9sNvB2mRt4yKe83");
    }

    #[test]
    fn test_user_id_empty_is_validation_error() {
        let err: ValidationError = UserId::new("").unwrap_err().into();
        assert!(matches!(err, ValidationError::UserId(_)));
    }
}
