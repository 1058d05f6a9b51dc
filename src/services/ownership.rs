use uuid::Uuid;

use super::ServiceError;
use crate::database::models::Owned;
use crate::database::{Document, Repository};
use crate::middleware::AuthUser;

/// Gate a mutation on creator identity.
///
/// A missing record fails with `NotFound` before the creator is compared;
/// a record created by anyone other than `caller` fails with `Forbidden`.
pub fn ensure_creator<T: Owned>(record: Option<T>, caller: &AuthUser) -> Result<T, ServiceError> {
    let record = record.ok_or(ServiceError::NotFound(T::KIND))?;
    if record.creator() != caller.id {
        return Err(ServiceError::Forbidden(T::KIND));
    }
    Ok(record)
}

/// Load record `id` and apply [`ensure_creator`] to it.
pub async fn load_owned<T>(repo: &Repository<T>, id: Uuid, caller: &AuthUser) -> Result<T, ServiceError>
where
    T: Document + Owned,
{
    ensure_creator(repo.select_id(id).await?, caller)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        creator: Uuid,
    }

    impl Owned for Widget {
        const KIND: &'static str = "Widget";

        fn creator(&self) -> Uuid {
            self.creator
        }
    }

    fn caller(id: Uuid) -> AuthUser {
        AuthUser {
            id,
            email: "owner@example.com".to_string(),
            name: "Owner".to_string(),
        }
    }

    #[test]
    fn creator_passes() {
        let id = Uuid::new_v4();
        let widget = ensure_creator(Some(Widget { creator: id }), &caller(id)).unwrap();
        assert_eq!(widget.creator, id);
    }

    #[test]
    fn other_caller_is_forbidden() {
        let result = ensure_creator(Some(Widget { creator: Uuid::new_v4() }), &caller(Uuid::new_v4()));
        assert!(matches!(result, Err(ServiceError::Forbidden("Widget"))));
    }

    #[test]
    fn missing_record_is_not_found_for_anyone() {
        let result = ensure_creator::<Widget>(None, &caller(Uuid::new_v4()));
        assert!(matches!(result, Err(ServiceError::NotFound("Widget"))));
    }
}
