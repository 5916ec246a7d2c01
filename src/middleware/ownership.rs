use mongodb::bson::oid::ObjectId;

use crate::middleware::auth::AuthUser;
use crate::utils::error::CustomError;

/// Anything with an author who alone may change it.
pub trait Owned {
    fn author_id(&self) -> Option<&ObjectId>;
}

/// Hand the resource back only when `user` wrote it.
///
/// A foreign resource is reported exactly like a missing one, so a
/// non-owner learns nothing about its existence. Authorless resources
/// belong to nobody.
pub fn ensure_owner<T: Owned>(
    resource: Option<T>,
    user: &AuthUser,
    what: &str,
) -> Result<T, CustomError> {
    match resource {
        Some(resource) if resource.author_id() == Some(&user.id) => Ok(resource),
        Some(_) => {
            log::warn!("user {} denied access to a foreign {}", user.id, what);
            Err(CustomError::not_found(what))
        }
        None => Err(CustomError::not_found(what)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Doc(Option<ObjectId>);

    impl Owned for Doc {
        fn author_id(&self) -> Option<&ObjectId> {
            self.0.as_ref()
        }
    }

    fn user(id: ObjectId) -> AuthUser {
        AuthUser {
            id,
            username: "owner".to_string(),
        }
    }

    #[test]
    fn owner_gets_the_resource() {
        let id = ObjectId::new();
        assert!(ensure_owner(Some(Doc(Some(id))), &user(id), "Doc").is_ok());
    }

    #[test]
    fn foreign_missing_and_authorless_look_the_same() {
        let me = user(ObjectId::new());
        let foreign = ensure_owner(Some(Doc(Some(ObjectId::new()))), &me, "Doc").unwrap_err();
        let missing = ensure_owner::<Doc>(None, &me, "Doc").unwrap_err();
        let authorless = ensure_owner(Some(Doc(None)), &me, "Doc").unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
        assert_eq!(authorless.to_string(), missing.to_string());
        assert!(matches!(foreign, CustomError::NotFoundError(_)));
    }
}
