/// Authorization predicates
///
/// Two independent, pure checks gate every mutation:
///
/// 1. **Role check**: is the principal's role in the required set?
/// 2. **Ownership check**: does the principal's identity match the resource's
///    owning foreign key?
///
/// Both surface as HTTP 403, but they are distinct error variants so tests
/// and logs can tell a wrong-role rejection from a wrong-owner rejection.
///
/// # Example
///
/// ```
/// use donatehub_shared::auth::authorization::{require_role, require_ownership};
/// use donatehub_shared::auth::middleware::AuthContext;
/// use donatehub_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example(campaign_owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let auth = AuthContext::new(campaign_owner, UserRole::Ngo);
///
/// // Only NGOs may update campaigns, and only their own
/// require_role(&auth, &[UserRole::Ngo])?;
/// require_ownership(&auth, campaign_owner)?;
/// # Ok(())
/// # }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Principal's role is not in the required set
    #[error("Insufficient role: requires one of {required:?}, has {actual:?}")]
    InsufficientRole {
        required: Vec<UserRole>,
        actual: UserRole,
    },

    /// Principal does not own the resource
    #[error("Not authorized to access this resource")]
    NotOwner,
}

/// Checks that the principal's role is in the required set
pub fn require_role(auth: &AuthContext, required: &[UserRole]) -> Result<(), AuthzError> {
    if required.contains(&auth.role) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required: required.to_vec(),
            actual: auth.role,
        })
    }
}

/// Checks that the principal owns the resource
///
/// Compares the authenticated identity to the resource's owning foreign key.
pub fn require_ownership(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id == resource_owner_id {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

/// Checks that the principal is one of the listed identities
///
/// Used where either party of a donation may view it (the donor who gave, or
/// the NGO owning the campaign).
pub fn require_any_identity(auth: &AuthContext, allowed: &[Uuid]) -> Result<(), AuthzError> {
    if allowed.contains(&auth.user_id) {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let ngo = AuthContext::new(Uuid::new_v4(), UserRole::Ngo);
        let donor = AuthContext::new(Uuid::new_v4(), UserRole::Donor);

        assert!(require_role(&ngo, &[UserRole::Ngo]).is_ok());
        assert!(require_role(&donor, &[UserRole::Donor]).is_ok());
        assert!(require_role(&donor, &[UserRole::Ngo, UserRole::Donor]).is_ok());

        let err = require_role(&donor, &[UserRole::Ngo]).unwrap_err();
        assert!(matches!(err, AuthzError::InsufficientRole { actual: UserRole::Donor, .. }));
    }

    #[test]
    fn test_require_ownership() {
        let user_id = Uuid::new_v4();
        let auth = AuthContext::new(user_id, UserRole::Ngo);

        assert!(require_ownership(&auth, user_id).is_ok());

        let err = require_ownership(&auth, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AuthzError::NotOwner));
    }

    #[test]
    fn test_require_any_identity() {
        let donor_id = Uuid::new_v4();
        let ngo_id = Uuid::new_v4();
        let auth = AuthContext::new(donor_id, UserRole::Donor);

        assert!(require_any_identity(&auth, &[donor_id, ngo_id]).is_ok());
        assert!(require_any_identity(&auth, &[ngo_id]).is_err());
        assert!(require_any_identity(&auth, &[]).is_err());
    }

    #[test]
    fn test_role_and_ownership_are_distinct_errors() {
        let donor = AuthContext::new(Uuid::new_v4(), UserRole::Donor);

        let role_err = require_role(&donor, &[UserRole::Ngo]).unwrap_err();
        let owner_err = require_ownership(&donor, Uuid::new_v4()).unwrap_err();

        assert!(matches!(role_err, AuthzError::InsufficientRole { .. }));
        assert!(matches!(owner_err, AuthzError::NotOwner));
    }
}
