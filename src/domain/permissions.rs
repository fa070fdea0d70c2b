//! Access rules for books and relations.
//!
//! Reads follow the configured [`ReadAccess`] policy. Writes on a book are
//! reserved to its owner and to staff.

use std::str::FromStr;

use super::DomainError;

/// Who may list and fetch books
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadAccess {
    /// Anyone, including anonymous callers
    #[default]
    Open,
    /// Only callers presenting a valid token
    Authenticated,
}

impl FromStr for ReadAccess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(ReadAccess::Open),
            "authenticated" => Ok(ReadAccess::Authenticated),
            other => Err(format!("unknown read access policy '{}'", other)),
        }
    }
}

/// The identity a permission decision is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub is_staff: bool,
}

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

/// Gate for GET on books. `caller` is the outcome of resolving the bearer
/// token; under the authenticated policy its rejection is returned as is.
pub fn check_read(policy: ReadAccess, caller: Result<Actor, DomainError>) -> Result<(), DomainError> {
    match policy {
        ReadAccess::Open => Ok(()),
        ReadAccess::Authenticated => caller.map(|_| ()),
    }
}

pub fn is_owner_or_staff(actor: &Actor, owner_id: Option<i32>) -> bool {
    actor.is_staff || owner_id == Some(actor.user_id)
}

/// Gate for PUT/PATCH/DELETE on a book owned by `owner_id`
pub fn check_modify(actor: &Actor, owner_id: Option<i32>) -> Result<(), DomainError> {
    if is_owner_or_staff(actor, owner_id) {
        Ok(())
    } else {
        Err(DomainError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Actor = Actor {
        user_id: 1,
        is_staff: false,
    };
    const STRANGER: Actor = Actor {
        user_id: 2,
        is_staff: false,
    };
    const STAFF: Actor = Actor {
        user_id: 3,
        is_staff: true,
    };

    #[test]
    fn owner_and_staff_may_modify() {
        assert!(check_modify(&OWNER, Some(1)).is_ok());
        assert!(check_modify(&STAFF, Some(1)).is_ok());
        assert!(check_modify(&STAFF, None).is_ok());
    }

    #[test]
    fn others_are_denied() {
        assert!(matches!(
            check_modify(&STRANGER, Some(1)),
            Err(DomainError::PermissionDenied)
        ));
        // Ownerless books are staff-only
        assert!(matches!(
            check_modify(&OWNER, None),
            Err(DomainError::PermissionDenied)
        ));
    }

    fn anonymous() -> Result<Actor, DomainError> {
        Err(DomainError::Unauthenticated(NOT_AUTHENTICATED.to_string()))
    }

    #[test]
    fn read_policy() {
        assert!(check_read(ReadAccess::Open, anonymous()).is_ok());
        assert!(check_read(ReadAccess::Authenticated, Ok(OWNER)).is_ok());
        match check_read(ReadAccess::Authenticated, anonymous()) {
            Err(DomainError::Unauthenticated(msg)) => assert_eq!(msg, NOT_AUTHENTICATED),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn read_policy_keeps_token_rejection() {
        let rejected =
            || Err(DomainError::Unauthenticated("Invalid or expired token.".to_string()));
        assert!(check_read(ReadAccess::Open, rejected()).is_ok());
        match check_read(ReadAccess::Authenticated, rejected()) {
            Err(DomainError::Unauthenticated(msg)) => assert_eq!(msg, "Invalid or expired token."),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn parse_read_access() {
        assert_eq!("open".parse(), Ok(ReadAccess::Open));
        assert_eq!(" Authenticated ".parse(), Ok(ReadAccess::Authenticated));
        assert!("staff".parse::<ReadAccess>().is_err());
    }
}
