//! The authenticated principal attached to each request.

use backlot_core::{AppError, Id};
use backlot_models::UserRole;

use crate::jwt::Claims;

/// Who is making the request. Built from verified token claims, or anonymous
/// when the deployment runs with authentication disabled.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Id,
    pub email: String,
    pub role: UserRole,
    pub anonymous: bool,
}

impl Principal {
    /// Anonymous staff principal used when `require_authentication` is off.
    pub fn anonymous() -> Self {
        Self {
            user_id: 0,
            email: "anonymous@localhost".into(),
            role: UserRole::Staff,
            anonymous: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Guard for admin-only mutations.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("admin role required"))
        }
    }
}

impl TryFrom<Claims> for Principal {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("invalid token subject"))?;

        Ok(Self {
            user_id,
            email: claims.email,
            role: claims.role,
            anonymous: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_cannot_pass_the_admin_guard() {
        let principal = Principal::anonymous();
        let err = principal.require_admin().unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn claims_with_non_numeric_subject_are_rejected() {
        let claims = Claims {
            sub: "not-a-number".into(),
            exp: 0,
            iat: 0,
            jti: "x".into(),
            email: "a@example.com".into(),
            role: UserRole::Staff,
        };
        assert!(Principal::try_from(claims).is_err());
    }
}
