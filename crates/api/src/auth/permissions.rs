use uuid::Uuid;

use infra::models::Role;

use crate::auth::Claims;
use crate::error::AppError;

/// An authenticated caller with a parsed identity and role.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

pub fn authenticate(claims: &Claims) -> Result<Actor, AppError> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("invalid token subject".to_string()))?;
    let role = Role::parse(&claims.role)
        .ok_or_else(|| AppError::Unauthorized("unknown role".to_string()))?;
    Ok(Actor { user_id, role })
}

/// Capability check run before any state mutation. Roles are disjoint
/// capability sets here: an admin does not implicitly hold attendee or
/// organizer capabilities.
pub fn require_role(claims: &Claims, required: Role) -> Result<Actor, AppError> {
    let actor = authenticate(claims)?;
    if actor.role != required {
        return Err(AppError::Unauthorized(format!(
            "{} privileges required",
            required.as_str()
        )));
    }
    Ok(actor)
}
