//! Resolved caller capability within a coaching

use crate::model::{CoachingContext, CoachingRole, UserContext};

/// What the caller may do on batch screens.
///
/// Resolved once per render pass and passed down; never cached across passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Owns the coaching or holds the ADMIN role in it
    Admin,
    /// Everyone else (teachers, students, unknown roles)
    Member,
}

impl Capability {
    pub fn resolve(coaching: &CoachingContext, user: &UserContext) -> Self {
        if coaching.owner_id == user.id || coaching.role == Some(CoachingRole::Admin) {
            Capability::Admin
        } else {
            Capability::Member
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Capability::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coaching(owner: &str, role: Option<CoachingRole>) -> CoachingContext {
        CoachingContext {
            id: "c1".into(),
            owner_id: owner.into(),
            role,
        }
    }

    fn user(id: &str) -> UserContext {
        UserContext { id: id.into() }
    }

    #[test]
    fn test_owner_is_admin_regardless_of_role() {
        assert_eq!(
            Capability::resolve(&coaching("u1", Some(CoachingRole::Student)), &user("u1")),
            Capability::Admin
        );
        assert_eq!(
            Capability::resolve(&coaching("u1", None), &user("u1")),
            Capability::Admin
        );
    }

    #[test]
    fn test_admin_role_is_admin() {
        assert_eq!(
            Capability::resolve(&coaching("owner", Some(CoachingRole::Admin)), &user("u2")),
            Capability::Admin
        );
    }

    #[test]
    fn test_other_roles_are_members() {
        for role in [
            Some(CoachingRole::Teacher),
            Some(CoachingRole::Student),
            Some(CoachingRole::Unknown),
            None,
        ] {
            let capability = Capability::resolve(&coaching("owner", role), &user("u2"));
            assert_eq!(capability, Capability::Member, "role {:?}", role);
            assert!(!capability.is_admin());
        }
    }
}
