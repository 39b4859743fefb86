use super::domain::{AuthUser, Role};

/// Role gate for protected operations.
///
/// `admin` satisfies every check; any other role must be listed. Pure, never
/// fails; callers turn `false` into a `Forbidden` response.
pub fn authorize(user: &AuthUser, allowed: &[Role]) -> bool {
    role_allowed(user.role, allowed)
}

pub fn role_allowed(role: Role, allowed: &[Role]) -> bool {
    role == Role::Admin || allowed.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: "x".into(),
            email: "x@hotel.com".into(),
            role,
            phone: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn admin_passes_every_gate() {
        let admin = user(Role::Admin);
        assert!(authorize(&admin, &[]));
        assert!(authorize(&admin, &[Role::Guest]));
        assert!(authorize(&admin, &[Role::Housekeeping, Role::Maintenance]));
    }

    #[test]
    fn other_roles_need_membership() {
        let subsets: [&[Role]; 4] = [&[], &[Role::Guest], &[Role::Housekeeping], &[Role::Receptionist, Role::Housekeeping]];
        for role in Role::ALL.into_iter().filter(|r| *r != Role::Admin) {
            for allowed in subsets {
                assert_eq!(authorize(&user(role), allowed), allowed.contains(&role), "{role} vs {allowed:?}");
            }
        }
    }

    #[test]
    fn guest_is_not_admin() {
        assert!(!authorize(&user(Role::Guest), &[Role::Admin]));
    }
}
