use crate::domain::user::Role;
use std::collections::HashSet;
use std::fmt;

/// Permissions an actor can hold on an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    View,
    Edit,
    Delete,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Edit => "edit",
            Permission::Delete => "delete",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-based permission check. The table is exact: there is no role
/// hierarchy, so `super_admin` does not imply `admin`.
pub fn is_granted(permission: Permission, roles: &HashSet<Role>) -> bool {
    match permission {
        Permission::View | Permission::Edit => roles.contains(&Role::Admin),
        Permission::Delete => roles.contains(&Role::SuperAdmin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_may_view_and_edit_but_not_delete() {
        let roles = HashSet::from([Role::Admin]);
        assert!(is_granted(Permission::View, &roles));
        assert!(is_granted(Permission::Edit, &roles));
        assert!(!is_granted(Permission::Delete, &roles));
    }

    #[test]
    fn super_admin_may_delete() {
        let roles = HashSet::from([Role::Admin, Role::SuperAdmin]);
        assert!(is_granted(Permission::Delete, &roles));
    }

    #[test]
    fn super_admin_alone_does_not_inherit_admin() {
        let roles = HashSet::from([Role::SuperAdmin]);
        assert!(is_granted(Permission::Delete, &roles));
        assert!(!is_granted(Permission::View, &roles));
        assert!(!is_granted(Permission::Edit, &roles));
    }

    #[test]
    fn no_roles_means_no_permissions() {
        let roles = HashSet::new();
        assert!(!is_granted(Permission::View, &roles));
        assert!(!is_granted(Permission::Edit, &roles));
        assert!(!is_granted(Permission::Delete, &roles));
    }

    #[test]
    fn plain_user_role_grants_nothing() {
        let roles = HashSet::from([Role::User]);
        assert!(!is_granted(Permission::View, &roles));
        assert!(!is_granted(Permission::Edit, &roles));
        assert!(!is_granted(Permission::Delete, &roles));
    }
}
