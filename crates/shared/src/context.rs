//! Explicit request context for posting operations.
//!
//! The posting core never reads ambient session state. Every operation
//! receives a `RequestContext` carrying the acting user and their
//! permission set, which makes the core testable without a web server.

use serde::{Deserialize, Serialize};

/// User role in the privilege hierarchy.
///
/// Roles are ordered from lowest to highest privilege. Higher roles can
/// perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Day-to-day data entry: view and create documents.
    Staff = 0,
    /// Full document lifecycle plus budget approvals.
    Admin = 1,
    /// Everything, including user management.
    SuperAdmin = 2,
}

impl Role {
    /// Parse a role from its database string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "staff" => Some(Self::Staff),
            "admin" => Some(Self::Admin),
            "super_admin" | "superadmin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Returns the permissions granted to this role.
    ///
    /// Permission names follow `<resource>.<verb>`. Staff can view and
    /// create documents; edit and delete require admin.
    #[must_use]
    pub fn permissions(&self) -> &'static [&'static str] {
        const STAFF: &[&str] = &[
            "bills.view",
            "bills.create",
            "invoices.view",
            "invoices.create",
            "disbursements.view",
            "disbursements.create",
            "adjustments.view",
            "adjustments.create",
            "journal.view",
            "budgets.view",
            "accounts.view",
        ];
        const ADMIN: &[&str] = &[
            "bills.view",
            "bills.create",
            "bills.edit",
            "bills.delete",
            "invoices.view",
            "invoices.create",
            "invoices.edit",
            "invoices.delete",
            "disbursements.view",
            "disbursements.create",
            "disbursements.edit",
            "disbursements.delete",
            "adjustments.view",
            "adjustments.create",
            "adjustments.edit",
            "adjustments.delete",
            "journal.view",
            "budgets.view",
            "budgets.approve",
            "accounts.view",
        ];

        match self {
            Self::Staff => STAFF,
            Self::Admin | Self::SuperAdmin => ADMIN,
        }
    }
}

/// The authenticated caller of a posting operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Acting user id.
    pub user_id: i64,
    /// The user's role.
    pub role: Role,
}

impl RequestContext {
    /// Creates a context for the given user and role.
    #[must_use]
    pub const fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns true if the caller holds the named permission.
    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.role.permissions().contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Staff < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
    }

    #[rstest]
    #[case("staff", Some(Role::Staff))]
    #[case("admin", Some(Role::Admin))]
    #[case("super_admin", Some(Role::SuperAdmin))]
    #[case("superadmin", Some(Role::SuperAdmin))]
    #[case("manager", None)]
    fn test_role_parse(#[case] input: &str, #[case] expected: Option<Role>) {
        assert_eq!(Role::parse(input), expected);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Staff, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_staff_cannot_delete() {
        let ctx = RequestContext::new(7, Role::Staff);
        assert!(ctx.has_permission("bills.create"));
        assert!(!ctx.has_permission("bills.delete"));
        assert!(!ctx.has_permission("budgets.approve"));
    }

    #[test]
    fn test_admin_full_document_lifecycle() {
        let ctx = RequestContext::new(1, Role::Admin);
        for perm in [
            "bills.edit",
            "bills.delete",
            "invoices.delete",
            "adjustments.edit",
            "budgets.approve",
        ] {
            assert!(ctx.has_permission(perm), "admin should hold {perm}");
        }
    }
}
