//! Access policy as one declarative table.
//!
//! Each protected operation maps to the roles that may always perform it
//! and whether the resource owner may perform it regardless of role.
//! Handlers never check role strings themselves; they state the operation
//! and the caller's relationship to the resource and call [`authorize`].
//! Operations missing from the table are denied.

use pantry::user::UserRole;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateOrder,
    ViewOrder,
    ListOrdersByUser,
    ListOrdersByRestaurant,
    UpdateOrderStatus,
    CancelOrder,
    ManageRestaurant,
    ManageMenu,
    SeedCatalog,
    ManageOwnProfile,
    CreatePayment,
    ViewPayment,
    RefundPayment,
}

/// The caller's relationship to the resource being acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Owner,
    Other,
}

pub struct Rule {
    pub operation: Operation,
    /// Roles allowed regardless of ownership.
    pub roles: &'static [UserRole],
    /// Whether the resource owner is allowed regardless of role.
    pub owner: bool,
}

const ANY_ROLE: &[UserRole] = &[
    UserRole::User,
    UserRole::Vendor,
    UserRole::Admin,
    UserRole::Delivery,
];

pub const TABLE: &[Rule] = &[
    Rule {
        operation: Operation::CreateOrder,
        roles: &[],
        owner: true,
    },
    Rule {
        operation: Operation::ViewOrder,
        roles: &[UserRole::Admin, UserRole::Vendor],
        owner: true,
    },
    Rule {
        operation: Operation::ListOrdersByUser,
        roles: &[UserRole::Admin],
        owner: true,
    },
    Rule {
        operation: Operation::ListOrdersByRestaurant,
        roles: &[UserRole::Vendor, UserRole::Admin],
        owner: false,
    },
    Rule {
        operation: Operation::UpdateOrderStatus,
        roles: &[UserRole::Vendor, UserRole::Admin, UserRole::Delivery],
        owner: false,
    },
    Rule {
        operation: Operation::CancelOrder,
        roles: &[],
        owner: true,
    },
    Rule {
        operation: Operation::ManageRestaurant,
        roles: &[UserRole::Vendor, UserRole::Admin],
        owner: false,
    },
    Rule {
        operation: Operation::ManageMenu,
        roles: &[UserRole::Vendor, UserRole::Admin],
        owner: false,
    },
    Rule {
        operation: Operation::SeedCatalog,
        roles: &[UserRole::Vendor, UserRole::Admin],
        owner: false,
    },
    Rule {
        operation: Operation::ManageOwnProfile,
        roles: &[],
        owner: true,
    },
    Rule {
        operation: Operation::CreatePayment,
        roles: ANY_ROLE,
        owner: false,
    },
    Rule {
        operation: Operation::ViewPayment,
        roles: ANY_ROLE,
        owner: false,
    },
    Rule {
        operation: Operation::RefundPayment,
        roles: ANY_ROLE,
        owner: false,
    },
];

/// Central policy check: 403 unless the table allows (operation, role,
/// relationship). Deny-by-default for operations without a rule.
pub fn authorize(
    operation: Operation,
    role: UserRole,
    relationship: Relationship,
) -> Result<(), AppError> {
    let allowed = TABLE
        .iter()
        .find(|rule| rule.operation == operation)
        .map(|rule| {
            rule.roles.contains(&role) || (rule.owner && relationship == Relationship::Owner)
        })
        .unwrap_or(false);

    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Relationship::{Other, Owner};
    use UserRole::{Admin, Delivery, User, Vendor};

    fn allowed(op: Operation, role: UserRole, rel: Relationship) -> bool {
        authorize(op, role, rel).is_ok()
    }

    #[test]
    fn view_order_owner_or_staff() {
        assert!(allowed(Operation::ViewOrder, User, Owner));
        assert!(allowed(Operation::ViewOrder, Admin, Other));
        assert!(allowed(Operation::ViewOrder, Vendor, Other));
        assert!(!allowed(Operation::ViewOrder, User, Other));
        assert!(!allowed(Operation::ViewOrder, Delivery, Other));
    }

    #[test]
    fn listing_by_user_is_admin_or_self() {
        assert!(allowed(Operation::ListOrdersByUser, Admin, Other));
        assert!(allowed(Operation::ListOrdersByUser, User, Owner));
        assert!(!allowed(Operation::ListOrdersByUser, Vendor, Other));
        assert!(!allowed(Operation::ListOrdersByUser, User, Other));
    }

    #[test]
    fn status_updates_are_staff_only() {
        for role in [Vendor, Admin, Delivery] {
            assert!(allowed(Operation::UpdateOrderStatus, role, Other));
        }
        // Even the order's owner cannot drive the fulfilment states.
        assert!(!allowed(Operation::UpdateOrderStatus, User, Owner));
    }

    #[test]
    fn cancel_is_owner_only() {
        assert!(allowed(Operation::CancelOrder, User, Owner));
        assert!(!allowed(Operation::CancelOrder, Admin, Other));
        assert!(!allowed(Operation::CancelOrder, User, Other));
    }

    #[test]
    fn catalog_mutation_is_vendor_or_admin() {
        for op in [Operation::ManageRestaurant, Operation::ManageMenu, Operation::SeedCatalog] {
            assert!(allowed(op, Vendor, Other));
            assert!(allowed(op, Admin, Other));
            assert!(!allowed(op, User, Other));
            assert!(!allowed(op, Delivery, Other));
        }
    }

    #[test]
    fn payments_allow_any_authenticated_role() {
        for role in [User, Vendor, Admin, Delivery] {
            assert!(allowed(Operation::CreatePayment, role, Other));
        }
    }
}
