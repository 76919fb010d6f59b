//! The order status state machine.
//!
//! Which status changes are legal depends on who is asking. The full table:
//!
//! | Role     | From       | May move to                     |
//! |----------|------------|---------------------------------|
//! | admin    | pending    | paid, processing, cancelled     |
//! | admin    | paid       | processing, cancelled, refunded |
//! | admin    | processing | shipped, cancelled              |
//! | admin    | shipped    | delivered, refunded             |
//! | admin    | delivered  | refunded                        |
//! | artisan  | paid       | processing                      |
//! | artisan  | processing | shipped                         |
//! | customer | pending    | cancelled                       |
//! | customer | paid       | cancelled                       |
//!
//! `cancelled` and `refunded` are terminal for everyone. Artisans additionally have to own at least one item on the
//! order, and customers have to own the order itself; those ownership checks live with the storage layer, which has
//! the rows at hand.

use crate::db_types::{OrderStatus, Role};

pub const ALL_ROLES: [Role; 3] = [Role::Customer, Role::Artisan, Role::Admin];

pub const ALL_STATUSES: [OrderStatus; 7] = [
    OrderStatus::Pending,
    OrderStatus::Paid,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
    OrderStatus::Refunded,
];

/// The statuses `role` may move an order to from `from`. Empty for terminal states and for edges the role does not
/// hold.
pub fn allowed_transitions(role: Role, from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match (role, from) {
        (Role::Admin, Pending) => &[Paid, Processing, Cancelled],
        (Role::Admin, Paid) => &[Processing, Cancelled, Refunded],
        (Role::Admin, Processing) => &[Shipped, Cancelled],
        (Role::Admin, Shipped) => &[Delivered, Refunded],
        (Role::Admin, Delivered) => &[Refunded],
        (Role::Artisan, Paid) => &[Processing],
        (Role::Artisan, Processing) => &[Shipped],
        (Role::Customer, Pending) => &[Cancelled],
        (Role::Customer, Paid) => &[Cancelled],
        _ => &[],
    }
}

pub fn is_allowed(role: Role, from: OrderStatus, to: OrderStatus) -> bool {
    allowed_transitions(role, from).contains(&to)
}

/// Spells out the legal moves for `role` from `from`, for rejection messages.
pub fn legal_transitions_message(role: Role, from: OrderStatus) -> String {
    let allowed = allowed_transitions(role, from);
    if allowed.is_empty() {
        format!("No status changes are allowed for role {role} from {from}")
    } else {
        let edges = allowed.iter().map(|to| format!("{from} -> {to}")).collect::<Vec<_>>().join(", ");
        format!("Allowed: {edges}")
    }
}

/// True when this cancellation must return the order's items to stock. Cancellations out of
/// pending, paid or processing by an admin or the customer put every item's quantity back; a
/// refund never does.
pub fn restores_stock(role: Role, from: OrderStatus, to: OrderStatus) -> bool {
    to == OrderStatus::Cancelled
        && matches!(from, OrderStatus::Pending | OrderStatus::Paid | OrderStatus::Processing)
        && matches!(role, Role::Admin | Role::Customer)
}
