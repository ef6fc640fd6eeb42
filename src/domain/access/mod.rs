//! Access control core
//!
//! Role model, permission evaluator, route authorization guard, and the
//! navigation filter. All decision logic here is pure; enforcement and
//! session state live in the auth middleware and the session store.

pub mod capability;
pub mod guard;
pub mod navigation;
pub mod role;

pub use capability::{
    can_edit, can_manage_users, can_view, capability_granted_by_name, has_any_role, has_role,
    is_admin, is_encoder, is_viewer, Capability,
};
pub use guard::{authorize, AccessDecision, RedirectTarget, RouteRequirement};
pub use navigation::{navigation_tree, visible_items, NavEntry};
pub use role::Role;
