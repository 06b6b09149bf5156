use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::member::Role;
use crate::utils::error::AppError;

/// A named capability required to perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CreateEvent,
    EditEvent,
    DeleteEvent,
    ViewOnly,
}

/// Immutable role -> permission table, built once at first use. The
/// mapping is static configuration, not per-workspace state.
fn role_permissions() -> &'static HashMap<Role, Vec<Permission>> {
    static TABLE: OnceLock<HashMap<Role, Vec<Permission>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        table.insert(
            Role::Owner,
            vec![
                Permission::CreateEvent,
                Permission::EditEvent,
                Permission::DeleteEvent,
                Permission::ViewOnly,
            ],
        );
        table.insert(
            Role::Admin,
            vec![
                Permission::CreateEvent,
                Permission::EditEvent,
                Permission::DeleteEvent,
                Permission::ViewOnly,
            ],
        );
        // Standard members can schedule and reschedule meetings but not
        // cancel them.
        table.insert(
            Role::Member,
            vec![
                Permission::ViewOnly,
                Permission::CreateEvent,
                Permission::EditEvent,
            ],
        );
        table
    })
}

/// Denies the request before any service call when the caller's role
/// lacks one of the required permissions.
pub fn role_guard(role: Role, required: &[Permission]) -> Result<(), AppError> {
    let granted = role_permissions()
        .get(&role)
        .map(Vec::as_slice)
        .unwrap_or_default();

    if required.iter().all(|needed| granted.contains(needed)) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have the necessary permissions to perform this action".to_string(),
        ))
    }
}
