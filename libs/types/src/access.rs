//! Role-based access control shared by the engine and the oracle
//!
//! One admin plus optional single-holder guardian roles. Guardians may
//! tighten risk settings (pause, cap) but never loosen them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ids::AccountId;

/// Access roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full configuration control
    Admin,
    /// May pause actions, never unpause
    PauseGuardian,
    /// May set borrow caps
    BorrowCapGuardian,
}

/// Maps each role to at most one holder.
#[derive(Debug, Clone)]
pub struct AccessControl {
    holders: HashMap<Role, AccountId>,
}

impl AccessControl {
    /// Create access control with an initial admin.
    pub fn new(admin: AccountId) -> Self {
        let mut holders = HashMap::new();
        holders.insert(Role::Admin, admin);
        Self { holders }
    }

    /// Check if a caller holds the specified role.
    pub fn has_role(&self, caller: &AccountId, role: Role) -> bool {
        self.holders.get(&role).map_or(false, |holder| holder == caller)
    }

    pub fn is_admin(&self, caller: &AccountId) -> bool {
        self.has_role(caller, Role::Admin)
    }

    /// Admin, or the holder of `role`.
    pub fn is_admin_or(&self, caller: &AccountId, role: Role) -> bool {
        self.is_admin(caller) || self.has_role(caller, role)
    }

    /// Assign a guardian role, replacing any previous holder. Only admin can
    /// assign; the admin role itself moves through `transfer_admin`.
    ///
    /// Passing `None` clears the role.
    pub fn set_guardian(
        &mut self,
        admin_caller: &AccountId,
        role: Role,
        holder: Option<AccountId>,
    ) -> bool {
        if !self.is_admin(admin_caller) || role == Role::Admin {
            return false;
        }
        match holder {
            Some(h) => self.holders.insert(role, h),
            None => self.holders.remove(&role),
        };
        true
    }

    /// Transfer admin to a new account.
    pub fn transfer_admin(&mut self, current_admin: &AccountId, new_admin: AccountId) -> bool {
        if !self.is_admin(current_admin) {
            return false;
        }
        self.holders.insert(Role::Admin, new_admin);
        true
    }

    pub fn holder(&self, role: Role) -> Option<AccountId> {
        self.holders.get(&role).copied()
    }

    /// Get the current admin.
    pub fn admin(&self) -> AccountId {
        // the admin entry is inserted at construction and only ever replaced
        self.holders[&Role::Admin]
    }
}
