//! # Session State
//!
//! Who is logged in and which company is active.
//!
//! ```text
//!   logged out ──login(company user)──► user + company fixed
//!        ▲    └─login(super admin)───► user, no company
//!        │                                 │   ▲
//!     logout                   select_company  leave_company
//!        │                                 ▼   │
//!        └─────────────────────────── user + chosen company
//! ```

use serde::Serialize;

use comptoir_core::{TenantScope, User};

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    user: Option<User>,
    active_company_id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session. Company users are pinned to their company; super
    /// administrators start with none.
    pub fn sign_in(&mut self, user: User) {
        self.active_company_id = user.company_id.clone();
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.active_company_id = None;
    }

    pub fn enter_company(&mut self, company_id: &str) {
        self.active_company_id = Some(company_id.to_string());
    }

    pub fn leave_company(&mut self) {
        self.active_company_id = None;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_super_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_super_admin)
    }

    pub fn active_company_id(&self) -> Option<&str> {
        self.active_company_id.as_deref()
    }

    pub fn scope(&self) -> TenantScope {
        TenantScope::from_active(self.active_company_id())
    }

    pub fn require_user(&self) -> ApiResult<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized("Not logged in"))
    }

    pub fn require_tenant(&self) -> ApiResult<&str> {
        self.require_user()?;
        self.active_company_id()
            .ok_or_else(ApiError::no_active_tenant)
    }

    pub fn require_super_admin(&self) -> ApiResult<&User> {
        let user = self.require_user()?;
        if !user.is_super_admin() {
            return Err(ApiError::unauthorized(
                "Only the super administrator can do this",
            ));
        }
        Ok(user)
    }
}
