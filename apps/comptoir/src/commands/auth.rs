//! # Session Commands
//!
//! Login, logout and company switching. Every change of active company
//! goes through [`AppContext::apply_scope`], which rebuilds the cached
//! views before the handler returns.

use tracing::{info, warn};

use comptoir_core::{Company, Entity, User};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};

/// Logs in with a plaintext username/password pair.
///
/// Company users land in their company; the super administrator lands
/// with no company selected.
pub async fn login<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    username: &str,
    password: &str,
) -> ApiResult<User> {
    let user = ctx
        .cache()
        .raw::<User>()
        .iter()
        .find(|u| u.username == username.trim())
        .filter(|u| u.check_password(password))
        .cloned()
        .ok_or_else(|| {
            warn!(username = %username, "Login rejected");
            ApiError::unauthorized("Invalid username or password")
        })?;

    ctx.session_mut().sign_in(user.clone());
    ctx.apply_scope();

    info!(
        user_id = %user.id,
        company_id = ?user.company_id,
        "User logged in"
    );
    Ok(user)
}

pub async fn logout<R: RemoteBackend>(ctx: &mut AppContext<R>) {
    if let Some(user) = ctx.session().user() {
        info!(user_id = %user.id, "User logged out");
    }
    ctx.session_mut().sign_out();
    ctx.apply_scope();
}

/// Super administrator only: works inside `company_id`.
pub async fn select_company<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    company_id: &str,
) -> ApiResult<Company> {
    ctx.session().require_super_admin()?;

    let company = ctx
        .cache()
        .find::<Company>(company_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(Company::KIND, company_id))?;

    ctx.session_mut().enter_company(&company.id);
    ctx.apply_scope();

    info!(company_id = %company.id, "Company selected");
    Ok(company)
}

/// Super administrator only: back to the company list.
pub async fn leave_company<R: RemoteBackend>(ctx: &mut AppContext<R>) -> ApiResult<()> {
    ctx.session().require_super_admin()?;
    ctx.session_mut().leave_company();
    ctx.apply_scope();
    Ok(())
}
