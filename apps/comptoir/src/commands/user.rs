//! # User Commands
//!
//! Staff accounts of the active company. Usernames are unique across the
//! whole store, since login happens before any company is chosen.

use serde::{Deserialize, Serialize};
use tracing::info;

use comptoir_core::ids::new_id;
use comptoir_core::validation::{validate_name, validate_username};
use comptoir_core::{Entity, User, UserRole, ValidationError, MIN_SECRET_LENGTH};
use comptoir_sync::RemoteBackend;

use crate::commands::company::require_manager;
use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: String,
    pub username: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    /// `None` keeps the current password on update.
    pub password: Option<String>,
}

pub async fn create_user<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    input: UserInput,
) -> ApiResult<User> {
    require_manager(ctx)?;
    let company_id = ctx.session().require_tenant()?.to_string();
    check_input(ctx, &input, None)?;

    let mut user = User {
        id: new_id(),
        company_id: None,
        name: input.name.trim().to_string(),
        username: input.username.trim().to_string(),
        role: input.role,
        avatar: input.avatar,
        password: input.password,
    };
    user.assign_company(&company_id);

    let user = ctx.persist(&user).await?;
    info!(user_id = %user.id, role = ?user.role, "User created");
    Ok(user)
}

pub async fn update_user<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
    input: UserInput,
) -> ApiResult<User> {
    require_manager(ctx)?;
    ctx.session().require_tenant()?;
    let mut user = ctx.scoped_record::<User>(id)?;
    check_input(ctx, &input, Some(id))?;

    user.name = input.name.trim().to_string();
    user.username = input.username.trim().to_string();
    user.role = input.role;
    user.avatar = input.avatar;
    if input.password.is_some() {
        user.password = input.password;
    }

    ctx.persist(&user).await
}

/// Deletes a staff account. The logged-in user cannot delete itself.
pub async fn delete_user<R: RemoteBackend>(ctx: &mut AppContext<R>, id: &str) -> ApiResult<()> {
    require_manager(ctx)?;
    ctx.session().require_tenant()?;
    if ctx.session().user().map(|u| u.id.as_str()) == Some(id) {
        return Err(ApiError::validation("You cannot delete your own account"));
    }
    let user = ctx.scoped_record::<User>(id)?;
    ctx.discard::<User>(&user.id).await?;
    info!(user_id = %id, "User deleted");
    Ok(())
}

fn check_input<R: RemoteBackend>(
    ctx: &AppContext<R>,
    input: &UserInput,
    existing_id: Option<&str>,
) -> ApiResult<()> {
    validate_name("name", &input.name)?;
    validate_username(input.username.trim())?;

    if input.role == UserRole::SuperAdmin {
        return Err(ApiError::unauthorized(
            "Company accounts cannot be super administrators",
        ));
    }

    if let Some(password) = &input.password {
        if password.chars().count() < MIN_SECRET_LENGTH {
            return Err(ValidationError::TooShort {
                field: "password".to_string(),
                min: MIN_SECRET_LENGTH,
            }
            .into());
        }
    }

    let username = input.username.trim();
    let taken = ctx
        .cache()
        .raw::<User>()
        .iter()
        .any(|u| u.username == username && Some(u.id.as_str()) != existing_id);
    if taken {
        return Err(ApiError::validation(format!(
            "Username '{}' is already taken",
            username
        )));
    }

    Ok(())
}
