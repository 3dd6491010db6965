//! # Company Commands
//!
//! Creating a company is reserved to the super administrator. Settings of
//! an existing company are edited from inside it, and the settings PIN
//! guards that screen.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use comptoir_core::ids::new_id;
use comptoir_core::validation::{validate_name, validate_settings_pin, validate_tax_rate_bps};
use comptoir_core::{
    Company, Entity, UserRole, DEFAULT_CURRENCY_SYMBOL, DEFAULT_TAX_RATE_BPS, DEFAULT_THEME_COLOR,
};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Settings fields to change. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_rate_bps: Option<u32>,
    pub currency_symbol: Option<String>,
    pub footer_message: Option<String>,
    pub theme_color: Option<String>,
}

/// Super administrator only: registers a new tenant with default settings.
pub async fn create_company<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    input: NewCompany,
) -> ApiResult<Company> {
    ctx.session().require_super_admin()?;
    validate_name("company name", &input.name)?;

    let company = Company {
        id: new_id(),
        name: input.name.trim().to_string(),
        logo: None,
        address: input.address,
        phone: input.phone,
        email: input.email,
        tax_rate_bps: DEFAULT_TAX_RATE_BPS,
        currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        footer_message: String::new(),
        theme_color: Some(DEFAULT_THEME_COLOR.to_string()),
        settings_pin: None,
    };

    let company = ctx.persist(&company).await?;
    info!(company_id = %company.id, name = %company.name, "Company created");
    Ok(company)
}

/// Updates the active company's settings. Company admins and the super
/// administrator only.
pub async fn update_company<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    settings: CompanySettings,
) -> ApiResult<Company> {
    require_manager(ctx)?;
    let mut company = ctx.active_company()?.clone();

    if let Some(name) = settings.name {
        validate_name("company name", &name)?;
        company.name = name.trim().to_string();
    }
    if let Some(bps) = settings.tax_rate_bps {
        validate_tax_rate_bps(bps)?;
        company.tax_rate_bps = bps;
    }
    if let Some(symbol) = settings.currency_symbol {
        validate_name("currency symbol", &symbol)?;
        company.currency_symbol = symbol;
    }
    if let Some(logo) = settings.logo {
        company.logo = Some(logo);
    }
    if let Some(address) = settings.address {
        company.address = address;
    }
    if let Some(phone) = settings.phone {
        company.phone = phone;
    }
    if let Some(email) = settings.email {
        company.email = email;
    }
    if let Some(footer) = settings.footer_message {
        company.footer_message = footer;
    }
    if let Some(color) = settings.theme_color {
        company.theme_color = Some(color);
    }

    let company = ctx.persist(&company).await?;
    info!(company_id = %company.id, "Company settings updated");
    Ok(company)
}

/// Sets or replaces the active company's settings PIN.
pub async fn set_settings_pin<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    pin: &str,
) -> ApiResult<()> {
    require_manager(ctx)?;
    validate_settings_pin(pin)?;
    let mut company = ctx.active_company()?.clone();
    company.settings_pin = Some(pin.to_string());
    ctx.persist(&company).await?;
    info!(company_id = %company.id, "Settings PIN changed");
    Ok(())
}

/// Checks a PIN against the active company's settings PIN.
pub async fn verify_settings_pin<R: RemoteBackend>(
    ctx: &AppContext<R>,
    pin: &str,
) -> ApiResult<bool> {
    let company = ctx.active_company()?;
    let ok = company.verify_pin(pin);
    if !ok {
        warn!(company_id = %company.id, "Settings PIN rejected");
    }
    Ok(ok)
}

/// Deletes a company that no longer owns any record.
pub async fn delete_company<R: RemoteBackend>(ctx: &mut AppContext<R>, id: &str) -> ApiResult<()> {
    ctx.session().require_super_admin()?;
    if ctx.session().active_company_id() == Some(id) {
        return Err(ApiError::validation("Leave the company before deleting it"));
    }
    let company = ctx
        .cache()
        .find::<Company>(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(Company::KIND, id))?;

    let owned = ctx.cache().collections().owned_by(&company.id);
    if owned > 0 {
        warn!(company_id = %id, owned, "Company delete refused");
        return Err(ApiError::business_logic(format!(
            "Company {} still owns {} record(s)",
            company.name, owned
        )));
    }
    ctx.discard::<Company>(&company.id).await?;
    info!(company_id = %id, "Company deleted");
    Ok(())
}

pub(crate) fn require_manager<R: RemoteBackend>(ctx: &AppContext<R>) -> ApiResult<()> {
    let user = ctx.session().require_user()?;
    match user.role {
        UserRole::SuperAdmin | UserRole::Admin => Ok(()),
        _ => Err(ApiError::unauthorized("Only administrators can do this")),
    }
}
