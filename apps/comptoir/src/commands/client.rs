//! # Client Commands
//!
//! Loyalty points and total spent are not editable here; they only move
//! through checkout.

use serde::{Deserialize, Serialize};
use tracing::info;

use comptoir_core::ids::new_id;
use comptoir_core::validation::validate_name;
use comptoir_core::{Client, ClientType, Entity};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    pub notes: Option<String>,
}

pub async fn create_client<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    input: ClientInput,
) -> ApiResult<Client> {
    let company_id = ctx.session().require_tenant()?.to_string();
    validate_name("name", &input.name)?;

    let mut client = Client {
        id: new_id(),
        company_id: String::new(),
        name: input.name.trim().to_string(),
        email: input.email,
        phone: input.phone,
        address: input.address,
        client_type: input.client_type,
        loyalty_points: 0,
        total_spent: 0,
        notes: input.notes,
    };
    client.assign_company(&company_id);

    let client = ctx.persist(&client).await?;
    info!(client_id = %client.id, "Client created");
    Ok(client)
}

pub async fn update_client<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    id: &str,
    input: ClientInput,
) -> ApiResult<Client> {
    ctx.session().require_tenant()?;
    validate_name("name", &input.name)?;
    let mut client = ctx.scoped_record::<Client>(id)?;

    client.name = input.name.trim().to_string();
    client.email = input.email;
    client.phone = input.phone;
    client.address = input.address;
    client.client_type = input.client_type;
    client.notes = input.notes;

    ctx.persist(&client).await
}

/// Deletes a client. Sales keep the client's id and name.
pub async fn delete_client<R: RemoteBackend>(ctx: &mut AppContext<R>, id: &str) -> ApiResult<()> {
    ctx.session().require_tenant()?;
    let client = ctx.scoped_record::<Client>(id)?;
    ctx.discard::<Client>(&client.id).await?;
    info!(client_id = %id, "Client deleted");
    Ok(())
}
