use uuid::Uuid;

use crate::auth::issue_token;
use crate::config::AppConfig;
use crate::database::Scope;

/// Print a signed token carrying the given claims.
/// Inbound tokens are not verified, so this is a convenience for local use only.
pub fn handle(config: AppConfig, tenant_id: Uuid, store_id: Uuid) -> anyhow::Result<()> {
    let token = issue_token(&Scope::new(tenant_id, store_id), &config.security)?;
    println!("{}", token);
    Ok(())
}
