// core/src/identity/access.rs

use tracing::{instrument, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{Role, User};
use crate::store::UserStore;

/// Loads the caller and checks their role against `allowed`.
///
/// The role is always read from storage; a token only proves identity.
#[instrument(name = "access::require_role", skip(store), fields(user_id = %user_id))]
pub async fn require_role<S>(store: &S, user_id: Uuid, allowed: &[Role]) -> CoreResult<User>
where
  S: UserStore + ?Sized,
{
  let user = store
    .find_user(user_id)
    .await?
    .ok_or_else(|| CoreError::Auth("User no longer exists".to_string()))?;

  if allowed.contains(&user.role) {
    Ok(user)
  } else {
    warn!(role = ?user.role, ?allowed, "Capability check failed.");
    Err(CoreError::Forbidden(
      "You do not have permission to perform this action".to_string(),
    ))
  }
}
