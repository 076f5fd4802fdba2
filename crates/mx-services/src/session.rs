//! Acting user lookup

use mx_backend::Backend;
use mx_core::error::MxError;
use mx_core::result::MxResult;
use mx_models::CurrentUser;

/// The signed-in user, or `Unauthorized`
pub async fn require_user<B: Backend + ?Sized>(backend: &B) -> MxResult<CurrentUser> {
    backend
        .current_user()
        .await?
        .ok_or_else(|| MxError::Unauthorized {
            message: "no active session".to_string(),
        })
}
