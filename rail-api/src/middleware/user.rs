use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use rail_core::{AppContext, CurrentUser};

use crate::error::AppError;
use crate::state::AppState;

/// Identifies the traveller. There is no credential behind it.
pub const USER_HEADER: &str = "x-user-id";

/// Builds the request's [`AppContext`] from the user header and injects it
/// into the request extensions.
pub async fn current_user_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = req
        .headers()
        .get(USER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::AuthenticationError(format!("Missing {} header", USER_HEADER)))?
        .to_string();

    let mut ctx = AppContext::new(state.endpoints.clone());
    ctx.sign_in(CurrentUser::new(user_id));
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
