use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use crate::shared::{AppError, AppState};
use crate::user::models::UserModel;

/// The user resolved from the bearer token, available to handlers as an extension
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserModel);

/// JWT authentication middleware - validates Authorization Bearer header, resolves the
/// token's user in the store and adds AuthenticatedUser to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::jwt_auth))
/// Handlers can then extract Extension(user): Extension<AuthenticatedUser>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    info!(
        "JWT authentication middleware triggered for request {}",
        req.uri()
    );

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("Missing or malformed Authorization header");
            AppError::Unauthorized("Invalid token".to_string())
        })?;

    let claims = match state.token_config.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    // The user must still exist and still own the email the token was issued for
    let user = state
        .store
        .get_user_by_id(claims.sub)
        .await?
        .filter(|user| user.email == claims.email)
        .ok_or_else(|| {
            warn!(user_id = claims.sub, "Token refers to an unknown user");
            AppError::Unauthorized("User not found".to_string())
        })?;

    info!(
        user_id = user.id,
        email = %user.email,
        "Authentication successful, adding user to request"
    );

    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}
