//! Bearer token middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::app::AppState;
use crate::game::Token;
use crate::http::routes::AppError;

/// Middleware to require the token of a joined player.
///
/// A missing or malformed header is `invalidToken`; a well-formed token that
/// no session issued is `unknownToken`. Both are reported before the request
/// body is looked at.
pub async fn require_token(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = auth.ok_or(AppError::InvalidToken)?;
    let token = Token::parse(bearer.token()).ok_or(AppError::InvalidToken)?;

    state.world.authorize(token.clone()).await?;

    // Insert into request extensions for handlers to access
    request.extensions_mut().insert(token);

    Ok(next.run(request).await)
}
