//! Role-gating request extractors.
//!
//! Each guard resolves the session named by the cookie and requires an exact
//! role match. Rejections branch on the request's Accept header: browser
//! navigations (`text/html`) are bounced to the login page with a 303, API
//! calls get a JSON 401.

use crate::errors::AppError;
use crate::models::account::Role;
use crate::session::SessionUser;
use crate::state::AppState;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

/// A resolved live session. Carries the opaque session id so handlers can
/// mutate or destroy the underlying record.
#[derive(Debug, Clone)]
pub struct Authenticated {
  pub session_id: String,
  pub user: SessionUser,
}

/// Session lookup that never rejects; `/check-session` and logout use it.
pub struct MaybeSession(pub Option<Authenticated>);

fn state_of(req: &HttpRequest) -> Result<AppState, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .map(|data| data.get_ref().clone())
    .ok_or_else(|| AppError::Internal("AppState missing from request".to_string()))
}

fn prefers_html(req: &HttpRequest) -> bool {
  req
    .headers()
    .get(header::ACCEPT)
    .and_then(|value| value.to_str().ok())
    .map(|value| value.contains("text/html"))
    .unwrap_or(false)
}

async fn resolve_session(state: &AppState, req: &HttpRequest) -> Result<Option<Authenticated>, AppError> {
  let Some(cookie) = req.cookie(&state.config.session_cookie_name) else {
    return Ok(None);
  };
  let session_id = cookie.value().to_string();
  Ok(
    state
      .sessions
      .load(&session_id)
      .await?
      .map(|user| Authenticated { session_id, user }),
  )
}

async fn require_role(req: HttpRequest, role: Role) -> Result<Authenticated, AppError> {
  let state = state_of(&req)?;
  match resolve_session(&state, &req).await? {
    Some(auth) if auth.user.role == role => Ok(auth),
    _ => {
      if prefers_html(&req) {
        Err(AppError::LoginRedirect(state.config.login_page.clone()))
      } else {
        Err(AppError::Auth("Unauthorized".to_string()))
      }
    }
  }
}

impl FromRequest for MaybeSession {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, AppError>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move {
      let state = state_of(&req)?;
      Ok(MaybeSession(resolve_session(&state, &req).await?))
    })
  }
}

macro_rules! role_guard {
  ($name:ident, $role:expr) => {
    pub struct $name(pub Authenticated);

    impl FromRequest for $name {
      type Error = AppError;
      type Future = LocalBoxFuture<'static, Result<Self, AppError>>;

      fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { require_role(req, $role).await.map($name) })
      }
    }
  };
}

role_guard!(SellerAuth, Role::Seller);
role_guard!(BuyerAuth, Role::Buyer);
role_guard!(AdminAuth, Role::Admin);
