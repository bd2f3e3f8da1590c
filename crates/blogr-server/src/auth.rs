//! Authentication (HTTP Basic against stored argon2 hashes) and the access
//! control list guarding the entry API.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, Method, header},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use blogr_api::ApiError;
use blogr_core::{
  store::{EntryStore, UserStore},
  user::User,
};
use rand_core::OsRng;

use crate::{AppState, error::Error};

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check `password` against a PHC string. A malformed hash never verifies.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, Error> {
  tokio::task::spawn_blocking(move || hash_password(&password))
    .await
    .map_err(|e| Error::PasswordHash(e.to_string()))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(password: String, phc: String) -> bool {
  tokio::task::spawn_blocking(move || verify_password(&password, &phc))
    .await
    .unwrap_or(false)
}

// ─── Access control ──────────────────────────────────────────────────────────

/// Something a request wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
  View,
  Create,
  Edit,
}

impl Permission {
  /// The permission needed for `method` on the entry API, or `None` for a
  /// method the API does not serve (left to the router's 405 handling).
  pub fn for_method(method: &Method) -> Option<Self> {
    match *method {
      Method::GET | Method::HEAD | Method::OPTIONS => Some(Self::View),
      Method::POST => Some(Self::Create),
      Method::PATCH => Some(Self::Edit),
      _ => None,
    }
  }

  /// Whether exercising this permission counts as a login.
  pub fn is_write(self) -> bool { !matches!(self, Self::View) }
}

/// Who an ACL rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grantee {
  Everyone,
  Authenticated,
}

/// Allow-only rules: anyone may read, signed-in users may write.
pub const ACL: &[(Grantee, Permission)] = &[
  (Grantee::Everyone, Permission::View),
  (Grantee::Authenticated, Permission::Create),
  (Grantee::Authenticated, Permission::Edit),
];

/// The identity attached to a request.
#[derive(Debug, Clone)]
pub enum Principal {
  Anonymous,
  User(User),
}

impl Principal {
  fn matches(&self, grantee: Grantee) -> bool {
    match grantee {
      Grantee::Everyone => true,
      Grantee::Authenticated => matches!(self, Self::User(_)),
    }
  }

  pub fn is_allowed(&self, permission: Permission) -> bool {
    ACL
      .iter()
      .any(|&(grantee, p)| p == permission && self.matches(grantee))
  }
}

// ─── Basic auth ──────────────────────────────────────────────────────────────

/// Decode a `Basic` authorization header into `(username, password)`.
///
/// `Ok(None)` means no credentials were sent; a header that is present but
/// malformed is an error.
pub fn basic_credentials(headers: &HeaderMap) -> Result<Option<(String, String)>, Error> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };

  let encoded = value
    .to_str()
    .ok()
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded.trim()).map_err(|_| Error::Unauthorized)?;
  let creds   = String::from_utf8(decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok(Some((username.to_owned(), password.to_owned())))
}

/// Resolve the request's principal from its Basic credentials.
pub async fn authenticate<S>(store: &S, headers: &HeaderMap) -> Result<Principal, Error>
where
  S: UserStore,
{
  let Some((name, password)) = basic_credentials(headers)? else {
    return Ok(Principal::Anonymous);
  };

  let user = store
    .user_by_name(&name)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      tracing::debug!(user = %name, "unknown user");
      Error::Unauthorized
    })?;

  if !verify_password_blocking(password, user.password_hash.clone()).await {
    tracing::debug!(user = %name, "bad password");
    return Err(Error::Unauthorized);
  }

  Ok(Principal::User(user))
}

/// Middleware enforcing [`ACL`] on the entry API.
///
/// `last_logged` is stamped only when a user exercises a write permission;
/// reads never touch the users table.
pub async fn authorize<S>(
  State(state): State<AppState<S>>,
  req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: EntryStore + UserStore + 'static,
{
  let Some(permission) = Permission::for_method(req.method()) else {
    return Ok(next.run(req).await);
  };

  let (parts, body) = req.into_parts();
  let principal = authenticate(state.store.as_ref(), &parts.headers).await?;

  if !principal.is_allowed(permission) {
    tracing::debug!(?permission, "permission denied");
    return Err(Error::Unauthorized);
  }

  if let Principal::User(user) = &principal
    && permission.is_write()
  {
    state
      .store
      .record_login(user.id)
      .await
      .map_err(ApiError::from_store)?;
  }
  Ok(next.run(Request::from_parts(parts, body)).await)
}
