//! Password hashing and verification for the account tables.

use crate::errors::AppError;
use argon2::{
  password_hash::{
    rand_core::OsRng, // For generating random salts
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    SaltString,
  },
  Argon2,
};
use tracing::{debug, error, instrument};

/// Hashes a plain-text password using Argon2 with a per-call random salt.
///
/// Returns the PHC-formatted hash string, or an `AppError` if hashing fails
/// or the password is empty. No further password policy is enforced here.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  let argon2_hasher = Argon2::default(); // Default Argon2 parameters

  match argon2_hasher.hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => {
      debug!("Password hashed successfully.");
      Ok(password_hash_obj.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!(
        "Password hashing process failed: {}",
        argon_err
      )))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// `Ok(false)` on a mismatch; an error only when the stored hash itself is
/// malformed or verification fails internally.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = match PasswordHash::new(stored_hash) {
    Ok(ph) => ph,
    Err(parse_err) => {
      error!(error = %parse_err, "Failed to parse stored password hash string.");
      return Err(AppError::Internal(format!(
        "Invalid stored password hash format: {}",
        parse_err
      )));
    }
  };

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify_round_trips() {
    let hash = hash_password("hunter2!").unwrap();
    assert!(verify_password(&hash, "hunter2!").unwrap());
    assert!(!verify_password(&hash, "hunter3!").unwrap());
  }

  #[test]
  fn same_password_gets_distinct_salts() {
    let a = hash_password("repeatable").unwrap();
    let b = hash_password("repeatable").unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn empty_password_is_rejected() {
    assert!(matches!(hash_password(""), Err(AppError::Validation(_))));
  }

  #[test]
  fn empty_provided_password_never_matches() {
    let hash = hash_password("secret").unwrap();
    assert!(!verify_password(&hash, "").unwrap());
  }

  #[test]
  fn garbage_stored_hash_is_an_internal_error() {
    assert!(matches!(
      verify_password("not-a-phc-string", "whatever"),
      Err(AppError::Internal(_))
    ));
  }
}
