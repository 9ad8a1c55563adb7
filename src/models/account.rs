use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The three account classes the marketplace recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Seller,
  Buyer,
}

impl Role {
  /// Login probes the role tables in this fixed order and short-circuits on
  /// the first email match.
  pub const LOGIN_PROBE_ORDER: [Role; 3] = [Role::Admin, Role::Seller, Role::Buyer];

  /// Single-letter prefix on the human-readable ids (`A001`, `S001`, `B001`).
  pub fn id_prefix(self) -> char {
    match self {
      Role::Admin => 'A',
      Role::Seller => 'S',
      Role::Buyer => 'B',
    }
  }

  pub fn table(self) -> &'static str {
    match self {
      Role::Admin => "admindetails",
      Role::Seller => "sellerdetails",
      Role::Buyer => "buyerdetails",
    }
  }

  pub fn id_column(self) -> &'static str {
    match self {
      Role::Admin => "admin_id",
      Role::Seller => "seller_id",
      Role::Buyer => "buyer_id",
    }
  }

  /// Dashboard path handed back as the post-login redirect hint.
  pub fn dashboard_path(self) -> &'static str {
    match self {
      Role::Admin => "/admin",
      Role::Seller => "/seller",
      Role::Buyer => "/buyer",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Role::Admin => "admin",
      Role::Seller => "seller",
      Role::Buyer => "buyer",
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Role::Admin => "Admin",
      Role::Seller => "Seller",
      Role::Buyer => "Buyer",
    }
  }
}

/// Unified row shape for the login probe; every role table exposes these
/// columns (the role id is aliased in the query).
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
  pub role_id: String,
  pub name: String,
  pub email: String,
  pub hashed_password: String,
}

/// A seller's profile as returned by GET /seller/profile. Never carries the
/// password hash.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SellerProfile {
  pub seller_id: String,
  pub name: String,
  pub email: String,
  pub smartcard_id: String,
  pub hostel: String,
}
