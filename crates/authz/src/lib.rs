//! Authentication primitives: the static credential table consulted at login
//! and the HS256 token service that guards protected routes.

pub mod credentials;
pub mod token;

pub use credentials::{AuthError, CredentialStore};
pub use token::{Claims, TokenError, TokenService};
