pub mod cookies;
pub mod password;
pub mod policy;
pub mod resolver;
pub mod session;
pub mod token;

pub use policy::{can_mutate, ensure_can_mutate};
pub use resolver::{DynIdentityResolver, IdentityResolver};
pub use session::{require_session, CurrentUser, SessionVerifier};
pub use token::{SessionClaims, TokenError, TokenService};
