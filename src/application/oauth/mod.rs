//! OAuth 2.0 authorization-code login with PKCE
//!
//! `OAuthFlow::begin` produces the provider redirect plus the verifier the
//! caller must keep in a short-lived cookie; `OAuthFlow::complete` redeems the
//! callback code, resolves the local identity and signs a session token.

mod flow;
pub mod pkce;
mod session;

pub use flow::{EstablishedSession, FlowStage, LoginStart, OAuthError, OAuthFlow, OAuthSettings};
pub use pkce::PkcePair;
pub use session::{SessionClaims, SessionError, SessionIssuer, SessionStaff, SessionUser};
