mod http_identity_provider;
mod secure_http_client;

pub use http_identity_provider::HttpIdentityProvider;
pub use secure_http_client::SecureHttpClient;
