pub mod builder;
pub mod dto;
pub mod errors;
pub mod oauth;
pub mod ports;
pub mod totp;
pub mod use_cases;
pub mod validation;
