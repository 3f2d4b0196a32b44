pub mod identity;
pub mod persistence;
