//! Auth module: domain inputs, token registry and the account service.
//!
//! Accounts live in a user `RecordStore`; tokens live only in memory and
//! are lost on restart.

pub mod domain;
pub mod errors;
pub mod service;
pub mod tokens;

pub use service::AuthService;
