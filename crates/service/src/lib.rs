//! Service layer for the blog platform.
//! - Record stores persist users and posts as JSON collections.
//! - `auth` owns accounts and bearer tokens; `posts` owns post workflows.
//! - Both services are generic over `storage::RecordStore` and never touch HTTP.

pub mod errors;
pub mod auth;
pub mod posts;
pub mod storage;
