//! Posts module: post CRUD, voting, comments and search.

pub mod domain;
pub mod policy;
pub mod service;

pub use policy::can_modify;
pub use service::PostService;
