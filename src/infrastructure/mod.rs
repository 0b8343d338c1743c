//! Infrastructure layer - password hashing, tokens, storage and observability

pub mod auth;
pub mod observability;
pub mod storage;
pub mod user;
