//! API models for request and response payloads
//!
//! Each submodule holds one entity: the persisted row shape, the JSON
//! projections sent to clients, and the request payloads that mutate it.
//! Projections use camelCase field names because the frontend consumes them
//! that way; password hashes never appear in any projection.

pub mod achievement;
pub mod admin;
pub mod comment;
pub mod course;
pub mod feedback;
pub mod media;
pub mod message;
pub mod rating;
pub mod task;
pub mod user;
