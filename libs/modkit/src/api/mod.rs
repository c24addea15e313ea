//! HTTP API helpers shared by modules: RFC 9457 problem responses, the static
//! error catalog, and body rejection mapping.

pub mod catalog;
pub mod problem;
pub mod rejection;

pub use catalog::ErrDef;
pub use problem::{Problem, ProblemResponse, ValidationError};
