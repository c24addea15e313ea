//! # ModKit
//!
//! Shared building blocks for LegalWatch modules:
//!
//! - **Contracts**: `Module` / `DbModule` / `RestfulModule` phases (init → migrate → REST)
//! - **Context**: `ModuleCtx` with the DB handle and per-module config
//! - **API**: RFC 9457 problem responses and a static error catalog
//! - **HTTP**: traced outgoing client, request-id and trace middleware

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod api;
pub mod context;
pub mod contracts;
pub mod http;
pub mod shutdown;

pub use api::problem::{Problem, ProblemResponse, ValidationError};
pub use api::ErrDef;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
pub use contracts::{DbModule, Module, RestfulModule};
pub use http::client::TracedClient;
