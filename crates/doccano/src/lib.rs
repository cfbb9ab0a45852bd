//! Doccano - an async client for the doccano annotation server.
//!
//! The crate is layered: a [`session::ApiClient`] speaks HTTP through an
//! [`http::HttpTransport`], one repository per resource maps records to and
//! from JSON, use-cases resolve names to ids and orchestrate multi-step
//! flows, and [`DoccanoClient`] ties it all together.
//!
//! # Example
//!
//! ```ignore
//! use doccano::{ClientConfig, DoccanoClient, ProjectType};
//!
//! let client = DoccanoClient::new(ClientConfig::load()?)?;
//! client.login("admin", "password").await?;
//!
//! let project = client
//!     .create_project("news", ProjectType::SequenceLabeling, "NER on news")
//!     .await?;
//! let mut examples = client.list_examples(project.id.unwrap_or_default(), None);
//! while let Some(example) = examples.try_next().await? {
//!     println!("{:?}", example.text);
//! }
//! ```
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod retry;
pub mod services;
pub mod session;
pub mod usecase;

pub use client::DoccanoClient;
pub use config::ClientConfig;
pub use error::{ApiError, DoccanoError, ErrorBody, Result, ValidationError};
pub use http::{HttpTransport, reqwest_transport::ReqwestTransport};
pub use models::*;
pub use pagination::{Page, Paginator};
pub use repositories::IntoId;
pub use usecase::LabelTypeRef;
