//! # Products API
//!
//! A product-catalog service: an HTTP API over a Postgres-backed product
//! table, SNS notification publishing, and a supervised set of background
//! SQS message processors.
//!
//! ## Features
//!
//! - Asynchronous SQS message processing with tokio
//! - Trait-based handler system with a functional registration variant
//! - Automatic message deletion on successful processing, and only then
//! - Continue-on-error semantics with fixed backoff on transport failures
//! - Cooperative shutdown: `stop()` blocks until every processor is quiescent
//! - Long polling with configurable parameters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use products_api::client::create_sqs_client_from_env;
//! use products_api::queue::SqsQueueClient;
//! use products_api::supervisor::ProcessorSupervisor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(SqsQueueClient::new(create_sqs_client_from_env().await));
//!     let mut supervisor = ProcessorSupervisor::new(client);
//!
//!     supervisor.register_fn(
//!         "https://sqs.region.amazonaws.com/account/queue-name",
//!         |message| async move {
//!             println!("processing message: {}", message.body);
//!             Ok(())
//!         },
//!         None,
//!     )?;
//!
//!     supervisor.start()?;
//!     // ... serve traffic, wait for a shutdown signal ...
//!     supervisor.stop().await;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod database;
pub mod errors;
pub mod handler;
pub mod http;
pub mod models;
pub mod processor;
pub mod queue;
pub mod repository;
pub mod service;
pub mod supervisor;
