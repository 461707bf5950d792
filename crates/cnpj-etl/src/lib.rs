//! CNPJ ETL Library
//!
//! Bulk-load pipelines for the public CNPJ extracts published by the Receita
//! Federal do Brasil: headerless, semicolon-delimited, Latin-1 encoded files
//! streamed row by row into a Postgres store with idempotent upserts.
//!
//! # Pipelines
//!
//! - **Reference tables**: paises, municipios, naturezas, qualificacoes,
//!   motivos, cnaes (`codigo;descricao` lookups)
//! - **Bulk tables**: empresas, estabelecimentos, simples
//!
//! Every pipeline shares the same orchestration skeleton ([`pipeline::Runner`])
//! and differs only in field layout, transform rules and upsert comparison.
//!
//! # Example
//!
//! ```no_run
//! use cnpj_etl::pipeline::{ReferencePipeline, Runner};
//! use sqlx::postgres::PgPoolOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = PgPoolOptions::new().connect("postgres://localhost/cnpj").await?;
//!     let pipeline = ReferencePipeline::paises(pool);
//!     let stats = Runner::new().run(&pipeline, "storage/PAISCSV".as_ref()).await?;
//!     println!("{stats}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod repository;

pub use error::{EtlError, Result};
