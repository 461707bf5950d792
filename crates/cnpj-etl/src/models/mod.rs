//! Domain records for the CNPJ tables
//!
//! Field names follow the RFB extract layouts. Each record knows its own
//! upsert rule: `business_eq` compares the business-relevant mutable fields
//! and `apply_update` overwrites every mutable field, leaving the natural key
//! untouched.

pub mod empresa;
pub mod estabelecimento;
pub mod referencia;
pub mod simples;

pub use empresa::Empresa;
pub use estabelecimento::Estabelecimento;
pub use referencia::Referencia;
pub use simples::Simples;
