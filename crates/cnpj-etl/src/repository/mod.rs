//! Postgres access per entity
//!
//! Each repository exposes the capability the loader needs: lookup by natural
//! key, insert, update. Every method runs against a caller-supplied
//! [`sqlx::PgConnection`], so the unit of work (a per-row transaction in the
//! runner) is always explicit and never a module-level singleton.
//!
//! Queries are built at runtime (no compile-time database required); table
//! names are static constants, never user input.

pub mod empresa;
pub mod estabelecimento;
pub mod referencia;
pub mod simples;

pub use empresa::EmpresaRepository;
pub use estabelecimento::EstabelecimentoRepository;
pub use referencia::ReferenceRepository;
pub use simples::SimplesRepository;
