//! Pipelines for the six reference tables
//!
//! All reference extracts share one layout (`codigo;descricao`, headerless,
//! Latin-1) and one upsert rule, so a single pipeline type serves paises,
//! municipios, naturezas, qualificacoes, motivos and cnaes; only the target
//! table and the code width differ.
//!
//! Example rows from the PAISCSV extract:
//!
//! ```text
//! "000";"COLIS POSTAUX"
//! "013";"AFEGANISTAO"
//! "076";"BRASIL"
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use super::transform::truncated;
use super::{CsvPipeline, RowOutcome};
use crate::extract::{Layout, RawRow, SourceEncoding};
use crate::models::Referencia;
use crate::repository::ReferenceRepository;

const FIELDNAMES: &[&str] = &["codigo", "descricao"];

/// Per-table parameters for a reference pipeline
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSpec {
    pub entity: &'static str,
    pub table: &'static str,
    /// Maximum width of the `codigo` natural key
    pub code_len: usize,
}

static PAISES: ReferenceSpec = ReferenceSpec { entity: "paises", table: "paises", code_len: 3 };
static MUNICIPIOS: ReferenceSpec =
    ReferenceSpec { entity: "municipios", table: "municipios", code_len: 7 };
static NATUREZAS: ReferenceSpec =
    ReferenceSpec { entity: "naturezas", table: "naturezas", code_len: 7 };
static QUALIFICACOES: ReferenceSpec =
    ReferenceSpec { entity: "qualificacoes", table: "qualificacoes", code_len: 7 };
static MOTIVOS: ReferenceSpec = ReferenceSpec { entity: "motivos", table: "motivos", code_len: 7 };
static CNAES: ReferenceSpec = ReferenceSpec { entity: "cnaes", table: "cnaes", code_len: 7 };

/// Loader for one `codigo;descricao` reference table
pub struct ReferencePipeline {
    pool: PgPool,
    repo: ReferenceRepository,
    spec: &'static ReferenceSpec,
    layout: Layout,
}

impl ReferencePipeline {
    fn new(pool: PgPool, spec: &'static ReferenceSpec) -> Self {
        Self {
            pool,
            repo: ReferenceRepository::new(spec.table),
            spec,
            layout: Layout {
                entity: spec.entity,
                encoding: SourceEncoding::Latin1,
                fieldnames: Some(FIELDNAMES),
                required: FIELDNAMES,
            },
        }
    }

    /// Countries (PAISCSV)
    pub fn paises(pool: PgPool) -> Self {
        Self::new(pool, &PAISES)
    }

    /// Municipalities (MUNICCSV)
    pub fn municipios(pool: PgPool) -> Self {
        Self::new(pool, &MUNICIPIOS)
    }

    /// Legal-nature codes (NATJUCSV)
    pub fn naturezas(pool: PgPool) -> Self {
        Self::new(pool, &NATUREZAS)
    }

    /// Qualification codes (QUALSCSV)
    pub fn qualificacoes(pool: PgPool) -> Self {
        Self::new(pool, &QUALIFICACOES)
    }

    /// Registration-status reason codes (MOTICSV)
    pub fn motivos(pool: PgPool) -> Self {
        Self::new(pool, &MOTIVOS)
    }

    /// Economic-activity codes (CNAECSV)
    pub fn cnaes(pool: PgPool) -> Self {
        Self::new(pool, &CNAES)
    }
}

/// Transform one raw row into a reference record, or discard it
fn transform(row: &RawRow, code_len: usize) -> Option<Referencia> {
    let codigo = row.get("codigo").trim();
    let descricao = row.get("descricao").trim();
    if codigo.is_empty() || descricao.is_empty() {
        return None;
    }
    Some(Referencia {
        codigo: truncated(codigo, code_len),
        descricao: descricao.to_string(),
    })
}

#[async_trait]
impl CsvPipeline for ReferencePipeline {
    type Record = Referencia;

    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn transform_row(&self, row: &RawRow) -> Option<Referencia> {
        transform(row, self.spec.code_len)
    }

    async fn persist_one(&self, record: &Referencia) -> anyhow::Result<RowOutcome> {
        let mut tx = self.pool.begin().await?;
        let outcome = match self.repo.get_by_codigo(&mut tx, &record.codigo).await? {
            Some(mut existing) => {
                if existing.business_eq(record) {
                    RowOutcome::Skipped
                } else {
                    existing.apply_update(record);
                    self.repo.update(&mut tx, &existing).await?;
                    RowOutcome::Updated
                }
            }
            None => {
                self.repo.insert(&mut tx, record).await?;
                RowOutcome::Inserted
            }
        };
        tx.commit().await?;
        Ok(outcome)
    }

    fn describe(&self, record: &Referencia) -> String {
        format!("codigo={} descricao={:.50}", record.codigo, record.descricao)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Header;
    use std::sync::Arc;

    fn row(codigo: &str, descricao: &str) -> RawRow {
        let header = Arc::new(Header::new(
            FIELDNAMES.iter().map(|n| n.to_string()).collect(),
        ));
        RawRow::new(
            header,
            vec![codigo.to_string(), descricao.to_string()],
            1,
        )
    }

    #[test]
    fn test_transform_trims_and_keeps_row() {
        let record = transform(&row(" 076 ", " BRASIL "), 3).unwrap();
        assert_eq!(record.codigo, "076");
        assert_eq!(record.descricao, "BRASIL");
    }

    #[test]
    fn test_transform_discards_empty_codigo() {
        assert!(transform(&row("   ", "BRASIL"), 3).is_none());
    }

    #[test]
    fn test_transform_discards_empty_descricao() {
        assert!(transform(&row("076", ""), 3).is_none());
    }

    #[test]
    fn test_transform_truncates_codigo() {
        let record = transform(&row("1234567890", "x"), 7).unwrap();
        assert_eq!(record.codigo, "1234567");
    }
}
