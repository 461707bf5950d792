//! Pipeline for the simples bulk table
//!
//! SIMPLES rows are headerless, Latin-1, 7 columns, one per company. Only the
//! `cnpj_basico` key is mandatory; flags and dates degrade gracefully.

use async_trait::async_trait;
use sqlx::PgPool;

use super::transform::{normalize_opcao, parse_date, truncated};
use super::{CsvPipeline, RowOutcome};
use crate::extract::{Layout, RawRow, SourceEncoding};
use crate::models::Simples;
use crate::repository::SimplesRepository;

const FIELDNAMES: &[&str] = &[
    "cnpj_basico",
    "opcao_simples",
    "data_opcao_simples",
    "data_exclusao_simples",
    "opcao_mei",
    "data_opcao_mei",
    "data_exclusao_mei",
];

const LAYOUT: Layout = Layout {
    entity: "simples",
    encoding: SourceEncoding::Latin1,
    fieldnames: Some(FIELDNAMES),
    required: FIELDNAMES,
};

/// Loader for Simples Nacional / MEI enrollment (SIMPLES)
pub struct SimplesPipeline {
    pool: PgPool,
    repo: SimplesRepository,
}

impl SimplesPipeline {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repo: SimplesRepository,
        }
    }
}

fn transform(row: &RawRow) -> Option<Simples> {
    let cnpj_basico = row.get("cnpj_basico").trim();
    if cnpj_basico.is_empty() {
        return None;
    }
    Some(Simples {
        cnpj_basico: truncated(cnpj_basico, 10),
        opcao_simples: normalize_opcao(row.get("opcao_simples")).to_string(),
        data_opcao_simples: parse_date(row.get("data_opcao_simples")),
        data_exclusao_simples: parse_date(row.get("data_exclusao_simples")),
        opcao_mei: normalize_opcao(row.get("opcao_mei")).to_string(),
        data_opcao_mei: parse_date(row.get("data_opcao_mei")),
        data_exclusao_mei: parse_date(row.get("data_exclusao_mei")),
    })
}

#[async_trait]
impl CsvPipeline for SimplesPipeline {
    type Record = Simples;

    fn layout(&self) -> &Layout {
        &LAYOUT
    }

    fn transform_row(&self, row: &RawRow) -> Option<Simples> {
        transform(row)
    }

    async fn persist_one(&self, record: &Simples) -> anyhow::Result<RowOutcome> {
        let mut tx = self.pool.begin().await?;
        let outcome = match self
            .repo
            .get_by_cnpj_basico(&mut tx, &record.cnpj_basico)
            .await?
        {
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

    fn describe(&self, record: &Simples) -> String {
        format!(
            "cnpj_basico={} simples={:?} mei={:?}",
            record.cnpj_basico, record.opcao_simples, record.opcao_mei
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Header;
    use crate::models::simples::opcao;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn row(fields: &[&str]) -> RawRow {
        let header = Arc::new(Header::new(
            FIELDNAMES.iter().map(|n| n.to_string()).collect(),
        ));
        RawRow::new(header, fields.iter().map(|f| f.to_string()).collect(), 1)
    }

    #[test]
    fn test_transform_full_row() {
        let record = transform(&row(&[
            "12345678", "S", "20200101", "", "N", "", "",
        ]))
        .unwrap();
        assert_eq!(record.cnpj_basico, "12345678");
        assert_eq!(record.opcao_simples, opcao::SIM);
        assert_eq!(record.data_opcao_simples, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(record.data_exclusao_simples, None);
        assert_eq!(record.opcao_mei, opcao::NAO);
    }

    #[test]
    fn test_transform_discards_missing_key() {
        assert!(transform(&row(&["  ", "S", "", "", "N", "", ""])).is_none());
    }

    #[test]
    fn test_transform_normalizes_unknown_flag() {
        let record = transform(&row(&["12345678", "X", "", "", "", "", ""])).unwrap();
        assert_eq!(record.opcao_simples, opcao::OUTROS);
        assert_eq!(record.opcao_mei, opcao::OUTROS);
    }

    #[test]
    fn test_transform_sentinel_date_is_absent() {
        let record =
            transform(&row(&["12345678", "S", "00000000", "", "N", "", ""])).unwrap();
        assert_eq!(record.data_opcao_simples, None);
    }
}
