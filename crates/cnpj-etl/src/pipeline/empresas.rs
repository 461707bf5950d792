//! Pipeline for the empresas bulk table
//!
//! EMPRECSV rows are headerless, Latin-1, 7 columns. A row needs a
//! `cnpj_basico` and a `razao_social` to survive the transform; a malformed
//! capital value degrades to 0.00 rather than losing the company.

use async_trait::async_trait;
use sqlx::PgPool;

use super::transform::{parse_decimal_comma, str_or_none, truncated};
use super::{CsvPipeline, RowOutcome};
use crate::extract::{Layout, RawRow, SourceEncoding};
use crate::models::empresa::porte;
use crate::models::Empresa;
use crate::repository::EmpresaRepository;

const FIELDNAMES: &[&str] = &[
    "cnpj_basico",
    "razao_social",
    "natureza_juridica",
    "qualificacao_responsavel",
    "capital_social",
    "porte_empresa",
    "ente_federativo",
];

const LAYOUT: Layout = Layout {
    entity: "empresas",
    encoding: SourceEncoding::Latin1,
    fieldnames: Some(FIELDNAMES),
    required: FIELDNAMES,
};

/// Loader for company registrations (EMPRECSV)
pub struct EmpresasPipeline {
    pool: PgPool,
    repo: EmpresaRepository,
}

impl EmpresasPipeline {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repo: EmpresaRepository,
        }
    }
}

fn transform(row: &RawRow) -> Option<Empresa> {
    let cnpj_basico = row.get("cnpj_basico").trim();
    let razao_social = row.get("razao_social").trim();
    if cnpj_basico.is_empty() || razao_social.is_empty() {
        return None;
    }

    let porte_raw = row.get("porte_empresa").trim();
    let porte_empresa = if porte_raw.is_empty() {
        porte::NAO_INFORMADO.to_string()
    } else {
        truncated(porte_raw, 2)
    };

    Some(Empresa {
        cnpj_basico: truncated(cnpj_basico, 10),
        razao_social: razao_social.to_string(),
        natureza_juridica: truncated(row.get("natureza_juridica").trim(), 7),
        qualificacao_responsavel: truncated(row.get("qualificacao_responsavel").trim(), 7),
        capital_social: parse_decimal_comma(row.get("capital_social")),
        porte_empresa,
        ente_federativo: str_or_none(row.get("ente_federativo"), None),
    })
}

#[async_trait]
impl CsvPipeline for EmpresasPipeline {
    type Record = Empresa;

    fn layout(&self) -> &Layout {
        &LAYOUT
    }

    fn transform_row(&self, row: &RawRow) -> Option<Empresa> {
        transform(row)
    }

    async fn persist_one(&self, record: &Empresa) -> anyhow::Result<RowOutcome> {
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

    fn describe(&self, record: &Empresa) -> String {
        format!(
            "cnpj_basico={} razao_social={:.40}",
            record.cnpj_basico, record.razao_social
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Header;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
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
            "12345678",
            "ACME LTDA",
            "2062",
            "49",
            "1000,00",
            "01",
            "",
        ]))
        .unwrap();
        assert_eq!(record.cnpj_basico, "12345678");
        assert_eq!(record.razao_social, "ACME LTDA");
        assert_eq!(record.capital_social, BigDecimal::from_str("1000.00").unwrap());
        assert_eq!(record.porte_empresa, "01");
        assert_eq!(record.ente_federativo, None);
    }

    #[test]
    fn test_transform_discards_missing_razao_social() {
        assert!(transform(&row(&["12345678", "  ", "2062", "49", "0,00", "01", ""])).is_none());
    }

    #[test]
    fn test_transform_discards_missing_cnpj_basico() {
        assert!(transform(&row(&["", "ACME LTDA", "2062", "49", "0,00", "01", ""])).is_none());
    }

    #[test]
    fn test_transform_defaults_porte_when_empty() {
        let record =
            transform(&row(&["12345678", "ACME LTDA", "2062", "49", "0,00", "", ""])).unwrap();
        assert_eq!(record.porte_empresa, porte::NAO_INFORMADO);
    }

    #[test]
    fn test_transform_bad_capital_falls_back_to_zero() {
        let record =
            transform(&row(&["12345678", "ACME LTDA", "2062", "49", "abc", "05", ""])).unwrap();
        assert_eq!(record.capital_social, BigDecimal::from(0));
    }

    #[test]
    fn test_transform_keeps_ente_federativo() {
        let record = transform(&row(&[
            "12345678",
            "MUNICIPIO DE SAO PAULO",
            "1244",
            "49",
            "0,00",
            "05",
            "SAO PAULO",
        ]))
        .unwrap();
        assert_eq!(record.ente_federativo.as_deref(), Some("SAO PAULO"));
    }
}
