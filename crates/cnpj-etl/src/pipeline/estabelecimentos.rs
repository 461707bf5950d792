//! Pipeline for the estabelecimentos bulk table
//!
//! ESTABELE rows are headerless, Latin-1, 29 columns. This is the strictest
//! transform: an establishment without its composite key, a valid status date
//! or a full address is discarded, because such a row cannot be upserted or
//! located again on the next load.

use async_trait::async_trait;
use sqlx::PgPool;

use super::transform::{parse_date, str_or_none, truncated};
use super::{CsvPipeline, RowOutcome};
use crate::extract::{Layout, RawRow, SourceEncoding};
use crate::models::estabelecimento::{identificador, situacao};
use crate::models::Estabelecimento;
use crate::repository::EstabelecimentoRepository;

const FIELDNAMES: &[&str] = &[
    "cnpj_basico",
    "cnpj_ordem",
    "cnpj_dv",
    "identificador_matriz_filial",
    "nome_fantasia",
    "situacao_cadastral",
    "data_situacao_cadastral",
    "motivo_situacao_cadastral",
    "nome_cidade_exterior",
    "pais",
    "data_inicio_atividade",
    "cnae_fiscal_principal",
    "cnae_fiscal_secundaria",
    "tipo_logradouro",
    "logradouro",
    "numero",
    "complemento",
    "bairro",
    "cep",
    "uf",
    "municipio",
    "ddd1",
    "telefone1",
    "ddd2",
    "telefone2",
    "ddd_fax",
    "fax",
    "correio_eletronico",
    "situacao_especial",
    "data_situacao_especial",
];

const LAYOUT: Layout = Layout {
    entity: "estabelecimentos",
    encoding: SourceEncoding::Latin1,
    fieldnames: Some(FIELDNAMES),
    required: FIELDNAMES,
};

/// Loader for establishments (ESTABELE)
pub struct EstabelecimentosPipeline {
    pool: PgPool,
    repo: EstabelecimentoRepository,
}

impl EstabelecimentosPipeline {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repo: EstabelecimentoRepository,
        }
    }
}

/// Trimmed value of a mandatory field; `None` discards the row
fn required(row: &RawRow, name: &str, max_len: Option<usize>) -> Option<String> {
    let value = row.get(name).trim();
    if value.is_empty() {
        return None;
    }
    Some(match max_len {
        Some(max) => truncated(value, max),
        None => value.to_string(),
    })
}

fn transform(row: &RawRow) -> Option<Estabelecimento> {
    let cnpj_basico = required(row, "cnpj_basico", Some(10))?;
    let cnpj_ordem = required(row, "cnpj_ordem", Some(4))?;
    let cnpj_dv = required(row, "cnpj_dv", Some(2))?;
    let data_situacao_cadastral = parse_date(row.get("data_situacao_cadastral"))?;
    let motivo_situacao_cadastral = required(row, "motivo_situacao_cadastral", Some(7))?;
    let cnae_fiscal_principal = required(row, "cnae_fiscal_principal", Some(7))?;
    let tipo_logradouro = required(row, "tipo_logradouro", None)?;
    let logradouro = required(row, "logradouro", None)?;
    let numero = required(row, "numero", None)?;
    let bairro = required(row, "bairro", None)?;
    let cep = {
        let raw = row.get("cep").trim().replace('-', "");
        if raw.is_empty() {
            return None;
        }
        truncated(&raw, 8)
    };
    let uf = required(row, "uf", Some(2))?;
    let municipio = required(row, "municipio", Some(7))?;

    let identificador_raw = row.get("identificador_matriz_filial").trim();
    let identificador_matriz_filial = if identificador_raw.is_empty() {
        identificador::MATRIZ.to_string()
    } else {
        truncated(identificador_raw, 1)
    };

    let situacao_raw = row.get("situacao_cadastral").trim();
    let situacao_cadastral = if situacao_raw.is_empty() {
        situacao::NULA.to_string()
    } else {
        truncated(situacao_raw, 2)
    };

    Some(Estabelecimento {
        cnpj_basico,
        cnpj_ordem,
        cnpj_dv,
        identificador_matriz_filial,
        nome_fantasia: row.get("nome_fantasia").trim().to_string(),
        situacao_cadastral,
        data_situacao_cadastral,
        motivo_situacao_cadastral,
        nome_cidade_exterior: str_or_none(row.get("nome_cidade_exterior"), None),
        pais: str_or_none(row.get("pais"), Some(7)),
        data_inicio_atividade: parse_date(row.get("data_inicio_atividade")),
        cnae_fiscal_principal,
        cnae_fiscal_secundaria: str_or_none(row.get("cnae_fiscal_secundaria"), None),
        tipo_logradouro,
        logradouro,
        numero,
        complemento: str_or_none(row.get("complemento"), None),
        bairro,
        cep,
        uf,
        municipio,
        ddd1: str_or_none(row.get("ddd1"), Some(2)),
        telefone1: str_or_none(row.get("telefone1"), None),
        ddd2: str_or_none(row.get("ddd2"), Some(2)),
        telefone2: str_or_none(row.get("telefone2"), None),
        ddd_fax: str_or_none(row.get("ddd_fax"), Some(2)),
        fax: str_or_none(row.get("fax"), None),
        correio_eletronico: str_or_none(row.get("correio_eletronico"), None),
        situacao_especial: str_or_none(row.get("situacao_especial"), None),
        data_situacao_especial: parse_date(row.get("data_situacao_especial")),
    })
}

#[async_trait]
impl CsvPipeline for EstabelecimentosPipeline {
    type Record = Estabelecimento;

    fn layout(&self) -> &Layout {
        &LAYOUT
    }

    fn transform_row(&self, row: &RawRow) -> Option<Estabelecimento> {
        transform(row)
    }

    async fn persist_one(&self, record: &Estabelecimento) -> anyhow::Result<RowOutcome> {
        let mut tx = self.pool.begin().await?;
        let outcome = match self
            .repo
            .get_by_cnpj(&mut tx, &record.cnpj_basico, &record.cnpj_ordem, &record.cnpj_dv)
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

    fn describe(&self, record: &Estabelecimento) -> String {
        format!(
            "cnpj={}/{}-{} situacao={}",
            record.cnpj_basico, record.cnpj_ordem, record.cnpj_dv, record.situacao_cadastral
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Header;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn row(overrides: &[(&str, &str)]) -> RawRow {
        let mut fields: Vec<String> = vec![
            "12345678".into(),  // cnpj_basico
            "0001".into(),      // cnpj_ordem
            "95".into(),        // cnpj_dv
            "1".into(),         // identificador_matriz_filial
            "ACME".into(),      // nome_fantasia
            "02".into(),        // situacao_cadastral
            "20230115".into(),  // data_situacao_cadastral
            "00".into(),        // motivo_situacao_cadastral
            "".into(),          // nome_cidade_exterior
            "".into(),          // pais
            "20100503".into(),  // data_inicio_atividade
            "6201501".into(),   // cnae_fiscal_principal
            "".into(),          // cnae_fiscal_secundaria
            "RUA".into(),       // tipo_logradouro
            "DAS FLORES".into(), // logradouro
            "100".into(),       // numero
            "".into(),          // complemento
            "CENTRO".into(),    // bairro
            "01001-000".into(), // cep
            "SP".into(),        // uf
            "3550308".into(),   // municipio
            "11".into(),        // ddd1
            "33334444".into(),  // telefone1
            "".into(),          // ddd2
            "".into(),          // telefone2
            "".into(),          // ddd_fax
            "".into(),          // fax
            "".into(),          // correio_eletronico
            "".into(),          // situacao_especial
            "".into(),          // data_situacao_especial
        ];
        for (name, value) in overrides {
            let idx = FIELDNAMES.iter().position(|n| n == name).unwrap();
            fields[idx] = value.to_string();
        }
        let header = Arc::new(Header::new(
            FIELDNAMES.iter().map(|n| n.to_string()).collect(),
        ));
        RawRow::new(header, fields, 1)
    }

    #[test]
    fn test_transform_full_row() {
        let record = transform(&row(&[])).unwrap();
        assert_eq!(record.cnpj_basico, "12345678");
        assert_eq!(record.cnpj_ordem, "0001");
        assert_eq!(record.cnpj_dv, "95");
        assert_eq!(
            record.data_situacao_cadastral,
            NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
        );
        assert_eq!(record.cep, "01001000");
        assert_eq!(record.ddd1.as_deref(), Some("11"));
        assert_eq!(record.telefone2, None);
    }

    #[test]
    fn test_transform_discards_missing_key_part() {
        assert!(transform(&row(&[("cnpj_ordem", "")])).is_none());
    }

    #[test]
    fn test_transform_discards_invalid_status_date() {
        assert!(transform(&row(&[("data_situacao_cadastral", "2023")])).is_none());
        assert!(transform(&row(&[("data_situacao_cadastral", "")])).is_none());
    }

    #[test]
    fn test_transform_discards_missing_address() {
        assert!(transform(&row(&[("logradouro", " ")])).is_none());
        assert!(transform(&row(&[("cep", "")])).is_none());
        assert!(transform(&row(&[("municipio", "")])).is_none());
    }

    #[test]
    fn test_transform_defaults_identificador_and_situacao() {
        let record = transform(&row(&[
            ("identificador_matriz_filial", ""),
            ("situacao_cadastral", ""),
        ]))
        .unwrap();
        assert_eq!(record.identificador_matriz_filial, identificador::MATRIZ);
        assert_eq!(record.situacao_cadastral, situacao::NULA);
    }

    #[test]
    fn test_transform_optional_date_absent_when_invalid() {
        let record = transform(&row(&[("data_inicio_atividade", "00000000")])).unwrap();
        assert_eq!(record.data_inicio_atividade, None);
    }
}
