//! Repository for the estabelecimentos table
//!
//! Lookup is by the composite natural key (cnpj_basico, cnpj_ordem, cnpj_dv).

use sqlx::PgConnection;

use crate::models::Estabelecimento;

const COLUMNS: &str = "cnpj_basico, cnpj_ordem, cnpj_dv, identificador_matriz_filial, \
    nome_fantasia, situacao_cadastral, data_situacao_cadastral, motivo_situacao_cadastral, \
    nome_cidade_exterior, pais, data_inicio_atividade, cnae_fiscal_principal, \
    cnae_fiscal_secundaria, tipo_logradouro, logradouro, numero, complemento, bairro, \
    cep, uf, municipio, ddd1, telefone1, ddd2, telefone2, ddd_fax, fax, \
    correio_eletronico, situacao_especial, data_situacao_especial";

#[derive(Debug, Clone, Copy, Default)]
pub struct EstabelecimentoRepository;

impl EstabelecimentoRepository {
    pub async fn get_by_cnpj(
        &self,
        conn: &mut PgConnection,
        cnpj_basico: &str,
        cnpj_ordem: &str,
        cnpj_dv: &str,
    ) -> sqlx::Result<Option<Estabelecimento>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM estabelecimentos \
             WHERE cnpj_basico = $1 AND cnpj_ordem = $2 AND cnpj_dv = $3"
        );
        sqlx::query_as(&sql)
            .bind(cnpj_basico)
            .bind(cnpj_ordem)
            .bind(cnpj_dv)
            .fetch_optional(conn)
            .await
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        record: &Estabelecimento,
    ) -> sqlx::Result<()> {
        let sql = format!(
            "INSERT INTO estabelecimentos ({COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
              $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30)"
        );
        bind_fields(sqlx::query(&sql), record).execute(conn).await?;
        Ok(())
    }

    pub async fn update(
        &self,
        conn: &mut PgConnection,
        record: &Estabelecimento,
    ) -> sqlx::Result<()> {
        let sql = "UPDATE estabelecimentos SET \
             identificador_matriz_filial = $4, nome_fantasia = $5, situacao_cadastral = $6, \
             data_situacao_cadastral = $7, motivo_situacao_cadastral = $8, \
             nome_cidade_exterior = $9, pais = $10, data_inicio_atividade = $11, \
             cnae_fiscal_principal = $12, cnae_fiscal_secundaria = $13, tipo_logradouro = $14, \
             logradouro = $15, numero = $16, complemento = $17, bairro = $18, cep = $19, \
             uf = $20, municipio = $21, ddd1 = $22, telefone1 = $23, ddd2 = $24, \
             telefone2 = $25, ddd_fax = $26, fax = $27, correio_eletronico = $28, \
             situacao_especial = $29, data_situacao_especial = $30 \
             WHERE cnpj_basico = $1 AND cnpj_ordem = $2 AND cnpj_dv = $3";
        bind_fields(sqlx::query(sql), record).execute(conn).await?;
        Ok(())
    }
}

/// Bind all 30 fields in layout order ($1..$30)
fn bind_fields<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    record: &'q Estabelecimento,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(&record.cnpj_basico)
        .bind(&record.cnpj_ordem)
        .bind(&record.cnpj_dv)
        .bind(&record.identificador_matriz_filial)
        .bind(&record.nome_fantasia)
        .bind(&record.situacao_cadastral)
        .bind(record.data_situacao_cadastral)
        .bind(&record.motivo_situacao_cadastral)
        .bind(&record.nome_cidade_exterior)
        .bind(&record.pais)
        .bind(record.data_inicio_atividade)
        .bind(&record.cnae_fiscal_principal)
        .bind(&record.cnae_fiscal_secundaria)
        .bind(&record.tipo_logradouro)
        .bind(&record.logradouro)
        .bind(&record.numero)
        .bind(&record.complemento)
        .bind(&record.bairro)
        .bind(&record.cep)
        .bind(&record.uf)
        .bind(&record.municipio)
        .bind(&record.ddd1)
        .bind(&record.telefone1)
        .bind(&record.ddd2)
        .bind(&record.telefone2)
        .bind(&record.ddd_fax)
        .bind(&record.fax)
        .bind(&record.correio_eletronico)
        .bind(&record.situacao_especial)
        .bind(record.data_situacao_especial)
}
