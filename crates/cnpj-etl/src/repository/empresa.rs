//! Repository for the empresas table

use sqlx::PgConnection;

use crate::models::Empresa;

const COLUMNS: &str = "cnpj_basico, razao_social, natureza_juridica, \
                       qualificacao_responsavel, capital_social, porte_empresa, ente_federativo";

#[derive(Debug, Clone, Copy, Default)]
pub struct EmpresaRepository;

impl EmpresaRepository {
    pub async fn get_by_cnpj_basico(
        &self,
        conn: &mut PgConnection,
        cnpj_basico: &str,
    ) -> sqlx::Result<Option<Empresa>> {
        let sql = format!("SELECT {COLUMNS} FROM empresas WHERE cnpj_basico = $1");
        sqlx::query_as(&sql)
            .bind(cnpj_basico)
            .fetch_optional(conn)
            .await
    }

    pub async fn insert(&self, conn: &mut PgConnection, record: &Empresa) -> sqlx::Result<()> {
        let sql = format!(
            "INSERT INTO empresas ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        );
        sqlx::query(&sql)
            .bind(&record.cnpj_basico)
            .bind(&record.razao_social)
            .bind(&record.natureza_juridica)
            .bind(&record.qualificacao_responsavel)
            .bind(&record.capital_social)
            .bind(&record.porte_empresa)
            .bind(&record.ente_federativo)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update(&self, conn: &mut PgConnection, record: &Empresa) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE empresas SET razao_social = $2, natureza_juridica = $3, \
             qualificacao_responsavel = $4, capital_social = $5, porte_empresa = $6, \
             ente_federativo = $7 WHERE cnpj_basico = $1",
        )
        .bind(&record.cnpj_basico)
        .bind(&record.razao_social)
        .bind(&record.natureza_juridica)
        .bind(&record.qualificacao_responsavel)
        .bind(&record.capital_social)
        .bind(&record.porte_empresa)
        .bind(&record.ente_federativo)
        .execute(conn)
        .await?;
        Ok(())
    }
}
