//! Repository for the simples table

use sqlx::PgConnection;

use crate::models::Simples;

const COLUMNS: &str = "cnpj_basico, opcao_simples, data_opcao_simples, \
                       data_exclusao_simples, opcao_mei, data_opcao_mei, data_exclusao_mei";

#[derive(Debug, Clone, Copy, Default)]
pub struct SimplesRepository;

impl SimplesRepository {
    pub async fn get_by_cnpj_basico(
        &self,
        conn: &mut PgConnection,
        cnpj_basico: &str,
    ) -> sqlx::Result<Option<Simples>> {
        let sql = format!("SELECT {COLUMNS} FROM simples WHERE cnpj_basico = $1");
        sqlx::query_as(&sql)
            .bind(cnpj_basico)
            .fetch_optional(conn)
            .await
    }

    pub async fn insert(&self, conn: &mut PgConnection, record: &Simples) -> sqlx::Result<()> {
        let sql = format!("INSERT INTO simples ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)");
        sqlx::query(&sql)
            .bind(&record.cnpj_basico)
            .bind(&record.opcao_simples)
            .bind(record.data_opcao_simples)
            .bind(record.data_exclusao_simples)
            .bind(&record.opcao_mei)
            .bind(record.data_opcao_mei)
            .bind(record.data_exclusao_mei)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update(&self, conn: &mut PgConnection, record: &Simples) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE simples SET opcao_simples = $2, data_opcao_simples = $3, \
             data_exclusao_simples = $4, opcao_mei = $5, data_opcao_mei = $6, \
             data_exclusao_mei = $7 WHERE cnpj_basico = $1",
        )
        .bind(&record.cnpj_basico)
        .bind(&record.opcao_simples)
        .bind(record.data_opcao_simples)
        .bind(record.data_exclusao_simples)
        .bind(&record.opcao_mei)
        .bind(record.data_opcao_mei)
        .bind(record.data_exclusao_mei)
        .execute(conn)
        .await?;
        Ok(())
    }
}
