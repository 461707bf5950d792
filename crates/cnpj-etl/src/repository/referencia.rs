//! Repository for the code/description reference tables
//!
//! One implementation serves all six lookup tables; the table name is fixed
//! per pipeline at construction.

use sqlx::PgConnection;

use crate::models::Referencia;

/// Repository over one reference table (paises, municipios, naturezas,
/// qualificacoes, motivos or cnaes)
#[derive(Debug, Clone, Copy)]
pub struct ReferenceRepository {
    table: &'static str,
}

impl ReferenceRepository {
    pub const fn new(table: &'static str) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub async fn get_by_codigo(
        &self,
        conn: &mut PgConnection,
        codigo: &str,
    ) -> sqlx::Result<Option<Referencia>> {
        let sql = format!(
            "SELECT codigo, descricao FROM {} WHERE codigo = $1",
            self.table
        );
        sqlx::query_as(&sql).bind(codigo).fetch_optional(conn).await
    }

    pub async fn insert(&self, conn: &mut PgConnection, record: &Referencia) -> sqlx::Result<()> {
        let sql = format!(
            "INSERT INTO {} (codigo, descricao) VALUES ($1, $2)",
            self.table
        );
        sqlx::query(&sql)
            .bind(&record.codigo)
            .bind(&record.descricao)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update(&self, conn: &mut PgConnection, record: &Referencia) -> sqlx::Result<()> {
        let sql = format!(
            "UPDATE {} SET descricao = $2 WHERE codigo = $1",
            self.table
        );
        sqlx::query(&sql)
            .bind(&record.codigo)
            .bind(&record.descricao)
            .execute(conn)
            .await?;
        Ok(())
    }
}
