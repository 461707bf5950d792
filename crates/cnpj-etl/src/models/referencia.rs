//! Reference-table record (codigo;descricao)
//!
//! One shape backs all six lookup tables: paises, municipios, naturezas,
//! qualificacoes, motivos and cnaes. The natural key is the fixed-width
//! `codigo`; the `descricao` is replaced when a later extract reports a
//! different text for the same code. Reference rows are never deleted by the
//! loader.

/// A code/description row from one of the reference tables
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Referencia {
    pub codigo: String,
    pub descricao: String,
}

impl Referencia {
    /// True when the existing row already carries the incoming description
    pub fn business_eq(&self, other: &Self) -> bool {
        self.descricao == other.descricao
    }

    /// Overwrite the mutable fields with the incoming values
    pub fn apply_update(&mut self, other: &Self) {
        self.descricao = other.descricao.clone();
    }
}
