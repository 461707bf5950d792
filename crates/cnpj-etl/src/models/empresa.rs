//! Empresa (company) record
//!
//! Keyed by the 10-character `cnpj_basico`. `natureza_juridica` and
//! `qualificacao_responsavel` reference the corresponding code tables;
//! `capital_social` is a fixed-point monetary value.

use bigdecimal::BigDecimal;

/// Porte da empresa conforme código da Receita Federal
pub mod porte {
    pub const NAO_INFORMADO: &str = "00";
    pub const MICRO_EMPRESA: &str = "01";
    pub const EMPRESA_DE_PEQUENO_PORTE: &str = "03";
    pub const DEMAIS: &str = "05";
}

/// Company registration data from the EMPRECSV extract
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Empresa {
    pub cnpj_basico: String,
    pub razao_social: String,
    pub natureza_juridica: String,
    pub qualificacao_responsavel: String,
    pub capital_social: BigDecimal,
    pub porte_empresa: String,
    pub ente_federativo: Option<String>,
}

impl Empresa {
    /// Compare every mutable, business-relevant field
    pub fn business_eq(&self, other: &Self) -> bool {
        self.razao_social == other.razao_social
            && self.natureza_juridica == other.natureza_juridica
            && self.qualificacao_responsavel == other.qualificacao_responsavel
            && self.capital_social == other.capital_social
            && self.porte_empresa == other.porte_empresa
            && self.ente_federativo == other.ente_federativo
    }

    /// Overwrite every mutable field, keeping the natural key
    pub fn apply_update(&mut self, other: &Self) {
        self.razao_social = other.razao_social.clone();
        self.natureza_juridica = other.natureza_juridica.clone();
        self.qualificacao_responsavel = other.qualificacao_responsavel.clone();
        self.capital_social = other.capital_social.clone();
        self.porte_empresa = other.porte_empresa.clone();
        self.ente_federativo = other.ente_federativo.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn empresa(capital: &str) -> Empresa {
        Empresa {
            cnpj_basico: "12345678".to_string(),
            razao_social: "ACME LTDA".to_string(),
            natureza_juridica: "2062".to_string(),
            qualificacao_responsavel: "49".to_string(),
            capital_social: BigDecimal::from_str(capital).unwrap(),
            porte_empresa: porte::NAO_INFORMADO.to_string(),
            ente_federativo: None,
        }
    }

    #[test]
    fn test_business_eq_identical() {
        assert!(empresa("1000.00").business_eq(&empresa("1000.00")));
    }

    #[test]
    fn test_business_eq_capital_changed() {
        assert!(!empresa("1000.00").business_eq(&empresa("2000.00")));
    }

    #[test]
    fn test_apply_update_overwrites_mutable_fields() {
        let mut existing = empresa("1000.00");
        let mut incoming = empresa("2000.00");
        incoming.razao_social = "ACME SA".to_string();
        existing.apply_update(&incoming);
        assert_eq!(existing.cnpj_basico, "12345678");
        assert_eq!(existing.razao_social, "ACME SA");
        assert_eq!(existing.capital_social, BigDecimal::from_str("2000.00").unwrap());
    }
}
