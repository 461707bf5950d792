//! Simples Nacional record
//!
//! One row per company (`cnpj_basico`), carrying the two independent opt-in
//! flags (Simples Nacional and MEI) with their enrollment/exclusion dates.

use chrono::NaiveDate;

/// Opção Simples/MEI conforme código da Receita Federal ("S", "N" or empty)
pub mod opcao {
    pub const SIM: &str = "S";
    pub const NAO: &str = "N";
    pub const OUTROS: &str = "";
}

/// Simplified-tax-regime data from the SIMPLES extract
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Simples {
    pub cnpj_basico: String,
    pub opcao_simples: String,
    pub data_opcao_simples: Option<NaiveDate>,
    pub data_exclusao_simples: Option<NaiveDate>,
    pub opcao_mei: String,
    pub data_opcao_mei: Option<NaiveDate>,
    pub data_exclusao_mei: Option<NaiveDate>,
}

impl Simples {
    /// Compare every mutable, business-relevant field
    pub fn business_eq(&self, other: &Self) -> bool {
        self.opcao_simples == other.opcao_simples
            && self.data_opcao_simples == other.data_opcao_simples
            && self.data_exclusao_simples == other.data_exclusao_simples
            && self.opcao_mei == other.opcao_mei
            && self.data_opcao_mei == other.data_opcao_mei
            && self.data_exclusao_mei == other.data_exclusao_mei
    }

    /// Overwrite every mutable field, keeping the natural key
    pub fn apply_update(&mut self, other: &Self) {
        self.opcao_simples = other.opcao_simples.clone();
        self.data_opcao_simples = other.data_opcao_simples;
        self.data_exclusao_simples = other.data_exclusao_simples;
        self.opcao_mei = other.opcao_mei.clone();
        self.data_opcao_mei = other.data_opcao_mei;
        self.data_exclusao_mei = other.data_exclusao_mei;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simples(opcao_simples: &str) -> Simples {
        Simples {
            cnpj_basico: "12345678".to_string(),
            opcao_simples: opcao_simples.to_string(),
            data_opcao_simples: NaiveDate::from_ymd_opt(2020, 1, 1),
            data_exclusao_simples: None,
            opcao_mei: opcao::NAO.to_string(),
            data_opcao_mei: None,
            data_exclusao_mei: None,
        }
    }

    #[test]
    fn test_business_eq_identical() {
        assert!(simples(opcao::SIM).business_eq(&simples(opcao::SIM)));
    }

    #[test]
    fn test_business_eq_flag_flipped() {
        assert!(!simples(opcao::SIM).business_eq(&simples(opcao::NAO)));
    }

    #[test]
    fn test_apply_update() {
        let mut existing = simples(opcao::SIM);
        let mut incoming = simples(opcao::NAO);
        incoming.data_exclusao_simples = NaiveDate::from_ymd_opt(2024, 6, 30);
        existing.apply_update(&incoming);
        assert_eq!(existing.opcao_simples, opcao::NAO);
        assert_eq!(
            existing.data_exclusao_simples,
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        assert_eq!(existing.cnpj_basico, "12345678");
    }
}
