//! Estabelecimento (establishment) record
//!
//! A company owns one matrix and any number of branches; the composite
//! natural key is (cnpj_basico, cnpj_ordem, cnpj_dv) and never changes once
//! assigned. `pais`, `municipio` and `cnae_fiscal_principal` reference the
//! code tables.

use chrono::NaiveDate;

/// Identificador matriz/filial conforme código da Receita Federal
pub mod identificador {
    pub const MATRIZ: &str = "1";
    pub const FILIAL: &str = "2";
}

/// Situação cadastral conforme código da Receita Federal
pub mod situacao {
    pub const NULA: &str = "01";
    pub const ATIVA: &str = "02";
    pub const SUSPENSA: &str = "03";
    pub const INAPTA: &str = "04";
    pub const BAIXADA: &str = "08";
}

/// Establishment data from the ESTABELE extract (29-column layout)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Estabelecimento {
    pub cnpj_basico: String,
    pub cnpj_ordem: String,
    pub cnpj_dv: String,
    pub identificador_matriz_filial: String,
    pub nome_fantasia: String,
    pub situacao_cadastral: String,
    pub data_situacao_cadastral: NaiveDate,
    pub motivo_situacao_cadastral: String,
    pub nome_cidade_exterior: Option<String>,
    pub pais: Option<String>,
    pub data_inicio_atividade: Option<NaiveDate>,
    pub cnae_fiscal_principal: String,
    pub cnae_fiscal_secundaria: Option<String>,
    pub tipo_logradouro: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cep: String,
    pub uf: String,
    pub municipio: String,
    pub ddd1: Option<String>,
    pub telefone1: Option<String>,
    pub ddd2: Option<String>,
    pub telefone2: Option<String>,
    pub ddd_fax: Option<String>,
    pub fax: Option<String>,
    pub correio_eletronico: Option<String>,
    pub situacao_especial: Option<String>,
    pub data_situacao_especial: Option<NaiveDate>,
}

impl Estabelecimento {
    /// Simplified comparison: only the fields that matter for change
    /// detection; contact and secondary fields do not trigger an update on
    /// their own but are still rewritten when any compared field differs.
    pub fn business_eq(&self, other: &Self) -> bool {
        self.nome_fantasia == other.nome_fantasia
            && self.situacao_cadastral == other.situacao_cadastral
            && self.data_situacao_cadastral == other.data_situacao_cadastral
            && self.motivo_situacao_cadastral == other.motivo_situacao_cadastral
            && self.cnae_fiscal_principal == other.cnae_fiscal_principal
            && self.logradouro == other.logradouro
            && self.numero == other.numero
            && self.cep == other.cep
            && self.uf == other.uf
            && self.municipio == other.municipio
    }

    /// Overwrite every mutable field, keeping the composite key
    pub fn apply_update(&mut self, other: &Self) {
        self.identificador_matriz_filial = other.identificador_matriz_filial.clone();
        self.nome_fantasia = other.nome_fantasia.clone();
        self.situacao_cadastral = other.situacao_cadastral.clone();
        self.data_situacao_cadastral = other.data_situacao_cadastral;
        self.motivo_situacao_cadastral = other.motivo_situacao_cadastral.clone();
        self.nome_cidade_exterior = other.nome_cidade_exterior.clone();
        self.pais = other.pais.clone();
        self.data_inicio_atividade = other.data_inicio_atividade;
        self.cnae_fiscal_principal = other.cnae_fiscal_principal.clone();
        self.cnae_fiscal_secundaria = other.cnae_fiscal_secundaria.clone();
        self.tipo_logradouro = other.tipo_logradouro.clone();
        self.logradouro = other.logradouro.clone();
        self.numero = other.numero.clone();
        self.complemento = other.complemento.clone();
        self.bairro = other.bairro.clone();
        self.cep = other.cep.clone();
        self.uf = other.uf.clone();
        self.municipio = other.municipio.clone();
        self.ddd1 = other.ddd1.clone();
        self.telefone1 = other.telefone1.clone();
        self.ddd2 = other.ddd2.clone();
        self.telefone2 = other.telefone2.clone();
        self.ddd_fax = other.ddd_fax.clone();
        self.fax = other.fax.clone();
        self.correio_eletronico = other.correio_eletronico.clone();
        self.situacao_especial = other.situacao_especial.clone();
        self.data_situacao_especial = other.data_situacao_especial;
    }
}
