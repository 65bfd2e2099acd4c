// src/models/catalog.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::sale::{BiometricStatus, OrderStatus, SaleType};

/// Meta diária de vendas concluídas por estado.
pub const DAILY_TARGETS: [(&str, u32); 6] = [
    ("PERNAMBUCO", 316),
    ("BAHIA", 75),
    ("CEARÁ", 285),
    ("AMAZONAS", 100),
    ("MINAS GERAIS", 300),
    ("RIO DE JANEIRO", 75),
];

pub const DEFAULT_DAILY_TARGET: u32 = 75;

pub fn daily_target(state: Option<&str>) -> u32 {
    state
        .and_then(|s| DAILY_TARGETS.iter().find(|(name, _)| *name == s))
        .map(|(_, target)| *target)
        .unwrap_or(DEFAULT_DAILY_TARGET)
}

pub const SUB_STATUSES: [&str; 20] = [
    "CONCLUÍDO",
    "EM ANDAMENTO",
    "EM TRATAMENTO DOC/BIOMETRIA",
    "CANCELADA",
    "AGENDADA",
    "EXECUÇÃO",
    "SEM SLOTS DE AGENDAMENTO",
    "PENDENCIADO",
    "FINALIZADO SEM SUCESSO",
    "ATRIBUÍDO",
    "ENTREGUE AO TÉCNICO",
    "EM DESLOCAMENTO",
    "NÃO ATRIBUÍDO",
    "FALHA SISTÊMICA",
    "ALÇADA",
    "CONCLUÍDO SEM SUCESSO",
    "RECEBIDO",
    "ERRO NO PROCESSAMENTO",
    "ERRO SERASA",
    "EM TRATAMENTO CTOP",
];

pub const OFFERS: [&str; 9] = [
    "TIM Fibra 300M 24",
    "TIM Fibra 400M 24",
    "TIM Fibra 600M 24",
    "TIM Fibra 600M P 24",
    "TIM Fibra 600M M 24",
    "TIM Fibra 1GB 24",
    "TIM Fibra 1GB P 24",
    "TIM Fibra 1GB M 24",
    "TIM Fibra 2GB 24",
];

pub const PRICES: [&str; 8] = ["90", "110", "130", "150", "160", "170", "180", "200"];

// Listas de opções para os selects do formulário de cadastro/edição
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleOptions {
    pub order_statuses: Vec<String>,
    pub sub_statuses: Vec<String>,
    pub offers: Vec<String>,
    pub prices: Vec<String>,
    pub states: Vec<String>,
    pub biometric_statuses: Vec<String>,
    pub types: Vec<String>,
}

impl SaleOptions {
    pub fn catalog() -> Self {
        Self {
            order_statuses: OrderStatus::ALL.iter().map(|s| s.label().to_string()).collect(),
            sub_statuses: SUB_STATUSES.iter().map(|s| s.to_string()).collect(),
            offers: OFFERS.iter().map(|s| s.to_string()).collect(),
            prices: PRICES.iter().map(|s| s.to_string()).collect(),
            states: DAILY_TARGETS.iter().map(|(state, _)| state.to_string()).collect(),
            biometric_statuses: BiometricStatus::ALL.iter().map(|s| s.label().to_string()).collect(),
            types: SaleType::ALL.iter().map(|s| s.label().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_target_defaults_to_75() {
        assert_eq!(daily_target(Some("PERNAMBUCO")), 316);
        assert_eq!(daily_target(Some("CEARÁ")), 285);
        assert_eq!(daily_target(Some("SÃO PAULO")), 75);
        assert_eq!(daily_target(None), 75);
    }

    #[test]
    fn test_catalog_lists_every_known_label() {
        let options = SaleOptions::catalog();
        assert_eq!(options.order_statuses.len(), 5);
        assert!(options.biometric_statuses.contains(&"NÃO FEZ".to_string()));
        assert_eq!(options.states.len(), DAILY_TARGETS.len());
        assert!(options.types.contains(&"ALÇADA".to_string()));
    }
}
