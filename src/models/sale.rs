// src/models/sale.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::dates::parse_sale_date;

// =============================================================================
//  VOCABULÁRIO CONHECIDO
// =============================================================================
// As colunas são texto livre. Os enums abaixo só servem para comparar contra o
// vocabulário fixo; rótulos desconhecidos viram `None` e são tolerados.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[serde(rename = "CONCLUÍDO")]
    Completed,
    #[serde(rename = "EM ANDAMENTO")]
    InProgress,
    #[serde(rename = "EM TRATAMENTO DOC/BIOMETRIA")]
    InTreatmentDoc,
    #[serde(rename = "EM TRATAMENTO CTOP")]
    InTreatmentCtop,
    #[serde(rename = "CANCELADA")]
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Completed,
        OrderStatus::InProgress,
        OrderStatus::InTreatmentDoc,
        OrderStatus::InTreatmentCtop,
        OrderStatus::Canceled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Completed => "CONCLUÍDO",
            OrderStatus::InProgress => "EM ANDAMENTO",
            OrderStatus::InTreatmentDoc => "EM TRATAMENTO DOC/BIOMETRIA",
            OrderStatus::InTreatmentCtop => "EM TRATAMENTO CTOP",
            OrderStatus::Canceled => "CANCELADA",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BiometricStatus {
    #[serde(rename = "APROVADA")]
    Approved,
    #[serde(rename = "EM ANDAMENTO")]
    InProgress,
    #[serde(rename = "NÃO FEZ")]
    NotDone,
    #[serde(rename = "REPROVADA")]
    Rejected,
}

impl BiometricStatus {
    pub const ALL: [BiometricStatus; 4] = [
        BiometricStatus::Approved,
        BiometricStatus::InProgress,
        BiometricStatus::NotDone,
        BiometricStatus::Rejected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BiometricStatus::Approved => "APROVADA",
            BiometricStatus::InProgress => "EM ANDAMENTO",
            BiometricStatus::NotDone => "NÃO FEZ",
            BiometricStatus::Rejected => "REPROVADA",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SaleType {
    #[serde(rename = "INPUT")]
    Input,
    #[serde(rename = "REINPUT")]
    Reinput,
    #[serde(rename = "CTOP")]
    Ctop,
    #[serde(rename = "ALÇADA")]
    Escalation,
}

impl SaleType {
    pub const ALL: [SaleType; 4] = [
        SaleType::Input,
        SaleType::Reinput,
        SaleType::Ctop,
        SaleType::Escalation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SaleType::Input => "INPUT",
            SaleType::Reinput => "REINPUT",
            SaleType::Ctop => "CTOP",
            SaleType::Escalation => "ALÇADA",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

// =============================================================================
//  COLUNAS
// =============================================================================

/// Colunas de texto da tabela `vendas`. Usado para filtros de igualdade,
/// ordenação e para escolher o campo da busca.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SaleColumn {
    SaleDate,
    Responsible,
    Client,
    Login,
    TaxId,
    Salesperson,
    Supervisor,
    Manager,
    Offer,
    Price,
    BiometricStatus,
    OrderNumber,
    OrderStatus,
    SubStatus,
    Network,
    #[serde(rename = "type")]
    SaleType,
    CancellationType,
    State,
    ScheduledDate1,
    CompletedDate1,
    Reason1,
    Handling1,
    Note1,
    ScheduledDate2,
    CompletedDate2,
    Reason2,
    Handling2,
    Note2,
}

impl SaleColumn {
    pub const ALL: [SaleColumn; 28] = [
        SaleColumn::SaleDate,
        SaleColumn::Responsible,
        SaleColumn::Client,
        SaleColumn::Login,
        SaleColumn::TaxId,
        SaleColumn::Salesperson,
        SaleColumn::Supervisor,
        SaleColumn::Manager,
        SaleColumn::Offer,
        SaleColumn::Price,
        SaleColumn::BiometricStatus,
        SaleColumn::OrderNumber,
        SaleColumn::OrderStatus,
        SaleColumn::SubStatus,
        SaleColumn::Network,
        SaleColumn::SaleType,
        SaleColumn::CancellationType,
        SaleColumn::State,
        SaleColumn::ScheduledDate1,
        SaleColumn::CompletedDate1,
        SaleColumn::Reason1,
        SaleColumn::Handling1,
        SaleColumn::Note1,
        SaleColumn::ScheduledDate2,
        SaleColumn::CompletedDate2,
        SaleColumn::Reason2,
        SaleColumn::Handling2,
        SaleColumn::Note2,
    ];

    /// Nome da coluna no Postgres. Só sai daqui, nunca de input do usuário.
    pub fn as_sql(self) -> &'static str {
        match self {
            SaleColumn::SaleDate => "sale_date",
            SaleColumn::Responsible => "responsible",
            SaleColumn::Client => "client",
            SaleColumn::Login => "login",
            SaleColumn::TaxId => "tax_id",
            SaleColumn::Salesperson => "salesperson",
            SaleColumn::Supervisor => "supervisor",
            SaleColumn::Manager => "manager",
            SaleColumn::Offer => "offer",
            SaleColumn::Price => "price",
            SaleColumn::BiometricStatus => "biometric_status",
            SaleColumn::OrderNumber => "order_number",
            SaleColumn::OrderStatus => "order_status",
            SaleColumn::SubStatus => "sub_status",
            SaleColumn::Network => "network",
            SaleColumn::SaleType => "sale_type",
            SaleColumn::CancellationType => "cancellation_type",
            SaleColumn::State => "state",
            SaleColumn::ScheduledDate1 => "scheduled_date_1",
            SaleColumn::CompletedDate1 => "completed_date_1",
            SaleColumn::Reason1 => "reason_1",
            SaleColumn::Handling1 => "handling_1",
            SaleColumn::Note1 => "note_1",
            SaleColumn::ScheduledDate2 => "scheduled_date_2",
            SaleColumn::CompletedDate2 => "completed_date_2",
            SaleColumn::Reason2 => "reason_2",
            SaleColumn::Handling2 => "handling_2",
            SaleColumn::Note2 => "note_2",
        }
    }
}

// =============================================================================
//  VENDA
// =============================================================================

/// Campos editáveis de uma venda. O mesmo formato serve para criação
/// (formulário completo) e edição (só os campos enviados são trocados).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleFields {
    #[validate(custom(function = "validate_sale_date"))]
    #[schema(example = "15/03/2024")]
    pub sale_date: Option<String>,
    pub responsible: Option<String>,
    #[schema(example = "Maria da Silva")]
    pub client: Option<String>,
    pub login: Option<String>,
    #[schema(example = "12345678900")]
    pub tax_id: Option<String>,
    #[schema(example = "José Silva")]
    pub salesperson: Option<String>,
    pub supervisor: Option<String>,
    pub manager: Option<String>,
    #[schema(example = "TIM Fibra 600M 24")]
    pub offer: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[schema(example = "130")]
    pub price: Option<String>,
    #[schema(example = "APROVADA")]
    pub biometric_status: Option<String>,
    pub order_number: Option<String>,
    #[schema(example = "CONCLUÍDO")]
    pub order_status: Option<String>,
    pub sub_status: Option<String>,
    pub network: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "INPUT")]
    pub sale_type: Option<String>,
    pub cancellation_type: Option<String>,
    #[schema(example = "PERNAMBUCO")]
    pub state: Option<String>,

    // Acompanhamento em duas etapas
    pub scheduled_date_1: Option<String>,
    pub completed_date_1: Option<String>,
    pub reason_1: Option<String>,
    pub handling_1: Option<String>,
    pub note_1: Option<String>,
    pub scheduled_date_2: Option<String>,
    pub completed_date_2: Option<String>,
    pub reason_2: Option<String>,
    pub handling_2: Option<String>,
    pub note_2: Option<String>,
}

impl SaleFields {
    fn slot(&self, column: SaleColumn) -> &Option<String> {
        match column {
            SaleColumn::SaleDate => &self.sale_date,
            SaleColumn::Responsible => &self.responsible,
            SaleColumn::Client => &self.client,
            SaleColumn::Login => &self.login,
            SaleColumn::TaxId => &self.tax_id,
            SaleColumn::Salesperson => &self.salesperson,
            SaleColumn::Supervisor => &self.supervisor,
            SaleColumn::Manager => &self.manager,
            SaleColumn::Offer => &self.offer,
            SaleColumn::Price => &self.price,
            SaleColumn::BiometricStatus => &self.biometric_status,
            SaleColumn::OrderNumber => &self.order_number,
            SaleColumn::OrderStatus => &self.order_status,
            SaleColumn::SubStatus => &self.sub_status,
            SaleColumn::Network => &self.network,
            SaleColumn::SaleType => &self.sale_type,
            SaleColumn::CancellationType => &self.cancellation_type,
            SaleColumn::State => &self.state,
            SaleColumn::ScheduledDate1 => &self.scheduled_date_1,
            SaleColumn::CompletedDate1 => &self.completed_date_1,
            SaleColumn::Reason1 => &self.reason_1,
            SaleColumn::Handling1 => &self.handling_1,
            SaleColumn::Note1 => &self.note_1,
            SaleColumn::ScheduledDate2 => &self.scheduled_date_2,
            SaleColumn::CompletedDate2 => &self.completed_date_2,
            SaleColumn::Reason2 => &self.reason_2,
            SaleColumn::Handling2 => &self.handling_2,
            SaleColumn::Note2 => &self.note_2,
        }
    }

    fn slot_mut(&mut self, column: SaleColumn) -> &mut Option<String> {
        match column {
            SaleColumn::SaleDate => &mut self.sale_date,
            SaleColumn::Responsible => &mut self.responsible,
            SaleColumn::Client => &mut self.client,
            SaleColumn::Login => &mut self.login,
            SaleColumn::TaxId => &mut self.tax_id,
            SaleColumn::Salesperson => &mut self.salesperson,
            SaleColumn::Supervisor => &mut self.supervisor,
            SaleColumn::Manager => &mut self.manager,
            SaleColumn::Offer => &mut self.offer,
            SaleColumn::Price => &mut self.price,
            SaleColumn::BiometricStatus => &mut self.biometric_status,
            SaleColumn::OrderNumber => &mut self.order_number,
            SaleColumn::OrderStatus => &mut self.order_status,
            SaleColumn::SubStatus => &mut self.sub_status,
            SaleColumn::Network => &mut self.network,
            SaleColumn::SaleType => &mut self.sale_type,
            SaleColumn::CancellationType => &mut self.cancellation_type,
            SaleColumn::State => &mut self.state,
            SaleColumn::ScheduledDate1 => &mut self.scheduled_date_1,
            SaleColumn::CompletedDate1 => &mut self.completed_date_1,
            SaleColumn::Reason1 => &mut self.reason_1,
            SaleColumn::Handling1 => &mut self.handling_1,
            SaleColumn::Note1 => &mut self.note_1,
            SaleColumn::ScheduledDate2 => &mut self.scheduled_date_2,
            SaleColumn::CompletedDate2 => &mut self.completed_date_2,
            SaleColumn::Reason2 => &mut self.reason_2,
            SaleColumn::Handling2 => &mut self.handling_2,
            SaleColumn::Note2 => &mut self.note_2,
        }
    }

    pub fn get(&self, column: SaleColumn) -> Option<&str> {
        self.slot(column).as_deref()
    }

    pub fn set(&mut self, column: SaleColumn, value: Option<String>) {
        *self.slot_mut(column) = value;
    }

    /// Pares (coluna, valor) dos campos preenchidos, na ordem da tabela.
    pub fn present(&self) -> impl Iterator<Item = (SaleColumn, &str)> + '_ {
        SaleColumn::ALL
            .into_iter()
            .filter_map(move |column| self.get(column).map(|value| (column, value)))
    }

    /// Troca só os campos que vieram preenchidos em `patch`.
    pub fn apply(&mut self, patch: &SaleFields) {
        for (column, value) in patch.present() {
            self.set(column, Some(value.to_string()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[schema(example = 42)]
    pub id: i64,
    pub created_at: DateTime<Utc>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: SaleFields,
}

impl Sale {
    pub fn get(&self, column: SaleColumn) -> Option<&str> {
        self.fields.get(column)
    }

    pub fn order_status(&self) -> Option<OrderStatus> {
        self.fields.order_status.as_deref().and_then(OrderStatus::from_label)
    }

    pub fn biometric_status(&self) -> Option<BiometricStatus> {
        self.fields.biometric_status.as_deref().and_then(BiometricStatus::from_label)
    }

    pub fn sale_type(&self) -> Option<SaleType> {
        self.fields.sale_type.as_deref().and_then(SaleType::from_label)
    }

    pub fn is_completed(&self) -> bool {
        self.order_status() == Some(OrderStatus::Completed)
    }
}

/// Uma página da tabela do cadastro ("carregar mais").
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalePage {
    pub sales: Vec<Sale>,
    pub page: u64,
    pub per_page: u64,
    pub has_more: bool,
}

// --- Validadores usados pelo `Validate` ---

// Vazio passa aqui; a obrigatoriedade na criação é checada pelo serviço.
fn validate_sale_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    parse_sale_date(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_date").with_message("invalid_date".into()))
}

fn validate_price(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || crate::common::text::parse_price(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_number").with_message("invalid_number".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_round_trip() {
        assert_eq!(OrderStatus::from_label("CONCLUÍDO"), Some(OrderStatus::Completed));
        assert_eq!(BiometricStatus::from_label("NÃO FEZ"), Some(BiometricStatus::NotDone));
        assert_eq!(SaleType::from_label("REINPUT"), Some(SaleType::Reinput));
    }

    #[test]
    fn test_unknown_labels_are_tolerated() {
        assert_eq!(OrderStatus::from_label("PENDENCIADO"), None);
        assert_eq!(OrderStatus::from_label("concluído"), None);
        assert_eq!(BiometricStatus::from_label(""), None);
    }

    #[test]
    fn test_apply_replaces_only_present_fields() {
        let mut fields = SaleFields {
            client: Some("Maria".into()),
            state: Some("BAHIA".into()),
            ..Default::default()
        };
        let patch = SaleFields {
            state: Some("CEARÁ".into()),
            order_status: Some("CANCELADA".into()),
            ..Default::default()
        };

        fields.apply(&patch);

        assert_eq!(fields.client.as_deref(), Some("Maria"));
        assert_eq!(fields.state.as_deref(), Some("CEARÁ"));
        assert_eq!(fields.order_status.as_deref(), Some("CANCELADA"));
    }

    #[test]
    fn test_json_uses_camel_case_and_type_key() {
        let fields: SaleFields = serde_json::from_value(serde_json::json!({
            "saleDate": "2024-03-15",
            "type": "REINPUT",
            "scheduledDate1": "2024-03-20",
            "taxId": "123"
        }))
        .unwrap();

        assert_eq!(fields.sale_date.as_deref(), Some("2024-03-15"));
        assert_eq!(fields.sale_type.as_deref(), Some("REINPUT"));
        assert_eq!(fields.scheduled_date_1.as_deref(), Some("2024-03-20"));
        assert_eq!(fields.get(SaleColumn::TaxId), Some("123"));
    }

    #[test]
    fn test_validation_rejects_bad_date_and_price() {
        let fields = SaleFields {
            sale_date: Some("ontem".into()),
            price: Some("abc".into()),
            ..Default::default()
        };
        let errors = fields.validate().unwrap_err();
        let by_field = errors.field_errors();
        assert!(by_field.contains_key("sale_date"));
        assert!(by_field.contains_key("price"));

        let ok = SaleFields {
            sale_date: Some("15/03/2024".into()),
            price: Some("130".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }
}
