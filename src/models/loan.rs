use sea_orm::entity::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of a loan, stored and serialized with the client's labels.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum LoanStatus {
    #[sea_orm(string_value = "ativo")]
    #[serde(rename = "ativo")]
    Active,
    #[sea_orm(string_value = "atrasado")]
    #[serde(rename = "atrasado")]
    Overdue,
    #[sea_orm(string_value = "devolvido")]
    #[serde(rename = "devolvido")]
    Returned,
}

impl LoanStatus {
    /// Whether a loan in this state keeps a copy out of the shelf.
    pub fn holds_copy(self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Overdue)
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanStatus::Active => "ativo",
            LoanStatus::Overdue => "atrasado",
            LoanStatus::Returned => "devolvido",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub loan_date: DateTime,
    pub due_date: DateTime,
    pub return_date: Option<DateTime>,
    pub status: LoanStatus,
    pub fine: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Member,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Checkout request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    #[serde(rename = "livro_id")]
    pub book_id: Option<i32>,
    #[serde(rename = "usuario_id")]
    pub member_id: Option<i32>,
    #[serde(rename = "dias_emprestimo")]
    pub loan_days: Option<i64>,
}

/// Administrative edit body. Omitted fields keep their stored value;
/// `data_devolucao_real: null` clears the return date.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoanUpdate {
    #[serde(rename = "data_emprestimo")]
    pub loan_date: Option<String>,
    #[serde(rename = "data_devolucao_prevista")]
    pub due_date: Option<String>,
    #[serde(
        rename = "data_devolucao_real",
        default,
        deserialize_with = "present_or_null"
    )]
    #[schema(value_type = Option<String>)]
    pub return_date: Option<Option<String>>,
    pub status: Option<LoanStatus>,
    #[serde(rename = "multa")]
    pub fine: Option<f64>,
}

// Distinguishes an explicit `null` (Some(None)) from an absent key (None).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// DTO for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanDto {
    pub id: i32,
    #[serde(rename = "livro_id")]
    pub book_id: i32,
    #[serde(rename = "usuario_id")]
    pub member_id: i32,
    #[serde(rename = "data_emprestimo")]
    pub loan_date: DateTime,
    #[serde(rename = "data_devolucao_prevista")]
    pub due_date: DateTime,
    #[serde(rename = "data_devolucao_real")]
    pub return_date: Option<DateTime>,
    pub status: LoanStatus,
    #[serde(rename = "multa")]
    pub fine: f64,
}

impl From<Model> for LoanDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            book_id: model.book_id,
            member_id: model.member_id,
            loan_date: model.loan_date,
            due_date: model.due_date,
            return_date: model.return_date,
            status: model.status,
            fine: model.fine,
        }
    }
}

/// Loan joined with the book and member it references
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanWithDetails {
    #[serde(flatten)]
    pub loan: LoanDto,
    #[serde(rename = "livro_titulo")]
    pub book_title: String,
    #[serde(rename = "livro_autor")]
    pub book_author: String,
    #[serde(rename = "usuario_nome")]
    pub member_name: String,
    #[serde(rename = "usuario_email")]
    pub member_email: String,
    #[serde(rename = "usuario_tipo")]
    pub member_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_null_from_absent_return_date() {
        let cleared: LoanUpdate =
            serde_json::from_str(r#"{"data_devolucao_real": null}"#).unwrap();
        assert_eq!(cleared.return_date, Some(None));

        let untouched: LoanUpdate = serde_json::from_str(r#"{"multa": 4.0}"#).unwrap();
        assert_eq!(untouched.return_date, None);
        assert_eq!(untouched.fine, Some(4.0));
    }

    #[test]
    fn status_uses_client_labels() {
        let status: LoanStatus = serde_json::from_str(r#""atrasado""#).unwrap();
        assert_eq!(status, LoanStatus::Overdue);
        assert_eq!(
            serde_json::to_string(&LoanStatus::Returned).unwrap(),
            r#""devolvido""#
        );
        assert!(LoanStatus::Overdue.holds_copy());
        assert!(!LoanStatus::Returned.holds_copy());
    }
}
