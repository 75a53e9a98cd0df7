use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub member_type: String,
    #[sea_orm(unique)]
    pub membership_number: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan::Entity")]
    Loans,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API requests and responses
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MemberDto {
    pub id: Option<i32>,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "tipo")]
    pub member_type: Option<String>,
    #[serde(rename = "matricula")]
    pub membership_number: Option<String>,
}

impl From<Model> for MemberDto {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: Some(model.name),
            email: Some(model.email),
            phone: model.phone,
            member_type: Some(model.member_type),
            membership_number: model.membership_number,
        }
    }
}
