//! SeaORM implementation of MemberRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::validation::validate_member;
use crate::domain::{DomainError, MemberRepository};
use crate::models::MemberDto;
use crate::models::book::blank_to_none;
use crate::models::loan::{Column as LoanColumn, Entity as LoanEntity};
use crate::models::member::{ActiveModel, Column, Entity as MemberEntity};

const DUPLICATE_MEMBER: &str = "Email or membership number already registered";

pub struct SeaOrmMemberRepository {
    db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn find_all(&self) -> Result<Vec<MemberDto>, DomainError> {
        let members = MemberEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(members.into_iter().map(MemberDto::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<MemberDto>, DomainError> {
        let member = MemberEntity::find_by_id(id).one(&self.db).await?;
        Ok(member.map(MemberDto::from))
    }

    async fn create(&self, member: MemberDto) -> Result<MemberDto, DomainError> {
        let fields = validate_member(&member)?;
        let now = chrono::Utc::now().to_rfc3339();

        let new_member = ActiveModel {
            name: Set(fields.name),
            email: Set(fields.email),
            phone: Set(blank_to_none(member.phone)),
            member_type: Set(fields.member_type),
            membership_number: Set(blank_to_none(member.membership_number)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_member
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::from_write(e, DUPLICATE_MEMBER))?;

        tracing::info!(member_id = result.id, "Member registered");
        Ok(MemberDto::from(result))
    }

    async fn update(&self, id: i32, member: MemberDto) -> Result<MemberDto, DomainError> {
        let existing = MemberEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Member"))?;

        let fields = validate_member(&member)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(fields.name);
        active.email = Set(fields.email);
        active.phone = Set(blank_to_none(member.phone));
        active.member_type = Set(fields.member_type);
        active.membership_number = Set(blank_to_none(member.membership_number));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| DomainError::from_write(e, DUPLICATE_MEMBER))?;

        Ok(MemberDto::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let loans = LoanEntity::find()
            .filter(LoanColumn::MemberId.eq(id))
            .count(&self.db)
            .await?;
        if loans > 0 {
            return Err(DomainError::Conflict(
                "Member has loans on record and cannot be deleted".to_string(),
            ));
        }

        let result = MemberEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                DomainError::from_delete(e, "Member has loans on record and cannot be deleted")
            })?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Member"));
        }

        Ok(())
    }
}
