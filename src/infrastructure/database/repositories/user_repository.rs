use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::database::entities::{credit, user};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        credit: model.credit,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn insert_err(e: sea_orm::DbErr, email: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict(format!("email {} already registered", email))
        }
        _ => DomainError::from(e),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user_with_credit(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let new_user = user::ActiveModel {
            id: NotSet,
            email: Set(dto.email.clone()),
            password_hash: Set(dto.password_hash),
            credit: Set(dto.credit),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = new_user
            .insert(&txn)
            .await
            .map_err(|e| insert_err(e, &dto.email))?;

        let ledger = credit::ActiveModel {
            id: NotSet,
            user_id: Set(created.id),
            credit: Set(dto.credit),
            created_at: Set(now),
        };
        ledger.insert(&txn).await?;

        txn.commit().await?;
        debug!(user_id = created.id, "user and credit ledger entry created");

        Ok(user_model_to_domain(created))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_credit(&self, user_id: i32) -> DomainResult<Option<i64>> {
        let credit = user::Entity::find_by_id(user_id)
            .select_only()
            .column(user::Column::Credit)
            .into_tuple::<i64>()
            .one(&self.db)
            .await?;

        Ok(credit)
    }
}
