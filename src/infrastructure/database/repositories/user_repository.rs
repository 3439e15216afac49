use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, Statement,
};
use tracing::debug;

use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        oib: model.oib,
        status: model.status,
        file_name: model.file_name,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_oib(&self, oib: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Oib.eq(oib))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn save(&self, u: User) -> DomainResult<User> {
        if u.is_new() {
            let new_user = user::ActiveModel {
                first_name: Set(u.first_name),
                last_name: Set(u.last_name),
                oib: Set(u.oib),
                status: Set(u.status),
                file_name: Set(u.file_name),
                ..Default::default()
            };

            let inserted = new_user.insert(&self.db).await.map_err(db_err)?;
            debug!(id = inserted.id, "Inserted user row");
            return Ok(user_model_to_domain(inserted));
        }

        let existing = user::Entity::find_by_id(u.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: u.id.to_string(),
            });
        };

        let mut active: user::ActiveModel = existing.into();
        active.first_name = Set(u.first_name);
        active.last_name = Set(u.last_name);
        active.oib = Set(u.oib);
        active.status = Set(u.status);
        active.file_name = Set(u.file_name);

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(user_model_to_domain(updated))
    }

    async fn delete_by_oib(&self, oib: &str) -> DomainResult<()> {
        let result = user::Entity::delete_many()
            .filter(user::Column::Oib.eq(oib))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        debug!(oib, rows = result.rows_affected, "Deleted user rows");
        Ok(())
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
