use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

/// Something an account did, kept for auditing.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account_action_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub action: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.timestamp.is_not_set() {
            self.timestamp = Set(Utc::now());
        }
        Ok(self)
    }
}

impl Model {
    /// Records `action` for `account_id` at the current time.
    pub async fn record<C: ConnectionTrait>(
        db: &C,
        account_id: i32,
        action: impl Into<String>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            account_id: Set(account_id),
            action: Set(action.into()),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} - {}", self.account_id, self.action, self.timestamp)
    }
}
