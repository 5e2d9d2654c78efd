use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, TabulationError};
use crate::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            active_session_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 用户总数
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询用户总数失败: {e}")))
    }

    /// 列出所有评委
    pub async fn list_judges_impl(&self) -> Result<Vec<User>> {
        let judges = Users::find()
            .filter(Column::Role.eq(UserRole::JUDGE))
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询评委失败: {e}")))?;

        Ok(judges.into_iter().map(|m| m.into_user()).collect())
    }

    /// 写入新的会话 ID，并更新最后登录时间
    pub async fn start_session_impl(
        &self,
        user_id: i64,
        session_id: &str,
    ) -> Result<Option<String>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TabulationError::database_operation(format!("开启事务失败: {e}")))?;

        let user = Users::find_by_id(user_id)
            .one(&txn)
            .await
            .map_err(|e| TabulationError::database_operation(format!("查询用户失败: {e}")))?
            .ok_or_else(|| TabulationError::not_found(format!("User {user_id} not found")))?;

        let previous = user.active_session_id.clone();
        let now = chrono::Utc::now().timestamp();

        let mut active: ActiveModel = user.into();
        active.active_session_id = Set(Some(session_id.to_string()));
        active.last_login = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&txn)
            .await
            .map_err(|e| TabulationError::database_operation(format!("更新会话失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TabulationError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(previous)
    }

    /// 清除会话，仅当传入的会话仍为当前会话时生效
    pub async fn end_session_impl(&self, user_id: i64, session_id: &str) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::ActiveSessionId, Expr::value(Option::<String>::None))
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(user_id))
            .filter(Column::ActiveSessionId.eq(session_id))
            .exec(&self.db)
            .await
            .map_err(|e| TabulationError::database_operation(format!("清除会话失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
