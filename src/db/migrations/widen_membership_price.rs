//! Widen `memberships.price` from `NUMERIC(10, 2)` to `NUMERIC(12, 2)`

use async_trait::async_trait;

use super::Migration;
use crate::db::schema::{alter_column_statements, ColumnDefinition, ColumnType};
use crate::db::SqlExecutor;
use crate::utils::DbResult;

pub const TABLE: &str = "memberships";
pub const COLUMN: &str = "price";

pub const FORWARD_TYPE: ColumnType = ColumnType::decimal(12, 2);
pub const BACKWARD_TYPE: ColumnType = ColumnType::decimal(10, 2);

const PRICE_COMMENT: &str = "Membership price in currency units; up to 9,999,999,999.99";

#[derive(Debug, Clone, Copy, Default)]
pub struct WidenMembershipPrice;

impl WidenMembershipPrice {
    pub fn forward_definition() -> ColumnDefinition {
        ColumnDefinition::new(FORWARD_TYPE)
            .not_null()
            .comment(PRICE_COMMENT)
    }

    pub fn backward_definition() -> ColumnDefinition {
        ColumnDefinition::new(BACKWARD_TYPE).not_null()
    }
}

async fn change_column(
    executor: &mut dyn SqlExecutor,
    definition: &ColumnDefinition,
) -> DbResult<()> {
    for statement in alter_column_statements(TABLE, COLUMN, definition) {
        executor.execute_sql(&statement).await?;
    }
    Ok(())
}

#[async_trait]
impl Migration for WidenMembershipPrice {
    fn name(&self) -> &'static str {
        "20240601000000_widen_membership_price"
    }

    async fn up(&self, executor: &mut dyn SqlExecutor) -> DbResult<()> {
        change_column(executor, &Self::forward_definition()).await
    }

    async fn down(&self, executor: &mut dyn SqlExecutor) -> DbResult<()> {
        change_column(executor, &Self::backward_definition()).await
    }
}
