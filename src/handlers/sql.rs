//! SQL aggregation handler.

use async_trait::async_trait;

use crate::adapters::sql;
use crate::classify::TaskKind;
use crate::error::{ResolveError, ResolveResult};

use super::{format_number, Handler, TaskContext};

/// Answer with the total sales of Gold tickets from the seeded dataset.
pub struct GoldTickets;

#[async_trait]
impl Handler for GoldTickets {
    fn kind(&self) -> TaskKind {
        TaskKind::SqlAggregate
    }

    async fn run(&self, _ctx: &TaskContext<'_>) -> ResolveResult<String> {
        // rusqlite is synchronous; keep it off the async runtime.
        let total = tokio::task::spawn_blocking(sql::gold_ticket_sales)
            .await
            .map_err(|err| ResolveError::Execution(format!("worker task failed: {}", err)))??;
        Ok(format_number(total))
    }
}
