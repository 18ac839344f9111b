//! In-memory SQLite aggregation.
//!
//! `rusqlite` is synchronous; callers on the async runtime go through
//! `spawn_blocking`.

use rusqlite::Connection;

use crate::error::{ResolveError, ResolveResult};

/// Fixed ticket-sales dataset. Type labels carry deliberate case and
/// whitespace noise, which the aggregate has to normalize away.
const SEED: &str = "
    CREATE TABLE tickets (type TEXT NOT NULL, units INTEGER NOT NULL, price REAL NOT NULL);
    INSERT INTO tickets (type, units, price) VALUES
        ('GOLD', 24, 95.0),
        (' Gold ', 56, 95.0),
        ('gold', 17, 95.0),
        ('Gold', 3, 95.0),
        ('Bronze', 20, 40.0),
        ('SILVER', 12, 65.0),
        ('silver ', 9, 65.0);
";

fn sql_error(err: rusqlite::Error) -> ResolveError {
    ResolveError::Execution(format!("sqlite error: {}", err))
}

/// Total sales (units x price) of Gold tickets, matching the type label
/// case-insensitively and ignoring surrounding whitespace.
pub fn gold_ticket_sales() -> ResolveResult<f64> {
    let conn = Connection::open_in_memory().map_err(sql_error)?;
    conn.execute_batch(SEED).map_err(sql_error)?;
    conn.query_row(
        "SELECT COALESCE(SUM(units * price), 0.0) FROM tickets \
         WHERE TRIM(LOWER(type)) = 'gold'",
        [],
        |row| row.get(0),
    )
    .map_err(sql_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_all_gold_spellings() {
        // 24 + 56 + 17 + 3 units at 95.0 each.
        assert_eq!(gold_ticket_sales().unwrap(), 9500.0);
    }

    #[test]
    fn result_is_stable_across_calls() {
        assert_eq!(gold_ticket_sales().unwrap(), gold_ticket_sales().unwrap());
    }
}
