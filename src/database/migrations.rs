use sqlx::PgPool;
use tracing::info;

use super::DatabaseError;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

/// Ordered, append-only migration list. Versions already recorded in
/// schema_migrations are skipped.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "000_uuid_extension",
        sql: r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#,
    },
    Migration {
        version: "001_create_users",
        sql: r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    },
    Migration {
        version: "002_create_apostilas",
        sql: r#"
            CREATE TABLE IF NOT EXISTS apostilas (
                id UUID PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id),
                edited_html TEXT,
                pdf_raw BYTEA,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
    },
    Migration {
        version: "003_apostilas_user_id_index",
        sql: "CREATE INDEX IF NOT EXISTS idx_apostilas_user_id ON apostilas (user_id)",
    },
];

/// Apply all pending migrations in order.
pub async fn run(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    for migration in MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(pool)
                .await?;

        if applied {
            info!(version = migration.version, "migration already applied");
            continue;
        }

        apply(pool, migration).await.map_err(|source| DatabaseError::Migration {
            version: migration.version,
            source,
        })?;

        info!(version = migration.version, "migration applied");
    }

    Ok(())
}

async fn apply(pool: &PgPool, migration: &Migration) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(migration.sql).execute(&mut *tx).await?;
    sqlx::query("INSERT INTO schema_migrations (version) VALUES ($1)")
        .bind(migration.version)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn versions_are_unique_and_sorted() {
        let versions: Vec<&str> = MIGRATIONS.iter().map(|m| m.version).collect();

        let unique: HashSet<&str> = versions.iter().copied().collect();
        assert_eq!(unique.len(), versions.len(), "duplicate migration version");

        let mut sorted = versions.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, versions, "migrations must be listed in order");
    }

    #[test]
    fn statements_are_non_empty() {
        for migration in MIGRATIONS {
            assert!(!migration.sql.trim().is_empty(), "{}", migration.version);
        }
    }
}
