use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

/// Run each `;`-separated statement of `sql` in order.
async fn execute_batch(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            statement.to_owned(),
        ))
        .await?;
    }
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    execute_batch(db, "PRAGMA foreign_keys = ON").await?;

    // Balances are integers with a hard floor at zero
    execute_batch(db, r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            religion TEXT,
            address TEXT,
            school TEXT,
            class TEXT,
            image TEXT,
            point INTEGER NOT NULL DEFAULT 0 CHECK (point >= 0),
            total_point INTEGER NOT NULL DEFAULT 0 CHECK (total_point >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#).await?;

    execute_batch(db, r#"
        CREATE TABLE IF NOT EXISTS user_point_history (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            label TEXT NOT NULL,
            point INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#).await?;

    execute_batch(db, "CREATE INDEX IF NOT EXISTS idx_point_history_user_id ON user_point_history(user_id)").await?;

    execute_batch(db, r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY NOT NULL,
            admin_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            point INTEGER NOT NULL CHECK (point > 0),
            message TEXT,
            status TEXT NOT NULL DEFAULT 'Active',
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#).await?;

    // The unique index closes the window between the generator's
    // existence check and its insert.
    execute_batch(db, r#"
        CREATE TABLE IF NOT EXISTS religion_tasks (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            religion TEXT NOT NULL,
            point INTEGER NOT NULL CHECK (point > 0),
            status TEXT NOT NULL DEFAULT 'Active',
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_religion_tasks_unique_day
            ON religion_tasks(religion, title, start_date);
        "#).await?;

    execute_batch(db, r#"
        CREATE TABLE IF NOT EXISTS task_claims (
            id TEXT PRIMARY KEY NOT NULL,
            kind TEXT NOT NULL,
            user_id TEXT NOT NULL,
            task_id TEXT,
            title TEXT,
            point INTEGER CHECK (point IS NULL OR point > 0),
            description TEXT NOT NULL,
            image TEXT,
            status TEXT NOT NULL DEFAULT 'Perlu Review',
            message TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_task_claims_user_id ON task_claims(user_id);
        CREATE INDEX IF NOT EXISTS idx_task_claims_kind_status ON task_claims(kind, status);
        "#).await?;

    // At most one live (not rejected) claim per user and task
    execute_batch(db, r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_task_claims_live
            ON task_claims(user_id, kind, task_id)
            WHERE task_id IS NOT NULL AND status != 'Ditolak'
        "#).await?;

    execute_batch(db, r#"
        CREATE TABLE IF NOT EXISTS rewards (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
            price INTEGER NOT NULL DEFAULT 0 CHECK (price >= 0),
            image TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#).await?;

    // Requests outlive their reward; price and amount are copied onto the row.
    execute_batch(db, r#"
        CREATE TABLE IF NOT EXISTS reward_requests (
            id TEXT PRIMARY KEY NOT NULL,
            reward_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            price INTEGER NOT NULL,
            amount INTEGER NOT NULL CHECK (amount > 0),
            total_price INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'Perlu Review',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_reward_requests_user_id ON reward_requests(user_id);
        CREATE INDEX IF NOT EXISTS idx_reward_requests_reward_status ON reward_requests(reward_id, status);
        "#).await?;

    execute_batch(db, r#"
        CREATE TABLE IF NOT EXISTS penalties (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            point INTEGER NOT NULL CHECK (point >= 0),
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_penalties_user_id ON penalties(user_id);
        "#).await?;

    Ok(())
}
