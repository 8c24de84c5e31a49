/// Idempotent DDL applied by `hometask-api migrate`, one statement per entry
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        email       TEXT NOT NULL UNIQUE,
        password    TEXT NOT NULL,
        confirmed   BOOLEAN NOT NULL DEFAULT false,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tokens (
        id          UUID PRIMARY KEY,
        token       TEXT NOT NULL,
        user_id     UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS tokens_token_idx ON tokens (token)",
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id            UUID PRIMARY KEY,
        project_name  TEXT NOT NULL,
        client_name   TEXT NOT NULL,
        description   TEXT NOT NULL,
        manager       UUID NOT NULL REFERENCES users (id),
        tasks         UUID[] NOT NULL DEFAULT '{}',
        team          UUID[] NOT NULL DEFAULT '{}',
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS projects_manager_idx ON projects (manager)",
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id           UUID PRIMARY KEY,
        task_name    TEXT NOT NULL,
        description  TEXT NOT NULL,
        project_id   UUID NOT NULL REFERENCES projects (id),
        status       TEXT NOT NULL DEFAULT 'pending'
                     CHECK (status IN ('pending', 'onHold', 'inProgress', 'underReview', 'completed')),
        notes        UUID[] NOT NULL DEFAULT '{}',
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS tasks_project_idx ON tasks (project_id)",
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id          UUID PRIMARY KEY,
        content     TEXT NOT NULL,
        created_by  UUID NOT NULL REFERENCES users (id),
        task_id     UUID NOT NULL REFERENCES tasks (id),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS notes_task_idx ON notes (task_id)",
];
