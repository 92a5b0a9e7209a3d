//! Table definitions, applied idempotently on every connect.

/// `AUTOINCREMENT` keeps user ids from ever being reused, so id 1 stays the
/// first account ever registered.
pub(crate) const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        name          TEXT NOT NULL,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        author_id INTEGER NOT NULL REFERENCES users (id),
        title     TEXT NOT NULL UNIQUE,
        subtitle  TEXT NOT NULL,
        date      TEXT NOT NULL,
        body      TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (id),
        post_id INTEGER NOT NULL REFERENCES posts (id) ON DELETE CASCADE,
        text    TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS comments_post_id ON comments (post_id)",
];
