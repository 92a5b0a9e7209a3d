//! # SqliteStore
//!
//! Implements the data mapping between the SQLite relational model and the
//! `domains` models. One store value serves all three repository ports.

use std::str::FromStr;

use async_trait::async_trait;
use domains::{
    AuthoredPost, Comment, CommentId, CommentRepository, CommentThreadEntry, DomainError,
    NewComment, NewPost, NewUser, Post, PostEdit, PostId, PostRepository, Result, User, UserId,
    UserRepository,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::schema;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(store_error)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(store_error)?;

        let store = Self { pool };
        store.bootstrap().await?;
        tracing::info!(url, "sqlite store ready");
        Ok(store)
    }

    /// A private in-memory database. The pool holds exactly one connection
    /// that is never recycled, otherwise the data would vanish with it.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(store_error)?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(store_error)?;

        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    async fn bootstrap(&self) -> Result<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(store_error)?;
        }
        Ok(())
    }

    pub async fn count_users(&self) -> Result<i64> {
        sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(&self.pool)
            .await
            .and_then(|row| row.try_get("n"))
            .map_err(store_error)
    }
}

fn store_error(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "sqlite operation failed");
    DomainError::Internal("database operation failed".to_owned())
}

/// Unique violations become `Conflict`; anything else is internal.
fn write_error(err: sqlx::Error, conflict: &str) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(conflict.to_owned())
        }
        _ => store_error(err),
    }
}

fn user_from_row(row: &SqliteRow) -> sqlx::Result<User> {
    Ok(User {
        id: UserId(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
    })
}

fn authored_post_from_row(row: &SqliteRow) -> sqlx::Result<AuthoredPost> {
    Ok(AuthoredPost {
        post: Post {
            id: PostId(row.try_get("id")?),
            author_id: UserId(row.try_get("author_id")?),
            title: row.try_get("title")?,
            subtitle: row.try_get("subtitle")?,
            date: row.try_get("date")?,
            body: row.try_get("body")?,
        },
        author_name: row.try_get("author_name")?,
    })
}

fn comment_from_row(row: &SqliteRow) -> sqlx::Result<Comment> {
    Ok(Comment {
        id: CommentId(row.try_get("id")?),
        user_id: UserId(row.try_get("user_id")?),
        post_id: PostId(row.try_get("post_id")?),
        text: row.try_get("text")?,
    })
}

const AUTHORED_POST_SELECT: &str = "SELECT p.id, p.author_id, p.title, p.subtitle, p.date, p.body, u.name AS author_name \
     FROM posts p JOIN users u ON u.id = p.author_id";

#[async_trait]
impl UserRepository for SqliteStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, password_hash FROM users WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref().map(user_from_row).transpose().map_err(store_error)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref().map(user_from_row).transpose().map_err(store_error)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|err| write_error(err, "email already registered"))?;

        Ok(User {
            id: UserId(result.last_insert_rowid()),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        })
    }
}

#[async_trait]
impl PostRepository for SqliteStore {
    async fn list_posts(&self) -> Result<Vec<AuthoredPost>> {
        let rows = sqlx::query(&format!("{AUTHORED_POST_SELECT} ORDER BY p.id"))
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.iter()
            .map(authored_post_from_row)
            .collect::<sqlx::Result<_>>()
            .map_err(store_error)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<AuthoredPost>> {
        let row = sqlx::query(&format!("{AUTHORED_POST_SELECT} WHERE p.id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref()
            .map(authored_post_from_row)
            .transpose()
            .map_err(store_error)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let result = sqlx::query(
            "INSERT INTO posts (author_id, title, subtitle, date, body) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(post.author_id.0)
        .bind(&post.title)
        .bind(&post.subtitle)
        .bind(&post.date)
        .bind(&post.body)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, "a post with that title already exists"))?;

        Ok(Post {
            id: PostId(result.last_insert_rowid()),
            author_id: post.author_id,
            title: post.title,
            subtitle: post.subtitle,
            date: post.date,
            body: post.body,
        })
    }

    /// Both updates commit together or not at all.
    async fn update_post(&self, id: PostId, edit: PostEdit) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let updated = sqlx::query("UPDATE posts SET title = ?, subtitle = ?, body = ? WHERE id = ?")
            .bind(&edit.title)
            .bind(&edit.subtitle)
            .bind(&edit.body)
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(|err| write_error(err, "a post with that title already exists"))?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::not_found("Post", id));
        }

        sqlx::query("UPDATE users SET name = ? WHERE id = (SELECT author_id FROM posts WHERE id = ?)")
            .bind(&edit.author_name)
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        tx.commit().await.map_err(store_error)
    }

    async fn delete_post(&self, id: PostId) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if deleted.rows_affected() == 0 {
            return Err(DomainError::not_found("Post", id));
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for SqliteStore {
    async fn list_comments(&self) -> Result<Vec<Comment>> {
        let rows = sqlx::query("SELECT id, user_id, post_id, text FROM comments ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.iter()
            .map(comment_from_row)
            .collect::<sqlx::Result<_>>()
            .map_err(store_error)
    }

    async fn comments_for_post(&self, post_id: PostId) -> Result<Vec<CommentThreadEntry>> {
        let rows = sqlx::query(
            "SELECT c.id, c.user_id, c.post_id, c.text, u.name AS author_name, u.email AS author_email \
             FROM comments c JOIN users u ON u.id = c.user_id \
             WHERE c.post_id = ? ORDER BY c.id",
        )
        .bind(post_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.iter()
            .map(|row| -> sqlx::Result<CommentThreadEntry> {
                Ok(CommentThreadEntry {
                    comment: comment_from_row(row)?,
                    author_name: row.try_get("author_name")?,
                    author_email: row.try_get("author_email")?,
                })
            })
            .collect::<sqlx::Result<_>>()
            .map_err(store_error)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let result = sqlx::query("INSERT INTO comments (user_id, post_id, text) VALUES (?, ?, ?)")
            .bind(comment.user_id.0)
            .bind(comment.post_id.0)
            .bind(&comment.text)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(Comment {
            id: CommentId(result.last_insert_rowid()),
            user_id: comment.user_id,
            post_id: comment.post_id,
            text: comment.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_admin() -> (SqliteStore, User) {
        let store = SqliteStore::in_memory().await.unwrap();
        let admin = store
            .create_user(NewUser {
                name: "Admin".into(),
                email: "admin@example.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        (store, admin)
    }

    fn new_post(author: &User, title: &str) -> NewPost {
        NewPost {
            author_id: author.id,
            title: title.into(),
            subtitle: "Subtitle".into(),
            date: "January 01, 2026".into(),
            body: "<p>Body</p>".into(),
        }
    }

    #[tokio::test]
    async fn first_user_gets_id_one() {
        let (store, admin) = store_with_admin().await;
        assert_eq!(admin.id, UserId(1));
        let found = store
            .find_user_by_email("admin@example.com")
            .await
            .unwrap()
            .expect("admin is stored");
        assert_eq!(found, admin);
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (store, _) = store_with_admin().await;
        let err = store
            .create_user(NewUser {
                name: "Other".into(),
                email: "admin@example.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_title_leaves_existing_post_intact() {
        let (store, admin) = store_with_admin().await;
        let original = store.create_post(new_post(&admin, "T1")).await.unwrap();

        let mut clash = new_post(&admin, "T1");
        clash.body = "<p>Replacement</p>".into();
        let err = store.create_post(clash).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let posts = store.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].post, original);
        assert_eq!(posts[0].author_name, "Admin");
    }

    #[tokio::test]
    async fn update_renames_the_author() {
        let (store, admin) = store_with_admin().await;
        let post = store.create_post(new_post(&admin, "T1")).await.unwrap();

        store
            .update_post(
                post.id,
                PostEdit {
                    title: "T2".into(),
                    subtitle: "New sub".into(),
                    body: "New body".into(),
                    author_name: "Renamed".into(),
                },
            )
            .await
            .unwrap();

        let stored = store.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.post.title, "T2");
        assert_eq!(stored.post.date, post.date);
        assert_eq!(stored.author_name, "Renamed");
        assert_eq!(store.get_user(admin.id).await.unwrap().unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn update_to_taken_title_rolls_back() {
        let (store, admin) = store_with_admin().await;
        store.create_post(new_post(&admin, "T1")).await.unwrap();
        let second = store.create_post(new_post(&admin, "T2")).await.unwrap();

        let err = store
            .update_post(
                second.id,
                PostEdit {
                    title: "T1".into(),
                    subtitle: "S".into(),
                    body: "B".into(),
                    author_name: "Renamed".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.get_user(admin.id).await.unwrap().unwrap().name, "Admin");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_posts() {
        let (store, _) = store_with_admin().await;
        let edit = PostEdit {
            title: "T".into(),
            subtitle: "S".into(),
            body: "B".into(),
            author_name: "A".into(),
        };
        assert!(matches!(
            store.update_post(PostId(99), edit).await,
            Err(DomainError::NotFound(..))
        ));
        assert!(matches!(
            store.delete_post(PostId(99)).await,
            Err(DomainError::NotFound(..))
        ));
    }

    #[tokio::test]
    async fn comments_are_scoped_and_cascade_on_delete() {
        let (store, admin) = store_with_admin().await;
        let first = store.create_post(new_post(&admin, "T1")).await.unwrap();
        let second = store.create_post(new_post(&admin, "T2")).await.unwrap();

        for (post, text) in [(first.id, "one"), (first.id, "two"), (second.id, "three")] {
            store
                .create_comment(NewComment {
                    user_id: admin.id,
                    post_id: post,
                    text: text.into(),
                })
                .await
                .unwrap();
        }

        let thread = store.comments_for_post(first.id).await.unwrap();
        let texts: Vec<_> = thread.iter().map(|e| e.comment.text.as_str()).collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(thread[0].author_email, "admin@example.com");

        store.delete_post(first.id).await.unwrap();
        let remaining = store.list_comments().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].post_id, second.id);
    }
}
