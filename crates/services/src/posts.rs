//! Post authoring and reading.

use std::sync::Arc;

use chrono::Local;
use domains::policy::admin_only;
use domains::{
    AuthoredPost, DomainError, NewPost, Post, PostEdit, PostId, PostRepository, Result, User,
};

use crate::required;

/// Display format for `Post::date`, e.g. "March 04, 2026".
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// Input of the new-post form.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub subtitle: String,
    pub body: String,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn list(&self) -> Result<Vec<AuthoredPost>> {
        self.posts.list_posts().await
    }

    pub async fn get(&self, id: PostId) -> Result<AuthoredPost> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Publishes a post authored by `author`, dated today.
    pub async fn create(&self, author: &User, draft: PostDraft) -> Result<Post> {
        let author = admin_only(Some(author))?;
        let post = NewPost {
            author_id: author.id,
            title: required("title", &draft.title)?.to_owned(),
            subtitle: required("subtitle", &draft.subtitle)?.to_owned(),
            body: required("body", &draft.body)?.to_owned(),
            date: Local::now().format(DATE_FORMAT).to_string(),
        };

        let post = self.posts.create_post(post).await?;
        tracing::info!(post_id = %post.id, title = %post.title, "post created");
        Ok(post)
    }

    /// Overwrites title, subtitle and body, and renames the post's author.
    pub async fn edit(&self, editor: &User, id: PostId, edit: PostEdit) -> Result<()> {
        admin_only(Some(editor))?;
        let edit = PostEdit {
            title: required("title", &edit.title)?.to_owned(),
            subtitle: required("subtitle", &edit.subtitle)?.to_owned(),
            body: required("body", &edit.body)?.to_owned(),
            author_name: required("author", &edit.author_name)?.to_owned(),
        };

        self.posts.update_post(id, edit).await?;
        tracing::info!(post_id = %id, "post updated");
        Ok(())
    }

    /// Removes a post and every comment on it.
    pub async fn delete(&self, editor: &User, id: PostId) -> Result<()> {
        admin_only(Some(editor))?;
        self.posts.delete_post(id).await?;
        tracing::info!(post_id = %id, "post deleted");
        Ok(())
    }
}
