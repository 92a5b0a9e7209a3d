//! Reader comments on posts.

use std::sync::Arc;

use domains::{
    Comment, CommentRepository, CommentThreadEntry, DomainError, NewComment, PostId,
    PostRepository, Result, User,
};

use crate::required;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Comments belonging to `post_id`, oldest first.
    pub async fn thread(&self, post_id: PostId) -> Result<Vec<CommentThreadEntry>> {
        self.comments.comments_for_post(post_id).await
    }

    /// Every comment in the store.
    pub async fn all(&self) -> Result<Vec<Comment>> {
        self.comments.list_comments().await
    }

    pub async fn add(&self, author: &User, post_id: PostId, text: &str) -> Result<Comment> {
        let text = required("comment", text)?;
        if self.posts.get_post(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        let comment = self
            .comments
            .create_comment(NewComment {
                user_id: author.id,
                post_id,
                text: text.to_owned(),
            })
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, user_id = %author.id, "comment added");
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        AuthoredPost, CommentId, MockCommentRepository, MockPostRepository, Post, UserId,
    };

    fn reader() -> User {
        User {
            id: UserId(2),
            name: "Reader".into(),
            email: "reader@example.com".into(),
            password_hash: String::new(),
        }
    }

    fn existing_post(id: PostId) -> AuthoredPost {
        AuthoredPost {
            post: Post {
                id,
                author_id: UserId(1),
                title: "T1".into(),
                subtitle: "S".into(),
                date: "January 01, 2026".into(),
                body: "B".into(),
            },
            author_name: "Admin".into(),
        }
    }

    #[tokio::test]
    async fn add_persists_trimmed_text() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_get_post()
            .returning(|id| Ok(Some(existing_post(id))));

        let mut comments = MockCommentRepository::new();
        comments
            .expect_create_comment()
            .withf(|c| c.text == "Nice post" && c.user_id == UserId(2) && c.post_id == PostId(5))
            .times(1)
            .returning(|c| {
                Ok(Comment {
                    id: CommentId(1),
                    user_id: c.user_id,
                    post_id: c.post_id,
                    text: c.text,
                })
            });

        let service = CommentService::new(Arc::new(comments), Arc::new(posts));
        let comment = service
            .add(&reader(), PostId(5), "  Nice post ")
            .await
            .unwrap();
        assert_eq!(comment.text, "Nice post");
    }

    #[tokio::test]
    async fn add_to_missing_post_writes_nothing() {
        let mut posts = MockPostRepository::new();
        posts.expect_get_post().returning(|_| Ok(None));

        let mut comments = MockCommentRepository::new();
        comments.expect_create_comment().never();

        let service = CommentService::new(Arc::new(comments), Arc::new(posts));
        let err = service.add(&reader(), PostId(9), "hello").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(..)));
    }

    #[tokio::test]
    async fn blank_comment_is_rejected_before_lookup() {
        let mut posts = MockPostRepository::new();
        posts.expect_get_post().never();

        let service =
            CommentService::new(Arc::new(MockCommentRepository::new()), Arc::new(posts));
        let err = service.add(&reader(), PostId(1), "   ").await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
