use http::Method;
use shared::models::{Post, PostStatus, PostUpdate};
use shared::request::ListQuery;
use shared::response::ListPage;
use shared::types::Id;

use super::{ApiClient, not_wired};
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> ApiClient<H> {
    pub async fn list_posts(&self, query: &ListQuery) -> ClientResult<ListPage<Post>> {
        self.get_list("/api/posts", query, "posts").await
    }

    pub async fn update_post(&self, id: Id, update: &PostUpdate) -> ClientResult<Option<Post>> {
        self.send(Method::PUT, &format!("/api/posts/{id}"), update).await
    }

    /// Move a post through moderation; illegal transitions never reach the server
    pub async fn moderate_post(&self, post: &Post, next: PostStatus) -> ClientResult<Post> {
        let status = post.status.transition(next)?;
        let saved = self.update_post(post.id, &PostUpdate::status(status)).await?;
        tracing::info!(post_id = post.id, status = ?status, "Post moderated");
        Ok(saved.unwrap_or_else(|| Post {
            status,
            ..post.clone()
        }))
    }

    pub async fn delete_post(&self, _id: Id) -> ClientResult<()> {
        not_wired("posts.delete")
    }
}
