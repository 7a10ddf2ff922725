use moveminds_dto::{Comment, Conversation, Message, NewComment, NewMessage};
use reqwest::Method;

use super::{ApiClient, RequestOptions};
use crate::error::Result;

impl ApiClient {
    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        self.get("/messages/conversations", &Vec::new()).await
    }

    /// Full message history with one other user.
    pub async fn conversation(&self, other_user_id: i64) -> Result<Vec<Message>> {
        self.get(&format!("/messages/conversations/{other_user_id}"), &Vec::new())
            .await
    }

    pub async fn send_message(&self, message: &NewMessage) -> Result<Message> {
        self.send_json(Method::POST, "/messages", message).await
    }

    pub async fn mark_message_read(&self, message_id: i64) -> Result<()> {
        self.send_unit::<()>(
            Method::PATCH,
            &format!("/messages/{message_id}/read"),
            None,
        )
        .await
    }

    /// Comments under a program.
    ///
    /// The listing is decorative on the program page, so an expired token
    /// here is reported as an ordinary error instead of ending the session.
    pub async fn program_comments(&self, program_id: i64) -> Result<Vec<Comment>> {
        self.get_with(
            &format!("/programs/{program_id}/comments"),
            &Vec::new(),
            RequestOptions::quiet_auth(),
        )
        .await
    }

    pub async fn add_comment(&self, program_id: i64, comment: &NewComment) -> Result<Comment> {
        self.send_json(
            Method::POST,
            &format!("/programs/{program_id}/comments"),
            comment,
        )
        .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<()> {
        self.delete(&format!("/comments/{comment_id}")).await
    }
}
