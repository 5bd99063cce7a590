use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    auth::AuthenticatedUser,
    feedback::{CreateFeedbackRequest, Feedback},
};

const SELECT_COLUMNS: &str = "id, user_id, user_email, subject, message, rating, category, \
                              status, admin_response, responded_by, responded_at, created_at";

pub struct FeedbackService;

impl FeedbackService {
    pub async fn create(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: &CreateFeedbackRequest,
    ) -> anyhow::Result<Feedback> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            r#"INSERT INTO feedback (user_id, user_email, subject, message, rating, category)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&req.subject)
        .bind(&req.message)
        .bind(req.rating)
        .bind(&req.category)
        .fetch_one(pool)
        .await?;
        Ok(feedback)
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {SELECT_COLUMNS} FROM feedback WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(feedback)
    }

    pub async fn list_all(pool: &PgPool) -> anyhow::Result<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {SELECT_COLUMNS} FROM feedback ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(feedback)
    }

    /// Resolve or reject, optionally attaching a response for the user.
    pub async fn respond(
        pool: &PgPool,
        id: Uuid,
        status: &str,
        response: Option<&str>,
        responded_by: &str,
    ) -> anyhow::Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            r#"UPDATE feedback
               SET status = $2, admin_response = $3, responded_by = $4, responded_at = $5
               WHERE id = $1
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(status)
        .bind(response.unwrap_or(""))
        .bind(responded_by)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;
        Ok(feedback)
    }
}
