use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    auth::AuthenticatedUser,
    payment::{Payment, SubmitPaymentRequest},
};
use crate::services::billing;

const SELECT_COLUMNS: &str = "id, user_id, user_email, amount, month, transaction_id, \
                              payment_method, status, verified_by, verified_at, created_at";

pub struct PaymentService;

impl PaymentService {
    /// Record a submitted payment awaiting admin verification.
    pub async fn submit(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: &SubmitPaymentRequest,
    ) -> anyhow::Result<Payment> {
        let month = req
            .month
            .clone()
            .unwrap_or_else(|| billing::month_label(Utc::now().date_naive()));
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"INSERT INTO payments (user_id, user_email, amount, month, transaction_id, payment_method)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(user.user_id)
        .bind(&user.email)
        .bind(req.amount)
        .bind(month)
        .bind(&req.transaction_id)
        .bind(&req.payment_method)
        .fetch_one(pool)
        .await?;
        Ok(payment)
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {SELECT_COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(payments)
    }

    pub async fn list_all(pool: &PgPool) -> anyhow::Result<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {SELECT_COLUMNS} FROM payments ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(payments)
    }

    /// Mark paid or rejected; stamps the verifier. None when the id is unknown.
    pub async fn verify(
        pool: &PgPool,
        id: Uuid,
        status: &str,
        verified_by: &str,
    ) -> anyhow::Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"UPDATE payments
               SET status = $2, verified_by = $3, verified_at = $4
               WHERE id = $1
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(status)
        .bind(verified_by)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;
        Ok(payment)
    }
}
