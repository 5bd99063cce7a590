use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::qr::DailyQrCode;

pub struct QrService;

impl QrService {
    /// Opaque payload encoded into the QR image: the date keeps scans
    /// verifiable against "today", the nonce makes each issuance unique.
    pub fn generate_value(date: NaiveDate) -> String {
        use rand::Rng;
        let nonce: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        format!("meal-attendance-{date}-{nonce}")
    }

    /// Issue a fresh code for `date`. Older codes for the same date stay in
    /// place; `today` always resolves to the newest one.
    pub async fn issue(
        pool: &PgPool,
        date: NaiveDate,
        meal_type: Option<&str>,
        created_by: &str,
    ) -> anyhow::Result<DailyQrCode> {
        let qr_value = Self::generate_value(date);
        let code = sqlx::query_as::<_, DailyQrCode>(
            r#"INSERT INTO qr_codes (date, qr_value, meal_type, created_by)
               VALUES ($1, $2, $3, $4)
               RETURNING id, date, qr_value, meal_type, created_by, created_at"#,
        )
        .bind(date)
        .bind(qr_value)
        .bind(meal_type)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(code)
    }

    /// The most recently issued code for `date`, if any.
    pub async fn for_date(pool: &PgPool, date: NaiveDate) -> anyhow::Result<Option<DailyQrCode>> {
        let code = sqlx::query_as::<_, DailyQrCode>(
            r#"SELECT id, date, qr_value, meal_type, created_by, created_at
               FROM qr_codes
               WHERE date = $1
               ORDER BY created_at DESC
               LIMIT 1"#,
        )
        .bind(date)
        .fetch_optional(pool)
        .await?;
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_embeds_the_issue_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let value = QrService::generate_value(date);
        assert!(value.starts_with("meal-attendance-2026-08-07-"));
        assert_eq!(value.len(), "meal-attendance-2026-08-07-".len() + 12);
    }

    #[test]
    fn payloads_are_unique_per_issuance() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_ne!(QrService::generate_value(date), QrService::generate_value(date));
    }
}
