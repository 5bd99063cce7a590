//! Demo seed script
//!
//! Seeds the database with a small, realistic mess setup:
//! - 1 admin and 3 student accounts
//! - A full weekly lunch/dinner menu
//! - Today's attendance QR code
//! - A pending leave request, feedback entry and payment to review
//!
//! Usage:
//!   DATABASE_URL=... DEMO_PASSWORD=Demo2024! ./seed-demo
//!
//! Environment variables:
//!   DATABASE_URL   — PostgreSQL connection string (required)
//!   DEMO_PASSWORD  — Password for all demo accounts (default: Demo2024!)

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use std::env;
use uuid::Uuid;

use messmate_api::db::run_migrations;
use messmate_api::services::{billing, qr::QrService};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let demo_password = env::var("DEMO_PASSWORD").unwrap_or_else(|_| "Demo2024!".to_string());

    println!("=== Seed Demo Data ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool).await.context("Failed to run migrations")?;

    // 1. Clean previous demo rows (demo accounts use @demo.messmate.app)
    println!("Cleaning existing demo data...");
    for table in ["attendance", "leave_requests", "feedback", "payments"] {
        sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_email LIKE '%@demo.messmate.app'"
        ))
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to clean {table}"))?;
    }
    sqlx::query("DELETE FROM menu_items WHERE created_by LIKE '%@demo.messmate.app'")
        .execute(&pool)
        .await
        .context("Failed to clean menu_items")?;
    sqlx::query("DELETE FROM qr_codes WHERE created_by LIKE '%@demo.messmate.app'")
        .execute(&pool)
        .await
        .context("Failed to clean qr_codes")?;
    sqlx::query("DELETE FROM users WHERE email LIKE '%@demo.messmate.app'")
        .execute(&pool)
        .await
        .context("Failed to clean users")?;

    // 2. Hash password (cost 10 for seed speed)
    let password_hash =
        bcrypt::hash(&demo_password, 10).context("Failed to hash demo password")?;

    // 3. Insert users
    println!("Inserting users...");
    let admin_id = Uuid::new_v4();
    let student1_id = Uuid::new_v4();
    let student2_id = Uuid::new_v4();
    let student3_id = Uuid::new_v4();

    let users = [
        (admin_id,    "warden@demo.messmate.app", "Anita Deshmukh", "admin"),
        (student1_id, "asha@demo.messmate.app",   "Asha Kulkarni",  "user"),
        (student2_id, "ravi@demo.messmate.app",   "Ravi Patil",     "user"),
        (student3_id, "meera@demo.messmate.app",  "Meera Joshi",    "user"),
    ];

    for (id, email, name, role) in &users {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, role)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(email)
        .bind(&password_hash)
        .bind(name)
        .bind(role)
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to insert user {email}"))?;
    }

    // 4. Weekly menu
    println!("Inserting weekly menu...");
    let menu: &[(&str, &str, &str)] = &[
        ("Monday",    "Lunch",  "Rice, Dal Tadka, Bhindi Sabji, Roti, Papad"),
        ("Monday",    "Dinner", "Jeera Rice, Rajma, Salad, Roti"),
        ("Tuesday",   "Lunch",  "Rice, Sambar, Cabbage Sabji, Roti, Curd"),
        ("Tuesday",   "Dinner", "Veg Pulao, Dal Fry, Papad"),
        ("Wednesday", "Lunch",  "Rice, Dal, Paneer Bhurji, Roti"),
        ("Wednesday", "Dinner", "Khichdi, Kadhi, Pickle"),
        ("Thursday",  "Lunch",  "Rice, Chole, Aloo Sabji, Puri"),
        ("Thursday",  "Dinner", "Rice, Dal, Mix Veg, Roti"),
        ("Friday",    "Lunch",  "Veg Biryani, Raita, Papad"),
        ("Friday",    "Dinner", "Rice, Dal Makhani, Roti, Sweet"),
        ("Saturday",  "Lunch",  "Rice, Dal, Lauki Sabji, Roti"),
        ("Saturday",  "Dinner", "Pav Bhaji, Salad"),
        ("Sunday",    "Lunch",  "Masala Dosa, Sambar, Chutney"),
        ("Sunday",    "Dinner", "Rice, Dal, Seasonal Sabji, Roti, Kheer"),
    ];

    for (day, meal_type, items) in menu {
        sqlx::query(
            "INSERT INTO menu_items (day, meal_type, items, created_by)
             VALUES ($1, $2, $3, 'warden@demo.messmate.app')",
        )
        .bind(day)
        .bind(meal_type)
        .bind(items)
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to insert menu for {day} {meal_type}"))?;
    }

    // 5. Today's QR code
    println!("Issuing today's QR code...");
    let today = Utc::now().date_naive();
    let code = QrService::issue(&pool, today, Some("general"), "warden@demo.messmate.app")
        .await
        .context("Failed to issue QR code")?;

    // 6. Sample records awaiting admin action
    println!("Inserting sample records...");
    sqlx::query(
        "INSERT INTO leave_requests (user_id, user_email, start_date, end_date, meal_type, reason)
         VALUES ($1, 'asha@demo.messmate.app', $2, $3, 'Dinner', 'Travelling home for the weekend')",
    )
    .bind(student1_id)
    .bind(today + chrono::Duration::days(2))
    .bind(today + chrono::Duration::days(4))
    .execute(&pool)
    .await
    .context("Failed to insert leave request")?;

    sqlx::query(
        "INSERT INTO feedback (user_id, user_email, subject, message, rating, category)
         VALUES ($1, 'ravi@demo.messmate.app', 'Less salt in dal', 'The dal has been too salty this week.', 3, 'complaint')",
    )
    .bind(student2_id)
    .execute(&pool)
    .await
    .context("Failed to insert feedback")?;

    let month = billing::month_label(today);
    sqlx::query(
        "INSERT INTO payments (user_id, user_email, amount, month, transaction_id, payment_method)
         VALUES ($1, 'meera@demo.messmate.app', 2400, $2, 'UPI-20260801-4417', 'upi')",
    )
    .bind(student3_id)
    .bind(&month)
    .execute(&pool)
    .await
    .context("Failed to insert payment")?;

    println!();
    println!("=== Demo data seeded successfully! ===");
    println!("  Users    :");
    for (_, email, name, role) in &users {
        println!("             {email} ({name}, {role})");
    }
    println!("  Password : {demo_password}");
    println!("  Menu     : {} entries", menu.len());
    println!("  QR code  : {} ({})", code.qr_value, code.date);
    println!("  Pending  : 1 leave, 1 feedback, 1 payment ({month})");

    Ok(())
}
