use chrono::NaiveDate;

use crate::models::attendance::AttendanceRecord;

/// Fixed column order of the attendance export.
const HEADER: [&str; 4] = ["Date", "Time", "Email", "MealType"];

/// Render attendance records as CSV: the fixed header, then one line per
/// record with Date/Time derived from the recording timestamp.
pub fn attendance_csv(records: &[AttendanceRecord]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([
            record.recorded_at.format("%Y-%m-%d").to_string(),
            record.recorded_at.format("%H:%M:%S").to_string(),
            record.user_email.clone(),
            record.meal_type.clone(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing csv writer: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name offered with the CSV body.
pub fn export_filename(today: NaiveDate) -> String {
    format!("attendance-data-{today}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn record(ts: &str, email: &str, meal: &str) -> AttendanceRecord {
        let recorded_at = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
            .expect("test timestamp")
            .and_utc();
        AttendanceRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_email: email.to_string(),
            user_name: email.split('@').next().unwrap_or(email).to_string(),
            date: recorded_at.date_naive(),
            recorded_at,
            meal_type: meal.to_string(),
            qr_code_id: None,
        }
    }

    #[test]
    fn two_records_export_as_three_lines() {
        let records = [
            record("2026-08-06 12:30:05", "asha@example.com", "Lunch"),
            record("2026-08-07 08:10:00", "ravi@example.com", "general"),
        ];
        let csv = attendance_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Date,Time,Email,MealType");
        assert_eq!(lines[1], "2026-08-06,12:30:05,asha@example.com,Lunch");
        assert_eq!(lines[2], "2026-08-07,08:10:00,ravi@example.com,general");
    }

    #[test]
    fn empty_input_is_header_only() {
        let csv = attendance_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "Date,Time,Email,MealType");
    }

    #[test]
    fn filename_carries_the_export_date() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(export_filename(today), "attendance-data-2026-08-07.csv");
    }
}
