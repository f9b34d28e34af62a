use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::ReadingRecord;
use crate::parameters;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Outcome of a CSV import. Rows whose value does not parse to a finite
/// number are skipped rather than failing the whole import.
#[derive(Debug, Clone, Copy)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let locations = vec![
        (
            Uuid::parse_str("7c2f9a10-55be-43d1-9c21-4b6a1f0c2e88")?,
            "Riverside Intake",
            28.6139,
            77.2090,
        ),
        (
            Uuid::parse_str("f41d8c2b-90ae-4d6f-b1e3-6d2a9c0f7e51")?,
            "Mill Creek Outfall",
            28.5355,
            77.3910,
        ),
    ];

    for (id, name, latitude, longitude) in locations {
        sqlx::query(
            r#"
            INSERT INTO water_quality.locations (id, name, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO UPDATE
            SET latitude = EXCLUDED.latitude, longitude = EXCLUDED.longitude
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .execute(pool)
        .await?;
    }

    for parameter in parameters::PARAMETER_REGISTRY {
        let limits = &parameter.default_limits;
        sqlx::query(
            r#"
            INSERT INTO water_quality.parameter_limits
            (parameter_code, parameter_name, unit, safe_limit, moderate_limit, high_limit, critical_limit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (parameter_code) DO NOTHING
            "#,
        )
        .bind(parameter.code)
        .bind(parameter.name)
        .bind(parameter.unit)
        .bind(limits.safe_limit)
        .bind(limits.moderate_limit)
        .bind(limits.high_limit)
        .bind(limits.critical_limit)
        .execute(pool)
        .await?;
    }

    let readings = vec![
        ("seed-001", "Riverside Intake", "pH", 7.4, (2026, 2, 2), (8, 30, 0)),
        ("seed-002", "Riverside Intake", "DO", 5.2, (2026, 2, 2), (8, 30, 0)),
        ("seed-003", "Riverside Intake", "BOD", 4.1, (2026, 2, 2), (8, 30, 0)),
        ("seed-004", "Mill Creek Outfall", "pH", 9.1, (2026, 2, 2), (9, 0, 0)),
        ("seed-005", "Mill Creek Outfall", "DO", 2.8, (2026, 2, 2), (9, 0, 0)),
        ("seed-006", "Mill Creek Outfall", "BOD", 11.5, (2026, 2, 2), (9, 0, 0)),
        ("seed-007", "Mill Creek Outfall", "TDS", 1240.0, (2026, 2, 2), (9, 0, 0)),
    ];

    for (source_key, location, parameter_code, value, date, time) in readings {
        let measured_at = NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .context("invalid date")?
            .and_hms_opt(time.0, time.1, time.2)
            .context("invalid time")?;

        let location_id: Uuid =
            sqlx::query("SELECT id FROM water_quality.locations WHERE name = $1")
                .bind(location)
                .fetch_one(pool)
                .await?
                .get("id");

        sqlx::query(
            r#"
            INSERT INTO water_quality.readings
            (id, location_id, parameter_code, value, measured_at, source_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(location_id)
        .bind(parameter_code)
        .bind(value)
        .bind(measured_at)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Fetches the latest reading per (location, parameter), joined with the
/// limit table. Limits are LEFT JOINed so readings for unconfigured
/// parameters still come back and flow into the unscoreable path.
pub async fn fetch_latest_readings(
    pool: &PgPool,
    location: Option<&str>,
) -> anyhow::Result<Vec<ReadingRecord>> {
    let mut query = String::from(
        "SELECT DISTINCT ON (r.location_id, r.parameter_code) \
         r.location_id, l.name AS location_name, r.parameter_code, r.value, r.measured_at, \
         COALESCE(pl.unit, '') AS unit, pl.safe_limit, pl.moderate_limit, pl.high_limit, pl.critical_limit \
         FROM water_quality.readings r \
         JOIN water_quality.locations l ON l.id = r.location_id \
         LEFT JOIN water_quality.parameter_limits pl ON pl.parameter_code = r.parameter_code",
    );

    if location.is_some() {
        query.push_str(" WHERE l.name = $1");
    }
    query.push_str(" ORDER BY r.location_id, r.parameter_code, r.measured_at DESC");

    let mut rows = sqlx::query(&query);
    if let Some(name) = location {
        rows = rows.bind(name);
    }

    let records = rows.fetch_all(pool).await?;
    let mut readings = Vec::new();

    for row in records {
        readings.push(ReadingRecord {
            location_id: row.get("location_id"),
            location_name: row.get("location_name"),
            parameter_code: row.get("parameter_code"),
            unit: row.get("unit"),
            value: row.get("value"),
            measured_at: row.get("measured_at"),
            safe_limit: row.get("safe_limit"),
            moderate_limit: row.get("moderate_limit"),
            high_limit: row.get("high_limit"),
            critical_limit: row.get("critical_limit"),
        });
    }

    Ok(readings)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<ImportSummary> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        location: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        parameter_code: String,
        value: String,
        measured_at: NaiveDateTime,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        // Sensor exports carry values as strings; anything that does not
        // parse to a finite number is excluded here, mirroring how the
        // classifier excludes bad readings instead of zeroing them.
        let value = match row.value.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let location_id: Uuid = sqlx::query(
            r#"
            INSERT INTO water_quality.locations (id, name, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO UPDATE
            SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.location)
        .bind(row.latitude)
        .bind(row.longitude)
        .fetch_one(pool)
        .await?
        .get("id");

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO water_quality.readings
            (id, location_id, parameter_code, value, measured_at, source_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(location_id)
        .bind(&row.parameter_code)
        .bind(value)
        .bind(row.measured_at)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(ImportSummary { inserted, skipped })
}
