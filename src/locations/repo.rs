use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub status: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Country row joined with its live division count, for admin lists.
#[derive(Debug, Clone, FromRow)]
pub struct CountryWithCount {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub status: bool,
    pub divisions: i64,
}

impl Country {
    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
    ) -> anyhow::Result<Option<Country>> {
        let row = sqlx::query_as::<_, Country>(
            "SELECT id, name, code, status, created_at, updated_at FROM countries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_active<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
    ) -> anyhow::Result<Option<Country>> {
        let row = sqlx::query_as::<_, Country>(
            "SELECT id, name, code, status, created_at, updated_at \
             FROM countries WHERE id = $1 AND status = TRUE",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn code_taken<'e>(
        db: impl PgExecutor<'e>,
        code: &str,
        exclude_id: Option<i64>,
    ) -> anyhow::Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM countries WHERE code = $1 AND ($2::BIGINT IS NULL OR id != $2)",
        )
        .bind(code)
        .bind(exclude_id)
        .fetch_one(db)
        .await?;
        Ok(count > 0)
    }

    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        name: &str,
        code: &str,
    ) -> anyhow::Result<Country> {
        let row = sqlx::query_as::<_, Country>(
            "INSERT INTO countries (name, code) VALUES ($1, $2) \
             RETURNING id, name, code, status, created_at, updated_at",
        )
        .bind(name)
        .bind(code)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
        name: &str,
        code: &str,
        status: bool,
    ) -> anyhow::Result<Country> {
        let row = sqlx::query_as::<_, Country>(
            "UPDATE countries SET name = $1, code = $2, status = $3, updated_at = now() \
             WHERE id = $4 \
             RETURNING id, name, code, status, created_at, updated_at",
        )
        .bind(name)
        .bind(code)
        .bind(status)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM countries WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn count<'e>(db: impl PgExecutor<'e>) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    pub async fn division_count<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM divisions WHERE country_id = $1")
            .bind(id)
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    pub async fn list_page<'e>(
        db: impl PgExecutor<'e>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<CountryWithCount>> {
        let rows = sqlx::query_as::<_, CountryWithCount>(
            "SELECT c.id, c.name, c.code, c.status, \
                    (SELECT COUNT(*) FROM divisions d WHERE d.country_id = c.id) AS divisions \
             FROM countries c \
             ORDER BY c.name ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_active<'e>(db: impl PgExecutor<'e>) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries WHERE status = TRUE")
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    pub async fn list_active_page<'e>(
        db: impl PgExecutor<'e>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Country>> {
        let rows = sqlx::query_as::<_, Country>(
            "SELECT id, name, code, status, created_at, updated_at \
             FROM countries WHERE status = TRUE \
             ORDER BY name ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Division {
    pub id: i64,
    pub name: String,
    pub country_id: i64,
    pub status: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Division row joined with its country name and district count.
#[derive(Debug, Clone, FromRow)]
pub struct DivisionWithCountry {
    pub id: i64,
    pub name: String,
    pub status: bool,
    pub country_id: i64,
    pub country_name: String,
    pub districts: i64,
}

impl Division {
    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
    ) -> anyhow::Result<Option<Division>> {
        let row = sqlx::query_as::<_, Division>(
            "SELECT id, name, country_id, status, created_at, updated_at \
             FROM divisions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_active<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
    ) -> anyhow::Result<Option<Division>> {
        let row = sqlx::query_as::<_, Division>(
            "SELECT id, name, country_id, status, created_at, updated_at \
             FROM divisions WHERE id = $1 AND status = TRUE",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        name: &str,
        country_id: i64,
    ) -> anyhow::Result<Division> {
        let row = sqlx::query_as::<_, Division>(
            "INSERT INTO divisions (name, country_id) VALUES ($1, $2) \
             RETURNING id, name, country_id, status, created_at, updated_at",
        )
        .bind(name)
        .bind(country_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
        name: &str,
        country_id: i64,
        status: bool,
    ) -> anyhow::Result<Division> {
        let row = sqlx::query_as::<_, Division>(
            "UPDATE divisions SET name = $1, country_id = $2, status = $3, updated_at = now() \
             WHERE id = $4 \
             RETURNING id, name, country_id, status, created_at, updated_at",
        )
        .bind(name)
        .bind(country_id)
        .bind(status)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM divisions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn count<'e>(db: impl PgExecutor<'e>) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM divisions")
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    pub async fn district_count<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM districts WHERE division_id = $1")
                .bind(id)
                .fetch_one(db)
                .await?;
        Ok(count)
    }

    pub async fn list_page<'e>(
        db: impl PgExecutor<'e>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<DivisionWithCountry>> {
        let rows = sqlx::query_as::<_, DivisionWithCountry>(
            "SELECT d.id, d.name, d.status, d.country_id, c.name AS country_name, \
                    (SELECT COUNT(*) FROM districts t WHERE t.division_id = d.id) AS districts \
             FROM divisions d \
             JOIN countries c ON c.id = d.country_id \
             ORDER BY d.name ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_active_in<'e>(
        db: impl PgExecutor<'e>,
        country_id: i64,
    ) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM divisions WHERE country_id = $1 AND status = TRUE",
        )
        .bind(country_id)
        .fetch_one(db)
        .await?;
        Ok(count)
    }

    pub async fn list_active_in<'e>(
        db: impl PgExecutor<'e>,
        country_id: i64,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Division>> {
        let rows = sqlx::query_as::<_, Division>(
            "SELECT id, name, country_id, status, created_at, updated_at \
             FROM divisions WHERE country_id = $1 AND status = TRUE \
             ORDER BY name ASC LIMIT $2 OFFSET $3",
        )
        .bind(country_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct District {
    pub id: i64,
    pub name: String,
    pub country_id: i64,
    pub division_id: i64,
    pub status: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// District row joined with its division and country names.
#[derive(Debug, Clone, FromRow)]
pub struct DistrictWithParents {
    pub id: i64,
    pub name: String,
    pub status: bool,
    pub division_id: i64,
    pub division_name: String,
    pub country_id: i64,
    pub country_name: String,
}

impl District {
    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
    ) -> anyhow::Result<Option<District>> {
        let row = sqlx::query_as::<_, District>(
            "SELECT id, name, country_id, division_id, status, created_at, updated_at \
             FROM districts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        name: &str,
        division_id: i64,
        country_id: i64,
    ) -> anyhow::Result<District> {
        let row = sqlx::query_as::<_, District>(
            "INSERT INTO districts (name, division_id, country_id) VALUES ($1, $2, $3) \
             RETURNING id, name, country_id, division_id, status, created_at, updated_at",
        )
        .bind(name)
        .bind(division_id)
        .bind(country_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
        name: &str,
        division_id: i64,
        country_id: i64,
        status: bool,
    ) -> anyhow::Result<District> {
        let row = sqlx::query_as::<_, District>(
            "UPDATE districts \
             SET name = $1, division_id = $2, country_id = $3, status = $4, updated_at = now() \
             WHERE id = $5 \
             RETURNING id, name, country_id, division_id, status, created_at, updated_at",
        )
        .bind(name)
        .bind(division_id)
        .bind(country_id)
        .bind(status)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM districts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn count<'e>(db: impl PgExecutor<'e>) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM districts")
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    pub async fn list_page<'e>(
        db: impl PgExecutor<'e>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<DistrictWithParents>> {
        let rows = sqlx::query_as::<_, DistrictWithParents>(
            "SELECT t.id, t.name, t.status, t.division_id, d.name AS division_name, \
                    t.country_id, c.name AS country_name \
             FROM districts t \
             JOIN divisions d ON d.id = t.division_id \
             JOIN countries c ON c.id = t.country_id \
             ORDER BY t.name ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_active_in<'e>(
        db: impl PgExecutor<'e>,
        division_id: i64,
    ) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM districts WHERE division_id = $1 AND status = TRUE",
        )
        .bind(division_id)
        .fetch_one(db)
        .await?;
        Ok(count)
    }

    pub async fn list_active_in<'e>(
        db: impl PgExecutor<'e>,
        division_id: i64,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<District>> {
        let rows = sqlx::query_as::<_, District>(
            "SELECT id, name, country_id, division_id, status, created_at, updated_at \
             FROM districts WHERE division_id = $1 AND status = TRUE \
             ORDER BY name ASC LIMIT $2 OFFSET $3",
        )
        .bind(division_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
