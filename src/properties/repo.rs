use anyhow::Context;
use sqlx::{FromRow, PgExecutor, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::filter::FilterSet;
use crate::properties::dto::PropertyPatch;
use crate::properties::features::{
    Amenities, CommunityFeature, EnergyFeature, FeatureBundle, LuxuryFeature, SecurityFeature,
    TechnologyFeature, UtilsFeature,
};

/// Property row joined with location names and the owning user, the shape
/// every read path works from.
#[derive(Debug, Clone, FromRow)]
pub struct PropertyDetailRow {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub purpose: String,
    pub price: f64,
    pub status: String,
    pub property_type: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub size: f64,
    pub built_year: Option<i32>,
    pub country_id: i64,
    pub country_name: String,
    pub division_id: i64,
    pub division_name: String,
    pub district_id: i64,
    pub district_name: String,
    pub address: String,
    pub description: String,
    pub approved_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email: String,
}

const DETAIL_SELECT: &str = "SELECT p.id, p.owner_id, p.title, p.purpose, p.price, p.status, \
     p.property_type, p.bedrooms, p.bathrooms, p.size, p.built_year, \
     p.country_id, c.name AS country_name, \
     p.division_id, dv.name AS division_name, \
     p.district_id, ds.name AS district_name, \
     p.address, p.description, p.approved_at, p.created_at, p.updated_at, \
     u.first_name AS owner_first_name, u.last_name AS owner_last_name, u.email AS owner_email \
     FROM properties p \
     JOIN countries c ON c.id = p.country_id \
     JOIN divisions dv ON dv.id = p.division_id \
     JOIN districts ds ON ds.id = p.district_id \
     JOIN users u ON u.id = p.owner_id";

pub struct NewProperty<'a> {
    pub owner_id: i64,
    pub title: &'a str,
    pub purpose: &'a str,
    pub price: f64,
    pub property_type: &'a str,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub size: f64,
    pub built_year: Option<i32>,
    pub country_id: i64,
    pub division_id: i64,
    pub district_id: i64,
    pub address: &'a str,
    pub description: &'a str,
}

pub struct Property;

impl Property {
    /// Counts rows matching the owner restriction plus the filter set.
    pub async fn count_filtered<'e>(
        db: impl PgExecutor<'e>,
        owner_id: i64,
        filters: &FilterSet,
    ) -> anyhow::Result<i64> {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM properties p WHERE p.owner_id = ");
        qb.push_bind(owner_id);
        filters.apply(&mut qb);
        let count: i64 = qb.build_query_scalar().fetch_one(db).await?;
        Ok(count)
    }

    /// One page of the owner's properties, newest first, with associations.
    pub async fn list_filtered<'e>(
        db: impl PgExecutor<'e>,
        owner_id: i64,
        filters: &FilterSet,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<PropertyDetailRow>> {
        let mut qb = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        qb.push(" WHERE p.owner_id = ");
        qb.push_bind(owner_id);
        filters.apply(&mut qb);
        qb.push(" ORDER BY p.created_at DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);
        let rows = qb.build_query_as().fetch_all(db).await?;
        Ok(rows)
    }

    pub async fn find_detail<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
    ) -> anyhow::Result<Option<PropertyDetailRow>> {
        let row =
            sqlx::query_as::<_, PropertyDetailRow>(&format!("{DETAIL_SELECT} WHERE p.id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(row)
    }

    pub async fn find_detail_for_owner<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
        owner_id: i64,
    ) -> anyhow::Result<Option<PropertyDetailRow>> {
        let row = sqlx::query_as::<_, PropertyDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE p.id = $1 AND p.owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Inserts the row and returns its id. Status defaults to draft.
    pub async fn insert<'e>(db: impl PgExecutor<'e>, new: NewProperty<'_>) -> anyhow::Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO properties \
             (owner_id, title, purpose, price, property_type, bedrooms, bathrooms, size, \
              built_year, country_id, division_id, district_id, address, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING id",
        )
        .bind(new.owner_id)
        .bind(new.title)
        .bind(new.purpose)
        .bind(new.price)
        .bind(new.property_type)
        .bind(new.bedrooms)
        .bind(new.bathrooms)
        .bind(new.size)
        .bind(new.built_year)
        .bind(new.country_id)
        .bind(new.division_id)
        .bind(new.district_id)
        .bind(new.address)
        .bind(new.description)
        .fetch_one(db)
        .await?;
        Ok(id)
    }

    /// Sparse update restricted to the owning user. Only fields present in
    /// the patch are written. Returns false when no such row exists.
    pub async fn apply_patch<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
        owner_id: i64,
        patch: &PropertyPatch,
    ) -> anyhow::Result<bool> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE properties SET updated_at = now()");

        if let Some(title) = &patch.title {
            qb.push(", title = ").push_bind(title.clone());
        }
        if let Some(purpose) = &patch.purpose {
            qb.push(", purpose = ").push_bind(purpose.clone());
        }
        if let Some(price) = patch.price {
            qb.push(", price = ").push_bind(price);
        }
        if let Some(property_type) = &patch.property_type {
            qb.push(", property_type = ").push_bind(property_type.clone());
        }
        if let Some(bedrooms) = patch.bedrooms {
            qb.push(", bedrooms = ").push_bind(bedrooms);
        }
        if let Some(bathrooms) = patch.bathrooms {
            qb.push(", bathrooms = ").push_bind(bathrooms);
        }
        if let Some(size) = patch.size {
            qb.push(", size = ").push_bind(size);
        }
        if let Some(built_year) = patch.built_year {
            qb.push(", built_year = ").push_bind(built_year);
        }
        if let Some(country_id) = patch.country_id {
            qb.push(", country_id = ").push_bind(country_id);
        }
        if let Some(division_id) = patch.division_id {
            qb.push(", division_id = ").push_bind(division_id);
        }
        if let Some(district_id) = patch.district_id {
            qb.push(", district_id = ").push_bind(district_id);
        }
        if let Some(address) = &patch.address {
            qb.push(", address = ").push_bind(address.clone());
        }
        if let Some(description) = &patch.description {
            qb.push(", description = ").push_bind(description.clone());
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND owner_id = ");
        qb.push_bind(owner_id);

        let result = qb.build().execute(db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PropertyFeatureRow {
    pub id: i64,
    pub property_id: i64,
    pub features: Vec<String>,
    pub amenities: serde_json::Value,
    pub security_feature: serde_json::Value,
    pub technology_feature: serde_json::Value,
    pub luxury_feature: serde_json::Value,
    pub community_feature: serde_json::Value,
    pub utils_feature: serde_json::Value,
    pub energy_feature: serde_json::Value,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl PropertyFeatureRow {
    /// Explicit deserialize-after-read step: rebuilds the typed categories
    /// from the stored blobs.
    pub fn rehydrate(&self) -> anyhow::Result<FeatureBundle> {
        Ok(FeatureBundle {
            features: self.features.clone(),
            amenities: serde_json::from_value::<Amenities>(self.amenities.clone())
                .context("amenities blob")?,
            security: serde_json::from_value::<SecurityFeature>(self.security_feature.clone())
                .context("security blob")?,
            technology: serde_json::from_value::<TechnologyFeature>(
                self.technology_feature.clone(),
            )
            .context("technology blob")?,
            luxury: serde_json::from_value::<LuxuryFeature>(self.luxury_feature.clone())
                .context("luxury blob")?,
            community: serde_json::from_value::<CommunityFeature>(self.community_feature.clone())
                .context("community blob")?,
            utils: serde_json::from_value::<UtilsFeature>(self.utils_feature.clone())
                .context("utils blob")?,
            energy: serde_json::from_value::<EnergyFeature>(self.energy_feature.clone())
                .context("energy blob")?,
        })
    }
}

pub struct PropertyFeature;

const FEATURE_COLUMNS: &str = "id, property_id, features, amenities, security_feature, \
     technology_feature, luxury_feature, community_feature, utils_feature, energy_feature, \
     created_at, updated_at";

impl PropertyFeature {
    pub async fn find_by_property<'e>(
        db: impl PgExecutor<'e>,
        property_id: i64,
    ) -> anyhow::Result<Option<PropertyFeatureRow>> {
        let row = sqlx::query_as::<_, PropertyFeatureRow>(&format!(
            "SELECT {FEATURE_COLUMNS} FROM property_features WHERE property_id = $1"
        ))
        .bind(property_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Explicit serialize-before-write step followed by a single-row upsert.
    pub async fn upsert<'e>(
        db: impl PgExecutor<'e>,
        property_id: i64,
        bundle: &FeatureBundle,
    ) -> anyhow::Result<PropertyFeatureRow> {
        let amenities = serde_json::to_value(&bundle.amenities)?;
        let security = serde_json::to_value(&bundle.security)?;
        let technology = serde_json::to_value(&bundle.technology)?;
        let luxury = serde_json::to_value(&bundle.luxury)?;
        let community = serde_json::to_value(&bundle.community)?;
        let utils = serde_json::to_value(&bundle.utils)?;
        let energy = serde_json::to_value(&bundle.energy)?;

        let row = sqlx::query_as::<_, PropertyFeatureRow>(&format!(
            "INSERT INTO property_features \
             (property_id, features, amenities, security_feature, technology_feature, \
              luxury_feature, community_feature, utils_feature, energy_feature) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (property_id) DO UPDATE SET \
               features = EXCLUDED.features, \
               amenities = EXCLUDED.amenities, \
               security_feature = EXCLUDED.security_feature, \
               technology_feature = EXCLUDED.technology_feature, \
               luxury_feature = EXCLUDED.luxury_feature, \
               community_feature = EXCLUDED.community_feature, \
               utils_feature = EXCLUDED.utils_feature, \
               energy_feature = EXCLUDED.energy_feature, \
               updated_at = now() \
             RETURNING {FEATURE_COLUMNS}"
        ))
        .bind(property_id)
        .bind(&bundle.features)
        .bind(amenities)
        .bind(security)
        .bind(technology)
        .bind(luxury)
        .bind(community)
        .bind(utils)
        .bind(energy)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete<'e>(db: impl PgExecutor<'e>, property_id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM property_features WHERE property_id = $1")
            .bind(property_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
