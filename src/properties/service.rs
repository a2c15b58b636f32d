use tracing::info;

use crate::error::AppError;
use crate::filter::{Filter, FilterSet};
use crate::locations::repo::{Country, District, Division};
use crate::pagination::{Page, PageParams};
use crate::properties::dto::{
    LocationRef, OwnerRef, PropertyDetails, PropertyFeatureResponse, PropertyFilter,
    PropertyListItem, PropertyPatch, PropertyRequest, PROPERTY_STATUS_ACTIVE,
    PROPERTY_STATUS_DRAFT, PROPERTY_STATUS_PENDING, PURPOSE_RENT, PURPOSE_SALE,
};
use crate::properties::features::FeatureBundle;
use crate::properties::repo::{NewProperty, Property, PropertyDetailRow, PropertyFeature};
use crate::state::AppState;

fn non_empty(value: &Option<String>) -> Option<crate::filter::Value> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s.into())
}

/// Enum-like columns only accept their known values; anything else degrades
/// to "no filter".
fn known(value: &Option<String>, allowed: &[&str]) -> Option<crate::filter::Value> {
    value
        .as_deref()
        .filter(|s| allowed.contains(s))
        .map(|s| s.into())
}

/// Declarative filter conditions for the owner's property list. Absent
/// values emit no predicate.
pub(crate) fn property_filters(filter: &PropertyFilter) -> FilterSet {
    FilterSet::new()
        .with(Filter::Eq(
            "p.purpose",
            known(&filter.purpose, &[PURPOSE_SALE, PURPOSE_RENT]),
        ))
        .with(Filter::Cmp(
            "p.price",
            ">=",
            filter.min_price.map(Into::into),
        ))
        .with(Filter::Cmp(
            "p.price",
            "<=",
            filter.max_price.map(Into::into),
        ))
        .with(Filter::Eq(
            "p.property_type",
            non_empty(&filter.property_type),
        ))
        .with(Filter::Cmp(
            "p.bedrooms",
            ">=",
            filter.bedrooms.map(|v| (v as i64).into()),
        ))
        .with(Filter::Cmp(
            "p.bathrooms",
            ">=",
            filter.bathrooms.map(|v| (v as i64).into()),
        ))
        .with(Filter::Cmp("p.size", ">=", filter.min_size.map(Into::into)))
        .with(Filter::Cmp("p.size", "<=", filter.max_size.map(Into::into)))
        .with(Filter::Eq("p.country_id", filter.country_id.map(Into::into)))
        .with(Filter::Eq(
            "p.division_id",
            filter.division_id.map(Into::into),
        ))
        .with(Filter::Eq(
            "p.district_id",
            filter.district_id.map(Into::into),
        ))
        .with(Filter::Eq(
            "p.status",
            known(
                &filter.status,
                &[
                    PROPERTY_STATUS_DRAFT,
                    PROPERTY_STATUS_PENDING,
                    PROPERTY_STATUS_ACTIVE,
                ],
            ),
        ))
}

fn to_list_item(row: PropertyDetailRow) -> PropertyListItem {
    PropertyListItem {
        id: row.id,
        title: row.title,
        purpose: row.purpose,
        price: row.price,
        property_type: row.property_type,
        status: row.status,
        address: row.address,
        country: LocationRef {
            id: row.country_id,
            name: row.country_name,
        },
        division: LocationRef {
            id: row.division_id,
            name: row.division_name,
        },
        district: LocationRef {
            id: row.district_id,
            name: row.district_name,
        },
        created_at: row.created_at,
    }
}

fn to_details(row: PropertyDetailRow) -> PropertyDetails {
    PropertyDetails {
        id: row.id,
        title: row.title,
        purpose: row.purpose,
        price: row.price,
        status: row.status,
        property_type: row.property_type,
        bedrooms: row.bedrooms,
        bathrooms: row.bathrooms,
        size: row.size,
        built_year: row.built_year,
        address: row.address,
        description: row.description,
        country: LocationRef {
            id: row.country_id,
            name: row.country_name,
        },
        division: LocationRef {
            id: row.division_id,
            name: row.division_name,
        },
        district: LocationRef {
            id: row.district_id,
            name: row.district_name,
        },
        owner: OwnerRef {
            id: row.owner_id,
            first_name: row.owner_first_name,
            last_name: row.owner_last_name,
            email: row.owner_email,
        },
        approved_at: row.approved_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub async fn get_properties(
    state: &AppState,
    owner_id: i64,
    filter: PropertyFilter,
    params: PageParams,
) -> Result<Page<PropertyListItem>, AppError> {
    let filters = property_filters(&filter);

    let total = Property::count_filtered(&state.db, owner_id, &filters).await?;
    let rows = Property::list_filtered(
        &state.db,
        owner_id,
        &filters,
        params.limit(),
        params.offset(),
    )
    .await?;

    let data = rows.into_iter().map(to_list_item).collect();
    Ok(Page::new(data, total, params))
}

fn validate_property_request(request: &PropertyRequest) -> Result<(), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if request.purpose != PURPOSE_SALE && request.purpose != PURPOSE_RENT {
        return Err(AppError::validation("Purpose must be sale or rent"));
    }
    if request.price <= 0.0 {
        return Err(AppError::validation("Price must be greater than zero"));
    }
    if request.size <= 0.0 {
        return Err(AppError::validation("Size must be greater than zero"));
    }
    if request.bedrooms < 0 || request.bathrooms < 0 {
        return Err(AppError::validation("Room counts cannot be negative"));
    }
    Ok(())
}

pub async fn create_property(
    state: &AppState,
    owner_id: i64,
    request: PropertyRequest,
) -> Result<PropertyDetails, AppError> {
    validate_property_request(&request)?;

    // The whole location hierarchy must exist before the insert.
    Country::find_by_id(&state.db, request.country_id)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;
    Division::find_by_id(&state.db, request.division_id)
        .await?
        .ok_or_else(|| AppError::not_found("Division not found"))?;
    District::find_by_id(&state.db, request.district_id)
        .await?
        .ok_or_else(|| AppError::not_found("District not found"))?;

    let mut tx = state.db.begin().await?;
    let id = Property::insert(
        &mut *tx,
        NewProperty {
            owner_id,
            title: request.title.trim(),
            purpose: &request.purpose,
            price: request.price,
            property_type: &request.property_type,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            size: request.size,
            built_year: request.built_year,
            country_id: request.country_id,
            division_id: request.division_id,
            district_id: request.district_id,
            address: request.address.trim(),
            description: &request.description,
        },
    )
    .await
    // The one place where underlying detail is deliberately surfaced.
    .map_err(|e| AppError::validation(format!("Property creation failed: {e}")))?;

    let row = Property::find_detail(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::internal(anyhow::anyhow!("created property {id} not readable")))?;
    tx.commit().await?;

    info!(property_id = %id, owner_id = %owner_id, "property created");
    Ok(to_details(row))
}

pub async fn get_property(
    state: &AppState,
    owner_id: i64,
    id: i64,
) -> Result<PropertyDetails, AppError> {
    let row = Property::find_detail_for_owner(&state.db, id, owner_id)
        .await?
        .ok_or_else(|| AppError::not_found("Property not found"))?;
    Ok(to_details(row))
}

pub async fn patch_property(
    state: &AppState,
    owner_id: i64,
    id: i64,
    patch: PropertyPatch,
) -> Result<PropertyDetails, AppError> {
    if let Some(purpose) = &patch.purpose {
        if purpose != PURPOSE_SALE && purpose != PURPOSE_RENT {
            return Err(AppError::validation("Purpose must be sale or rent"));
        }
    }
    if let Some(country_id) = patch.country_id {
        Country::find_by_id(&state.db, country_id)
            .await?
            .ok_or_else(|| AppError::not_found("Country not found"))?;
    }
    if let Some(division_id) = patch.division_id {
        Division::find_by_id(&state.db, division_id)
            .await?
            .ok_or_else(|| AppError::not_found("Division not found"))?;
    }
    if let Some(district_id) = patch.district_id {
        District::find_by_id(&state.db, district_id)
            .await?
            .ok_or_else(|| AppError::not_found("District not found"))?;
    }

    let updated = Property::apply_patch(&state.db, id, owner_id, &patch).await?;
    if !updated {
        return Err(AppError::not_found("Property not found"));
    }

    let row = Property::find_detail_for_owner(&state.db, id, owner_id)
        .await?
        .ok_or_else(|| AppError::not_found("Property not found"))?;
    Ok(to_details(row))
}

// --- features ---

async fn owned_property(state: &AppState, owner_id: i64, id: i64) -> Result<i64, AppError> {
    let row = Property::find_detail_for_owner(&state.db, id, owner_id)
        .await?
        .ok_or_else(|| AppError::not_found("Property not found"))?;
    Ok(row.id)
}

pub async fn upsert_features(
    state: &AppState,
    owner_id: i64,
    property_id: i64,
    bundle: FeatureBundle,
) -> Result<PropertyFeatureResponse, AppError> {
    let property_id = owned_property(state, owner_id, property_id).await?;

    let row = PropertyFeature::upsert(&state.db, property_id, &bundle).await?;
    let bundle = row.rehydrate().map_err(AppError::internal)?;

    info!(property_id = %property_id, "property features saved");
    Ok(PropertyFeatureResponse {
        id: row.id,
        property_id: row.property_id,
        bundle,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn get_features(
    state: &AppState,
    owner_id: i64,
    property_id: i64,
) -> Result<PropertyFeatureResponse, AppError> {
    let property_id = owned_property(state, owner_id, property_id).await?;

    let row = PropertyFeature::find_by_property(&state.db, property_id)
        .await?
        .ok_or_else(|| AppError::not_found("Property features not found"))?;
    let bundle = row.rehydrate().map_err(AppError::internal)?;

    Ok(PropertyFeatureResponse {
        id: row.id,
        property_id: row.property_id,
        bundle,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn delete_features(
    state: &AppState,
    owner_id: i64,
    property_id: i64,
) -> Result<(), AppError> {
    let property_id = owned_property(state, owner_id, property_id).await?;

    if !PropertyFeature::delete(&state.db, property_id).await? {
        return Err(AppError::not_found("Property features not found"));
    }
    info!(property_id = %property_id, "property features deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::{Postgres, QueryBuilder};

    fn sql_with(filter: &PropertyFilter) -> String {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM properties p WHERE p.owner_id = ");
        qb.push_bind(7i64);
        property_filters(filter).apply(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn empty_filter_restricts_only_by_owner() {
        let sql = sql_with(&PropertyFilter::default());
        assert_eq!(sql, "SELECT COUNT(*) FROM properties p WHERE p.owner_id = $1");
    }

    #[test]
    fn present_filters_emit_predicates_in_order() {
        let filter = PropertyFilter {
            purpose: Some("rent".into()),
            min_price: Some(1000.0),
            max_price: Some(5000.0),
            bedrooms: Some(2),
            country_id: Some(1),
            status: Some("active".into()),
            ..Default::default()
        };
        let sql = sql_with(&filter);
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM properties p WHERE p.owner_id = $1 \
             AND p.purpose = $2 AND p.price >= $3 AND p.price <= $4 \
             AND p.bedrooms >= $5 AND p.country_id = $6 AND p.status = $7"
        );
    }

    #[test]
    fn request_validation_rejects_bad_purpose_and_price() {
        let mut request = PropertyRequest {
            title: "Lakeside flat".into(),
            purpose: "lease".into(),
            price: 100.0,
            property_type: "apartment".into(),
            bedrooms: 2,
            bathrooms: 1,
            size: 120.0,
            built_year: Some(2015),
            country_id: 1,
            division_id: 1,
            district_id: 1,
            address: "12 Lake Road".into(),
            description: "Bright two-bedroom flat".into(),
        };
        assert!(validate_property_request(&request).is_err());

        request.purpose = "rent".into();
        assert!(validate_property_request(&request).is_ok());

        request.price = 0.0;
        assert!(validate_property_request(&request).is_err());
    }
}
