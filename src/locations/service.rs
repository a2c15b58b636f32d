use tracing::info;

use crate::error::AppError;
use crate::locations::dto::{
    CountryRef, CountryRequest, CountryResponse, CountryUpdateRequest, DistrictRequest,
    DistrictResponse, DistrictUpdateRequest, DivisionRef, DivisionRequest, DivisionResponse,
    DivisionUpdateRequest, PublicCountry, PublicDistrict, PublicDivision,
};
use crate::locations::repo::{Country, District, Division};
use crate::pagination::{Page, PageParams};
use crate::state::AppState;

// --- countries ---

pub async fn create_country(
    state: &AppState,
    request: CountryRequest,
) -> Result<CountryResponse, AppError> {
    if request.name.trim().is_empty() || request.code.trim().is_empty() {
        return Err(AppError::validation("Name and code are required"));
    }

    if Country::code_taken(&state.db, &request.code, None).await? {
        return Err(AppError::conflict("Country with this code already exists"));
    }

    let country = Country::insert(&state.db, request.name.trim(), request.code.trim()).await?;
    info!(country_id = %country.id, "country created");

    Ok(CountryResponse {
        id: country.id,
        name: country.name,
        code: country.code,
        status: country.status,
        divisions: 0,
    })
}

pub async fn list_countries(
    state: &AppState,
    params: PageParams,
) -> Result<Page<CountryResponse>, AppError> {
    let total = Country::count(&state.db).await?;
    let rows = Country::list_page(&state.db, params.limit(), params.offset()).await?;

    let data = rows
        .into_iter()
        .map(|row| CountryResponse {
            id: row.id,
            name: row.name,
            code: row.code,
            status: row.status,
            divisions: row.divisions,
        })
        .collect();

    Ok(Page::new(data, total, params))
}

pub async fn update_country(
    state: &AppState,
    id: i64,
    request: CountryUpdateRequest,
) -> Result<CountryResponse, AppError> {
    let country = Country::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;

    if country.code != request.code
        && Country::code_taken(&state.db, &request.code, Some(id)).await?
    {
        return Err(AppError::conflict("Country with this code already exists"));
    }

    let updated = Country::update(
        &state.db,
        id,
        request.name.trim(),
        request.code.trim(),
        request.status,
    )
    .await?;
    let divisions = Country::division_count(&state.db, id).await?;

    Ok(CountryResponse {
        id: updated.id,
        name: updated.name,
        code: updated.code,
        status: updated.status,
        divisions,
    })
}

pub async fn delete_country(state: &AppState, id: i64) -> Result<(), AppError> {
    Country::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;

    if Country::division_count(&state.db, id).await? > 0 {
        return Err(AppError::conflict(
            "Cannot delete country with associated divisions",
        ));
    }

    Country::delete(&state.db, id).await?;
    info!(country_id = %id, "country deleted");
    Ok(())
}

// --- divisions ---

pub async fn create_division(
    state: &AppState,
    request: DivisionRequest,
) -> Result<DivisionResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::validation("Name is required"));
    }

    let country = Country::find_by_id(&state.db, request.country_id)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;

    let division = Division::insert(&state.db, request.name.trim(), country.id).await?;
    info!(division_id = %division.id, "division created");

    Ok(DivisionResponse {
        id: division.id,
        name: division.name,
        country: CountryRef {
            id: country.id,
            name: country.name,
        },
        status: division.status,
        districts: 0,
    })
}

pub async fn list_divisions(
    state: &AppState,
    params: PageParams,
) -> Result<Page<DivisionResponse>, AppError> {
    let total = Division::count(&state.db).await?;
    let rows = Division::list_page(&state.db, params.limit(), params.offset()).await?;

    let data = rows
        .into_iter()
        .map(|row| DivisionResponse {
            id: row.id,
            name: row.name,
            country: CountryRef {
                id: row.country_id,
                name: row.country_name,
            },
            status: row.status,
            districts: row.districts,
        })
        .collect();

    Ok(Page::new(data, total, params))
}

pub async fn update_division(
    state: &AppState,
    id: i64,
    request: DivisionUpdateRequest,
) -> Result<DivisionResponse, AppError> {
    let division = Division::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Division not found"))?;

    let country = if request.country_id != division.country_id {
        Country::find_by_id(&state.db, request.country_id)
            .await?
            .ok_or_else(|| AppError::not_found("New country not found"))?
    } else {
        Country::find_by_id(&state.db, division.country_id)
            .await?
            .ok_or_else(|| AppError::not_found("Country not found"))?
    };

    let updated = Division::update(
        &state.db,
        id,
        request.name.trim(),
        country.id,
        request.status,
    )
    .await?;
    let districts = Division::district_count(&state.db, id).await?;

    Ok(DivisionResponse {
        id: updated.id,
        name: updated.name,
        country: CountryRef {
            id: country.id,
            name: country.name,
        },
        status: updated.status,
        districts,
    })
}

pub async fn delete_division(state: &AppState, id: i64) -> Result<(), AppError> {
    Division::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Division not found"))?;

    if Division::district_count(&state.db, id).await? > 0 {
        return Err(AppError::conflict(
            "Cannot delete division with associated districts",
        ));
    }

    Division::delete(&state.db, id).await?;
    info!(division_id = %id, "division deleted");
    Ok(())
}

// --- districts ---

pub async fn create_district(
    state: &AppState,
    request: DistrictRequest,
) -> Result<DistrictResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::validation("Name is required"));
    }

    let division = Division::find_by_id(&state.db, request.division_id)
        .await?
        .ok_or_else(|| AppError::not_found("Division not found"))?;
    let country = Country::find_by_id(&state.db, division.country_id)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;

    // The district's country is inherited from its division.
    let district = District::insert(&state.db, request.name.trim(), division.id, country.id).await?;
    info!(district_id = %district.id, "district created");

    Ok(DistrictResponse {
        id: district.id,
        name: district.name,
        division: DivisionRef {
            id: division.id,
            name: division.name,
        },
        country: CountryRef {
            id: country.id,
            name: country.name,
        },
        status: district.status,
    })
}

pub async fn list_districts(
    state: &AppState,
    params: PageParams,
) -> Result<Page<DistrictResponse>, AppError> {
    let total = District::count(&state.db).await?;
    let rows = District::list_page(&state.db, params.limit(), params.offset()).await?;

    let data = rows
        .into_iter()
        .map(|row| DistrictResponse {
            id: row.id,
            name: row.name,
            division: DivisionRef {
                id: row.division_id,
                name: row.division_name,
            },
            country: CountryRef {
                id: row.country_id,
                name: row.country_name,
            },
            status: row.status,
        })
        .collect();

    Ok(Page::new(data, total, params))
}

pub async fn update_district(
    state: &AppState,
    id: i64,
    request: DistrictUpdateRequest,
) -> Result<DistrictResponse, AppError> {
    let district = District::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("District not found"))?;

    let division = if request.division_id != district.division_id {
        Division::find_by_id(&state.db, request.division_id)
            .await?
            .ok_or_else(|| AppError::not_found("New division not found"))?
    } else {
        Division::find_by_id(&state.db, district.division_id)
            .await?
            .ok_or_else(|| AppError::not_found("Division not found"))?
    };
    let country = Country::find_by_id(&state.db, division.country_id)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;

    let updated = District::update(
        &state.db,
        id,
        request.name.trim(),
        division.id,
        country.id,
        request.status,
    )
    .await?;

    Ok(DistrictResponse {
        id: updated.id,
        name: updated.name,
        division: DivisionRef {
            id: division.id,
            name: division.name,
        },
        country: CountryRef {
            id: country.id,
            name: country.name,
        },
        status: updated.status,
    })
}

pub async fn delete_district(state: &AppState, id: i64) -> Result<(), AppError> {
    District::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("District not found"))?;

    District::delete(&state.db, id).await?;
    info!(district_id = %id, "district deleted");
    Ok(())
}

// --- public read paths (active rows, reduced fields) ---

pub async fn public_countries(
    state: &AppState,
    params: PageParams,
) -> Result<Page<PublicCountry>, AppError> {
    let total = Country::count_active(&state.db).await?;
    let rows = Country::list_active_page(&state.db, params.limit(), params.offset()).await?;

    let data = rows
        .into_iter()
        .map(|c| PublicCountry {
            id: c.id,
            name: c.name,
            code: c.code,
        })
        .collect();

    Ok(Page::new(data, total, params))
}

pub async fn public_divisions(
    state: &AppState,
    country_id: i64,
    params: PageParams,
) -> Result<Page<PublicDivision>, AppError> {
    Country::find_active(&state.db, country_id)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;

    let total = Division::count_active_in(&state.db, country_id).await?;
    let rows =
        Division::list_active_in(&state.db, country_id, params.limit(), params.offset()).await?;

    let data = rows
        .into_iter()
        .map(|d| PublicDivision {
            id: d.id,
            name: d.name,
        })
        .collect();

    Ok(Page::new(data, total, params))
}

pub async fn public_districts(
    state: &AppState,
    division_id: i64,
    params: PageParams,
) -> Result<Page<PublicDistrict>, AppError> {
    Division::find_active(&state.db, division_id)
        .await?
        .ok_or_else(|| AppError::not_found("Division not found"))?;

    let total = District::count_active_in(&state.db, division_id).await?;
    let rows =
        District::list_active_in(&state.db, division_id, params.limit(), params.offset()).await?;

    let data = rows
        .into_iter()
        .map(|d| PublicDistrict {
            id: d.id,
            name: d.name,
        })
        .collect();

    Ok(Page::new(data, total, params))
}
