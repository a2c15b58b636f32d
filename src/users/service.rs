use sqlx::{FromRow, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::auth::repo::{
    ROLE_ADMIN, ROLE_CUSTOMER, ROLE_OWNER, STATUS_ACTIVE, STATUS_INACTIVE, STATUS_SUSPENDED,
};
use crate::error::AppError;
use crate::filter::{sort_clause, Filter, FilterSet};
use crate::pagination::{Page, PageParams};
use crate::state::AppState;
use crate::users::dto::{ProfileSummary, UserDetail, UserFilter};

/// Request-facing sort fields mapped to their columns.
const USER_SORT_FIELDS: &[(&str, &str)] = &[
    ("id", "u.id"),
    ("first_name", "u.first_name"),
    ("last_name", "u.last_name"),
    ("email", "u.email"),
    ("joined_at", "u.joined_at"),
    ("status", "u.status"),
];

const DEFAULT_SORT_FIELD: &str = "first_name";

/// Enum-like columns only accept their known values; anything else degrades
/// to "no filter".
fn known(value: &Option<String>, allowed: &[&str]) -> Option<crate::filter::Value> {
    value
        .as_deref()
        .filter(|s| allowed.contains(s))
        .map(|s| s.into())
}

pub(crate) fn user_filters(filter: &UserFilter) -> FilterSet {
    let mut set = FilterSet::new()
        .with(Filter::Eq(
            "u.role",
            known(&filter.role, &[ROLE_ADMIN, ROLE_OWNER, ROLE_CUSTOMER]),
        ))
        .with(Filter::Eq(
            "u.status",
            known(
                &filter.status,
                &[STATUS_ACTIVE, STATUS_INACTIVE, STATUS_SUSPENDED],
            ),
        ))
        .with(Filter::Eq(
            "u.email_verified",
            filter.email_verified.map(Into::into),
        ));

    // Free-text search is an OR group over name and email.
    if let Some(search) = filter.search.clone() {
        set.push(Filter::Or(vec![
            Filter::Contains("u.first_name", Some(search.clone())),
            Filter::Contains("u.last_name", Some(search.clone())),
            Filter::Contains("u.email", Some(search)),
        ]));
    }
    set
}

#[derive(Debug, FromRow)]
struct UserDirectoryRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    role: String,
    status: String,
    is_superuser: bool,
    email_verified: bool,
    joined_at: OffsetDateTime,
    last_login_at: Option<OffsetDateTime>,
    phone_number: Option<String>,
    company_name: Option<String>,
    website: Option<String>,
}

const DIRECTORY_SELECT: &str = "SELECT u.id, u.first_name, u.last_name, u.email, u.role, u.status, \
     u.is_superuser, u.email_verified, u.joined_at, u.last_login_at, \
     p.phone_number, p.company_name, p.website \
     FROM users u \
     LEFT JOIN owner_profiles p ON p.user_id = u.id \
     WHERE 1=1";

pub async fn list_users(
    state: &AppState,
    filter: UserFilter,
    params: PageParams,
) -> Result<Page<UserDetail>, AppError> {
    let filters = user_filters(&filter);

    let mut count_qb =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u WHERE 1=1");
    filters.apply(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    let order = sort_clause(
        filter.sort_by.as_deref(),
        filter.sort_order.as_deref(),
        USER_SORT_FIELDS,
        DEFAULT_SORT_FIELD,
    );

    let mut qb = QueryBuilder::<Postgres>::new(DIRECTORY_SELECT);
    filters.apply(&mut qb);
    qb.push(" ORDER BY ");
    qb.push(order);
    qb.push(" LIMIT ");
    qb.push_bind(params.limit());
    qb.push(" OFFSET ");
    qb.push_bind(params.offset());

    let rows: Vec<UserDirectoryRow> = qb.build_query_as().fetch_all(&state.db).await?;

    let data = rows
        .into_iter()
        .map(|row| UserDetail {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role: row.role,
            status: row.status,
            is_superuser: row.is_superuser,
            email_verified: row.email_verified,
            joined_at: row.joined_at,
            last_login_at: row.last_login_at,
            profile: match row.phone_number {
                Some(phone_number) => ProfileSummary {
                    phone_number,
                    company_name: row.company_name,
                    website: row.website,
                },
                None => ProfileSummary::default(),
            },
        })
        .collect();

    Ok(Page::new(data, total, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_with(filter: &UserFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u WHERE 1=1");
        user_filters(filter).apply(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn empty_filter_emits_no_predicates() {
        assert_eq!(
            sql_with(&UserFilter::default()),
            "SELECT COUNT(*) FROM users u WHERE 1=1"
        );
    }

    #[test]
    fn search_is_or_combined_over_name_and_email() {
        let filter = UserFilter {
            role: Some("owner".into()),
            search: Some("rahim".into()),
            ..Default::default()
        };
        assert_eq!(
            sql_with(&filter),
            "SELECT COUNT(*) FROM users u WHERE 1=1 AND u.role = $1 \
             AND (u.first_name ILIKE $2 OR u.last_name ILIKE $3 OR u.email ILIKE $4)"
        );
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let filter = UserFilter {
            role: Some(String::new()),
            status: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            sql_with(&filter),
            "SELECT COUNT(*) FROM users u WHERE 1=1"
        );
    }

    #[test]
    fn sort_field_outside_allow_list_uses_default() {
        let order = sort_clause(
            Some("password_hash"),
            Some("desc"),
            USER_SORT_FIELDS,
            DEFAULT_SORT_FIELD,
        );
        assert_eq!(order, "u.first_name DESC");
    }
}
