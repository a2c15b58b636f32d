use sqlx::{Postgres, QueryBuilder};

/// A bindable filter value. Owned so a [`FilterSet`] can be applied to more
/// than one builder (count query, then page query).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl Value {
    fn bind_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Value::Int(v) => qb.push_bind(*v),
            Value::Float(v) => qb.push_bind(*v),
            Value::Text(v) => qb.push_bind(v.clone()),
            Value::Bool(v) => qb.push_bind(*v),
        };
    }
}

/// One declarative filter condition. A condition whose value is absent emits
/// nothing: absence means "do not filter".
///
/// Column names and comparison operators must come from static code, never
/// from user input; only values are bound as parameters.
#[derive(Debug, Clone)]
pub enum Filter {
    /// `column = value`
    Eq(&'static str, Option<Value>),
    /// `column ILIKE '%value%'`; also skipped when the string is empty.
    Contains(&'static str, Option<String>),
    /// `column IN (...)`; skipped when the list is absent or empty.
    In(&'static str, Option<Vec<Value>>),
    /// `column <op> value` for an arbitrary static operator (`>=`, `<=`, ...).
    Cmp(&'static str, &'static str, Option<Value>),
    /// Parenthesized OR group, usable inside the AND chain without leaking
    /// into sibling conditions.
    Or(Vec<Filter>),
}

impl Filter {
    fn is_present(&self) -> bool {
        match self {
            Filter::Eq(_, v) => v.is_some(),
            Filter::Contains(_, s) => s.as_deref().is_some_and(|s| !s.is_empty()),
            Filter::In(_, vs) => vs.as_deref().is_some_and(|vs| !vs.is_empty()),
            Filter::Cmp(_, _, v) => v.is_some(),
            Filter::Or(children) => children.iter().any(Filter::is_present),
        }
    }

    /// Pushes the bare predicate, without a leading `AND`/`OR`. Must only be
    /// called when `is_present()` holds.
    fn push_predicate(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Filter::Eq(column, Some(value)) => {
                qb.push(*column).push(" = ");
                value.bind_to(qb);
            }
            Filter::Contains(column, Some(needle)) => {
                qb.push(*column).push(" ILIKE ");
                qb.push_bind(format!("%{needle}%"));
            }
            Filter::In(column, Some(values)) => {
                qb.push(*column).push(" IN (");
                {
                    let mut separated = qb.separated(", ");
                    for value in values {
                        match value {
                            Value::Int(v) => separated.push_bind(*v),
                            Value::Float(v) => separated.push_bind(*v),
                            Value::Text(v) => separated.push_bind(v.clone()),
                            Value::Bool(v) => separated.push_bind(*v),
                        };
                    }
                }
                qb.push(")");
            }
            Filter::Cmp(column, op, Some(value)) => {
                qb.push(*column).push(" ").push(*op).push(" ");
                value.bind_to(qb);
            }
            Filter::Or(children) => {
                qb.push("(");
                let mut first = true;
                for child in children.iter().filter(|c| c.is_present()) {
                    if !first {
                        qb.push(" OR ");
                    }
                    first = false;
                    child.push_predicate(qb);
                }
                qb.push(")");
            }
            // absent values are filtered out by the caller
            _ => {}
        }
    }
}

/// An ordered set of filter conditions, conjoined with `AND` onto a base
/// query. The base query must already contain a `WHERE` clause (`WHERE 1=1`
/// when there is no mandatory predicate).
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Folds every present condition onto the builder in insertion order.
    /// With no present conditions the builder is left untouched.
    pub fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for filter in self.filters.iter().filter(|f| f.is_present()) {
            qb.push(" AND ");
            filter.push_predicate(qb);
        }
    }
}

/// Returns a safe `ORDER BY` expression. `allowed` maps request-facing field
/// names to actual columns; unknown fields fall back to `default_field` (a
/// key of the map), unknown directions to `ASC`.
pub fn sort_clause(
    requested_field: Option<&str>,
    requested_dir: Option<&str>,
    allowed: &[(&str, &str)],
    default_field: &str,
) -> String {
    let column = requested_field
        .and_then(|field| {
            allowed
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, column)| *column)
        })
        .unwrap_or_else(|| {
            allowed
                .iter()
                .find(|(name, _)| *name == default_field)
                .map(|(_, column)| *column)
                .unwrap_or(default_field)
        });

    let dir = match requested_dir {
        Some(d) if d.eq_ignore_ascii_case("desc") => "DESC",
        _ => "ASC",
    };

    format!("{column} {dir}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT id FROM things WHERE 1=1";

    fn sql_for(set: &FilterSet) -> String {
        let mut qb = QueryBuilder::<Postgres>::new(BASE);
        set.apply(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn no_present_values_leaves_base_query_untouched() {
        let set = FilterSet::new()
            .with(Filter::Eq("status", None))
            .with(Filter::Contains("name", None))
            .with(Filter::Contains("code", Some(String::new())))
            .with(Filter::In("id", None))
            .with(Filter::In("id", Some(vec![])))
            .with(Filter::Cmp("price", ">=", None))
            .with(Filter::Or(vec![Filter::Eq("a", None)]));
        assert_eq!(sql_for(&set), BASE);
    }

    #[test]
    fn conditions_conjoin_in_insertion_order() {
        let set = FilterSet::new()
            .with(Filter::Eq("status", Some("active".into())))
            .with(Filter::Cmp("price", ">=", Some(100.0.into())))
            .with(Filter::Eq("purpose", None))
            .with(Filter::Cmp("price", "<=", Some(500.0.into())));
        assert_eq!(
            sql_for(&set),
            format!("{BASE} AND status = $1 AND price >= $2 AND price <= $3")
        );
    }

    #[test]
    fn contains_wraps_value_in_wildcards() {
        let set = FilterSet::new().with(Filter::Contains("name", Some("dha".into())));
        let mut qb = QueryBuilder::<Postgres>::new(BASE);
        set.apply(&mut qb);
        assert_eq!(qb.sql(), format!("{BASE} AND name ILIKE $1"));
    }

    #[test]
    fn in_emits_set_membership() {
        let set = FilterSet::new().with(Filter::In(
            "id",
            Some(vec![1i64.into(), 2i64.into(), 3i64.into()]),
        ));
        assert_eq!(sql_for(&set), format!("{BASE} AND id IN ($1, $2, $3)"));
    }

    #[test]
    fn or_group_is_parenthesized_and_scoped() {
        let set = FilterSet::new()
            .with(Filter::Eq("role", Some("owner".into())))
            .with(Filter::Or(vec![
                Filter::Contains("first_name", Some("jo".into())),
                Filter::Contains("last_name", Some("jo".into())),
                Filter::Contains("email", None),
            ]));
        assert_eq!(
            sql_for(&set),
            format!("{BASE} AND role = $1 AND (first_name ILIKE $2 OR last_name ILIKE $3)")
        );
    }

    const USER_SORTS: &[(&str, &str)] = &[
        ("id", "u.id"),
        ("first_name", "u.first_name"),
        ("email", "u.email"),
    ];

    #[test]
    fn unknown_sort_field_falls_back_to_default() {
        let clause = sort_clause(
            Some("password_hash; DROP TABLE users"),
            None,
            USER_SORTS,
            "first_name",
        );
        assert_eq!(clause, "u.first_name ASC");
    }

    #[test]
    fn sort_direction_is_case_insensitive_with_asc_fallback() {
        assert_eq!(
            sort_clause(Some("email"), Some("DESC"), USER_SORTS, "first_name"),
            "u.email DESC"
        );
        assert_eq!(
            sort_clause(Some("email"), Some("desc"), USER_SORTS, "first_name"),
            "u.email DESC"
        );
        assert_eq!(
            sort_clause(Some("email"), Some("sideways"), USER_SORTS, "first_name"),
            "u.email ASC"
        );
        assert_eq!(
            sort_clause(None, None, USER_SORTS, "first_name"),
            "u.first_name ASC"
        );
    }
}
