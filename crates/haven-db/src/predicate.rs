//! Search predicate compiler.
//!
//! Turns a validated [`SearchFilter`] into an ordered list of [`Predicate`]s
//! and renders them as a parameterized SQL `WHERE` fragment.
//!
//! # Query shape
//!
//! Fragments reference the aliases of the listing query:
//! `property p JOIN location l ON p.location_id = l.id`.
//!
//! # Guarantees
//!
//! 1. **Conjunctive**: fragments are joined with `AND` only.
//! 2. **Ordered**: one predicate per constrained field, in the field order of
//!    [`SearchFilter`].
//! 3. **Parameterized**: every user-supplied value is a bound `$n`
//!    parameter; fragment text is built from constants and placeholder
//!    indices only.
//! 4. **Total**: compilation never fails; an empty set matches every row.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

use haven_core::defaults::POINT_SRID;
use haven_core::geo::search_radius_degrees;
use haven_core::{PropertyType, SearchFilter};

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Integer parameter.
    Int(i32),
    /// Array of integers (for ANY operations).
    IntArray(Vec<i32>),
    /// Double-precision parameter.
    Float(f64),
    /// Text parameter.
    Text(String),
    /// Array of text (for containment operations).
    TextArray(Vec<String>),
    /// Timestamp parameter.
    Timestamp(DateTime<Utc>),
}

/// One compiled filter fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Property id is one of the given ids.
    IdIn(Vec<i32>),
    PriceAtLeast(f64),
    PriceAtMost(f64),
    BedsAtLeast(i32),
    BathsAtLeast(f64),
    SquareFeetAtLeast(i32),
    SquareFeetAtMost(i32),
    /// Category equality against the `property_type` enum.
    PropertyTypeIs(PropertyType),
    /// Property amenity set is a superset of the given set.
    AmenitiesContain(Vec<String>),
    /// Some lease on the property starts on or before the instant.
    ///
    /// This is "a lease has already started by then", not "vacant from
    /// then on". Kept literal until the intended meaning is settled.
    LeaseStartedBy(DateTime<Utc>),
    /// Location point lies within `degrees` of the center (planar distance
    /// in degree space).
    WithinRadius {
        longitude: f64,
        latitude: f64,
        degrees: f64,
    },
}

impl Predicate {
    /// Bound parameters, in placeholder order.
    pub fn params(&self) -> Vec<QueryParam> {
        match self {
            Predicate::IdIn(ids) => vec![QueryParam::IntArray(ids.clone())],
            Predicate::PriceAtLeast(v)
            | Predicate::PriceAtMost(v)
            | Predicate::BathsAtLeast(v) => vec![QueryParam::Float(*v)],
            Predicate::BedsAtLeast(v)
            | Predicate::SquareFeetAtLeast(v)
            | Predicate::SquareFeetAtMost(v) => vec![QueryParam::Int(*v)],
            Predicate::PropertyTypeIs(t) => vec![QueryParam::Text(t.as_str().to_string())],
            Predicate::AmenitiesContain(items) => vec![QueryParam::TextArray(items.clone())],
            Predicate::LeaseStartedBy(ts) => vec![QueryParam::Timestamp(*ts)],
            Predicate::WithinRadius {
                longitude,
                latitude,
                degrees,
            } => vec![
                QueryParam::Float(*longitude),
                QueryParam::Float(*latitude),
                QueryParam::Float(*degrees),
            ],
        }
    }

    /// SQL fragment whose first placeholder is `$first`.
    fn render(&self, first: usize) -> String {
        match self {
            Predicate::IdIn(_) => format!("p.id = ANY(${first}::int4[])"),
            Predicate::PriceAtLeast(_) => format!("p.price_per_month >= ${first}::float8"),
            Predicate::PriceAtMost(_) => format!("p.price_per_month <= ${first}::float8"),
            Predicate::BedsAtLeast(_) => format!("p.beds >= ${first}::int4"),
            Predicate::BathsAtLeast(_) => format!("p.baths >= ${first}::float8"),
            Predicate::SquareFeetAtLeast(_) => format!("p.square_feet >= ${first}::int4"),
            Predicate::SquareFeetAtMost(_) => format!("p.square_feet <= ${first}::int4"),
            Predicate::PropertyTypeIs(_) => {
                format!("p.property_type = ${first}::property_type")
            }
            Predicate::AmenitiesContain(_) => format!("p.amenities @> ${first}::text[]"),
            Predicate::LeaseStartedBy(_) => format!(
                "EXISTS (SELECT 1 FROM lease le WHERE le.property_id = p.id AND le.start_date <= ${first}::timestamptz)"
            ),
            Predicate::WithinRadius { .. } => format!(
                "ST_DWithin(l.coordinates::geometry, ST_SetSRID(ST_MakePoint(${}::float8, ${}::float8), {}), ${}::float8)",
                first,
                first + 1,
                POINT_SRID,
                first + 2
            ),
        }
    }
}

/// Ordered conjunction of predicates. Empty means "match all rows".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
}

/// A rendered predicate set.
#[derive(Debug, Clone)]
pub struct CompiledPredicates {
    /// The WHERE clause fragment (without the "WHERE" keyword).
    pub where_clause: String,
    /// Query parameters in the order they appear in the SQL.
    pub params: Vec<QueryParam>,
}

impl PredicateSet {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }

    /// Render as a WHERE fragment.
    ///
    /// `param_offset` is the number of parameters already bound ahead of
    /// this fragment in the enclosing query. An empty set renders `TRUE`.
    pub fn build(&self, param_offset: usize) -> CompiledPredicates {
        let mut clauses = Vec::with_capacity(self.predicates.len());
        let mut params = Vec::new();
        let mut param_idx = param_offset;

        for predicate in &self.predicates {
            let bound = predicate.params();
            clauses.push(predicate.render(param_idx + 1));
            param_idx += bound.len();
            params.extend(bound);
        }

        let where_clause = if clauses.is_empty() {
            "TRUE".to_string()
        } else {
            clauses.join(" AND ")
        };

        CompiledPredicates {
            where_clause,
            params,
        }
    }
}

/// Compiles search filters into predicate sets.
pub struct PredicateCompiler;

impl PredicateCompiler {
    /// Emit one predicate per constrained field, in declaration order.
    pub fn compile(filter: &SearchFilter) -> PredicateSet {
        let mut predicates = Vec::new();

        if let Some(ids) = &filter.favorite_ids {
            predicates.push(Predicate::IdIn(ids.clone()));
        }
        if let Some(v) = filter.price_min {
            predicates.push(Predicate::PriceAtLeast(v));
        }
        if let Some(v) = filter.price_max {
            predicates.push(Predicate::PriceAtMost(v));
        }
        if let Some(v) = filter.beds {
            predicates.push(Predicate::BedsAtLeast(v));
        }
        if let Some(v) = filter.baths {
            predicates.push(Predicate::BathsAtLeast(v));
        }
        if let Some(v) = filter.square_feet_min {
            predicates.push(Predicate::SquareFeetAtLeast(v));
        }
        if let Some(v) = filter.square_feet_max {
            predicates.push(Predicate::SquareFeetAtMost(v));
        }
        if let Some(t) = filter.property_type {
            predicates.push(Predicate::PropertyTypeIs(t));
        }
        if let Some(items) = &filter.amenities {
            predicates.push(Predicate::AmenitiesContain(items.clone()));
        }
        if let Some(ts) = filter.available_from {
            predicates.push(Predicate::LeaseStartedBy(ts));
        }
        if let Some(center) = filter.center {
            predicates.push(Predicate::WithinRadius {
                longitude: center.longitude,
                latitude: center.latitude,
                degrees: search_radius_degrees(),
            });
        }

        PredicateSet { predicates }
    }
}

/// Bind compiled parameters onto a query, in order.
pub fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [QueryParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            QueryParam::Int(v) => query.bind(*v),
            QueryParam::IntArray(v) => query.bind(v),
            QueryParam::Float(v) => query.bind(*v),
            QueryParam::Text(v) => query.bind(v),
            QueryParam::TextArray(v) => query.bind(v),
            QueryParam::Timestamp(v) => query.bind(*v),
        };
    }
    query
}
