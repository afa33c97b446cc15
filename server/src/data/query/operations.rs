//! Lookup operation table
//!
//! Each lookup tool is a row here: dataset, table, projection, ordered
//! filter fields with their match policy, default limit and sort key.
//! Query construction is shared, so a field's policy cannot drift from
//! the SQL it produces.

use std::collections::BTreeMap;

use super::builder::{FilterSpec, Matcher, OrderBy, QueryPlan, build};
use crate::data::Dataset;
use crate::data::error::DataError;

/// Default limit for broad listings
pub const LIST_LIMIT: i64 = 100;

/// Default limit for search and narrow lookups
pub const SEARCH_LIMIT: i64 = 10;

/// A filterable argument of an operation
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub arg: &'static str,
    pub matcher: Matcher,
    pub required: bool,
}

impl Field {
    const fn optional(arg: &'static str, matcher: Matcher) -> Self {
        Self {
            arg,
            matcher,
            required: false,
        }
    }

    const fn required(arg: &'static str, matcher: Matcher) -> Self {
        Self {
            arg,
            matcher,
            required: true,
        }
    }
}

/// Result cardinality of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Zero or more records
    Many,
    /// At most one record; absent when nothing matches
    One,
}

#[derive(Debug)]
pub struct Operation {
    pub name: &'static str,
    pub dataset: Dataset,
    pub table: &'static str,
    /// Empty selects every column
    pub columns: &'static [&'static str],
    pub fields: &'static [Field],
    pub default_limit: i64,
    pub order_by: Option<OrderBy>,
    pub shape: Shape,
}

pub const GET_COUNTRIES: &str = "get_countries";
pub const SEARCH_COUNTRIES: &str = "search_countries";
pub const GET_COUNTRY_BY_CODE: &str = "get_country_by_code";
pub const GET_COUNTRIES_BY_REGION: &str = "get_countries_by_region";
pub const GET_COUNTRIES_BY_CURRENCY: &str = "get_countries_by_currency";
pub const GET_CITIES_IN_COUNTRY: &str = "get_cities_in_country";
pub const SEARCH_CITIES: &str = "search_cities";
pub const GET_STATES_IN_COUNTRY: &str = "get_states_in_country";
pub const GET_TOP_CHATTERS: &str = "get_top_chatters";

pub static OPERATIONS: &[Operation] = &[
    Operation {
        name: GET_COUNTRIES,
        dataset: Dataset::World,
        table: "countries",
        columns: &[],
        fields: &[
            Field::optional("name", Matcher::Contains("name")),
            Field::optional("iso2", Matcher::Exact("iso2")),
            Field::optional("iso3", Matcher::Exact("iso3")),
            Field::optional("capital", Matcher::Contains("capital")),
            Field::optional("currency", Matcher::Exact("currency")),
        ],
        default_limit: LIST_LIMIT,
        order_by: None,
        shape: Shape::Many,
    },
    Operation {
        name: SEARCH_COUNTRIES,
        dataset: Dataset::World,
        table: "countries",
        columns: &[],
        fields: &[Field::required("name", Matcher::Contains("name"))],
        default_limit: SEARCH_LIMIT,
        order_by: Some(OrderBy::asc("name")),
        shape: Shape::Many,
    },
    Operation {
        name: GET_COUNTRY_BY_CODE,
        dataset: Dataset::World,
        table: "countries",
        columns: &[],
        fields: &[Field::required(
            "code",
            Matcher::ExactEitherOf("iso2", "iso3"),
        )],
        default_limit: 1,
        order_by: None,
        shape: Shape::One,
    },
    Operation {
        name: GET_COUNTRIES_BY_REGION,
        dataset: Dataset::World,
        table: "countries",
        columns: &[],
        fields: &[Field::required("region", Matcher::Exact("region"))],
        default_limit: LIST_LIMIT,
        order_by: Some(OrderBy::asc("name")),
        shape: Shape::Many,
    },
    Operation {
        name: GET_COUNTRIES_BY_CURRENCY,
        dataset: Dataset::World,
        table: "countries",
        columns: &[],
        fields: &[Field::required("currency", Matcher::Exact("currency"))],
        default_limit: LIST_LIMIT,
        order_by: Some(OrderBy::asc("name")),
        shape: Shape::Many,
    },
    Operation {
        name: GET_CITIES_IN_COUNTRY,
        dataset: Dataset::World,
        table: "cities",
        columns: &[],
        fields: &[
            Field::required("country_code", Matcher::Exact("country_code")),
            Field::optional("name", Matcher::Contains("name")),
        ],
        default_limit: LIST_LIMIT,
        order_by: Some(OrderBy::asc("name")),
        shape: Shape::Many,
    },
    Operation {
        name: SEARCH_CITIES,
        dataset: Dataset::World,
        table: "cities",
        columns: &[],
        fields: &[
            Field::required("name", Matcher::Contains("name")),
            Field::optional("country_code", Matcher::Exact("country_code")),
        ],
        default_limit: SEARCH_LIMIT,
        order_by: Some(OrderBy::asc("name")),
        shape: Shape::Many,
    },
    Operation {
        name: GET_STATES_IN_COUNTRY,
        dataset: Dataset::World,
        table: "states",
        columns: &[],
        fields: &[Field::required(
            "country_code",
            Matcher::Exact("country_code"),
        )],
        default_limit: LIST_LIMIT,
        order_by: Some(OrderBy::asc("name")),
        shape: Shape::Many,
    },
    Operation {
        name: GET_TOP_CHATTERS,
        dataset: Dataset::Community,
        table: "chatters",
        columns: &["name", "messages"],
        fields: &[],
        default_limit: SEARCH_LIMIT,
        order_by: Some(OrderBy::desc("messages")),
        shape: Shape::Many,
    },
];

/// Look up an operation by tool name
pub fn find(name: &str) -> Result<&'static Operation, DataError> {
    OPERATIONS
        .iter()
        .find(|op| op.name == name)
        .ok_or_else(|| DataError::UnknownOperation(name.to_string()))
}

/// Named arguments for a lookup call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupArgs {
    values: BTreeMap<String, String>,
    limit: Option<i64>,
}

impl LookupArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter argument; `None` leaves it unset
    pub fn arg(mut self, name: &str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.values.insert(name.to_string(), value);
        }
        self
    }

    pub fn limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

impl Operation {
    /// Validate arguments and build the query for this operation.
    ///
    /// Fails with `InvalidInput` before anything reaches the store when a
    /// required argument is missing or blank, an argument is not declared
    /// by the operation, or the limit is not positive.
    pub fn plan(&self, args: &LookupArgs) -> Result<QueryPlan, DataError> {
        if let Some(unknown) = args
            .values
            .keys()
            .find(|key| !self.fields.iter().any(|f| f.arg == key.as_str()))
        {
            return Err(DataError::InvalidInput(format!(
                "{} does not accept argument '{}'",
                self.name, unknown
            )));
        }

        let mut filters = FilterSpec::new();
        for field in self.fields {
            let value = args.get(field.arg);
            if field.required && value.is_none() {
                return Err(DataError::InvalidInput(format!(
                    "{} requires a non-empty '{}'",
                    self.name, field.arg
                )));
            }
            filters.push(field.matcher, value.map(str::to_string));
        }

        let limit = match self.shape {
            Shape::One => 1,
            Shape::Many => args.limit.unwrap_or(self.default_limit),
        };

        build(self.table, self.columns, &filters, limit, self.order_by)
    }
}
