use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Deserialize, JsonSchema)]
pub struct GetCountriesInput {
    /// Partial match on country name
    pub name: Option<String>,
    /// Exact ISO 3166-1 alpha-2 code
    pub iso2: Option<String>,
    /// Exact ISO 3166-1 alpha-3 code
    pub iso3: Option<String>,
    /// Partial match on capital city
    pub capital: Option<String>,
    /// Exact currency code (e.g. EUR)
    pub currency: Option<String>,
    /// Max results (default: 100)
    pub limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub struct SearchCountriesInput {
    /// Partial match on country name (required)
    pub name: String,
    /// Max results (default: 10)
    pub limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetCountryByCodeInput {
    /// ISO2 or ISO3 country code
    pub code: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetCountriesByRegionInput {
    /// Region name, matched exactly (e.g. Europe)
    pub region: String,
    /// Max results (default: 100)
    pub limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetCountriesByCurrencyInput {
    /// Currency code, matched exactly
    pub currency: String,
    /// Max results (default: 100)
    pub limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetCitiesInCountryInput {
    /// ISO2 country code
    pub country_code: String,
    /// Partial match on city name
    pub name: Option<String>,
    /// Max results (default: 100)
    pub limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub struct SearchCitiesInput {
    /// Partial match on city name (required)
    pub name: String,
    /// Restrict to one ISO2 country code
    pub country_code: Option<String>,
    /// Max results (default: 10)
    pub limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetStatesInCountryInput {
    /// ISO2 country code
    pub country_code: String,
    /// Max results (default: 100)
    pub limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetTopChattersInput {
    /// Max results (default: 10)
    pub limit: Option<i64>,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetRandomNameInput {
    /// Candidate names; a built-in list is used when omitted or empty
    pub names: Option<Vec<String>>,
}

#[derive(Deserialize, JsonSchema)]
pub struct CalculateDistanceInput {
    /// First point as [x, y]
    pub point1: [f64; 2],
    /// Second point as [x, y]
    pub point2: [f64; 2],
}
