use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo, ToolsCapability,
};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};

use crate::data::query::operations::{
    GET_CITIES_IN_COUNTRY, GET_COUNTRIES, GET_COUNTRIES_BY_CURRENCY, GET_COUNTRIES_BY_REGION,
    GET_COUNTRY_BY_CODE, GET_STATES_IN_COUNTRY, GET_TOP_CHATTERS, SEARCH_CITIES,
    SEARCH_COUNTRIES,
};
use crate::data::{DataError, DatasetService, LookupArgs};
use crate::domain::utility;

use super::types::*;

type McpError = rmcp::model::ErrorData;

#[derive(Clone)]
pub struct GazetteerServer {
    datasets: Arc<DatasetService>,
    tool_router: ToolRouter<Self>,
}

impl GazetteerServer {
    pub fn new(datasets: Arc<DatasetService>) -> Self {
        Self {
            datasets,
            tool_router: Self::tool_router(),
        }
    }

    async fn lookup(&self, operation: &str, args: LookupArgs) -> Result<CallToolResult, McpError> {
        let result = self
            .datasets
            .run(operation, &args)
            .await
            .map_err(data_err)?;
        ok_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for GazetteerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "Gazetteer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

const INSTRUCTIONS: &str = r#"Gazetteer - look up countries, cities, states and community chatters from local reference datasets.

MATCHING:
- Names and capitals match partially (case-insensitive substring)
- Codes, currencies and regions match exactly
- All supplied filters must match (AND); omitted filters are ignored

TIPS:
- get_country_by_code accepts either ISO2 (FR) or ISO3 (FRA)
- get_countries with no filters lists every country up to the limit
- Use search_countries / search_cities for quick fuzzy lookups (limit 10)
- Results are JSON: an array of records, a single record, or null when nothing matched"#;

#[tool_router]
impl GazetteerServer {
    #[tool(
        description = "Get countries with optional filters. Name and capital match partially; iso2, iso3 and currency match exactly. With no filters, all countries are returned up to the limit (default 100)."
    )]
    async fn get_countries(
        &self,
        Parameters(input): Parameters<GetCountriesInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new()
            .arg("name", input.name)
            .arg("iso2", input.iso2)
            .arg("iso3", input.iso3)
            .arg("capital", input.capital)
            .arg("currency", input.currency)
            .limit(input.limit);
        self.lookup(GET_COUNTRIES, args).await
    }

    #[tool(description = "Search countries by partial name, sorted by name (default limit 10).")]
    async fn search_countries(
        &self,
        Parameters(input): Parameters<SearchCountriesInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new()
            .arg("name", Some(input.name))
            .limit(input.limit);
        self.lookup(SEARCH_COUNTRIES, args).await
    }

    #[tool(
        description = "Get a single country by ISO2 or ISO3 code. Returns null when no country matches."
    )]
    async fn get_country_by_code(
        &self,
        Parameters(input): Parameters<GetCountryByCodeInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new().arg("code", Some(input.code));
        self.lookup(GET_COUNTRY_BY_CODE, args).await
    }

    #[tool(description = "List countries in a region (exact match), sorted by name.")]
    async fn get_countries_by_region(
        &self,
        Parameters(input): Parameters<GetCountriesByRegionInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new()
            .arg("region", Some(input.region))
            .limit(input.limit);
        self.lookup(GET_COUNTRIES_BY_REGION, args).await
    }

    #[tool(description = "List countries using a currency code (exact match), sorted by name.")]
    async fn get_countries_by_currency(
        &self,
        Parameters(input): Parameters<GetCountriesByCurrencyInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new()
            .arg("currency", Some(input.currency))
            .limit(input.limit);
        self.lookup(GET_COUNTRIES_BY_CURRENCY, args).await
    }

    #[tool(
        description = "List cities in a country (ISO2 code), optionally filtered by partial city name, sorted by name."
    )]
    async fn get_cities_in_country(
        &self,
        Parameters(input): Parameters<GetCitiesInCountryInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new()
            .arg("country_code", Some(input.country_code))
            .arg("name", input.name)
            .limit(input.limit);
        self.lookup(GET_CITIES_IN_COUNTRY, args).await
    }

    #[tool(
        description = "Search cities by partial name, optionally within one country (default limit 10)."
    )]
    async fn search_cities(
        &self,
        Parameters(input): Parameters<SearchCitiesInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new()
            .arg("name", Some(input.name))
            .arg("country_code", input.country_code)
            .limit(input.limit);
        self.lookup(SEARCH_CITIES, args).await
    }

    #[tool(
        description = "List states in a country (ISO2 code), sorted by name. Returns an empty list for unknown countries."
    )]
    async fn get_states_in_country(
        &self,
        Parameters(input): Parameters<GetStatesInCountryInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new()
            .arg("country_code", Some(input.country_code))
            .limit(input.limit);
        self.lookup(GET_STATES_IN_COUNTRY, args).await
    }

    #[tool(
        description = "Retrieve the top chatters sorted by number of messages. Each record has name and messages."
    )]
    async fn get_top_chatters(
        &self,
        Parameters(input): Parameters<GetTopChattersInput>,
    ) -> Result<CallToolResult, McpError> {
        let args = LookupArgs::new().limit(input.limit);
        self.lookup(GET_TOP_CHATTERS, args).await
    }

    #[tool(description = "Get a random name from a provided list or a default list.")]
    async fn get_random_name(
        &self,
        Parameters(input): Parameters<GetRandomNameInput>,
    ) -> Result<CallToolResult, McpError> {
        let name = utility::random_name(input.names.as_deref());
        Ok(CallToolResult::success(vec![Content::text(name)]))
    }

    #[tool(description = "Calculate the Euclidean distance between two points given as [x, y].")]
    async fn calculate_distance(
        &self,
        Parameters(input): Parameters<CalculateDistanceInput>,
    ) -> Result<CallToolResult, McpError> {
        let d = utility::distance(input.point1, input.point2)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        ok_json(&d)
    }
}

fn ok_json(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn data_err(e: DataError) -> McpError {
    tracing::debug!(error = %e, "MCP tool error");
    if e.is_invalid_input() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}
