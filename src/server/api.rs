use std::collections::HashMap;

use serde::Serialize;

use crate::engine::request::{FLAG_LEGENDARY, FLAG_MYTHICAL, FLAG_ULTRA_BEAST};
use crate::engine::{
    split_type_combo, QueryEngine, QueryError, QueryOutcome, QueryRequest, SpeciesFilter,
    StatQuery,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Invalid request body: {0}")]
    Body(serde_json::Error),
    #[error("failed to serialize response: {0}")]
    Serialize(serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::Query(err) if err.is_not_found() => (404, "Not Found"),
            Self::Query(_) | Self::Body(_) => (400, "Bad Request"),
            Self::Serialize(_) => (500, "Internal Server Error"),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Query(err) => err.kind(),
            Self::Body(_) => "invalid_body",
            Self::Serialize(_) => "internal",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody<'a> {
    pub status: &'static str,
    pub kind: &'a str,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct QueryResponse<'a> {
    result: QueryOutcome<'a>,
}

/// Decoded `?key=value&...` pairs. Later duplicates win; blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        serde_urlencoded::from_str(query)
            .map(Self)
            .map_err(|err| QueryError::InvalidArgument(format!("Invalid query string: {err}")))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// `true` and `1` switch a flag on; anything else leaves it off.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false)
    }

    pub fn u32_param(&self, key: &str) -> Result<Option<u32>, QueryError> {
        self.get(key)
            .map(|raw| {
                raw.parse::<u32>().map_err(|_| {
                    QueryError::InvalidArgument(format!(
                        "Invalid {key}: '{raw}'. Expected a non-negative integer"
                    ))
                })
            })
            .transpose()
    }

    pub fn species_filter(&self) -> SpeciesFilter {
        SpeciesFilter::new(
            self.flag(FLAG_LEGENDARY),
            self.flag(FLAG_MYTHICAL),
            self.flag(FLAG_ULTRA_BEAST),
        )
    }
}

/// Percent-decode one path segment. `+` is literal in paths.
pub fn decode_path_segment(raw: &str) -> Result<String, QueryError> {
    urlencoding::decode(raw)
        .map(|segment| segment.into_owned())
        .map_err(|_| QueryError::InvalidArgument(format!("Invalid path segment: '{raw}'")))
}

fn to_pretty<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::Serialize)
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "healthy",
        "service": "pokefinder",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn pokemon_payload(engine: &QueryEngine, name: &str) -> Result<String, ApiError> {
    let request = QueryRequest::Lookup {
        name: name.to_lowercase(),
    };
    to_pretty(&engine.execute(&request)?)
}

pub fn stat_profile_payload(engine: &QueryEngine, name: &str) -> Result<String, ApiError> {
    let request = QueryRequest::Profile {
        name: name.to_lowercase(),
    };
    to_pretty(&engine.execute(&request)?)
}

/// `move` wins over `types`, which wins over the stat filters. Stats need both stat names.
pub fn search_request(params: &QueryParams) -> Result<QueryRequest, QueryError> {
    let filter = params.species_filter();

    if let Some(move_name) = params.get("move") {
        return Ok(QueryRequest::Move {
            move_name: move_name.to_lowercase(),
            filter,
        });
    }
    if let Some(types) = params.get("types") {
        return Ok(QueryRequest::Types {
            types: split_type_combo(types),
            filter,
        });
    }
    if let (Some(primary), Some(secondary)) =
        (params.get("primary_stat"), params.get("secondary_stat"))
    {
        let mut query = StatQuery::new(primary, secondary).filter(filter);
        query.min_primary = params.u32_param("min_primary")?.unwrap_or(0);
        query.min_secondary = params.u32_param("min_secondary")?;
        query.min_speed = params.u32_param("min_speed")?;
        return Ok(QueryRequest::Stats(query));
    }

    Err(QueryError::InvalidArgument(
        "Must specify type, move, or stats filter".to_string(),
    ))
}

pub fn pokemon_search_payload(engine: &QueryEngine, query: &str) -> Result<String, ApiError> {
    let request = search_request(&QueryParams::parse(query)?)?;
    to_pretty(&engine.execute(&request)?)
}

pub fn type_matchups_payload(engine: &QueryEngine, query: &str) -> Result<String, ApiError> {
    let params = QueryParams::parse(query)?;
    let types = params
        .get("types")
        .map(split_type_combo)
        .ok_or_else(|| QueryError::InvalidArgument("Must specify type(s)".to_string()))?;
    to_pretty(&engine.execute(&QueryRequest::Matchup { types })?)
}

pub fn query_payload(engine: &QueryEngine, body: &str) -> Result<String, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(ApiError::Body)?;
    let request = QueryRequest::from_json(&value)?;
    let result = engine.execute(&request)?;
    to_pretty(&QueryResponse { result })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_decode_and_read_flags() {
        let params =
            QueryParams::parse("move=thunder%20wave&include_legendary=1&include_mythical=TRUE&x")
                .expect("valid query");
        assert_eq!(params.get("move"), Some("thunder wave"));
        assert!(params.flag("include_legendary"));
        assert!(params.flag("include_mythical"));
        assert!(!params.flag("include_ultra_beasts"));
        assert_eq!(params.get("x"), None);
        assert_eq!(
            params.species_filter(),
            SpeciesFilter::new(true, true, false)
        );
    }

    #[test]
    fn blank_values_count_as_absent() {
        let params = QueryParams::parse("move=&types=%20&min_speed=").expect("valid query");
        assert_eq!(params.get("move"), None);
        assert_eq!(params.get("types"), None);
        assert_eq!(params.u32_param("min_speed"), Ok(None));
    }

    #[test]
    fn path_segments_keep_plus_signs() {
        assert_eq!(decode_path_segment("mr%2Dmime"), Ok("mr-mime".to_string()));
        assert_eq!(decode_path_segment("mr+mime"), Ok("mr+mime".to_string()));
        assert_eq!(decode_path_segment("type%3Anull"), Ok("type:null".to_string()));
        assert!(decode_path_segment("%FF%FE").is_err());
    }

    #[test]
    fn search_precedence_is_move_then_types_then_stats() {
        let params = |raw: &str| QueryParams::parse(raw).expect("valid query");

        let both = params("types=fire&move=ember&primary_stat=attack");
        assert!(matches!(search_request(&both), Ok(QueryRequest::Move { .. })));

        let types_and_stats = params("types=fire-flying&primary_stat=attack");
        assert!(matches!(
            search_request(&types_and_stats),
            Ok(QueryRequest::Types { types, .. }) if types == vec!["fire", "flying"]
        ));

        let stats = params("primary_stat=attack&secondary_stat=speed&min_speed=90");
        assert!(matches!(
            search_request(&stats),
            Ok(QueryRequest::Stats(q)) if q.min_speed == Some(90) && q.min_secondary.is_none()
        ));

        assert!(matches!(
            search_request(&params("")),
            Err(QueryError::InvalidArgument(msg)) if msg.contains("Must specify")
        ));
    }

    #[test]
    fn bad_integers_are_rejected() {
        let params = QueryParams::parse("primary_stat=attack&secondary_stat=speed&min_primary=-3")
            .expect("valid query");
        assert!(matches!(
            search_request(&params),
            Err(QueryError::InvalidArgument(msg)) if msg.contains("min_primary")
        ));
    }

    #[test]
    fn error_status_mapping() {
        let not_found = ApiError::from(QueryError::NotFound("x".to_string()));
        assert_eq!(not_found.status().0, 404);
        let too_many = ApiError::from(QueryError::TooManyTypes(vec![]));
        assert_eq!(too_many.status().0, 400);
        assert_eq!(too_many.kind(), "too_many_types");
    }
}
