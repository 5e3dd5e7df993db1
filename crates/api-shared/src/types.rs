//! JSON wire types shared by the API surfaces.
//!
//! These mirror the request/response bodies exactly; conversion to and from the core domain
//! types happens in the handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Banner returned by the service root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RootRes {
    pub message: String,
}

/// Body returned for rejected requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// A NAMASTE term together with its ICD-11 TM2 and biomedicine mapping.
///
/// Returned by search and echoed back by clients as the generate request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TermRecord {
    pub namaste_term: String,
    pub namaste_code: String,
    pub tm2_code: String,
    pub tm2_term: String,
    pub bio_code: String,
    pub bio_term: String,
}

/// Query string for term search.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Partial term text; empty or absent yields no results.
    pub q: Option<String>,
}

impl SearchParams {
    /// Collect search parameters from decoded query pairs.
    ///
    /// A repeated `q` keeps its last value; unrelated keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let q = pairs
            .into_iter()
            .filter(|(key, _)| key == "q")
            .map(|(_, value)| value)
            .last();
        Self { q }
    }
}
