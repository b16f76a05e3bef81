use indoc::indoc;
use rmcp::ErrorData;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use upstream::Page;

use super::endpoint::{Endpoint, UpstreamRequest, path_segment};
use crate::format::{self, Field};

const COURT_FIELDS: &[Field] = &[
    Field::text("ID", "id"),
    Field::text("Short name", "short_name"),
    Field::text("Jurisdiction", "jurisdiction"),
    Field::text("Citation", "citation_string"),
    Field::text("In use", "in_use"),
    Field::text("Founded", "start_date"),
    Field::text("Abolished", "end_date"),
    Field::link("Website", "url"),
];

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ListCourtsParameters {
    /// Jurisdiction code, e.g. `F` (federal appellate), `FD` (federal district), `S` (state supreme).
    #[serde(default)]
    jurisdiction: Option<String>,
    /// Only courts that are still in use.
    #[serde(default)]
    in_use: Option<bool>,
}

pub(crate) struct ListCourts;

impl Endpoint for ListCourts {
    type Parameters = ListCourtsParameters;
    type Response = Page<Value>;

    const NAME: &'static str = "list_courts";
    const DESCRIPTION: &'static str = indoc! {r#"
        List the courts known to CourtListener, optionally filtered by
        jurisdiction. The returned IDs can be used as `court` filters in the
        search tools.
    "#};

    fn request(parameters: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        UpstreamRequest::new("/courts/").with_query(&parameters)
    }

    fn format(response: &Self::Response) -> String {
        format::list(response, |court| format::text(court, "full_name"), COURT_FIELDS)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct CourtId {
    /// Court ID, e.g. `scotus` or `ca9`.
    id: String,
}

pub(crate) struct Court;

impl Endpoint for Court {
    type Parameters = CourtId;
    type Response = Value;

    const NAME: &'static str = "get_court";
    const DESCRIPTION: &'static str = "Get details of a single court by its ID (e.g. `scotus`).";

    fn request(CourtId { id }: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        Ok(UpstreamRequest::new(format!("/courts/{}/", path_segment(&id)?)))
    }

    fn format(response: &Self::Response) -> String {
        format::detail(response, format::text(response, "full_name"), COURT_FIELDS)
    }
}
