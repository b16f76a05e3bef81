//! Full-text search through `/search/`.

use indoc::indoc;
use rmcp::ErrorData;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use upstream::Page;

use super::endpoint::{Endpoint, UpstreamRequest};
use crate::format::{self, Field};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct SearchParameters {
    /// Search query. Supports CourtListener query syntax, e.g. `"due process" AND court_id:scotus`.
    q: String,
    /// Restrict to one or more court IDs, separated by spaces (e.g. `scotus ca9`).
    #[serde(default)]
    court: Option<String>,
    /// Only cases filed on or after this date (YYYY-MM-DD).
    #[serde(default)]
    filed_after: Option<String>,
    /// Only cases filed on or before this date (YYYY-MM-DD).
    #[serde(default)]
    filed_before: Option<String>,
    /// Sort order, e.g. `score desc` or `dateFiled desc`.
    #[serde(default)]
    order_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct OralArgumentParameters {
    /// Search query.
    q: String,
    /// Restrict to one or more court IDs, separated by spaces.
    #[serde(default)]
    court: Option<String>,
    /// Only arguments heard on or after this date (YYYY-MM-DD).
    #[serde(default)]
    argued_after: Option<String>,
    /// Only arguments heard on or before this date (YYYY-MM-DD).
    #[serde(default)]
    argued_before: Option<String>,
    /// Sort order, e.g. `score desc` or `dateArgued desc`.
    #[serde(default)]
    order_by: Option<String>,
}

fn search(kind: &str, parameters: &impl Serialize) -> Result<UpstreamRequest, ErrorData> {
    Ok(UpstreamRequest::new("/search/").with_query(parameters)?.arg("type", kind))
}

fn case_name(record: &Value) -> Option<String> {
    format::text(record, "caseName")
}

pub(crate) struct Opinions;

impl Endpoint for Opinions {
    type Parameters = SearchParameters;
    type Response = Page<Value>;

    const NAME: &'static str = "search_opinions";
    const DESCRIPTION: &'static str = indoc! {r#"
        Search court opinions (case law) by keyword. Returns case names,
        courts, filing dates, citations and links to the full text.
    "#};

    fn request(parameters: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        search("o", &parameters)
    }

    fn format(response: &Self::Response) -> String {
        const FIELDS: &[Field] = &[
            Field::text("Court", "court"),
            Field::text("Filed", "dateFiled"),
            Field::text("Docket number", "docketNumber"),
            Field::text("Citations", "citation"),
            Field::text("Cluster ID", "cluster_id"),
            Field::link("Link", "absolute_url"),
        ];

        format::list(response, case_name, FIELDS)
    }
}

pub(crate) struct OralArguments;

impl Endpoint for OralArguments {
    type Parameters = OralArgumentParameters;
    type Response = Page<Value>;

    const NAME: &'static str = "search_oral_arguments";
    const DESCRIPTION: &'static str = indoc! {r#"
        Search oral argument recordings by keyword. Returns case names,
        courts, argument dates, judges and links to the audio pages.
    "#};

    fn request(parameters: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        search("oa", &parameters)
    }

    fn format(response: &Self::Response) -> String {
        const FIELDS: &[Field] = &[
            Field::text("Court", "court"),
            Field::text("Argued", "dateArgued"),
            Field::text("Docket number", "docketNumber"),
            Field::text("Judges", "judge"),
            Field::link("Link", "absolute_url"),
        ];

        format::list(response, case_name, FIELDS)
    }
}

pub(crate) struct Dockets;

impl Endpoint for Dockets {
    type Parameters = SearchParameters;
    type Response = Page<Value>;

    const NAME: &'static str = "search_dockets";
    const DESCRIPTION: &'static str = indoc! {r#"
        Search federal court dockets (RECAP archive) by keyword. Returns
        case names, courts, docket numbers, filing dates and assigned judges.
    "#};

    fn request(parameters: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        search("r", &parameters)
    }

    fn format(response: &Self::Response) -> String {
        const FIELDS: &[Field] = &[
            Field::text("Court", "court"),
            Field::text("Docket number", "docketNumber"),
            Field::text("Filed", "dateFiled"),
            Field::text("Assigned to", "assignedTo"),
            Field::text("Docket ID", "docket_id"),
            Field::link("Link", "docket_absolute_url"),
        ];

        format::list(response, case_name, FIELDS)
    }
}
