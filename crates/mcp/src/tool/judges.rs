use rmcp::ErrorData;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use upstream::Page;

use super::endpoint::{Endpoint, RecordId, UpstreamRequest};
use crate::format::{self, Field};

const PERSON_FIELDS: &[Field] = &[
    Field::text("ID", "id"),
    Field::text("Born", "date_dob"),
    Field::text("Birthplace", "dob_city"),
    Field::text("Birth state", "dob_state"),
    Field::text("Died", "date_dod"),
    Field::link("Link", "absolute_url"),
];

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct SearchJudgesParameters {
    /// First name of the judge.
    #[serde(default)]
    name_first: Option<String>,
    /// Last name of the judge.
    #[serde(default)]
    name_last: Option<String>,
}

pub(crate) struct SearchJudges;

impl Endpoint for SearchJudges {
    type Parameters = SearchJudgesParameters;
    type Response = Page<Value>;

    const NAME: &'static str = "search_judges";
    const DESCRIPTION: &'static str = "Find judges and other people in the CourtListener judicial database by name.";

    fn request(parameters: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        UpstreamRequest::new("/people/").with_query(&parameters)
    }

    fn format(response: &Self::Response) -> String {
        format::list(response, format::person_name, PERSON_FIELDS)
    }
}

pub(crate) struct Judge;

impl Endpoint for Judge {
    type Parameters = RecordId;
    type Response = Value;

    const NAME: &'static str = "get_judge";
    const DESCRIPTION: &'static str = "Get biographical details of a judge by their person ID.";

    fn request(RecordId { id }: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        Ok(UpstreamRequest::new(format!("/people/{id}/")))
    }

    fn format(response: &Self::Response) -> String {
        format::detail(response, format::person_name(response), PERSON_FIELDS)
    }
}
