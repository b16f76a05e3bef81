use rmcp::ErrorData;
use serde_json::Value;

use super::endpoint::{Endpoint, RecordId, UpstreamRequest};
use crate::format::{self, Field};

pub(crate) struct Docket;

impl Endpoint for Docket {
    type Parameters = RecordId;
    type Response = Value;

    const NAME: &'static str = "get_docket";
    const DESCRIPTION: &'static str =
        "Get a docket by its ID: case name, docket number, court, key dates, assigned judge and nature of suit.";

    fn request(RecordId { id }: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        Ok(UpstreamRequest::new(format!("/dockets/{id}/")))
    }

    fn format(response: &Self::Response) -> String {
        const FIELDS: &[Field] = &[
            Field::text("Docket number", "docket_number"),
            Field::text("Court", "court_id"),
            Field::text("Filed", "date_filed"),
            Field::text("Terminated", "date_terminated"),
            Field::text("Assigned to", "assigned_to_str"),
            Field::text("Referred to", "referred_to_str"),
            Field::text("Cause", "cause"),
            Field::text("Nature of suit", "nature_of_suit"),
            Field::text("Jury demand", "jury_demand"),
            Field::link("Link", "absolute_url"),
        ];

        format::detail(response, format::text(response, "case_name"), FIELDS)
    }
}
