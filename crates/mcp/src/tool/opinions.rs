use rmcp::ErrorData;
use serde_json::Value;

use super::endpoint::{Endpoint, RecordId, UpstreamRequest};
use crate::format::{self, Field};

pub(crate) struct Opinion;

impl Endpoint for Opinion {
    type Parameters = RecordId;
    type Response = Value;

    const NAME: &'static str = "get_opinion";
    const DESCRIPTION: &'static str =
        "Get a single court opinion by its ID, including author, type, date and the beginning of its text.";

    fn request(RecordId { id }: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        Ok(UpstreamRequest::new(format!("/opinions/{id}/")))
    }

    fn format(response: &Self::Response) -> String {
        const FIELDS: &[Field] = &[
            Field::text("Type", "type"),
            Field::text("Author", "author_str"),
            Field::text("Joined by", "joined_by_str"),
            Field::text("Created", "date_created"),
            Field::text("Cluster", "cluster"),
            Field::link("Link", "absolute_url"),
            Field::link("Download", "download_url"),
            Field::excerpt("Text", "plain_text", 2000),
        ];

        let title = format::text(response, "id").map(|id| format!("Opinion {id}"));
        format::detail(response, title, FIELDS)
    }
}

pub(crate) struct Cluster;

impl Endpoint for Cluster {
    type Parameters = RecordId;
    type Response = Value;

    const NAME: &'static str = "get_cluster";
    const DESCRIPTION: &'static str = "Get an opinion cluster (a decided case and its opinions) by its ID.";

    fn request(RecordId { id }: Self::Parameters) -> Result<UpstreamRequest, ErrorData> {
        Ok(UpstreamRequest::new(format!("/clusters/{id}/")))
    }

    fn format(response: &Self::Response) -> String {
        const FIELDS: &[Field] = &[
            Field::text("Filed", "date_filed"),
            Field::text("Judges", "judges"),
            Field::text("Status", "precedential_status"),
            Field::text("Cited by", "citation_count"),
            Field::text("Docket", "docket"),
            Field::link("Link", "absolute_url"),
            Field::excerpt("Syllabus", "syllabus", 1000),
        ];

        let title = format::text(response, "case_name").or_else(|| format::text(response, "case_name_full"));
        format::detail(response, title, FIELDS)
    }
}
