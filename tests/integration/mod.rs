//! Integration tests grouped by surface.

mod cli_contracts;
mod parse_matrix;
mod publish_flow;
mod registry_workflow;
mod search_properties;
mod support;
