//! Shorthand constructors for route documentation.
//!
//! Typed helpers compile their type parameter through [`ApiDocs`], so the
//! referenced definitions land in the shared component table.

use crate::docs::ApiDocs;
use crate::specification::{
    MediaType, Parameter, ParameterLocation, RequestBody, Response,
};
use apidoc_schema::{Describe, Schema, SchemaRef, SchemaType};
use std::collections::BTreeMap;

pub const APPLICATION_JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const APPLICATION_XML: &str = "application/xml";

/// Request body of type `T` with the given media type
pub fn request_body<T: Describe + ?Sized>(docs: &ApiDocs, mime: &str) -> RequestBody {
    let mut content = BTreeMap::new();
    content.insert(mime.to_string(), MediaType::new(docs.schema::<T>()));
    RequestBody {
        content,
        ..Default::default()
    }
}

pub fn request_body_json<T: Describe + ?Sized>(docs: &ApiDocs) -> RequestBody {
    request_body::<T>(docs, APPLICATION_JSON)
}

pub fn request_body_form_data<T: Describe + ?Sized>(docs: &ApiDocs) -> RequestBody {
    request_body::<T>(docs, MULTIPART_FORM_DATA)
}

pub fn request_body_form_urlencoded<T: Describe + ?Sized>(docs: &ApiDocs) -> RequestBody {
    request_body::<T>(docs, FORM_URLENCODED)
}

pub fn request_body_xml<T: Describe + ?Sized>(docs: &ApiDocs) -> RequestBody {
    request_body::<T>(docs, APPLICATION_XML)
}

/// A status code with a JSON response of type `T`
pub fn response<T: Describe + ?Sized>(
    docs: &ApiDocs,
    status: impl Into<String>,
    description: impl Into<String>,
) -> (String, Response) {
    let mut response = Response::new(description);
    response
        .content
        .insert(APPLICATION_JSON.to_string(), MediaType::new(docs.schema::<T>()));
    (status.into(), response)
}

/// A status code with a description and no body
pub fn empty_response(status: impl Into<String>, description: impl Into<String>) -> (String, Response) {
    (status.into(), Response::new(description))
}

/// Collect `(status, response)` pairs into a response table
pub fn responses<I>(entries: I) -> BTreeMap<String, Response>
where
    I: IntoIterator<Item = (String, Response)>,
{
    entries.into_iter().collect()
}

pub fn path_parameter(name: impl Into<String>) -> Parameter {
    Parameter::new(name, ParameterLocation::Path).schema(string_schema())
}

pub fn query_parameter(name: impl Into<String>) -> Parameter {
    Parameter::new(name, ParameterLocation::Query).schema(string_schema())
}

pub fn header_parameter(name: impl Into<String>) -> Parameter {
    Parameter::new(name, ParameterLocation::Header).schema(string_schema())
}

pub fn cookie_parameter(name: impl Into<String>) -> Parameter {
    Parameter::new(name, ParameterLocation::Cookie).schema(string_schema())
}

pub fn path_parameter_of<T: Describe + ?Sized>(docs: &ApiDocs, name: impl Into<String>) -> Parameter {
    Parameter::new(name, ParameterLocation::Path).schema(docs.schema::<T>())
}

pub fn query_parameter_of<T: Describe + ?Sized>(docs: &ApiDocs, name: impl Into<String>) -> Parameter {
    Parameter::new(name, ParameterLocation::Query).schema(docs.schema::<T>())
}

pub fn header_parameter_of<T: Describe + ?Sized>(docs: &ApiDocs, name: impl Into<String>) -> Parameter {
    Parameter::new(name, ParameterLocation::Header).schema(docs.schema::<T>())
}

pub fn cookie_parameter_of<T: Describe + ?Sized>(docs: &ApiDocs, name: impl Into<String>) -> Parameter {
    Parameter::new(name, ParameterLocation::Cookie).schema(docs.schema::<T>())
}

pub fn bool_schema() -> SchemaRef {
    Schema::new(SchemaType::Boolean).into()
}

pub fn string_schema() -> SchemaRef {
    Schema::new(SchemaType::String).into()
}

pub fn int32_schema() -> SchemaRef {
    Schema::new(SchemaType::Integer).with_format("int32").into()
}

pub fn int64_schema() -> SchemaRef {
    Schema::new(SchemaType::Integer).with_format("int64").into()
}

pub fn float64_schema() -> SchemaRef {
    Schema::new(SchemaType::Number).with_format("double").into()
}

pub fn date_time_schema() -> SchemaRef {
    Schema::string_with_format("date-time").into()
}

pub fn uuid_schema() -> SchemaRef {
    Schema::string_with_format("uuid").into()
}

pub fn binary_schema() -> SchemaRef {
    Schema::string_with_format("binary").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Describe)]
    struct Upload {
        name: String,
        size: i64,
    }

    #[test]
    fn test_request_bodies() {
        let docs = ApiDocs::new();
        let cases = [
            (request_body_json::<Upload>(&docs), APPLICATION_JSON),
            (request_body_form_data::<Upload>(&docs), MULTIPART_FORM_DATA),
            (request_body_form_urlencoded::<Upload>(&docs), FORM_URLENCODED),
            (request_body_xml::<Upload>(&docs), APPLICATION_XML),
        ];
        for (body, mime) in cases {
            let media = body.content.get(mime).unwrap();
            assert!(media.schema.as_ref().unwrap().is_reference());
        }
        assert_eq!(docs.cache().len(), 1);
    }

    #[test]
    fn test_responses() {
        let docs = ApiDocs::new();
        let table = responses([
            response::<Upload>(&docs, "201", "Created"),
            response::<String>(&docs, "404", "Not Found"),
            empty_response("204", "No Content"),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(table["201"].description, "Created");
        let not_found = table["404"].content[APPLICATION_JSON].schema.as_ref().unwrap();
        assert!(not_found.value.is_type(SchemaType::String));
        assert!(table["204"].content.is_empty());
    }

    #[test]
    fn test_parameters() {
        let params = [
            path_parameter("id"),
            query_parameter("name"),
            header_parameter("X-Request-ID"),
            cookie_parameter("session"),
        ];
        let locations: Vec<_> = params.iter().map(|p| p.location).collect();
        assert_eq!(
            locations,
            vec![
                ParameterLocation::Path,
                ParameterLocation::Query,
                ParameterLocation::Header,
                ParameterLocation::Cookie
            ]
        );
        assert!(params[0].required);
        assert!(!params[1].required);
        assert_eq!(params[2].name, "X-Request-ID");
    }

    #[test]
    fn test_typed_parameters() {
        let docs = ApiDocs::new();
        let id = path_parameter_of::<uuid::Uuid>(&docs, "id");
        assert_eq!(id.schema.unwrap().value.format.as_deref(), Some("uuid"));

        let page = query_parameter_of::<u32>(&docs, "page");
        assert!(page.schema.unwrap().value.is_type(SchemaType::Integer));
        assert!(!page.required);
    }

    #[test]
    fn test_schema_helpers() {
        assert!(bool_schema().value.is_type(SchemaType::Boolean));
        assert!(string_schema().value.is_type(SchemaType::String));
        assert_eq!(int32_schema().value.format.as_deref(), Some("int32"));
        assert_eq!(int64_schema().value.format.as_deref(), Some("int64"));
        assert_eq!(float64_schema().value.format.as_deref(), Some("double"));
        assert_eq!(date_time_schema().value.format.as_deref(), Some("date-time"));
        assert_eq!(uuid_schema().value.format.as_deref(), Some("uuid"));
        assert_eq!(binary_schema().value.format.as_deref(), Some("binary"));
    }
}
