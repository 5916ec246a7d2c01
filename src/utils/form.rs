use std::collections::BTreeMap;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, web};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::utils::error::CustomError;

pub const REQUIRED: &str = "This field is required.";
pub const NON_FIELD: &str = "__all__";

/// Field name -> messages, the way a bound form reports validation problems.
#[derive(Debug, Default, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

/// Result of processing a bound form: either the saved object or the errors
/// to re-render the form with.
#[derive(Debug)]
pub enum FormOutcome<T> {
    Saved(T),
    Invalid(FormErrors),
}

#[derive(Debug, Serialize)]
pub struct RenderedForm<T: Serialize> {
    pub name: &'static str,
    pub data: T,
    pub errors: FormErrors,
}

impl<T: Serialize> RenderedForm<T> {
    pub fn unbound(name: &'static str, data: T) -> Self {
        RenderedForm {
            name,
            data,
            errors: FormErrors::default(),
        }
    }

    pub fn with_errors(name: &'static str, data: T, errors: FormErrors) -> Self {
        RenderedForm { name, data, errors }
    }
}

/// Decode a submitted form from either a JSON or an urlencoded body.
///
/// An empty body decodes to `T::default()` so that missing fields surface as
/// form errors instead of a rejected request.
pub fn decode_form<T>(req: &HttpRequest, body: &web::Bytes) -> Result<T, CustomError>
where
    T: DeserializeOwned + Default,
{
    if body.is_empty() {
        return Ok(T::default());
    }

    let is_json = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        return serde_json::from_slice(body)
            .map_err(|e| CustomError::BadRequestError(format!("Invalid JSON body: {}", e)));
    }

    let raw = std::str::from_utf8(body)
        .map_err(|_| CustomError::BadRequestError("Form body is not UTF-8".to_string()))?;
    web::Query::<T>::from_query(raw)
        .map(web::Query::into_inner)
        .map_err(|e| CustomError::BadRequestError(format!("Invalid form body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        text: String,
        slug: String,
    }

    #[test]
    fn empty_body_is_an_empty_form() {
        let req = TestRequest::post().to_http_request();
        let form: Sample = decode_form(&req, &web::Bytes::new()).unwrap();
        assert!(form.text.is_empty());
    }

    #[test]
    fn urlencoded_and_json_bodies_decode() {
        let req = TestRequest::post().to_http_request();
        let form: Sample =
            decode_form(&req, &web::Bytes::from_static(b"text=hello+there&slug=a-b")).unwrap();
        assert_eq!(form.text, "hello there");
        assert_eq!(form.slug, "a-b");

        let req = TestRequest::post()
            .insert_header((CONTENT_TYPE, "application/json"))
            .to_http_request();
        let form: Sample = decode_form(&req, &web::Bytes::from_static(br#"{"text":"x"}"#)).unwrap();
        assert_eq!(form.text, "x");
        assert!(form.slug.is_empty());
    }

    #[test]
    fn errors_accumulate_per_field() {
        let mut errors = FormErrors::default();
        assert!(errors.is_empty());
        errors.add("text", REQUIRED);
        errors.add("text", "second");
        assert!(errors.has("text"));
        assert!(!errors.has("slug"));
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["text"].as_array().unwrap().len(), 2);
    }
}
