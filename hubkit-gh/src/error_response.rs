//! GitHub's structured error body:
//! `{message, documentation_url?, errors?: [{resource?, code?, field?, message?}]}`

use serde_json::{Map, Value};

use crate::json;

const MESSAGE: &str = "message";
const DOCUMENTATION_URL: &str = "documentation_url";
const ERRORS: &str = "errors";
const RESOURCE: &str = "resource";
const CODE: &str = "code";
const FIELD: &str = "field";

/// Error body returned by GitHub for a failed request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorResponse {
  message: Option<String>,
  documentation_url: Option<String>,
  errors: Vec<ErrorDetail>,
}

impl ErrorResponse {
  /// Create an empty error response
  pub fn new() -> Self {
    Self::default()
  }

  /// Map a parsed JSON object onto an error response.
  ///
  /// A missing or malformed `errors` property yields an empty list, and array
  /// entries that are not objects are skipped.
  pub fn from_json(json: &Map<String, Value>) -> Self {
    let errors = json
      .get(ERRORS)
      .and_then(Value::as_array)
      .map(|errors| errors.iter().filter_map(Value::as_object).map(ErrorDetail::from_json).collect())
      .unwrap_or_default();

    Self {
      message: json::get_str(json, MESSAGE).map(str::to_string),
      documentation_url: json::get_str(json, DOCUMENTATION_URL).map(str::to_string),
      errors,
    }
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  pub fn documentation_url(&self) -> Option<&str> {
    self.documentation_url.as_deref()
  }

  /// The errors that were reported as a result of the failed request
  pub fn errors(&self) -> &[ErrorDetail] {
    &self.errors
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }

  pub fn with_documentation_url(mut self, documentation_url: impl Into<String>) -> Self {
    self.documentation_url = Some(documentation_url.into());
    self
  }

  pub fn with_errors(mut self, errors: Vec<ErrorDetail>) -> Self {
    self.errors = errors;
    self
  }

  /// Wire representation. Absent properties and an empty error list are
  /// omitted.
  pub fn to_json(&self) -> Value {
    let mut json = Map::new();
    if let Some(message) = &self.message {
      json::set_str(&mut json, MESSAGE, message);
    }
    if let Some(documentation_url) = &self.documentation_url {
      json::set_str(&mut json, DOCUMENTATION_URL, documentation_url);
    }
    if !self.errors.is_empty() {
      json.insert(
        ERRORS.to_string(),
        Value::Array(self.errors.iter().map(ErrorDetail::to_json).collect()),
      );
    }
    Value::Object(json)
  }
}

/// A single entry of an error response's `errors` list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetail {
  resource: Option<String>,
  code: Option<String>,
  field: Option<String>,
  message: Option<String>,
}

impl ErrorDetail {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_json(json: &Map<String, Value>) -> Self {
    let get = |key| json::get_str(json, key).map(str::to_string);
    Self {
      resource: get(RESOURCE),
      code: get(CODE),
      field: get(FIELD),
      message: get(MESSAGE),
    }
  }

  /// The kind of resource the error relates to (e.g. `Repository`)
  pub fn resource(&self) -> Option<&str> {
    self.resource.as_deref()
  }

  /// GitHub's error code (e.g. `missing_field`, `already_exists`, `custom`)
  pub fn code(&self) -> Option<&str> {
    self.code.as_deref()
  }

  pub fn field(&self) -> Option<&str> {
    self.field.as_deref()
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
    self.resource = Some(resource.into());
    self
  }

  pub fn with_code(mut self, code: impl Into<String>) -> Self {
    self.code = Some(code.into());
    self
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }

  pub fn to_json(&self) -> Value {
    let mut json = Map::new();
    for (key, value) in [
      (RESOURCE, &self.resource),
      (CODE, &self.code),
      (FIELD, &self.field),
      (MESSAGE, &self.message),
    ] {
      if let Some(value) = value {
        json::set_str(&mut json, key, value);
      }
    }
    Value::Object(json)
  }
}
