//! Typed response records.
//!
//! Each endpoint's expected response is a serde record implementing
//! [`ResponseRecord`]. Decoding turns an absent or malformed field into a
//! [`ValidationError`] instead of a silent falsy check.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ways a response body can fail validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No response body is available (the request failed).
    #[error("no response body")]
    NoBody,

    /// The body does not have the shape of the record.
    #[error("{record}: {message}")]
    Decode {
        /// Record being decoded.
        record: &'static str,
        /// serde's description of the mismatch.
        message: String,
    },

    /// An optional field the scenario relies on is absent.
    #[error("{record}: missing field `{field}`")]
    MissingField {
        /// Record being checked.
        record: &'static str,
        /// Name of the absent field.
        field: &'static str,
    },

    /// A required field is present but empty.
    #[error("field `{field}` is empty")]
    EmptyField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// A field holds a value other than the expected one.
    #[error("field `{field}`: expected {expected:?}, got {actual:?}")]
    UnexpectedValue {
        /// Name of the field.
        field: &'static str,
        /// Expected value.
        expected: String,
        /// Value received.
        actual: String,
    },

    /// A collection has the wrong number of entries.
    #[error("expected {expected} entries, got {actual}")]
    UnexpectedCount {
        /// Expected number of entries.
        expected: usize,
        /// Number received.
        actual: usize,
    },

    /// A collection expected to hold entries is empty.
    #[error("{record}: empty collection")]
    EmptyCollection {
        /// Record type of the entries.
        record: &'static str,
    },
}

/// A response body shape with optional semantic validation.
pub trait ResponseRecord: DeserializeOwned {
    /// Name used in validation errors.
    const NAME: &'static str;

    /// Checks constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Decodes and validates a single record.
///
/// # Errors
///
/// Returns [`ValidationError::NoBody`] when `body` is `None`, a
/// [`ValidationError::Decode`] when the shape does not match, or whatever
/// [`ResponseRecord::validate`] reports.
pub fn decode<T: ResponseRecord>(body: Option<&serde_json::Value>) -> Result<T, ValidationError> {
    let body = body.ok_or(ValidationError::NoBody)?;
    let record = T::deserialize(body).map_err(|e| ValidationError::Decode {
        record: T::NAME,
        message: e.to_string(),
    })?;
    record.validate()?;
    Ok(record)
}

/// Decodes and validates a JSON array of records.
///
/// # Errors
///
/// Same as [`decode`], for the array and for each entry.
pub fn decode_list<T: ResponseRecord>(
    body: Option<&serde_json::Value>,
) -> Result<Vec<T>, ValidationError> {
    let body = body.ok_or(ValidationError::NoBody)?;
    let records = Vec::<T>::deserialize(body).map_err(|e| ValidationError::Decode {
        record: T::NAME,
        message: e.to_string(),
    })?;
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}

/// Compares a received value with the expected one.
///
/// # Errors
///
/// Returns [`ValidationError::UnexpectedValue`] when they differ.
pub fn expect_eq(field: &'static str, expected: &str, actual: &str) -> Result<(), ValidationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ValidationError::UnexpectedValue {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// `GET api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Must be `"healthy"`.
    pub status: String,
}

impl ResponseRecord for HealthStatus {
    const NAME: &'static str = "health status";

    fn validate(&self) -> Result<(), ValidationError> {
        expect_eq("status", "healthy", &self.status)
    }
}

/// One entry of `GET api/branches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Display name of the business branch.
    pub name: String,
    /// Branch identifier, when the API sends one.
    #[serde(default)]
    pub id: Option<String>,
}

impl ResponseRecord for Branch {
    const NAME: &'static str = "branch";
}

/// User profile, as returned by `GET api/auth/me` and embedded in auth grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// User identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

impl ResponseRecord for UserProfile {
    const NAME: &'static str = "user profile";
}

/// The user embedded in an auth grant.
///
/// Only the parts the run reports on are read, and each may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedUser {
    /// User identifier, textual or numeric.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
}

impl GrantedUser {
    /// Returns the identifier as text.
    #[must_use]
    pub fn id_text(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(id) => Some(id.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// `POST api/auth/register` and `POST api/auth/login`.
///
/// The embedded user is kept as raw JSON so its shape never prevents the
/// token from being read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGrant {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token type, usually `"bearer"`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// The authenticated user; always present on registration.
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

impl AuthGrant {
    /// Returns the embedded user, which registration must include.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when the grant has no user
    /// and [`ValidationError::Decode`] when the user is not an object.
    pub fn require_user(&self) -> Result<GrantedUser, ValidationError> {
        let user = self
            .user
            .as_ref()
            .filter(|user| !user.is_null())
            .ok_or(ValidationError::MissingField {
                record: Self::NAME,
                field: "user",
            })?;
        GrantedUser::deserialize(user).map_err(|e| ValidationError::Decode {
            record: "granted user",
            message: e.to_string(),
        })
    }
}

impl ResponseRecord for AuthGrant {
    const NAME: &'static str = "auth grant";

    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("access_token", &self.access_token)
    }
}

/// `POST api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Identifier of the created order.
    pub order_id: String,
}

impl ResponseRecord for OrderReceipt {
    const NAME: &'static str = "order receipt";

    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("order_id", &self.order_id)
    }
}

/// An order, as listed by `GET api/orders` and fetched by `GET api/orders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: String,
    /// Order title.
    pub title: String,
    /// Business branch the order belongs to.
    #[serde(default)]
    pub branch: Option<String>,
    /// Processing status.
    #[serde(default)]
    pub status: Option<String>,
}

impl ResponseRecord for Order {
    const NAME: &'static str = "order";
}

/// `POST api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReceipt {
    /// Identifier of the created support ticket.
    pub ticket_id: String,
}

impl ResponseRecord for TicketReceipt {
    const NAME: &'static str = "ticket receipt";

    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("ticket_id", &self.ticket_id)
    }
}

/// One entry of `GET api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportMessage {
    /// Ticket or message identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Message subject.
    #[serde(default)]
    pub subject: Option<String>,
}

impl ResponseRecord for SupportMessage {
    const NAME: &'static str = "support message";
}

/// `POST api/quotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteReceipt {
    /// Identifier of the quote request.
    pub quote_id: String,
}

impl ResponseRecord for QuoteReceipt {
    const NAME: &'static str = "quote receipt";

    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("quote_id", &self.quote_id)
    }
}

/// `POST api/prospects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProspectReceipt {
    /// Confirmation message.
    pub message: String,
}

impl ResponseRecord for ProspectReceipt {
    const NAME: &'static str = "prospect receipt";
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_health_must_be_healthy() {
        let ok = json!({"status": "healthy"});
        assert!(decode::<HealthStatus>(Some(&ok)).is_ok());

        let degraded = json!({"status": "degraded"});
        assert_eq!(
            decode::<HealthStatus>(Some(&degraded)),
            Err(ValidationError::UnexpectedValue {
                field: "status",
                expected: "healthy".to_string(),
                actual: "degraded".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_field_is_a_decode_error() {
        let body = json!({"token_type": "bearer"});
        let err = decode::<AuthGrant>(Some(&body)).unwrap_err();
        match err {
            ValidationError::Decode { record, message } => {
                assert_eq!(record, "auth grant");
                assert!(message.contains("access_token"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let body = json!({"access_token": "  ", "user": null});
        assert_eq!(
            decode::<AuthGrant>(Some(&body)),
            Err(ValidationError::EmptyField {
                field: "access_token"
            })
        );
    }

    #[test]
    fn test_require_user() {
        let body = json!({
            "access_token": "tok",
            "user": {"email": "a@doxa.test", "full_name": "A", "id": "u-1"}
        });
        let grant = decode::<AuthGrant>(Some(&body)).unwrap();
        assert_eq!(grant.require_user().unwrap().id_text().as_deref(), Some("u-1"));

        let grant = decode::<AuthGrant>(Some(&json!({"access_token": "tok"}))).unwrap();
        assert_eq!(
            grant.require_user(),
            Err(ValidationError::MissingField {
                record: "auth grant",
                field: "user"
            })
        );
    }

    #[test]
    fn test_user_shape_does_not_block_the_token() {
        let numeric_id = json!({
            "access_token": "tok",
            "user": {"id": 42, "email": "a@doxa.test"}
        });
        let grant = decode::<AuthGrant>(Some(&numeric_id)).unwrap();
        assert_eq!(grant.access_token, "tok");
        let user = grant.require_user().unwrap();
        assert_eq!(user.id_text().as_deref(), Some("42"));
        assert_eq!(user.full_name, None);

        let not_an_object = json!({"access_token": "tok", "user": "someone"});
        let grant = decode::<AuthGrant>(Some(&not_an_object)).unwrap();
        assert!(matches!(
            grant.require_user(),
            Err(ValidationError::Decode {
                record: "granted user",
                ..
            })
        ));
    }

    #[test]
    fn test_decode_list() {
        let body = json!([{"name": "Construction"}, {"name": "Agriculture", "id": "agri"}]);
        let branches = decode_list::<Branch>(Some(&body)).unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1].id.as_deref(), Some("agri"));

        let not_a_list = json!({"name": "Construction"});
        assert!(matches!(
            decode_list::<Branch>(Some(&not_a_list)),
            Err(ValidationError::Decode { record: "branch", .. })
        ));
    }

    #[test]
    fn test_no_body() {
        assert_eq!(decode::<QuoteReceipt>(None), Err(ValidationError::NoBody));
        assert_eq!(decode_list::<Order>(None), Err(ValidationError::NoBody));
    }
}
