use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FieldViolation, Validate};

/// A user record as stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub location: String,
    pub title: String,
}

impl User {
    /// Builds a new record with a freshly generated identifier.
    pub fn new(payload: UserPayload) -> Self {
        Self {
            id: ObjectId::new(),
            name: payload.name,
            location: payload.location,
            title: payload.title,
        }
    }
}

/// Request body for creating or replacing a user.
///
/// Missing fields decode as empty strings so they are reported by validation
/// rather than as a decode failure. Identifiers supplied by the client are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UserPayload {
    pub name: String,
    pub location: String,
    pub title: String,
}

impl Validate for UserPayload {
    fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let violations: Vec<FieldViolation> = [
            ("name", &self.name),
            ("location", &self.location),
            ("title", &self.title),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| FieldViolation { field, rule: "required" })
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Wire shape of a user record.
///
/// `Default` is the zero-value record returned when a lookup matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Hex-encoded document identifier, empty for the zero-value record
    pub id: String,
    pub name: String,
    pub location: String,
    pub title: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            location: user.location,
            title: user.title,
        }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsertedUser {
    pub inserted_id: String,
}

/// Parses a path segment into a document id.
///
/// Malformed ids map to the nil id, which never matches a stored document, so
/// they behave exactly like an unknown id.
pub fn parse_user_id(raw: &str) -> ObjectId {
    ObjectId::parse_str(raw).unwrap_or_else(|_| ObjectId::from_bytes([0; 12]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, location: &str, title: &str) -> UserPayload {
        UserPayload {
            name: name.to_string(),
            location: location.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(payload("Ann", "NY", "Eng").validate().is_ok());
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let violations = payload("", "NY", "").validate().unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["name", "title"]);
        assert_eq!(violations[0].to_string(), "name is required");
    }

    #[test]
    fn test_whitespace_counts_as_present() {
        assert!(payload(" ", "NY", "Eng").validate().is_ok());
    }

    #[test]
    fn test_absent_fields_decode_as_empty() {
        let decoded: UserPayload = serde_json::from_str(r#"{"name":"Ann"}"#).unwrap();
        assert_eq!(decoded, payload("Ann", "", ""));
        assert_eq!(decoded.validate().unwrap_err().len(), 2);
    }

    #[test]
    fn test_client_supplied_id_is_ignored() {
        let decoded: UserPayload = serde_json::from_str(
            r#"{"id":"65a1f0c2e4b0a1b2c3d4e5f6","name":"Ann","location":"NY","title":"Eng"}"#,
        )
        .unwrap();
        let user = User::new(decoded);
        assert_ne!(user.id.to_hex(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_wrong_field_type_fails_to_decode() {
        assert!(serde_json::from_str::<UserPayload>(r#"{"name":5}"#).is_err());
    }

    #[test]
    fn test_user_stores_id_as_underscore_id() {
        let user = User::new(payload("Ann", "NY", "Eng"));
        let doc = mongodb::bson::to_document(&user).unwrap();
        assert_eq!(doc.get_object_id("_id").unwrap(), user.id);
        assert_eq!(doc.get_str("name").unwrap(), "Ann");
    }

    #[test]
    fn test_response_uses_hex_id() {
        let user = User::new(payload("Ann", "NY", "Eng"));
        let hex = user.id.to_hex();
        let response = UserResponse::from(user);
        assert_eq!(response.id, hex);
        assert_eq!(response.id.len(), 24);
    }

    #[test]
    fn test_parse_user_id() {
        let id = ObjectId::new();
        assert_eq!(parse_user_id(&id.to_hex()), id);
        assert_eq!(parse_user_id("not-an-id"), ObjectId::from_bytes([0; 12]));
    }
}
