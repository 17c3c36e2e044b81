//! Record types exchanged with the organization backend

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use validator::Validate;

/// A contact request submitted through the public site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Sender name
    #[serde(default)]
    pub name: String,

    /// Message subject
    #[serde(default)]
    pub subject: String,

    /// When the backend stored the message
    ///
    /// Values that cannot be read as a point in time become `None` instead of
    /// failing the whole listing.
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Shapes a `createdAt` value may arrive in
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    Other(IgnoredAny),
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        Some(RawTimestamp::Millis(millis)) => DateTime::from_timestamp_millis(millis),
        Some(RawTimestamp::Other(_)) | None => None,
    })
}

/// RFC 3339, then a zone-less date-time, then a bare date; the latter two are
/// taken as UTC
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

/// An organization branch office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Branch name
    #[serde(default)]
    pub name: String,

    /// District the branch belongs to
    #[serde(default)]
    pub district: String,

    /// Street address
    #[serde(default)]
    pub address: String,

    /// Contact phone number
    #[serde(default)]
    pub phone: String,

    /// Branch manager name
    #[serde(default)]
    pub manager: String,

    /// Opening hours, free text
    #[serde(default)]
    pub hours: String,
}

/// Fields sent when creating or editing a branch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BranchDraft {
    /// Branch name
    #[validate(length(min = 1, message = "branch name is required"))]
    pub name: String,

    /// District the branch belongs to
    #[validate(length(min = 1, message = "district is required"))]
    pub district: String,

    /// Street address
    pub address: String,

    /// Contact phone number
    pub phone: String,

    /// Branch manager name
    pub manager: String,

    /// Opening hours, free text
    pub hours: String,
}

/// A route ("root" on the backend) served by the organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Route name
    #[serde(default)]
    pub name: String,

    /// District the route runs through
    #[serde(default)]
    pub district: String,

    /// Route manager name
    #[serde(rename = "managerName", default)]
    pub manager_name: String,
}

/// Admin signup form
#[derive(Clone, Serialize, Validate)]
pub struct SignupRequest {
    /// Admin email address
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,

    /// Admin password
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SignupRequest {
    /// Build a signup form
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the form before it is submitted
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] naming the first offending field.
    pub fn check(&self) -> crate::Result<()> {
        check_form(self)
    }
}

impl BranchDraft {
    /// Check the draft before it is submitted
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] naming the first offending field.
    pub fn check(&self) -> crate::Result<()> {
        check_form(self)
    }
}

impl From<Branch> for BranchDraft {
    fn from(branch: Branch) -> Self {
        Self {
            name: branch.name,
            district: branch.district,
            address: branch.address,
            phone: branch.phone,
            manager: branch.manager,
            hours: branch.hours,
        }
    }
}

fn check_form<T: Validate>(form: &T) -> crate::Result<()> {
    let Err(errors) = form.validate() else {
        return Ok(());
    };

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let Some((field, field_errors)) = fields.into_iter().next() else {
        return Err(crate::Error::validation("form", errors.to_string()));
    };

    let message = field_errors
        .first()
        .and_then(|e| e.message.as_ref())
        .map_or_else(|| "is invalid".to_string(), ToString::to_string);

    Err(crate::Error::validation(field.to_string(), message))
}

/// One line of a dashboard "recent" panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// Stable key (the record identifier)
    pub key: String,
    /// Primary text
    pub title: String,
    /// Secondary text
    pub subtitle: String,
    /// Trailing detail
    pub meta: String,
}

impl From<&ContactMessage> for SummaryRow {
    fn from(message: &ContactMessage) -> Self {
        Self {
            key: message.id.clone(),
            title: message.name.clone(),
            subtitle: message.subject.clone(),
            meta: message
                .created_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

impl From<&Branch> for SummaryRow {
    fn from(branch: &Branch) -> Self {
        Self {
            key: branch.id.clone(),
            title: branch.name.clone(),
            subtitle: branch.district.clone(),
            meta: branch.manager.clone(),
        }
    }
}

impl From<&Route> for SummaryRow {
    fn from(route: &Route) -> Self {
        Self {
            key: route.id.clone(),
            title: route.name.clone(),
            subtitle: route.district.clone(),
            meta: route.manager_name.clone(),
        }
    }
}
