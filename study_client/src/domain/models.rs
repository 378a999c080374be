// Typed response models validated at the API boundary.
//
// Defaulting rules: missing or null numbers become 0 (numeric strings are
// accepted), missing strings become "", missing lists become empty, and
// unknown enum values fall back to the variant marked as default.

use serde::{Deserialize, Serialize};

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(number_from_value).unwrap_or(0))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(text)) => text,
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => String::new(),
        })
    }

    // Like `number`, but null, missing or unparsable input stays `None`.
    pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(parse_number))
    }

    fn number_from_value(value: &Value) -> u64 {
        parse_number(value).unwrap_or(0)
    }

    fn parse_number(value: &Value) -> Option<u64> {
        match value {
            Value::Number(number) => number.as_u64().or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.is_finite() && *float >= 0.0)
                    .map(|float| float as u64)
            }),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Role {
    Admin,
    #[default]
    Student,
    Assistant,
    Collaborator,
}

impl Role {
    pub fn as_wire(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "estudiante",
            Role::Assistant => "auxiliar",
            Role::Collaborator => "colaborador",
        }
    }
}

impl From<Option<String>> for Role {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("admin") => Role::Admin,
            Some("auxiliar") => Role::Assistant,
            Some("colaborador") => Role::Collaborator,
            _ => Role::Student,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_wire().to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum MeetingKind {
    #[default]
    InPerson,
    Virtual,
}

impl MeetingKind {
    pub fn as_wire(self) -> &'static str {
        match self {
            MeetingKind::InPerson => "presencial",
            MeetingKind::Virtual => "virtual",
        }
    }
}

impl From<Option<String>> for MeetingKind {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("virtual") => MeetingKind::Virtual,
            _ => MeetingKind::InPerson,
        }
    }
}

impl From<MeetingKind> for String {
    fn from(kind: MeetingKind) -> Self {
        kind.as_wire().to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "lenient::number")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub group: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub schedule: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub semester: String,
}

// Course as embedded in a group payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseRef {
    #[serde(default, deserialize_with = "lenient::number")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "lenient::number")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub numberreg: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub semester: u64,
    #[serde(default)]
    pub role: Role,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, deserialize_with = "lenient::number")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, rename = "Course")]
    pub course: Option<CourseRef>,
    #[serde(default)]
    pub creator: Option<Member>,
    #[serde(default, rename = "Users")]
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(default, deserialize_with = "lenient::number")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub start_time: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub end_time: String,
    #[serde(default, rename = "type")]
    pub kind: MeetingKind,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(default, rename = "topic_name")]
    pub topic_name: Option<String>,
}

// Envelope returned when a meeting is created.
#[derive(Clone, Debug, Deserialize)]
pub struct CreatedMeeting {
    pub meeting: Meeting,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub numberreg: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub semester: u64,
    #[serde(default)]
    pub role: Role,
}

// Partial profile echoed back by the update endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub numberreg: Option<u64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub semester: Option<u64>,
}

impl UserProfile {
    // Fields present in the patch win; absent ones keep the previous value.
    pub fn merge(mut self, patch: ProfilePatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(numberreg) = patch.numberreg {
            self.numberreg = numberreg;
        }
        if let Some(semester) = patch.semester {
            self.semester = semester;
        }
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default, deserialize_with = "lenient::number")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserCounts {
    #[serde(default, deserialize_with = "lenient::number")]
    pub today: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub week: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub year: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopGroup {
    #[serde(default, deserialize_with = "lenient::number")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub member_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub users: UserCounts,
    #[serde(default)]
    pub top_groups: Vec<TopGroup>,
}

// Generic `{ "message": ... }` acknowledgement.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AssistantAnswer {
    #[serde(default)]
    pub text: String,
}
