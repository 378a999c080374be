// Request payloads and the local validation each form performs before a call.

use serde::Serialize;

use crate::domain::errors::GatewayError;
use crate::domain::models::MeetingKind;

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    // Emails are matched case-insensitively by the API.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub numberreg: String,
    pub semester: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub numberreg: u64,
    pub semester: u64,
}

impl RegisterForm {
    pub fn validate(self) -> Result<RegisterRequest, GatewayError> {
        let name = required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        if self.password.is_empty() {
            return Err(GatewayError::Validation("password is required".into()));
        }

        Ok(RegisterRequest {
            name,
            email,
            password: self.password,
            numberreg: parse_number(&self.numberreg, "registration number")?,
            semester: parse_number(&self.semester, "semester")?,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub numberreg: String,
    pub semester: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub numberreg: u64,
    pub semester: u64,
}

impl ProfileForm {
    pub fn validate(self) -> Result<ProfileUpdate, GatewayError> {
        Ok(ProfileUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            numberreg: parse_number(&self.numberreg, "registration number")?,
            semester: parse_number(&self.semester, "semester")?,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordForm {
    pub fn validate(self) -> Result<PasswordChange, GatewayError> {
        if self.current_password.is_empty() || self.new_password.is_empty() {
            return Err(GatewayError::Validation(
                "enter both the current and the new password".into(),
            ));
        }
        if self.new_password != self.confirm_password {
            return Err(GatewayError::Validation("passwords do not match".into()));
        }

        Ok(PasswordChange {
            current_password: self.current_password,
            new_password: self.new_password,
        })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub course_id: u64,
    pub name: String,
    pub is_public: bool,
}

impl NewGroup {
    pub fn new(course_id: Option<u64>, name: &str, is_public: bool) -> Result<Self, GatewayError> {
        let name = name.trim();
        match course_id {
            Some(course_id) if !name.is_empty() => Ok(Self {
                course_id,
                name: name.to_string(),
                is_public,
            }),
            _ => Err(GatewayError::Validation(
                "select a course and enter a group name".into(),
            )),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeetingForm {
    pub start_time: String,
    pub end_time: String,
    pub kind: MeetingKind,
    pub link: String,
    pub location: String,
    pub topic_name: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    pub study_group_id: u64,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub kind: MeetingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "topic_name", skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
}

impl MeetingForm {
    pub fn validate(self, study_group_id: u64) -> Result<NewMeeting, GatewayError> {
        let start_time = required(&self.start_time, "start time")?;
        let end_time = required(&self.end_time, "end time")?;

        // Virtual meetings carry a link, in-person ones a location.
        let (link, location) = match self.kind {
            MeetingKind::Virtual => (non_blank(&self.link), None),
            MeetingKind::InPerson => (None, non_blank(&self.location)),
        };

        Ok(NewMeeting {
            study_group_id,
            start_time,
            end_time,
            kind: self.kind,
            link,
            location,
            topic_name: non_blank(&self.topic_name),
        })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_ids: Vec<u64>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AskRequest {
    pub prompt: String,
}

fn required(value: &str, field: &str) -> Result<String, GatewayError> {
    non_blank(value).ok_or_else(|| GatewayError::Validation(format!("{field} is required")))
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number(value: &str, field: &str) -> Result<u64, GatewayError> {
    value
        .trim()
        .parse()
        .map_err(|_| GatewayError::Validation(format!("{field} must be a number")))
}
