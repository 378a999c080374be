use crate::domain::GatewayError;
use crate::domain::forms::{MeetingForm, NewGroup};
use crate::domain::models::Meeting;
use crate::use_cases::endpoints::{CreateGroup, CreateMeeting, JoinGroup};
use crate::use_cases::fetch::fetch;
use crate::use_cases::gateway::SessionGateway;

const JOINED_MESSAGE: &str = "joined the group";
const GROUP_CREATED_MESSAGE: &str = "group created successfully";

#[tracing::instrument(name = "join_group", skip(gateway))]
pub async fn join_group(gateway: &SessionGateway, group_id: u64) -> Result<String, GatewayError> {
    let ack = fetch(gateway, &JoinGroup { group_id }).await?;
    Ok(ack
        .message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| JOINED_MESSAGE.to_string()))
}

#[tracing::instrument(name = "create_group", skip_all, fields(course_id = group.course_id))]
pub async fn create_group(gateway: &SessionGateway, group: NewGroup) -> Result<String, GatewayError> {
    fetch(gateway, &CreateGroup(group)).await?;
    Ok(GROUP_CREATED_MESSAGE.to_string())
}

// Validates the form locally, then returns the meeting as stored by the API.
#[tracing::instrument(name = "create_meeting", skip(gateway, form))]
pub async fn create_meeting(
    gateway: &SessionGateway,
    group_id: u64,
    form: MeetingForm,
) -> Result<Meeting, GatewayError> {
    let meeting = form.validate(group_id)?;
    let created = fetch(gateway, &CreateMeeting(meeting)).await?;
    Ok(created.meeting)
}
