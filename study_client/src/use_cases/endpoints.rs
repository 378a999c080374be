// One descriptor and response schema per API route.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::RequestDescriptor;
use crate::domain::forms::{
    AskRequest, EnrollRequest, NewGroup, NewMeeting, PasswordChange, ProfileUpdate,
};
use crate::domain::models::{
    Acknowledgement, AssistantAnswer, Course, CreatedMeeting, Group, Meeting, ProfilePatch,
    Stats, UserProfile, UserSummary,
};

pub trait Endpoint {
    type Response: DeserializeOwned;

    fn descriptor(&self) -> RequestDescriptor;
}

pub struct CourseList;

impl Endpoint for CourseList {
    type Response = Vec<Course>;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get("/api/courses/course-list").with_fallback("could not load courses")
    }
}

pub struct MyCourses;

impl Endpoint for MyCourses {
    type Response = Vec<Course>;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get("/api/usercourse/my-courses")
            .with_fallback("could not load your courses")
    }
}

pub struct EnrollCourses {
    pub course_ids: Vec<u64>,
}

impl Endpoint for EnrollCourses {
    type Response = Acknowledgement;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::post("/api/usercourse/add-courses")
            .with_json(&EnrollRequest {
                course_ids: self.course_ids.clone(),
            })
            .with_fallback("could not enroll in the selected courses")
    }
}

pub struct PublicGroups;

impl Endpoint for PublicGroups {
    type Response = Vec<Group>;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get("/api/groups").with_fallback("could not load public groups")
    }
}

pub struct MyGroups;

impl Endpoint for MyGroups {
    type Response = Vec<Group>;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get("/api/groups/my-groups").with_fallback("could not load your groups")
    }
}

pub struct GroupDetails {
    pub group_id: u64,
}

impl Endpoint for GroupDetails {
    type Response = Group;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get(format!("/api/groups/{}/details", self.group_id))
            .with_fallback("could not load group details")
    }
}

pub struct JoinGroup {
    pub group_id: u64,
}

impl Endpoint for JoinGroup {
    type Response = Acknowledgement;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::post(format!("/api/groups/{}/join", self.group_id))
            .with_fallback("could not join the group")
    }
}

pub struct CreateGroup(pub NewGroup);

impl Endpoint for CreateGroup {
    // The created record is not used beyond confirming success.
    type Response = Value;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::post("/api/groups")
            .with_json(&self.0)
            .with_fallback("could not create the group")
    }
}

pub struct GroupMeetings {
    pub group_id: u64,
}

impl Endpoint for GroupMeetings {
    type Response = Vec<Meeting>;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get(format!("/api/meetings/group/{}", self.group_id))
            .with_fallback("could not load meetings")
    }
}

pub struct CreateMeeting(pub NewMeeting);

impl Endpoint for CreateMeeting {
    type Response = CreatedMeeting;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::post("/api/meetings")
            .with_json(&self.0)
            .with_fallback("could not create the meeting")
    }
}

pub struct GetProfile;

impl Endpoint for GetProfile {
    type Response = UserProfile;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get("/api/users/profile").with_fallback("could not load the profile")
    }
}

pub struct UpdateProfile(pub ProfileUpdate);

impl Endpoint for UpdateProfile {
    type Response = ProfilePatch;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::put("/api/users/profile")
            .with_json(&self.0)
            .with_fallback("could not save the profile")
    }
}

pub struct ChangePassword(pub PasswordChange);

impl Endpoint for ChangePassword {
    type Response = Value;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::put("/api/users/profile/password")
            .with_json(&self.0)
            .with_fallback("could not change the password")
    }
}

pub struct GetStats;

impl Endpoint for GetStats {
    type Response = Stats;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get("/api/stats").with_fallback("could not load statistics")
    }
}

pub struct AskAssistant {
    pub prompt: String,
}

impl Endpoint for AskAssistant {
    type Response = AssistantAnswer;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::post("/api/gemini/ask")
            .with_json(&AskRequest {
                prompt: self.prompt.clone(),
            })
            .with_fallback("could not get study material")
    }
}

pub struct ListUsers;

impl Endpoint for ListUsers {
    type Response = Vec<UserSummary>;

    fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get("/api/users/list-users").with_fallback("could not load users")
    }
}
