use crate::domain::GatewayError;
use crate::use_cases::endpoints::EnrollCourses;
use crate::use_cases::fetch::fetch;
use crate::use_cases::gateway::SessionGateway;

const ENROLLED_MESSAGE: &str = "courses enrolled successfully";

// Courses picked for enrollment, in the order they were picked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseSelection {
    selected: Vec<u64>,
}

impl CourseSelection {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds the course if absent, removes it if present.
    pub fn toggle(&mut self, course_id: u64) {
        if let Some(index) = self.selected.iter().position(|id| *id == course_id) {
            self.selected.remove(index);
        } else {
            self.selected.push(course_id);
        }
    }

    pub fn contains(&self, course_id: u64) -> bool {
        self.selected.contains(&course_id)
    }

    pub fn ids(&self) -> &[u64] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl FromIterator<u64> for CourseSelection {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut selection = Self::new();
        for id in iter {
            if !selection.contains(id) {
                selection.selected.push(id);
            }
        }
        selection
    }
}

#[tracing::instrument(name = "enroll", skip_all, fields(courses = selection.ids().len()))]
pub async fn enroll(
    gateway: &SessionGateway,
    selection: &CourseSelection,
) -> Result<String, GatewayError> {
    if selection.is_empty() {
        return Err(GatewayError::Validation("select at least one course".into()));
    }

    let endpoint = EnrollCourses {
        course_ids: selection.ids().to_vec(),
    };
    let ack = fetch(gateway, &endpoint).await?;
    Ok(ack
        .message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| ENROLLED_MESSAGE.to_string()))
}
