use crate::domain::models::{Course, Group, Stats};
use crate::use_cases::endpoints::{GetStats, MyCourses, PublicGroups};
use crate::use_cases::fetch::{FetchState, fetch};
use crate::use_cases::gateway::SessionGateway;

// The three dashboard panes; none depends on another.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub stats: FetchState<Stats>,
    pub courses: FetchState<Vec<Course>>,
    pub groups: FetchState<Vec<Group>>,
}

#[tracing::instrument(name = "load_dashboard", skip_all)]
pub async fn load_dashboard(gateway: &SessionGateway) -> Dashboard {
    // Run all three fetches concurrently; a failure only marks its own pane.
    let (stats, courses, groups) = tokio::join!(
        fetch(gateway, &GetStats),
        fetch(gateway, &MyCourses),
        fetch(gateway, &PublicGroups),
    );

    Dashboard {
        stats: stats.into(),
        courses: courses.into(),
        groups: groups.into(),
    }
}
