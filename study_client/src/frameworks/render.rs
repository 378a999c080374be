// Terminal output for CLI results: plain text by default, JSON on request.

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::models::{Course, Group, Meeting, MeetingKind, Stats, UserProfile, UserSummary};
use crate::use_cases::FetchState;
use crate::use_cases::assistant::StudyResource;
use crate::use_cases::dashboard::Dashboard;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

pub fn message(output: Output, text: &str) {
    match output {
        Output::Text => println!("{text}"),
        Output::Json => print_json(&json!({ "message": text })),
    }
}

pub fn courses(output: Output, courses: &[Course]) {
    if output == Output::Json {
        return print_json(&courses);
    }
    if courses.is_empty() {
        println!("No courses.");
        return;
    }
    for course in courses {
        println!("{}", course_line(course));
    }
}

pub fn groups(output: Output, groups: &[Group]) {
    if output == Output::Json {
        return print_json(&groups);
    }
    if groups.is_empty() {
        println!("No groups.");
        return;
    }
    for group in groups {
        println!("{}", group_line(group));
    }
}

pub fn group(output: Output, group: &Group, meetings: &[Meeting]) {
    if output == Output::Json {
        return print_json(&json!({ "group": group, "meetings": meetings }));
    }

    println!("{}", group_line(group));
    if let Some(description) = group.description.as_deref().filter(|text| !text.is_empty()) {
        println!("  {description}");
    }
    if let Some(creator) = &group.creator {
        println!("  created by {}", creator.name);
    }
    println!("  members ({}):", group.members.len());
    for member in &group.members {
        println!("    - {} <{}> [{}]", member.name, member.email, member.role.as_wire());
    }
    println!("  meetings ({}):", meetings.len());
    for meeting in meetings {
        println!("    - {}", meeting_line(meeting));
    }
}

pub fn meetings(output: Output, meetings: &[Meeting]) {
    if output == Output::Json {
        return print_json(&meetings);
    }
    if meetings.is_empty() {
        println!("No meetings scheduled.");
        return;
    }
    for meeting in meetings {
        println!("{}", meeting_line(meeting));
    }
}

pub fn profile(output: Output, profile: &UserProfile) {
    if output == Output::Json {
        return print_json(profile);
    }
    println!("name:      {}", profile.name);
    println!("email:     {}", profile.email);
    println!("numberreg: {}", profile.numberreg);
    println!("semester:  {}", profile.semester);
    println!("role:      {}", profile.role.as_wire());
}

pub fn users(output: Output, users: &[UserSummary]) {
    if output == Output::Json {
        return print_json(&users);
    }
    for user in users {
        println!("#{} {} <{}> [{}]", user.id, user.name, user.email, user.role.as_wire());
    }
}

pub fn stats(output: Output, stats: &Stats) {
    if output == Output::Json {
        return print_json(stats);
    }
    println!(
        "active users: {} today, {} this week, {} this year",
        stats.users.today, stats.users.week, stats.users.year
    );
    for group in &stats.top_groups {
        println!("  #{} {} ({} members)", group.id, group.name, group.member_count);
    }
}

pub fn resources(output: Output, resources: &[StudyResource]) {
    if output == Output::Json {
        return print_json(&resources);
    }
    for resource in resources {
        match resource {
            StudyResource::Link { url, description } => println!("- {url} ({description})"),
            StudyResource::Note(text) => println!("  {text}"),
        }
    }
}

pub fn dashboard(output: Output, dashboard: &Dashboard) {
    if output == Output::Json {
        return print_json(&json!({
            "stats": pane_json(&dashboard.stats),
            "courses": pane_json(&dashboard.courses),
            "groups": pane_json(&dashboard.groups),
        }));
    }

    println!("== statistics");
    match &dashboard.stats {
        FetchState::Loaded(value) => stats(output, value),
        other => pane_status(other),
    }
    println!("== my courses");
    match &dashboard.courses {
        FetchState::Loaded(value) => courses(output, value),
        other => pane_status(other),
    }
    println!("== public groups");
    match &dashboard.groups {
        FetchState::Loaded(value) => groups(output, value),
        other => pane_status(other),
    }
}

fn pane_status<T>(state: &FetchState<T>) {
    match state {
        FetchState::Loading => println!("loading..."),
        FetchState::Failed(err) => println!("error: {err}"),
        FetchState::Loaded(_) => {}
    }
}

fn pane_json<T: Serialize>(state: &FetchState<T>) -> Value {
    match state {
        FetchState::Loaded(value) => serde_json::to_value(value).unwrap_or(Value::Null),
        FetchState::Failed(err) => json!({ "error": err.to_string() }),
        FetchState::Loading => Value::Null,
    }
}

fn course_line(course: &Course) -> String {
    format!(
        "#{} {} {} (group {}, {}, semester {})",
        course.id, course.code, course.name, course.group, course.schedule, course.semester
    )
}

fn group_line(group: &Group) -> String {
    let visibility = if group.is_public { "public" } else { "private" };
    let course = group
        .course
        .as_ref()
        .map(|course| format!(" [{} {}]", course.code, course.name))
        .unwrap_or_default();
    format!("#{} {}{} ({visibility})", group.id, group.name, course)
}

fn meeting_line(meeting: &Meeting) -> String {
    let place = match meeting.kind {
        MeetingKind::Virtual => meeting.link.clone().unwrap_or_default(),
        MeetingKind::InPerson => meeting.location.clone().unwrap_or_default(),
    };
    let topic = meeting
        .topic_name
        .as_deref()
        .map(|topic| format!(" topic: {topic}"))
        .unwrap_or_default();
    format!(
        "#{} {} -> {} {} {} [{}]{}",
        meeting.id,
        meeting.start_time,
        meeting.end_time,
        meeting.kind.as_wire(),
        place,
        meeting.status,
        topic
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::error!(error = %err, "failed to encode output."),
    }
}
