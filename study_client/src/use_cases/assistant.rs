use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::GatewayError;
use crate::use_cases::endpoints::AskAssistant;
use crate::use_cases::fetch::fetch;
use crate::use_cases::gateway::SessionGateway;

const DEFAULT_LINK_DESCRIPTION: &str = "recommended resource";

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("link pattern is valid"));

// One line of the assistant's study-material answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyResource {
    Link { url: String, description: String },
    Note(String),
}

// Splits the free-text answer into links and plain notes, skipping blank lines.
pub fn parse_study_resources(text: &str) -> Vec<StudyResource> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match LINK.find(line) {
            Some(found) => {
                let url = found.as_str().to_string();
                let description = line.replacen(&url, "", 1).trim().to_string();
                StudyResource::Link {
                    url,
                    description: if description.is_empty() {
                        DEFAULT_LINK_DESCRIPTION.to_string()
                    } else {
                        description
                    },
                }
            }
            None => StudyResource::Note(line.to_string()),
        })
        .collect()
}

#[tracing::instrument(name = "ask_assistant", skip_all)]
pub async fn ask_assistant(
    gateway: &SessionGateway,
    topic: &str,
) -> Result<Vec<StudyResource>, GatewayError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(GatewayError::Validation("enter a topic to ask about".into()));
    }

    let answer = fetch(
        gateway,
        &AskAssistant {
            prompt: topic.to_string(),
        },
    )
    .await?;
    Ok(parse_study_resources(&answer.text))
}
