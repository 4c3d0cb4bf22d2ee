use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Course, Player, parse_timestamp};
use crate::mvu::round_form::Msg;

pub mod client;
pub mod parse;
pub mod prompt;

pub use client::{OpenAiVisionModel, VisionModel};
pub use parse::{parse_extracted_round, parse_model_reply, strip_code_fences};
pub use prompt::build_prompt;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("vision model API key not configured")]
    Configuration,
    #[error("vision model API error ({status})")]
    Upstream { status: u16, body: String },
    #[error("no analysis result from vision model")]
    EmptyResult,
    #[error("vision model returned malformed JSON: {0}")]
    MalformedResult(String),
    #[error("could not reach vision model: {0}")]
    Network(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CapturePlayer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Player> for CapturePlayer {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            first_name: player.first_name.clone(),
            last_name: player.last_name.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CaptureCourse {
    pub id: String,
    pub name: String,
}

impl From<&Course> for CaptureCourse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            name: course.name.clone(),
        }
    }
}

/// Body of the proxy endpoint. Every field is optional here so absence can be answered with a 400.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct CaptureRequest {
    #[serde(rename = "imageBase64")]
    pub image_base64: Option<String>,
    pub players: Option<Vec<CapturePlayer>>,
    pub courses: Option<Vec<CaptureCourse>>,
}

/// Body of the review path: the image only, candidates come from storage.
#[derive(Deserialize, Clone, Debug)]
pub struct CaptureReviewRequest {
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
}

/// The model's best guess at a round. Nothing in it is trusted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ExtractedRound {
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub played_at: Option<String>,
    #[serde(default)]
    pub round_scores: Vec<ExtractedRoundScore>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ExtractedRoundScore {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub gross_score: Option<i32>,
    #[serde(default)]
    pub round_score_holes: Vec<ExtractedHole>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtractedHole {
    pub hole_number: i32,
    pub gross_score: i32,
}

impl ExtractedRound {
    /// Round-form messages that pre-fill the manual form with this guess.
    /// Unknown course or player ids are dropped, as are holes the course does not have.
    #[must_use]
    pub fn to_form_messages(&self, courses: &[Course], players: &[Player]) -> Vec<Msg> {
        let mut msgs = Vec::new();

        let course = self
            .course_id
            .as_deref()
            .and_then(|id| Uuid::parse_str(id.trim()).ok())
            .and_then(|id| courses.iter().find(|c| c.id == id));
        if let Some(course) = course {
            msgs.push(Msg::SelectCourse(course.id));
        }

        if let Some(played_at) = self.played_at.as_deref().and_then(parse_timestamp) {
            msgs.push(Msg::SetPlayedAt(
                played_at.format("%Y-%m-%dT%H:%M").to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for score in &self.round_scores {
            let Some(player) = score
                .player_id
                .as_deref()
                .and_then(|id| Uuid::parse_str(id.trim()).ok())
                .and_then(|id| players.iter().find(|p| p.id == id))
            else {
                continue;
            };
            if !seen.insert(player.id) {
                continue;
            }
            msgs.push(Msg::TogglePlayer(player.id));

            let Some(course) = course else {
                continue;
            };
            for hole in &score.round_score_holes {
                if course
                    .course_holes
                    .iter()
                    .any(|ch| ch.hole_number == hole.hole_number)
                {
                    msgs.push(Msg::SetHoleScore {
                        player_id: player.id,
                        hole_number: hole.hole_number,
                        value: hole.gross_score.to_string(),
                    });
                }
            }
        }
        msgs
    }
}

/// Prefixes bare base64 with a jpeg data-URI header; data URIs pass through.
#[must_use]
pub fn image_data_uri(image_base64: &str) -> String {
    let image = image_base64.trim();
    if image.starts_with("data:") {
        image.to_string()
    } else {
        format!("data:image/jpeg;base64,{image}")
    }
}

/// Scorecard extraction backed by a vision model.
#[derive(Clone)]
pub struct CaptureService {
    model: Arc<dyn VisionModel>,
    enabled: bool,
}

impl CaptureService {
    /// `enabled` only controls whether the form offers a photo upload; the proxy always answers.
    #[must_use]
    pub fn new(model: Arc<dyn VisionModel>, enabled: bool) -> Self {
        Self { model, enabled }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sends the image and candidates to the model and returns its JSON verbatim.
    ///
    /// # Errors
    ///
    /// Any `CaptureError`; none are retried
    pub async fn extract_json(
        &self,
        image_base64: &str,
        players: &[CapturePlayer],
        courses: &[CaptureCourse],
    ) -> Result<Value, CaptureError> {
        let prompt = build_prompt(players, courses);
        let reply = self
            .model
            .complete(&prompt, &image_data_uri(image_base64))
            .await?;
        parse_model_reply(&reply)
    }

    /// # Errors
    ///
    /// Any `CaptureError`, including a reply that is JSON but not a round
    pub async fn extract_round(
        &self,
        image_base64: &str,
        players: &[Player],
        courses: &[Course],
    ) -> Result<ExtractedRound, CaptureError> {
        let players: Vec<CapturePlayer> = players.iter().map(CapturePlayer::from).collect();
        let courses: Vec<CaptureCourse> = courses.iter().map(CaptureCourse::from).collect();
        let value = self.extract_json(image_base64, &players, &courses).await?;
        parse_extracted_round(value)
    }
}
