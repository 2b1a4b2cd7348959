use serde::{Deserialize, Serialize};

use crate::domain::{
    AppointmentStatus, ChatMessage, Language, Patient, QueueEntry, SessionId, User, ZoneOccupancy,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: SessionId,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientHome {
    pub greeting_name: String,
    pub patient: Patient,
    pub status: AppointmentStatus,
    pub free_minutes: u32,
    pub checked_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicianHome {
    pub display_name: String,
    pub queue: QueueResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", content = "payload", rename_all = "snake_case")]
pub enum HomeView {
    Patient(PatientHome),
    Clinician(ClinicianHome),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub in_queue: usize,
    pub critical_cases: usize,
    pub average_lag_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueResponse {
    pub entries: Vec<QueueEntry>,
    pub stats: QueueStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    pub tick: u64,
    pub zones: Vec<ZoneOccupancy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantRequest {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    OccupancyUpdated(OccupancySnapshot),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, UserRole};

    #[test]
    fn login_request_defaults_language() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"sophie","password":"sophie"}"#).expect("json");
        assert_eq!(req.language, Language::En);
    }

    #[test]
    fn login_response_uses_plain_session_string() {
        let response = LoginResponse {
            session_id: SessionId::random(),
            user: User {
                id: UserId::new("doc-1"),
                username: "doctor".into(),
                name: "Dr. Martin".into(),
                role: UserRole::Doctor,
            },
        };
        let value = serde_json::to_value(&response).expect("json");
        assert_eq!(value["session_id"], response.session_id.to_string());
        assert_eq!(value["user"]["role"], "doctor");
        assert_eq!(value["user"]["id"], "doc-1");
    }

    #[test]
    fn server_event_is_tagged() {
        let event = ServerEvent::OccupancyUpdated(OccupancySnapshot {
            tick: 3,
            zones: Vec::new(),
        });
        let value = serde_json::to_value(&event).expect("json");
        assert_eq!(value["type"], "occupancy_updated");
        assert_eq!(value["payload"]["tick"], 3);
    }
}
