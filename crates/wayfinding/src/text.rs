use shared::domain::Language;

use crate::{
    bearing::Steering,
    heading::AccessNotice,
    itinerary::{Maneuver, Waypoint},
};

/// Walk screen strings for one language.
pub struct WalkText {
    pub title: &'static str,
    pub destination: &'static str,
    pub walk_forward: &'static str,
    pub turn_left: &'static str,
    pub turn_right: &'static str,
    pub next_beacon: &'static str,
    pub arrived: &'static str,
    pub start_prompt: &'static str,
    pub step: &'static str,
    pub permission_denied: &'static str,
    pub permission_failed: &'static str,
    pub manual_hint: &'static str,
}

static EN: WalkText = WalkText {
    title: "Navigation",
    destination: "To Radiology",
    walk_forward: "Walk forward",
    turn_left: "Turn left",
    turn_right: "Turn right",
    next_beacon: "Next beacon detected",
    arrived: "You have arrived",
    start_prompt: "Tap to Start Navigation",
    step: "Step",
    permission_denied: "Permission denied. Navigation requires compass access.",
    permission_failed: "Error requesting compass permission",
    manual_hint: "Desktop Mode: Use slider to rotate",
};

static FR: WalkText = WalkText {
    title: "Navigation",
    destination: "Vers Radiologie",
    walk_forward: "Marchez tout droit",
    turn_left: "Tournez à gauche",
    turn_right: "Tournez à droite",
    next_beacon: "Prochaine balise détectée",
    arrived: "Vous êtes arrivé",
    start_prompt: "Appuyez pour naviguer",
    step: "Pas",
    permission_denied: "Permission refusée. La navigation nécessite l'accès à la boussole.",
    permission_failed: "Erreur lors de la demande d'accès à la boussole",
    manual_hint: "Mode bureau : utilisez le curseur pour tourner",
};

impl WalkText {
    pub fn for_language(language: Language) -> &'static WalkText {
        match language {
            Language::En => &EN,
            Language::Fr => &FR,
        }
    }

    pub fn steering(&self, steering: Steering) -> &'static str {
        match steering {
            Steering::Forward => self.walk_forward,
            Steering::TurnLeft => self.turn_left,
            Steering::TurnRight => self.turn_right,
            Steering::WaypointReached => self.next_beacon,
            Steering::Arrived => self.arrived,
        }
    }

    pub fn notice(&self, notice: AccessNotice) -> &'static str {
        match notice {
            AccessNotice::PermissionDenied => self.permission_denied,
            AccessNotice::PermissionRequestFailed => self.permission_failed,
        }
    }
}

/// Instruction for a waypoint, falling back to a generic maneuver phrase.
pub fn waypoint_instruction(waypoint: &Waypoint, language: Language) -> String {
    if let Some(text) = waypoint.instruction() {
        return text.get(language).to_string();
    }
    let generic = match (language, waypoint.maneuver()) {
        (Language::En, Maneuver::Straight) => "Continue straight",
        (Language::En, Maneuver::TurnLeft) => "Turn left",
        (Language::En, Maneuver::TurnRight) => "Turn right",
        (Language::En, Maneuver::UseElevator) => "Take the elevator",
        (Language::En, Maneuver::UseStairs) => "Take the stairs",
        (Language::En, Maneuver::ArrivedAtDestination) => "You have arrived",
        (Language::Fr, Maneuver::Straight) => "Continuez tout droit",
        (Language::Fr, Maneuver::TurnLeft) => "Tournez à gauche",
        (Language::Fr, Maneuver::TurnRight) => "Tournez à droite",
        (Language::Fr, Maneuver::UseElevator) => "Prenez l'ascenseur",
        (Language::Fr, Maneuver::UseStairs) => "Prenez l'escalier",
        (Language::Fr, Maneuver::ArrivedAtDestination) => "Vous êtes arrivé",
    };
    generic.to_string()
}
