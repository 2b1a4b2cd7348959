use serde::{Deserialize, Serialize};
use shared::domain::Language;
use thiserror::Error;

use crate::bearing::FULL_TURN_DEGREES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Maneuver {
    Straight,
    TurnLeft,
    TurnRight,
    UseElevator,
    UseStairs,
    ArrivedAtDestination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub fr: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, fr: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            fr: fr.into(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Fr => &self.fr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    sequence_index: usize,
    remaining_distance: u32,
    maneuver: Maneuver,
    target_heading_degrees: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instruction: Option<LocalizedText>,
}

impl Waypoint {
    /// The sequence index is assigned when the waypoint joins an [`Itinerary`].
    pub fn new(remaining_distance: u32, maneuver: Maneuver, target_heading_degrees: u16) -> Self {
        Self {
            sequence_index: 0,
            remaining_distance,
            maneuver,
            target_heading_degrees,
            instruction: None,
        }
    }

    pub fn with_instruction(mut self, instruction: LocalizedText) -> Self {
        self.instruction = Some(instruction);
        self
    }

    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn remaining_distance(&self) -> u32 {
        self.remaining_distance
    }

    pub fn maneuver(&self) -> Maneuver {
        self.maneuver
    }

    pub fn target_heading_degrees(&self) -> u16 {
        self.target_heading_degrees
    }

    pub fn instruction(&self) -> Option<&LocalizedText> {
        self.instruction.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItineraryError {
    #[error("itinerary must contain at least one waypoint")]
    Empty,
    #[error("final waypoint must be the destination, found {found:?}")]
    MissingDestination { found: Maneuver },
    #[error("destination waypoint must have zero distance, found {distance}m")]
    DestinationDistance { distance: u32 },
    #[error("waypoint {index} is a destination but is not the final waypoint")]
    EarlyDestination { index: usize },
    #[error("waypoint {index} target heading {heading} is outside [0, 360)")]
    HeadingOutOfRange { index: usize, heading: u16 },
}

/// Fixed, ordered walk from the starting point to a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    waypoints: Vec<Waypoint>,
}

impl Itinerary {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, ItineraryError> {
        let Some(last) = waypoints.last() else {
            return Err(ItineraryError::Empty);
        };
        if last.maneuver != Maneuver::ArrivedAtDestination {
            return Err(ItineraryError::MissingDestination {
                found: last.maneuver,
            });
        }
        if last.remaining_distance != 0 {
            return Err(ItineraryError::DestinationDistance {
                distance: last.remaining_distance,
            });
        }

        let last_index = waypoints.len() - 1;
        for (index, waypoint) in waypoints.iter().enumerate() {
            if f64::from(waypoint.target_heading_degrees) >= FULL_TURN_DEGREES {
                return Err(ItineraryError::HeadingOutOfRange {
                    index,
                    heading: waypoint.target_heading_degrees,
                });
            }
            if index != last_index && waypoint.maneuver == Maneuver::ArrivedAtDestination {
                return Err(ItineraryError::EarlyDestination { index });
            }
        }

        let waypoints = waypoints
            .into_iter()
            .enumerate()
            .map(|(index, waypoint)| Waypoint {
                sequence_index: index,
                ..waypoint
            })
            .collect();
        Ok(Self { waypoints })
    }

    /// Demo route from the entrance to the radiology waiting room.
    pub fn radiology() -> Self {
        let waypoints = vec![
            Waypoint::new(15, Maneuver::Straight, 0).with_instruction(LocalizedText::new(
                "Head straight towards Radiology",
                "Allez tout droit vers la Radiologie",
            )),
            Waypoint::new(10, Maneuver::TurnLeft, 270).with_instruction(LocalizedText::new(
                "Turn left at the corridor",
                "Tournez à gauche dans le couloir",
            )),
            Waypoint::new(5, Maneuver::UseStairs, 0).with_instruction(LocalizedText::new(
                "Take stairs up to Floor 2",
                "Prenez l'escalier vers l'étage 2",
            )),
            Waypoint::new(0, Maneuver::ArrivedAtDestination, 0).with_instruction(
                LocalizedText::new(
                    "Arrived at Dr. Martin's Waiting Room",
                    "Arrivé en salle d'attente du Dr Martin",
                ),
            ),
        ];
        // the literal route satisfies every constructor check
        Self::new(waypoints).unwrap_or_else(|error| unreachable!("radiology route: {error}"))
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false: construction rejects empty itineraries.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }
}
