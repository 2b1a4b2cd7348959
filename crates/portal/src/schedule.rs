//! Mock appointment and clinician queue data behind the home screens.

use chrono::{Duration, NaiveTime};
use shared::{
    domain::{
        AppointmentStatus, DelayStatus, Patient, PatientId, Priority, QueueEntry, QueueEntryId,
        QueueStatus, User, UserRole,
    },
    protocol::{ClinicianHome, HomeView, PatientHome, QueueResponse, QueueStats},
};
use tracing::info;

/// Delays beyond this are flagged as significant.
pub const SIGNIFICANT_DELAY_MINUTES: u32 = 30;

fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| unreachable!("invalid fixture time {hour}:{minute}"))
}

pub fn delay_status(delay_minutes: u32) -> DelayStatus {
    match delay_minutes {
        0 => DelayStatus::OnTime,
        m if m <= SIGNIFICANT_DELAY_MINUTES => DelayStatus::Delayed,
        _ => DelayStatus::SignificantDelay,
    }
}

pub fn appointment_status(scheduled: NaiveTime, delay_minutes: u32) -> AppointmentStatus {
    AppointmentStatus {
        status: delay_status(delay_minutes),
        estimated_time: scheduled + Duration::minutes(i64::from(delay_minutes)),
        delay_minutes,
    }
}

fn entry(
    id: &str,
    slot: NaiveTime,
    patient_name: &str,
    reason: &str,
    status: QueueStatus,
    priority: Priority,
    notes: Option<&str>,
) -> QueueEntry {
    QueueEntry {
        id: QueueEntryId::new(id),
        slot,
        patient_name: patient_name.to_string(),
        reason: reason.to_string(),
        status,
        priority,
        notes: notes.map(str::to_string),
    }
}

#[derive(Debug, Clone)]
pub struct Schedule {
    patient: Patient,
    status: AppointmentStatus,
    queue: Vec<QueueEntry>,
    checked_in: bool,
}

impl Schedule {
    pub fn new(patient: Patient, delay_minutes: u32, queue: Vec<QueueEntry>) -> Self {
        let status = appointment_status(patient.appointment_time, delay_minutes);
        Self {
            patient,
            status,
            queue,
            checked_in: false,
        }
    }

    /// Sophie Dubois' orthopedics visit and Dr. Martin's afternoon list.
    pub fn demo() -> Self {
        let patient = Patient {
            id: PatientId::new("P-12345"),
            name: "Sophie Dubois".into(),
            appointment_time: clock(14, 0),
            doctor: "Dr. Martin".into(),
            department: "Orthopedics".into(),
        };
        use Priority::{Critical, High, Normal};
        use QueueStatus::{CheckedIn, Consulting, Late, Waiting};
        let queue = vec![
            entry(
                "1",
                clock(13, 45),
                "Marc Lavoine",
                "Initial Consult",
                Consulting,
                Normal,
                Some("Referral from Dr. House"),
            ),
            entry(
                "2",
                clock(14, 0),
                "Sophie Dubois",
                "Orthopedics Check",
                CheckedIn,
                High,
                Some("Post-op week 4"),
            ),
            entry(
                "3",
                clock(14, 30),
                "Pierre Niney",
                "Emergency",
                Late,
                Critical,
                Some("Reported severe pain"),
            ),
            entry("4", clock(15, 0), "Alain Delon", "Surgery Prep", Waiting, Normal, None),
            entry("5", clock(15, 30), "Marion Cotillard", "Follow-up", Waiting, Normal, None),
            entry("6", clock(16, 0), "Jean Dujardin", "X-Ray Review", Waiting, Normal, None),
        ];
        Self::new(patient, 25, queue)
    }

    pub fn patient(&self) -> &Patient {
        &self.patient
    }

    pub fn status(&self) -> &AppointmentStatus {
        &self.status
    }

    pub fn queue(&self) -> &[QueueEntry] {
        &self.queue
    }

    pub fn is_checked_in(&self) -> bool {
        self.checked_in
    }

    /// Time the patient can spend elsewhere before being called.
    pub fn free_minutes(&self) -> u32 {
        self.status.delay_minutes
    }

    /// "I have arrived". Returns false when already checked in.
    pub fn check_in(&mut self) -> bool {
        if self.checked_in {
            return false;
        }
        self.checked_in = true;
        info!(patient_id = %self.patient.id, "patient checked in");
        true
    }

    pub fn queue_stats(&self) -> QueueStats {
        let in_queue = self
            .queue
            .iter()
            .filter(|e| {
                matches!(
                    e.status,
                    QueueStatus::CheckedIn | QueueStatus::Late | QueueStatus::Waiting
                )
            })
            .count();
        let critical_cases = self
            .queue
            .iter()
            .filter(|e| e.priority == Priority::Critical && e.status != QueueStatus::Done)
            .count();
        QueueStats {
            in_queue,
            critical_cases,
            average_lag_minutes: self.status.delay_minutes,
        }
    }

    pub fn queue_response(&self) -> QueueResponse {
        QueueResponse {
            entries: self.queue.clone(),
            stats: self.queue_stats(),
        }
    }

    /// Clinicians get the dashboard, everyone else the appointment card.
    pub fn home_view(&self, user: &User) -> HomeView {
        if user.role.is_clinician() {
            HomeView::Clinician(ClinicianHome {
                display_name: clinician_display_name(user),
                queue: self.queue_response(),
            })
        } else {
            HomeView::Patient(PatientHome {
                greeting_name: user.first_name().to_string(),
                patient: self.patient.clone(),
                status: self.status.clone(),
                free_minutes: self.free_minutes(),
                checked_in: self.checked_in,
            })
        }
    }
}

fn clinician_display_name(user: &User) -> String {
    match user.role {
        UserRole::Doctor => {
            let surname = user.name.split_whitespace().last().unwrap_or("Martin");
            format!("Dr. {surname}")
        }
        _ => user.name.clone(),
    }
}

#[cfg(test)]
#[path = "tests/schedule_tests.rs"]
mod tests;
