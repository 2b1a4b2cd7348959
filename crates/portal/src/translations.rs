use shared::domain::{Language, QueueStatus, UserRole};

/// Portal strings outside the guided walk and the assistant.
#[derive(Debug, Clone, Copy)]
pub struct PortalText {
    pub clinic: &'static str,
    pub invalid_credentials: &'static str,
    pub hello: &'static str,
    pub appointment_with: &'static str,
    pub running_late: &'static str,
    pub free_time_prefix: &'static str,
    pub minutes: &'static str,
    pub relax: &'static str,
    pub confirm_arrival: &'static str,
    pub arrive_button: &'static str,
    pub checked_in: &'static str,
    pub head_to: &'static str,
    pub no_notes: &'static str,
}

const EN: PortalText = PortalText {
    clinic: "Clinique Générale d'Annecy",
    invalid_credentials: "Invalid credentials. Please try again.",
    hello: "Hello",
    appointment_with: "Appointment with",
    running_late: "mins late due to an emergency",
    free_time_prefix: "You have ~",
    minutes: "mins",
    relax: "Relax in the cafeteria or waiting room.",
    confirm_arrival: "Please confirm your arrival to join the digital queue.",
    arrive_button: "I have arrived",
    checked_in: "Check-in Confirmed",
    head_to: "Please head to Radiology waiting room.",
    no_notes: "No specific notes available for this patient.",
};

const FR: PortalText = PortalText {
    clinic: "Clinique Générale d'Annecy",
    invalid_credentials: "Identifiants invalides. Réessayez.",
    hello: "Bonjour",
    appointment_with: "Rendez-vous avec",
    running_late: "min de retard (urgence)",
    free_time_prefix: "Vous avez ~",
    minutes: "min",
    relax: "Détendez-vous à la cafétéria ou en salle d'attente.",
    confirm_arrival: "Veuillez confirmer votre arrivée pour rejoindre la file d'attente.",
    arrive_button: "Je suis arrivé",
    checked_in: "Enregistrement confirmé",
    head_to: "Veuillez vous rendre en salle d'attente Radiologie.",
    no_notes: "Aucune note particulière pour ce patient.",
};

impl PortalText {
    pub fn for_language(language: Language) -> &'static Self {
        match language {
            Language::En => &EN,
            Language::Fr => &FR,
        }
    }

    pub fn greeting(&self, first_name: &str) -> String {
        format!("{}, {first_name}", self.hello)
    }

    pub fn free_time(&self, minutes: u32) -> String {
        format!("{}{minutes} {}", self.free_time_prefix, self.minutes)
    }
}

pub fn role_label(role: UserRole, language: Language) -> &'static str {
    match (language, role) {
        (Language::En, UserRole::Patient) => "Patient",
        (Language::En, UserRole::Doctor) => "Doctor",
        (Language::En, UserRole::Personnel) => "Staff",
        (Language::Fr, UserRole::Patient) => "Patient",
        (Language::Fr, UserRole::Doctor) => "Docteur",
        (Language::Fr, UserRole::Personnel) => "Personnel",
    }
}

/// Triage label shown in the clinician queue.
pub fn queue_status_label(status: QueueStatus, language: Language) -> &'static str {
    match (language, status) {
        (Language::En, QueueStatus::CheckedIn) => "Ready",
        (Language::En, QueueStatus::Late) => "Late",
        (Language::En, QueueStatus::Consulting) => "In Progress",
        (Language::En, QueueStatus::Waiting) => "En Route",
        (Language::En, QueueStatus::Done) => "Discharged",
        (Language::Fr, QueueStatus::CheckedIn) => "Prêt",
        (Language::Fr, QueueStatus::Late) => "Retard",
        (Language::Fr, QueueStatus::Consulting) => "En Cours",
        (Language::Fr, QueueStatus::Waiting) => "En Route",
        (Language::Fr, QueueStatus::Done) => "Sorti",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_uses_first_name() {
        let fr = PortalText::for_language(Language::Fr);
        assert_eq!(fr.greeting("Sophie"), "Bonjour, Sophie");
        assert_eq!(
            PortalText::for_language(Language::En).free_time(25),
            "You have ~25 mins"
        );
    }

    #[test]
    fn labels_follow_language() {
        assert_eq!(role_label(UserRole::Personnel, Language::En), "Staff");
        assert_eq!(queue_status_label(QueueStatus::Consulting, Language::Fr), "En Cours");
    }
}
