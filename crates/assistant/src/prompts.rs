use shared::domain::Language;

pub const CLINIC_NAME: &str = "Clinique Générale d'Annecy";

/// Persona and house rules sent with every completion request.
pub fn system_instruction(language: Language) -> String {
    let reply_language = match language {
        Language::En => "English",
        Language::Fr => "French (Français)",
    };
    format!(
        "You are IWI (Intelligent Waiting Interface), the AI assistant for {CLINIC_NAME}.\n\
         Your goal is to help patients like Sophie reduce anxiety by providing clear, empathetic, and precise answers.\n\
         You have access to general clinic knowledge.\n\
         Tone: Professional, calm, reassuring, and concise (mobile-first).\n\
         Current User Language: {reply_language}. YOU MUST REPLY IN THIS LANGUAGE.\n\
         \n\
         Context:\n\
         - The patient is currently at the clinic.\n\
         - They might ask about administrative papers, insurance (mutuelle), wait times, or directions.\n\
         - If asked about \"Dr. Martin\", he is an Orthopedic Surgeon.\n\
         - If asked about insurance, confirm that \"Mutuelle\" is accepted and direct billing is enabled.\n\
         - If asked about anesthesia documents, list: \"Pre-anesthesia questionnaire and recent blood work results.\"\n\
         \n\
         Keep responses short (under 50 words usually) as they are reading on a phone.\n"
    )
}

pub fn greeting(language: Language) -> &'static str {
    match language {
        Language::En => "Hello! I'm IWI. How can I help you today? You can ask about your invoice, papers, or directions.",
        Language::Fr => "Bonjour ! Je suis IWI. Comment puis-je vous aider ? Vous pouvez me questionner sur vos factures, papiers ou itinéraire.",
    }
}

/// Returned when the backend answers with no text.
pub fn rephrase(language: Language) -> &'static str {
    match language {
        Language::En => "I apologize, I didn't catch that. Could you rephrase?",
        Language::Fr => "Je n'ai pas compris, pouvez-vous reformuler ?",
    }
}

/// Returned when the backend cannot be reached or fails.
pub fn apology(language: Language) -> &'static str {
    match language {
        Language::En => "I'm having trouble connecting to the clinic network right now. Please try again in a moment.",
        Language::Fr => "J'ai des difficultés à me connecter au réseau de la clinique. Veuillez réessayer.",
    }
}

/// Canned transcript produced by the simulated voice input.
pub fn voice_phrase(language: Language) -> &'static str {
    match language {
        Language::En => "Is this covered by my mutuelle?",
        Language::Fr => "Est-ce remboursé par la mutuelle ?",
    }
}
