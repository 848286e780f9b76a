//! Prompt builder: turns a matched knowledge entry and the user question into
//! instructions that keep the model inside the entry's answer.

use faqbot_core::{AssistantConfig, KnowledgeEntry};

const ANSWER_MARKER: &str = "\nAnswer: ";
const RULES_MARKER: &str = "\n\nRules:";

/// Who the assistant speaks for, and where unanswerable questions are sent.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantProfile {
    pub brand: String,
    pub contact_email: String,
    pub location: String,
}

impl From<&AssistantConfig> for AssistantProfile {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            brand: config.brand.clone(),
            contact_email: config.contact_email.clone(),
            location: config.location.clone(),
        }
    }
}

impl AssistantProfile {
    fn mail_link(&self) -> String {
        format!("<a href='mailto:{0}'>{0}</a>", self.contact_email)
    }

    /// Fixed reply when no knowledge entry matched.
    pub fn fallback_reply(&self) -> String {
        format!(
            "Entschuldigung, das habe ich nicht verstanden. Bitte stellen Sie eine klare Frage oder senden Sie uns eine E-Mail an {}.",
            self.mail_link()
        )
    }

    /// Sentence the model must use verbatim when the entry does not cover the question.
    pub fn uncertain_reply(&self) -> String {
        format!(
            "Entschuldigung, das habe ich nicht verstanden. Bitte stellen Sie eine klare Frage oder senden Sie uns eine E-Mail an {}, damit wir Ihnen besser weiterhelfen können.",
            self.mail_link()
        )
    }
}

/// Builds the model prompt for a matched entry.
pub fn build_prompt(profile: &AssistantProfile, entry: &KnowledgeEntry, question: &str) -> String {
    let patterns = entry.pattern_list().join(", ");
    format!(
        "You are the official chat assistant of {brand}.\n\
         \n\
         Answer the user's question using only the knowledge entry below. \
         Treat its patterns as example phrasings of questions this entry covers.\n\
         \n\
         Knowledge entry:\n\
         Patterns: {patterns}{answer_marker}{answer}{rules_marker}\n\
         - Use only the information in the Answer field. Do not add, guess or invent facts.\n\
         - If the Answer already fits, repeat it naturally with at most small changes for fluency.\n\
         - Always reply in German, whatever language the question is in.\n\
         - Questions about \"you\" refer to {brand}.\n\
         - Any question about address or location is answered with \"{location}\".\n\
         - Be professional, friendly and concise, as a company chatbot.\n\
         - Do not prefix the reply with labels such as \"Antwort:\" or \"Answer:\" and do not wrap it in quotes.\n\
         - If the Answer does not cover the question, reply exactly:\n  \"{uncertain}\"\n\
         \n\
         User question: {question}\n\
         \n\
         Reply (strictly based on the knowledge entry):\n",
        brand = profile.brand,
        patterns = patterns,
        answer_marker = ANSWER_MARKER,
        answer = entry.answer_text(),
        rules_marker = RULES_MARKER,
        location = profile.location,
        uncertain = profile.uncertain_reply(),
        question = question,
    )
}

/// The Answer field of a prompt built by [`build_prompt`], if present.
pub(crate) fn extract_prompt_answer(prompt: &str) -> Option<&str> {
    let (_, rest) = prompt.split_once(ANSWER_MARKER)?;
    let (answer, _) = rest.split_once(RULES_MARKER)?;
    Some(answer.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> AssistantProfile {
        AssistantProfile::from(&AssistantConfig::default())
    }

    #[test]
    fn fallback_points_to_contact_email() {
        let reply = profile().fallback_reply();
        assert!(reply.starts_with("Entschuldigung, das habe ich nicht verstanden."));
        assert!(reply.contains("<a href='mailto:info@labelmonster.eu'>info@labelmonster.eu</a>."));
    }

    #[test]
    fn prompt_carries_entry_question_and_rules() {
        let entry = KnowledgeEntry::new(["Öffnungszeiten", "Adresse"], "Mo-Fr 9-17 Uhr");
        let prompt = build_prompt(&profile(), &entry, "Wann habt ihr offen?");
        assert!(prompt.contains("official chat assistant of Labelmonster"));
        assert!(prompt.contains("Patterns: Öffnungszeiten, Adresse\nAnswer: Mo-Fr 9-17 Uhr\n\nRules:"));
        assert!(prompt.contains("User question: Wann habt ihr offen?"));
        assert!(prompt.contains("Always reply in German"));
        assert!(prompt.contains("\"Großenbaumer Allee 98, 47269 Duisburg\""));
        assert!(prompt.contains("damit wir Ihnen besser weiterhelfen können."));
    }

    #[test]
    fn answer_round_trips_through_prompt() {
        let entry = KnowledgeEntry::new(["Versand"], "Versand mit DHL.\nKostenlos ab 50 EUR.");
        let prompt = build_prompt(&profile(), &entry, "Versand?");
        assert_eq!(
            extract_prompt_answer(&prompt),
            Some("Versand mit DHL.\nKostenlos ab 50 EUR.")
        );
    }

    #[test]
    fn entry_without_answer_builds_empty_answer_field() {
        let entry = KnowledgeEntry {
            patterns: Some(vec!["Versand".to_string()]),
            answer: None,
        };
        let prompt = build_prompt(&profile(), &entry, "Versand?");
        assert_eq!(extract_prompt_answer(&prompt), Some(""));
    }
}
