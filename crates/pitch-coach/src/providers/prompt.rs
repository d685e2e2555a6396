use std::fmt::Write;

use super::PitchDuration;
use crate::evaluation::{Category, MAX_PROPOSALS};

pub(crate) const SYSTEM_PROMPT: &str = "Du bist ein erfahrener Pitch-Coach. Du bewertest \
kurze gesprochene Präsentationen streng, fair und ausschließlich anhand des vorgegebenen \
Bewertungsrasters. Antworte nur mit einem JSON-Objekt.";

/// User message asking the model to score `transcript` against the rubric.
pub fn evaluation_prompt(transcript: &str, duration: PitchDuration) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "Bewerte den folgenden Pitch mit einer Zielzeit von {} Sekunden.",
        duration.seconds()
    );
    prompt.push_str("\nBewertungsraster (jedes Kriterium 0-100 Punkte):\n");
    for category in Category::ALL {
        let _ = writeln!(
            prompt,
            "- {} (\"{}\", Gewicht {:.0}%): {}",
            category.label(),
            category.key(),
            category.weight() * 100.0,
            category.criteria().join(", ")
        );
    }

    let _ = write!(
        prompt,
        "\nAntwortformat:\n{{\"kpis\": {{\"<kategorie>\": {{\"<kriterium>\": <zahl>}}}}, \
\"proposals\": [{{\"type\": \"<TYP>\", \"title\": \"...\", \"description\": \"...\", \
\"priority\": \"HIGH|MEDIUM|LOW\"}}], \"word_count\": <zahl>, \"summary\": \"...\"}}\n\
Maximal {} Verbesserungsvorschläge.\n\nTranskript:\n\"\"\"\n{}\n\"\"\"\n",
        MAX_PROPOSALS,
        transcript.trim()
    );

    prompt
}
