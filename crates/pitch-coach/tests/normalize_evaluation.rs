use pitch_coach::evaluation::{Category, ProposalPriority};
use pitch_coach::normalize;
use serde_json::json;

#[test]
fn model_response_with_gaps_is_completed() {
    let raw = json!({
        "kpis": {
            "call_to_action": { "clear_ask": 90, "urgency": 70 },
            "memorability": { "storytelling": 80, "vivid_language": 80, "hook": 80, "humor": 40 }
        },
        "proposals": [
            { "type": "CTA_IMPROVEMENT", "title": "Konkreter werden", "priority": "HIGH" },
            { "type": "PACING", "priority": "urgent" },
            { "type": "STRUCTURE" },
            { "type": "EXTRA" }
        ],
        "word_count": 96
    });

    let evaluation = normalize(&raw).expect("object input normalizes");

    for category in Category::ALL {
        assert!(evaluation.kpis.get(category).len() >= category.criteria().len());
    }
    assert_eq!(evaluation.kpis.call_to_action["next_steps"], 0.0);
    assert_eq!(evaluation.category_scores.call_to_action, 40.0);
    assert_eq!(evaluation.category_scores.memorability, 70.0);
    // 40 * 0.40 + 70 * 0.15
    assert_eq!(evaluation.overall_score, 26.5);

    let kinds: Vec<_> = evaluation
        .proposals
        .iter()
        .map(|proposal| proposal.kind.as_str())
        .collect();
    assert_eq!(kinds, ["CTA_IMPROVEMENT", "PACING", "STRUCTURE"]);
    assert_eq!(evaluation.proposals[1].priority, ProposalPriority::Medium);
    assert_eq!(evaluation.proposals[1].description, "Siehe Bewertungsdetails");
    assert_eq!(evaluation.word_count, 96);
    assert_eq!(evaluation.summary, "Bewertung abgeschlossen");
}

#[test]
fn top_level_must_be_an_object() {
    assert!(normalize(&serde_json::Value::Null).is_err());
    assert!(normalize(&json!(3.5)).is_err());
}

#[test]
fn normalized_output_round_trips_through_json() {
    let raw = json!({ "kpis": { "structure_time": { "opening": 100 } }, "summary": "Gut" });

    let first = normalize(&raw).expect("object input normalizes");
    let json = serde_json::to_string(&first).expect("serializes");
    let reparsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    let second = normalize(&reparsed).expect("object input normalizes");

    assert_eq!(first.overall_score, second.overall_score);
    assert_eq!(second.summary, "Gut");
}
