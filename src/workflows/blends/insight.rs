use serde::Serialize;

use super::domain::{BlendRecord, OptimizationCategory};

/// Instruction and context strings handed to an external text-completion
/// collaborator. The collaborator's answer is an opaque annotation; nothing
/// here parses it or lets it influence ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightRequest {
    pub question: String,
    pub prompt: String,
}

/// Outbound seam for the text-completion collaborator. The core never calls
/// it directly; hosts wire in an adapter and own retry/cancellation policy.
pub trait InsightClient: Send + Sync {
    fn complete(&self, request: &InsightRequest) -> Result<String, InsightError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("insight transport unavailable: {0}")]
    Transport(String),
}

/// Prompt asking why an ingredient improves a base polymer on one property
/// axis, citing the catalog reference when the record carries one.
pub fn blend_insight_request(
    record: &BlendRecord,
    category: OptimizationCategory,
) -> InsightRequest {
    let property = category.label().to_lowercase();
    let question = format!(
        "How does {} improve {} for {}?",
        record.ingredient,
        record.base_polymer,
        category.label()
    );

    let mechanisms = "Discuss common mechanisms such as flexibility enhancement, \
         crystallinity improvement, adhesion, or barrier performance.";

    let prompt = match record
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|reference| !reference.is_empty())
    {
        Some(reference) => format!(
            "Based on the paper at {reference}, explain how blending {ingredient} with \
             {base} enhances its {property} properties. Mention mechanisms and \
             experimental outcomes if relevant. If the paper is not relevant to the \
             question, explain how blending {ingredient} with {base} improves its \
             {property} properties. {mechanisms}",
            ingredient = record.ingredient,
            base = record.base_polymer,
        ),
        None => format!(
            "Explain how blending {ingredient} with {base} improves its {property} \
             properties. {mechanisms}",
            ingredient = record.ingredient,
            base = record.base_polymer,
        ),
    };

    InsightRequest { question, prompt }
}

/// One-sentence material description prompt used by the detail views.
pub fn material_summary_request(material: &str) -> InsightRequest {
    InsightRequest {
        question: format!("Tell me about the material: {material}."),
        prompt: "Provide a brief description including its properties, uses, and \
                 sustainability aspects. Give only one sentence in response."
            .to_string(),
    }
}
