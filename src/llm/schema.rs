//! Response schemas sent with structured generation requests

use serde_json::json;
use serde_json::Value;

/// `{query, detectedType, explanation}`
#[must_use]
pub fn query_normalization_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "query": {
                "type": "STRING",
                "description": "The normalized search term extracted from the input."
            },
            "detectedType": {
                "type": "STRING",
                "enum": ["pincode", "area"],
                "description": "Whether the term is a numeric pincode or a text area."
            },
            "explanation": {
                "type": "STRING",
                "description": "A one-sentence expert context for the user."
            }
        },
        "required": ["query", "detectedType", "explanation"]
    })
}

/// Locality insight object
#[must_use]
pub fn locality_insight_schema() -> Value {
    let string_list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "keyPlaces": string_list,
            "connectivity": { "type": "STRING" },
            "popularFor": string_list,
            "hospitals": string_list,
            "schools": string_list
        },
        "required": ["summary", "keyPlaces", "connectivity", "popularFor", "hospitals", "schools"]
    })
}
