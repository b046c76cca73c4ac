use serde_json::Value;
use shared::{NormalizedDiseaseRecord, NormalizedPrediction};

use crate::fields::{
    FieldPath, first_id, first_list, first_number, first_present, first_string, key, to_fraction,
};

const ID_FIELDS: [FieldPath; 3] = [key("plant_disease_id"), key("disease_id"), key("id")];
const NAME_FIELDS: [FieldPath; 3] = [key("common_name"), key("name"), key("disease_name")];
const SCIENTIFIC_NAME_FIELDS: [FieldPath; 2] = [key("scientific_name"), key("scientificName")];
const IMAGE_FIELDS: [FieldPath; 4] = [
    key("regular_url_images"),
    key("image_urls"),
    key("images"),
    key("image_url"),
];
const HOST_FIELDS: [FieldPath; 2] = [key("host"), key("hosts")];
const ALIAS_FIELDS: [FieldPath; 3] = [key("other_name"), key("other_names"), key("aliases")];

pub const PREDICTION_ID_FIELDS: [FieldPath; 6] = [
    key("plant_disease_id"),
    key("disease_id"),
    key("predicted_id"),
    key("id"),
    FieldPath::Nested("disease", "id"),
    FieldPath::Nested("prediction", "id"),
];
pub const SCORE_FIELDS: [FieldPath; 4] = [
    key("score"),
    key("probability"),
    key("confidence"),
    key("prob"),
];

/// Maps one raw disease record. Records without a numeric id are rejected.
pub fn normalize_disease(raw: &Value) -> Option<NormalizedDiseaseRecord> {
    let id = first_id(raw, &ID_FIELDS)?;

    let sections = raw
        .get("description")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    Some(NormalizedDiseaseRecord {
        id,
        name: first_string(raw, &NAME_FIELDS).unwrap_or_default(),
        scientific_name: first_string(raw, &SCIENTIFIC_NAME_FIELDS).unwrap_or_default(),
        images: first_list(raw, &IMAGE_FIELDS),
        hosts: first_list(raw, &HOST_FIELDS),
        aliases: first_list(raw, &ALIAS_FIELDS),
        symptoms: section_text(sections.first())
            .or_else(|| first_string(raw, &[key("symptoms")]))
            .unwrap_or_default(),
        diagnosis: section_text(sections.get(1))
            .or_else(|| first_string(raw, &[key("diagnosis")]))
            .unwrap_or_default(),
        treatment: treatment_text(raw)
            .or_else(|| first_string(raw, &[key("treatment")]))
            .unwrap_or_default(),
        prevention: first_string(raw, &[key("prevention")]).unwrap_or_default(),
    })
}

pub fn normalize_diseases(items: &[Value]) -> Vec<NormalizedDiseaseRecord> {
    items.iter().filter_map(normalize_disease).collect()
}

/// Description sections are `{"description": "..."}` objects, occasionally bare strings.
fn section_text(section: Option<&Value>) -> Option<String> {
    let text = match section? {
        Value::String(s) => s.as_str(),
        other => other.get("description")?.as_str()?,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Solution steps rendered as "subtitle\ndescription" blocks separated by blank lines.
fn treatment_text(raw: &Value) -> Option<String> {
    let steps = raw.get("solution")?.as_array()?;
    let blocks: Vec<String> = steps
        .iter()
        .filter_map(|step| {
            let subtitle = step.get("subtitle").and_then(Value::as_str).unwrap_or("");
            let description = step.get("description").and_then(Value::as_str).unwrap_or("");
            let block = if subtitle.is_empty() {
                description.to_string()
            } else {
                format!("{}\n{}", subtitle, description)
            };
            let block = block.trim();
            (!block.is_empty()).then(|| block.to_string())
        })
        .collect();
    (!blocks.is_empty()).then(|| blocks.join("\n\n"))
}

/// Maps one raw recognizer candidate. Candidates without a resolvable id are rejected.
pub fn normalize_prediction(raw: &Value) -> Option<NormalizedPrediction> {
    let disease_id = first_id(raw, &PREDICTION_ID_FIELDS)?;
    Some(NormalizedPrediction {
        disease_id,
        score: first_number(raw, &SCORE_FIELDS),
        confidence: first_present(raw, &[key("confidence")]).and_then(to_fraction),
    })
}

pub fn normalize_predictions(items: &[Value]) -> Vec<NormalizedPrediction> {
    items.iter().filter_map(normalize_prediction).collect()
}
