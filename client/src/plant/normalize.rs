use serde_json::Value;
use shared::{PlantCard, PlantDetail, PlantFilters, PlantFlags, PlantKind, PlantPrediction};

use crate::fields::{
    FieldPath, first_id, first_list, first_number, first_present, first_string, key, split_list,
    to_flag,
};
use crate::http::QueryParams;

const GENERAL_ID_FIELDS: [FieldPath; 3] = [key("general_plant_id"), key("plant_id"), key("id")];
const THREATENED_ID_FIELDS: [FieldPath; 2] = [key("threatened_plant_id"), key("plant_id")];
const COMMON_NAME_FIELDS: [FieldPath; 3] = [key("common_name"), key("commonName"), key("name")];
const SCIENTIFIC_NAME_FIELDS: [FieldPath; 2] = [key("scientific_name"), key("scientificName")];
const IMAGE_LIST_FIELDS: [FieldPath; 2] = [key("image_urls"), key("images")];
const OTHER_NAME_FIELDS: [FieldPath; 2] = [key("other_name"), key("other_names")];
const PREDICTION_ID_FIELDS: [FieldPath; 3] = [key("plant_id"), key("general_plant_id"), key("id")];
const SCORE_FIELDS: [FieldPath; 4] = [
    key("score"),
    key("probability"),
    key("confidence"),
    key("prob"),
];

/// `"yes"` / `"no"` filter values; anything else means "don't filter".
pub fn yn_to_bool(v: &str) -> Option<bool> {
    match v {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

fn card_kind(raw: &Value) -> PlantKind {
    match raw.get("id_type").and_then(Value::as_str) {
        Some("threatened") => PlantKind::Threatened,
        Some(_) => PlantKind::General,
        None if key("general_plant_id").get(raw).is_none()
            && key("threatened_plant_id").get(raw).is_some() =>
        {
            PlantKind::Threatened
        }
        None => PlantKind::General,
    }
}

/// Maps a search result item. Items without an id for their kind are rejected.
pub fn normalize_card(raw: &Value) -> Option<PlantCard> {
    let common_name = first_string(raw, &COMMON_NAME_FIELDS).unwrap_or_default();
    let scientific_name = first_string(raw, &SCIENTIFIC_NAME_FIELDS).unwrap_or_default();
    let image_url = first_string(raw, &[key("image_url"), key("image")])
        .or_else(|| first_list(raw, &IMAGE_LIST_FIELDS).into_iter().next());

    Some(match card_kind(raw) {
        PlantKind::General => PlantCard::General {
            general_plant_id: first_id(raw, &GENERAL_ID_FIELDS)?,
            common_name,
            scientific_name,
            image_url,
        },
        PlantKind::Threatened => PlantCard::Threatened {
            threatened_plant_id: first_id(raw, &THREATENED_ID_FIELDS)?,
            common_name,
            scientific_name,
            image_url,
        },
    })
}

/// Maps a plant detail record. Detail endpoints sometimes wrap it in a one-element `items`.
pub fn normalize_detail(raw: &Value) -> Option<PlantDetail> {
    let raw = match raw.get("items").and_then(Value::as_array) {
        Some(items) => items.first()?,
        None => raw,
    };

    let plant_id = first_id(raw, &[key("plant_id")]);
    let general_plant_id = first_id(raw, &[key("general_plant_id")]);
    let threatened_plant_id = first_id(raw, &[key("threatened_plant_id")]);
    if plant_id.is_none() && general_plant_id.is_none() && threatened_plant_id.is_none() {
        return None;
    }

    let flag = |name: &'static str| first_present(raw, &[key(name)]).and_then(to_flag);
    let care_guide = first_present(raw, &[key("care_guide")]).cloned();
    let mut sun_expose = split_list(first_present(raw, &[key("sun_expose")]));
    if sun_expose.is_empty() {
        if let Some(guide) = &care_guide {
            sun_expose = split_list(guide.get("sunlight"));
        }
    }

    Some(PlantDetail {
        plant_id,
        general_plant_id,
        threatened_plant_id,
        common_name: first_string(raw, &COMMON_NAME_FIELDS).unwrap_or_default(),
        scientific_name: first_string(raw, &SCIENTIFIC_NAME_FIELDS).unwrap_or_default(),
        other_names: first_list(raw, &OTHER_NAME_FIELDS),
        flags: PlantFlags {
            threatened: flag("if_threatened"),
            edible: flag("if_edible"),
            indoors: flag("if_indoors"),
            medicinal: flag("if_medicinal"),
            poisonous: flag("if_poisonous"),
            fruits: flag("if_fruits"),
            flowers: flag("if_flowers"),
        },
        sun_expose,
        watering: first_string(raw, &[key("watering"), FieldPath::Nested("care_guide", "watering")]),
        plant_cycle: first_string(raw, &[key("plant_cycle")]),
        growth_rate: first_string(
            raw,
            &[key("growth_rate"), FieldPath::Nested("care_guide", "growth_rate")],
        ),
        image_urls: first_list(raw, &IMAGE_LIST_FIELDS),
        description: first_present(raw, &[key("description")]).cloned(),
        care_guide,
        distribution_map_html: first_string(
            raw,
            &[FieldPath::Nested("distribution_map", "distribution_map_html")],
        ),
        threatened: first_present(raw, &[key("threatened")]).cloned(),
    })
}

/// Card for a detail record. General cards prefer the second image (the first is
/// usually the distribution map), threatened cards use the first.
pub fn card_from_detail(detail: PlantDetail, kind: PlantKind) -> Option<PlantCard> {
    match kind {
        PlantKind::General => {
            let image_url = detail
                .image_urls
                .get(1)
                .or_else(|| detail.image_urls.first())
                .cloned();
            Some(PlantCard::General {
                general_plant_id: detail.general_plant_id.or(detail.plant_id)?,
                common_name: detail.common_name,
                scientific_name: detail.scientific_name,
                image_url,
            })
        }
        PlantKind::Threatened => {
            let image_url = detail.image_urls.first().cloned();
            Some(PlantCard::Threatened {
                threatened_plant_id: detail.threatened_plant_id.or(detail.plant_id)?,
                common_name: detail.common_name,
                scientific_name: detail.scientific_name,
                image_url,
            })
        }
    }
}

pub fn normalize_plant_prediction(raw: &Value) -> Option<PlantPrediction> {
    Some(PlantPrediction {
        plant_id: first_id(raw, &PREDICTION_ID_FIELDS)?,
        score: first_number(raw, &SCORE_FIELDS),
    })
}

/// Adds the search filters that are set. Unset filters never reach the query string.
pub fn apply_filters(params: &mut QueryParams, filters: &PlantFilters) {
    params.insert("if_threatened", filters.threatened);
    params.insert("if_edible", filters.edible);
    params.insert("if_medicinal", filters.medicinal);
    params.insert("if_fruits", filters.fruits);
    params.insert("if_indoors", filters.indoors);
    params.insert("if_poisonous", filters.poisonous);
    params.insert("if_flowers", filters.flowers);

    let sun: Vec<&str> = filters
        .sun
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    params.insert("sun_expose", sun.join(","));
    params.insert("watering", filters.watering.as_deref());
    params.insert("plant_cycle", filters.cycle.as_deref());
    params.insert("growth_rate", filters.growth.as_deref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_kind_follows_id_type() {
        let card = normalize_card(&json!({
            "id_type": "threatened",
            "threatened_plant_id": 8,
            "common_name": "Button Wrinklewort",
            "scientific_name": "Rutidosis leptorrhynchoides",
            "image_url": null
        }))
        .unwrap();
        assert_eq!(card.kind(), PlantKind::Threatened);
        assert_eq!(card.id(), 8);

        let card = normalize_card(&json!({
            "id_type": "general",
            "general_plant_id": "21",
            "common_name": "Lemon Myrtle",
            "image_url": "https://img.test/myrtle.jpg"
        }))
        .unwrap();
        assert_eq!(card.id(), 21);
        assert!(matches!(card, PlantCard::General { image_url: Some(_), .. }));
    }

    #[test]
    fn card_kind_is_inferred_without_id_type() {
        let card = normalize_card(&json!({"threatened_plant_id": 3, "common_name": "x"})).unwrap();
        assert_eq!(card.kind(), PlantKind::Threatened);
        assert!(normalize_card(&json!({"common_name": "no id"})).is_none());
    }

    #[test]
    fn detail_reads_flags_lists_and_wrapped_items() {
        let detail = normalize_detail(&json!({
            "items": [{
                "plant_id": 1,
                "general_plant_id": 11,
                "common_name": "Kangaroo Paw",
                "other_name": "Anigozanthos",
                "if_edible": "no",
                "if_flowers": true,
                "sun_expose": "full sun, part shade",
                "image_urls": ["map.png", "photo.jpg"],
                "care_guide": {"watering": "Average", "sunlight": ["full sun"]},
                "distribution_map": {"distribution_map_html": "<div/>"}
            }]
        }))
        .unwrap();

        assert_eq!(detail.general_plant_id, Some(11));
        assert_eq!(detail.other_names, vec!["Anigozanthos"]);
        assert_eq!(detail.flags.edible, Some(false));
        assert_eq!(detail.flags.flowers, Some(true));
        assert_eq!(detail.flags.poisonous, None);
        assert_eq!(detail.sun_expose, vec!["full sun", "part shade"]);
        assert_eq!(detail.watering.as_deref(), Some("Average"));
        assert_eq!(detail.distribution_map_html.as_deref(), Some("<div/>"));

        let card = card_from_detail(detail, PlantKind::General).unwrap();
        assert!(matches!(
            card,
            PlantCard::General { general_plant_id: 11, image_url: Some(ref url), .. } if url == "photo.jpg"
        ));
    }

    #[test]
    fn detail_sunlight_falls_back_to_care_guide() {
        let detail = normalize_detail(&json!({
            "plant_id": 2,
            "care_guide": {"sunlight": ["part shade"]}
        }))
        .unwrap();
        assert_eq!(detail.sun_expose, vec!["part shade"]);
    }

    #[test]
    fn threatened_card_uses_plant_id_fallback_and_first_image() {
        let detail = normalize_detail(&json!({"plant_id": 5, "image_urls": ["a.jpg", "b.jpg"]})).unwrap();
        let card = card_from_detail(detail, PlantKind::Threatened).unwrap();
        assert_eq!(card.id(), 5);
        assert!(matches!(
            card,
            PlantCard::Threatened { image_url: Some(ref url), .. } if url == "a.jpg"
        ));
    }

    #[test]
    fn filters_map_to_query_parameters() {
        let filters = PlantFilters {
            edible: yn_to_bool("yes"),
            poisonous: yn_to_bool("no"),
            indoors: yn_to_bool("any"),
            sun: vec!["full sun".into(), "".into(), "part shade".into()],
            cycle: Some("Perennial".into()),
            watering: Some(String::new()),
            ..PlantFilters::default()
        };
        let mut params = QueryParams::new();
        apply_filters(&mut params, &filters);

        assert_eq!(params.get("if_edible"), Some("true"));
        assert_eq!(params.get("if_poisonous"), Some("false"));
        assert!(!params.contains("if_indoors"));
        assert_eq!(params.get("sun_expose"), Some("full sun,part shade"));
        assert_eq!(params.get("plant_cycle"), Some("Perennial"));
        assert!(!params.contains("watering"));
    }

    #[test]
    fn plant_prediction_requires_id() {
        let p = normalize_plant_prediction(&json!({"plant_id": 4, "score": "0.5"})).unwrap();
        assert_eq!(p.score, Some(0.5));
        assert!(normalize_plant_prediction(&json!({"score": 0.5})).is_none());
    }
}
