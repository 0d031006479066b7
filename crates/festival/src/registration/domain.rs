use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::format::digits_only;

/// Opaque identifier assigned to a city by the participant service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub String);

/// City offered in the registration selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl City {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CityId(id.into()),
            name: name.into(),
            state: None,
        }
    }

    /// URL-safe key derived from the display name, e.g. `Marabá` -> `maraba`.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Built-in city list used whenever the service cannot provide one.
pub fn fallback_cities() -> Vec<City> {
    vec![
        City::new("550e8400-e29b-41d4-a716-446655440001", "Marabá"),
        City::new("550e8400-e29b-41d4-a716-446655440002", "Santarém"),
        City::new("550e8400-e29b-41d4-a716-446655440003", "Portel"),
        City::new("550e8400-e29b-41d4-a716-446655440004", "Benevides"),
        City::new("550e8400-e29b-41d4-a716-446655440005", "Belém"),
    ]
}

/// Lowercases, strips diacritics, and joins alphanumeric runs with `-`.
///
/// Input is decomposed first, so precomposed (`é`) and combining (`e\u{301}`) spellings
/// produce the same slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
    {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Form fields as the user sees them. Masked fields hold display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDraft {
    pub full_name: String,
    pub document_number: String,
    pub birth_date: String,
    pub phone: String,
    pub email: String,
    pub city_id: CityId,
    pub motivation: String,
    pub regulation_accepted: bool,
}

/// Outbound body for `POST /participants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub birth_date: String,
    pub city_id: CityId,
    pub reason: String,
}

impl From<&ParticipantDraft> for ParticipantRequest {
    fn from(draft: &ParticipantDraft) -> Self {
        Self {
            name: draft.full_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: digits_only(&draft.phone),
            cpf: digits_only(&draft.document_number),
            birth_date: draft.birth_date.trim().to_string(),
            city_id: draft.city_id.clone(),
            reason: draft.motivation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_fold_accents_and_separators() {
        assert_eq!(slugify("Marabá"), "maraba");
        assert_eq!(slugify("Santarém"), "santarem");
        assert_eq!(slugify("  São João do Araguaia "), "sao-joao-do-araguaia");
        assert_eq!(slugify("Belém / PA"), "belem-pa");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn decomposed_accents_slug_like_precomposed_ones() {
        assert_eq!(slugify("Bele\u{301}m"), "belem");
        assert_eq!(slugify("Santare\u{301}m"), slugify("Santarém"));
        assert_eq!(slugify("Sa\u{303}o Joa\u{303}o"), "sao-joao");
        assert_eq!(slugify("Conceic\u{327}a\u{303}o"), "conceicao");
        assert_eq!(slugify("ＰＯＲＴＥＬ"), "portel");
    }

    #[test]
    fn request_uses_digits_only_and_camel_case() {
        let draft = ParticipantDraft {
            full_name: " Maria Silva ".to_string(),
            document_number: "529.982.247-25".to_string(),
            birth_date: "2005-03-10".to_string(),
            phone: "(91) 98765-4321".to_string(),
            email: "maria@example.com".to_string(),
            city_id: CityId("city-1".to_string()),
            motivation: "Louvar".to_string(),
            regulation_accepted: true,
        };

        let request = ParticipantRequest::from(&draft);
        let json = serde_json::to_value(&request).expect("serializes");
        assert_eq!(json["name"], "Maria Silva");
        assert_eq!(json["cpf"], "52998224725");
        assert_eq!(json["phone"], "91987654321");
        assert_eq!(json["birthDate"], "2005-03-10");
        assert_eq!(json["cityId"], "city-1");
        assert_eq!(json["reason"], "Louvar");
    }

    #[test]
    fn cities_deserialize_with_optional_state() {
        let cities: Vec<City> = serde_json::from_str(
            r#"[{"id":"a","name":"Portel","state":"PA"},{"id":"b","name":"Belém"}]"#,
        )
        .expect("parses");
        assert_eq!(cities[0].state.as_deref(), Some("PA"));
        assert_eq!(cities[1].state, None);
        assert_eq!(cities[1].slug(), "belem");
    }

    #[test]
    fn fallback_list_has_five_cities() {
        let cities = fallback_cities();
        assert_eq!(cities.len(), 5);
        assert!(cities.iter().any(|city| city.slug() == "santarem"));
    }
}
