//! Regional WhatsApp groups participants are sent to after registering.

use serde::{Deserialize, Serialize};

use crate::registration::slugify;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityGroup {
    pub city: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityDirectory {
    groups: Vec<CommunityGroup>,
}

impl CommunityDirectory {
    pub fn new(groups: Vec<CommunityGroup>) -> Self {
        Self { groups }
    }

    pub fn builtin() -> Self {
        let group = |city: &str, link: &str| CommunityGroup {
            city: city.to_string(),
            description: format!("Grupo oficial para participantes de {city} e região"),
            link: link.to_string(),
        };

        Self::new(vec![
            group("Marabá", "https://chat.whatsapp.com/HLvLuXLvJbP0VAqyxW9Mt6"),
            group("Santarém", "https://chat.whatsapp.com/EFtRdI41eqYDtExdVkOTxd"),
            group("Benevides", "https://chat.whatsapp.com/HfXIju09BVdKNpkeReLTLc"),
            group("Portel", "https://chat.whatsapp.com/HfXIju09BVdKNpkeReLTLc"),
        ])
    }

    pub fn groups(&self) -> &[CommunityGroup] {
        &self.groups
    }

    /// Finds the group for a city name, ignoring case and accents.
    pub fn for_city(&self, city_name: &str) -> Option<&CommunityGroup> {
        let wanted = slugify(city_name);
        self.groups.iter().find(|group| slugify(&group.city) == wanted)
    }
}

impl Default for CommunityDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}
