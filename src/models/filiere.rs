use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filiere {
    pub id: u64,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub niveaux: Vec<Niveau>,
}

/// A level within a filière. Refers back to its filière by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Niveau {
    pub id: u64,
    #[serde(rename = "nom")]
    pub name: String,
    pub filiere_id: u64,
}

impl Filiere {
    pub fn niveau(&self, niveau_id: u64) -> Option<&Niveau> {
        self.niveaux.iter().find(|n| n.id == niveau_id)
    }
}
