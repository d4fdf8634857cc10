use std::fmt;

use tracing::warn;

use crate::models::{Course, Filiere, Niveau, Paginated};

/// Keep rule shared by both filter modes.
pub fn matches(course: &Course, filiere: Option<u64>, niveau: Option<u64>) -> bool {
    let Some(filiere) = filiere else {
        return true;
    };
    if course.filiere.id != filiere {
        return false;
    }
    niveau.is_none_or(|niveau| course.niveau.id == niveau)
}

/// Narrows one page of courses; paging metadata is carried over as is.
pub fn filter_courses(
    source: &Paginated<Course>,
    filiere: Option<u64>,
    niveau: Option<u64>,
) -> Paginated<Course> {
    let data = source
        .data
        .iter()
        .filter(|course| matches(course, filiere, niveau))
        .cloned()
        .collect();
    source.with_data(data)
}

pub type NiveauCallback = Box<dyn FnMut(Option<u64>) + Send>;

pub enum FilterMode {
    /// Filter what is already loaded.
    Local,
    /// Hand the chosen niveau to the caller, who refetches from the server.
    Remote(NiveauCallback),
}

impl fmt::Debug for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Local => f.write_str("Local"),
            FilterMode::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}

#[derive(Debug)]
pub struct CourseFilter {
    filieres: Vec<Filiere>,
    selected_filiere: Option<u64>,
    selected_niveau: Option<u64>,
    available_niveaux: Vec<Niveau>,
    mode: FilterMode,
}

impl CourseFilter {
    pub fn local(filieres: Vec<Filiere>) -> Self {
        Self::with_mode(filieres, FilterMode::Local)
    }

    pub fn remote<F>(filieres: Vec<Filiere>, on_niveau_change: F) -> Self
    where
        F: FnMut(Option<u64>) + Send + 'static,
    {
        Self::with_mode(filieres, FilterMode::Remote(Box::new(on_niveau_change)))
    }

    fn with_mode(filieres: Vec<Filiere>, mode: FilterMode) -> Self {
        Self {
            filieres,
            selected_filiere: None,
            selected_niveau: None,
            available_niveaux: Vec::new(),
            mode,
        }
    }

    /// Replaces the filière lookup; the niveau choice does not survive it.
    pub fn set_filieres(&mut self, filieres: Vec<Filiere>) {
        self.filieres = filieres;
        self.refresh_niveaux();
    }

    pub fn select_filiere(&mut self, filiere_id: u64) {
        self.selected_filiere = Some(filiere_id);
        self.refresh_niveaux();
    }

    /// Returns false when the niveau is not offered by the selected filière.
    pub fn select_niveau(&mut self, niveau_id: u64) -> bool {
        if !self.available_niveaux.iter().any(|n| n.id == niveau_id) {
            warn!(
                "niveau {} is not part of filiere {:?}, ignored",
                niveau_id, self.selected_filiere
            );
            return false;
        }
        self.selected_niveau = Some(niveau_id);
        true
    }

    fn refresh_niveaux(&mut self) {
        self.selected_niveau = None;
        self.available_niveaux = self
            .selected_filiere
            .and_then(|id| self.filieres.iter().find(|f| f.id == id))
            .map(|f| f.niveaux.clone())
            .unwrap_or_default();
    }

    /// What the list should show for `source`. Remote mode leaves the
    /// source untouched since the server already filtered it.
    pub fn view(&self, source: Option<&Paginated<Course>>) -> Option<Paginated<Course>> {
        let source = source?;
        match self.mode {
            FilterMode::Local => Some(filter_courses(
                source,
                self.selected_filiere,
                self.selected_niveau,
            )),
            FilterMode::Remote(_) => Some(source.clone()),
        }
    }

    /// Sends the selected niveau to the remote callback. Returns false in
    /// local mode, where there is nothing to apply.
    pub fn apply(&mut self) -> bool {
        match &mut self.mode {
            FilterMode::Remote(callback) => {
                callback(self.selected_niveau);
                true
            }
            FilterMode::Local => false,
        }
    }

    pub fn reset(&mut self) {
        self.selected_filiere = None;
        self.selected_niveau = None;
        self.available_niveaux.clear();
        if let FilterMode::Remote(callback) = &mut self.mode {
            callback(None);
        }
    }

    pub fn filieres(&self) -> &[Filiere] {
        &self.filieres
    }

    pub fn selected_filiere(&self) -> Option<u64> {
        self.selected_filiere
    }

    pub fn selected_niveau(&self) -> Option<u64> {
        self.selected_niveau
    }

    pub fn available_niveaux(&self) -> &[Niveau] {
        &self.available_niveaux
    }

    pub fn is_active(&self) -> bool {
        self.selected_filiere.is_some() || self.selected_niveau.is_some()
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.mode, FilterMode::Remote(_))
    }
}
