use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything locale-specific a session needs: labels keyed by field/step
/// label key, option lists keyed by picker field id, and UI messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LocaleBundle {
    #[serde(default)]
    pub labels: IndexMap<String, String>,
    #[serde(default)]
    pub options: IndexMap<String, Vec<OptionDefinition>>,
    #[serde(default)]
    pub messages: Messages,
}

impl LocaleBundle {
    pub fn new(messages: Messages) -> Self {
        Self {
            labels: IndexMap::new(),
            options: IndexMap::new(),
            messages,
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.labels.insert(key.into(), text.into());
        self
    }

    pub fn with_options(
        mut self,
        field: impl Into<String>,
        options: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        let options = options
            .into_iter()
            .map(|(id, label)| OptionDefinition::new(id, label))
            .collect();
        self.options.insert(field.into(), options);
        self
    }

    /// Label for `key`, or the key itself when the bundle has no entry.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map(String::as_str).unwrap_or(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptionDefinition {
    pub id: String,
    pub label: String,
}

impl OptionDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// UI copy. Templates use `{count}` and `{max}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Messages {
    pub placeholder: String,
    pub selected_count: String,
    pub required: String,
    pub invalid_email: String,
    pub invalid_phone: String,
    pub invalid_url: String,
    pub selection_required: String,
    pub consent_required: String,
    pub slot_required: String,
    pub max_selection: String,
    pub max_slots: String,
    pub morning: String,
    pub afternoon: String,
    pub welcome: String,
    pub submitting: String,
    pub submitted: String,
    pub submit_failed: String,
    pub locked: String,
    pub select_all: String,
    pub clear_all: String,
    pub no_slots: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self::english()
    }
}

impl Messages {
    pub fn english() -> Self {
        Self {
            placeholder: "Select an option".into(),
            selected_count: "{count} options selected".into(),
            required: "This field is required".into(),
            invalid_email: "Please enter a valid email address".into(),
            invalid_phone: "Please enter a valid phone number".into(),
            invalid_url: "Please enter a valid website address".into(),
            selection_required: "Please select at least one option".into(),
            consent_required: "Please confirm to continue".into(),
            slot_required: "Please add at least one availability slot".into(),
            max_selection: "You can select up to {max} options".into(),
            max_slots: "You can add up to {max} availability slots".into(),
            morning: "Morning".into(),
            afternoon: "Afternoon".into(),
            welcome: "Press Enter to begin".into(),
            submitting: "Sending...".into(),
            submitted: "Thank you! Your request has been sent.".into(),
            submit_failed: "We could not send your request. Please try again.".into(),
            locked: "This form has expired. Please reload to start over.".into(),
            select_all: "Select all".into(),
            clear_all: "Clear all".into(),
            no_slots: "No availability added yet".into(),
        }
    }

    pub fn french() -> Self {
        Self {
            placeholder: "Sélectionnez une option".into(),
            selected_count: "{count} options sélectionnées".into(),
            required: "Ce champ est obligatoire".into(),
            invalid_email: "Veuillez entrer une adresse courriel valide".into(),
            invalid_phone: "Veuillez entrer un numéro de téléphone valide".into(),
            invalid_url: "Veuillez entrer une adresse web valide".into(),
            selection_required: "Veuillez sélectionner au moins une option".into(),
            consent_required: "Veuillez confirmer pour continuer".into(),
            slot_required: "Veuillez ajouter au moins une disponibilité".into(),
            max_selection: "Vous pouvez sélectionner jusqu'à {max} options".into(),
            max_slots: "Vous pouvez ajouter jusqu'à {max} disponibilités".into(),
            morning: "Matin".into(),
            afternoon: "Après-midi".into(),
            welcome: "Appuyez sur Entrée pour commencer".into(),
            submitting: "Envoi en cours...".into(),
            submitted: "Merci! Votre demande a été envoyée.".into(),
            submit_failed: "Nous n'avons pas pu envoyer votre demande. Veuillez réessayer."
                .into(),
            locked: "Ce formulaire a expiré. Veuillez recharger pour recommencer.".into(),
            select_all: "Tout sélectionner".into(),
            clear_all: "Tout effacer".into(),
            no_slots: "Aucune disponibilité ajoutée".into(),
        }
    }

    pub fn for_locale(tag: &str) -> Self {
        if tag.starts_with("fr") {
            Self::french()
        } else {
            Self::english()
        }
    }

    pub fn selected_count(&self, count: usize) -> String {
        self.selected_count.replace("{count}", &count.to_string())
    }

    pub fn max_selection(&self, max: usize) -> String {
        self.max_selection.replace("{max}", &max.to_string())
    }

    pub fn max_slots(&self, max: usize) -> String {
        self.max_slots.replace("{max}", &max.to_string())
    }
}
