//! Widget definitions shipped with the crate.

use indexmap::IndexMap;

use crate::domain::{
    DependencyRule, FieldDefinition, FieldKind, LocaleBundle, Messages, SessionSettings,
    StepDefinition, TextFormat, TriggerPredicate, WizardDefinition,
};

pub const NAMES: [&str; 4] = [
    "contact",
    "property_search",
    "service_request",
    "marketing_assessment",
];

pub fn by_name(name: &str) -> Option<WizardDefinition> {
    match name {
        "contact" => Some(contact()),
        "property_search" => Some(property_search()),
        "service_request" => Some(service_request()),
        "marketing_assessment" => Some(marketing_assessment()),
        _ => None,
    }
}

pub fn names() -> &'static [&'static str] {
    &NAMES
}

fn field(id: &str, kind: FieldKind, required: bool) -> FieldDefinition {
    FieldDefinition {
        id: id.to_string(),
        label: None,
        kind,
        required,
        hidden: false,
    }
}

fn text(id: &str, format: TextFormat, required: bool) -> FieldDefinition {
    field(
        id,
        FieldKind::Text {
            format,
            multiline: false,
        },
        required,
    )
}

fn long_text(id: &str, required: bool) -> FieldDefinition {
    field(
        id,
        FieldKind::Text {
            format: TextFormat::Plain,
            multiline: true,
        },
        required,
    )
}

fn hidden_text(id: &str) -> FieldDefinition {
    FieldDefinition {
        hidden: true,
        ..text(id, TextFormat::Plain, false)
    }
}

fn single(id: &str, required: bool) -> FieldDefinition {
    field(
        id,
        FieldKind::Choice {
            multiple: false,
            max: None,
        },
        required,
    )
}

fn multi(id: &str, max: Option<usize>, required: bool) -> FieldDefinition {
    field(
        id,
        FieldKind::Choice {
            multiple: true,
            max,
        },
        required,
    )
}

fn step(id: &str, fields: Vec<FieldDefinition>) -> StepDefinition {
    StepDefinition {
        id: id.to_string(),
        heading: None,
        fields,
    }
}

fn other_rule(trigger: &str, dependent: &str) -> DependencyRule {
    DependencyRule::show_when(
        trigger,
        TriggerPredicate::Equals {
            value: "other".to_string(),
        },
        [dependent],
    )
}

fn wizard(
    id: &str,
    steps: Vec<StepDefinition>,
    rules: Vec<DependencyRule>,
    en: LocaleBundle,
    fr: LocaleBundle,
) -> WizardDefinition {
    WizardDefinition {
        id: id.to_string(),
        default_locale: "en".to_string(),
        steps,
        rules,
        settings: SessionSettings::default(),
        locales: IndexMap::from([("en".to_string(), en), ("fr".to_string(), fr)]),
    }
}

fn labels(bundle: LocaleBundle, pairs: &[(&str, &str)]) -> LocaleBundle {
    pairs
        .iter()
        .fold(bundle, |bundle, (key, text)| bundle.with_label(*key, *text))
}

/// Three-step contact form with an "other" topic and a consent gate.
pub fn contact() -> WizardDefinition {
    let steps = vec![
        step(
            "identity",
            vec![
                text("name", TextFormat::Plain, true),
                text("email", TextFormat::Email, true),
                text("phone", TextFormat::Phone, false),
            ],
        ),
        step(
            "request",
            vec![
                single("topic", true),
                hidden_text("topic_other"),
                long_text("message", true),
            ],
        ),
        step(
            "preferences",
            vec![
                multi("contact_method", Some(2), true),
                field("consent", FieldKind::Toggle, true),
            ],
        ),
    ];
    let rules = vec![other_rule("topic", "topic_other")];

    let en = labels(
        LocaleBundle::new(Messages::english()),
        &[
            ("identity", "About you"),
            ("request", "Your request"),
            ("preferences", "How should we reach you?"),
            ("name", "Full name"),
            ("email", "Email"),
            ("phone", "Phone"),
            ("topic", "Topic"),
            ("topic.placeholder", "Choose a topic"),
            ("topic_other", "Describe the topic"),
            ("message", "Message"),
            ("contact_method", "Preferred channels"),
            ("consent", "I agree to be contacted about this request"),
        ],
    )
    .with_options(
        "topic",
        [
            ("sales", "Sales"),
            ("support", "Support"),
            ("billing", "Billing"),
            ("other", "Other"),
        ],
    )
    .with_options(
        "contact_method",
        [("email", "Email"), ("phone", "Phone"), ("sms", "Text message")],
    );

    let fr = labels(
        LocaleBundle::new(Messages::french()),
        &[
            ("identity", "Vos coordonnées"),
            ("request", "Votre demande"),
            ("preferences", "Comment vous joindre ?"),
            ("name", "Nom complet"),
            ("email", "Courriel"),
            ("phone", "Téléphone"),
            ("topic", "Sujet"),
            ("topic.placeholder", "Choisissez un sujet"),
            ("topic_other", "Précisez le sujet"),
            ("message", "Message"),
            ("contact_method", "Moyens de contact préférés"),
            ("consent", "J'accepte d'être contacté au sujet de cette demande"),
        ],
    )
    .with_options(
        "topic",
        [
            ("sales", "Ventes"),
            ("support", "Assistance"),
            ("billing", "Facturation"),
            ("other", "Autre"),
        ],
    )
    .with_options(
        "contact_method",
        [("email", "Courriel"), ("phone", "Téléphone"), ("sms", "Texto")],
    );

    wizard("contact", steps, rules, en, fr)
}

/// Property search; bedrooms drop out when only land is wanted.
pub fn property_search() -> WizardDefinition {
    let steps = vec![
        step(
            "property",
            vec![
                multi("property_types", None, true),
                single("bedrooms", true),
                single("budget", true),
            ],
        ),
        step(
            "location",
            vec![text("city", TextFormat::Plain, true), single("radius", false)],
        ),
        step(
            "contact",
            vec![
                text("name", TextFormat::Plain, true),
                text("email", TextFormat::Email, true),
                text("phone", TextFormat::Phone, false),
                field("consent", FieldKind::Toggle, true),
            ],
        ),
    ];
    let rules = vec![DependencyRule::hide_when(
        "property_types",
        TriggerPredicate::Equals {
            value: "land".to_string(),
        },
        ["bedrooms"],
    )];

    let en = labels(
        LocaleBundle::new(Messages::english()),
        &[
            ("property", "What are you looking for?"),
            ("location", "Where?"),
            ("contact", "Contact details"),
            ("property_types", "Property types"),
            ("bedrooms", "Bedrooms"),
            ("budget", "Budget"),
            ("city", "City"),
            ("radius", "Search radius"),
            ("name", "Full name"),
            ("email", "Email"),
            ("phone", "Phone"),
            ("consent", "Send me matching listings"),
        ],
    )
    .with_options(
        "property_types",
        [
            ("house", "House"),
            ("apartment", "Apartment"),
            ("land", "Land"),
            ("commercial", "Commercial"),
        ],
    )
    .with_options(
        "bedrooms",
        [("1", "1"), ("2", "2"), ("3", "3"), ("4_plus", "4 or more")],
    )
    .with_options(
        "budget",
        [
            ("under_250k", "Under 250k"),
            ("250k_500k", "250k to 500k"),
            ("over_500k", "Over 500k"),
        ],
    )
    .with_options(
        "radius",
        [("5km", "5 km"), ("10km", "10 km"), ("25km", "25 km")],
    );

    let fr = labels(
        LocaleBundle::new(Messages::french()),
        &[
            ("property", "Que recherchez-vous ?"),
            ("location", "Où ?"),
            ("contact", "Coordonnées"),
            ("property_types", "Types de bien"),
            ("bedrooms", "Chambres"),
            ("budget", "Budget"),
            ("city", "Ville"),
            ("radius", "Rayon de recherche"),
            ("name", "Nom complet"),
            ("email", "Courriel"),
            ("phone", "Téléphone"),
            ("consent", "Envoyez-moi les annonces correspondantes"),
        ],
    )
    .with_options(
        "property_types",
        [
            ("house", "Maison"),
            ("apartment", "Appartement"),
            ("land", "Terrain"),
            ("commercial", "Commercial"),
        ],
    )
    .with_options(
        "bedrooms",
        [("1", "1"), ("2", "2"), ("3", "3"), ("4_plus", "4 ou plus")],
    )
    .with_options(
        "budget",
        [
            ("under_250k", "Moins de 250k"),
            ("250k_500k", "De 250k à 500k"),
            ("over_500k", "Plus de 500k"),
        ],
    )
    .with_options(
        "radius",
        [("5km", "5 km"), ("10km", "10 km"), ("25km", "25 km")],
    );

    wizard("property_search", steps, rules, en, fr)
}

/// Service booking with an availability calendar.
pub fn service_request() -> WizardDefinition {
    let steps = vec![
        step(
            "needs",
            vec![
                single("service", true),
                hidden_text("service_other"),
                long_text("details", false),
            ],
        ),
        step(
            "schedule",
            vec![field("availability", FieldKind::Calendar, true)],
        ),
        step(
            "contact",
            vec![
                text("name", TextFormat::Plain, true),
                text("email", TextFormat::Email, true),
                text("phone", TextFormat::Phone, true),
                field("consent", FieldKind::Toggle, true),
            ],
        ),
    ];
    let rules = vec![other_rule("service", "service_other")];

    let en = labels(
        LocaleBundle::new(Messages::english()),
        &[
            ("needs", "What do you need?"),
            ("service", "Service"),
            ("schedule", "When are you available?"),
            ("contact", "Contact details"),
            ("service_other", "Describe the service"),
            ("details", "Details"),
            ("availability", "Availability"),
            ("name", "Full name"),
            ("email", "Email"),
            ("phone", "Phone"),
            ("consent", "I agree to be contacted to schedule the visit"),
        ],
    )
    .with_options(
        "service",
        [
            ("plumbing", "Plumbing"),
            ("electrical", "Electrical"),
            ("hvac", "Heating and cooling"),
            ("other", "Other"),
        ],
    );

    let fr = labels(
        LocaleBundle::new(Messages::french()),
        &[
            ("needs", "De quoi avez-vous besoin ?"),
            ("service", "Service"),
            ("schedule", "Quand êtes-vous disponible ?"),
            ("contact", "Coordonnées"),
            ("service_other", "Décrivez le service"),
            ("details", "Détails"),
            ("availability", "Disponibilités"),
            ("name", "Nom complet"),
            ("email", "Courriel"),
            ("phone", "Téléphone"),
            ("consent", "J'accepte d'être contacté pour planifier la visite"),
        ],
    )
    .with_options(
        "service",
        [
            ("plumbing", "Plomberie"),
            ("electrical", "Électricité"),
            ("hvac", "Chauffage et climatisation"),
            ("other", "Autre"),
        ],
    );

    wizard("service_request", steps, rules, en, fr)
}

/// Marketing assessment; the budget question appears once the user says
/// they have one.
pub fn marketing_assessment() -> WizardDefinition {
    let steps = vec![
        step(
            "business",
            vec![
                text("company", TextFormat::Plain, true),
                text("website", TextFormat::Url, true),
                single("industry", true),
                hidden_text("industry_other"),
            ],
        ),
        step(
            "objectives",
            vec![
                multi("goals", Some(3), true),
                multi("channels", None, false),
                field("has_budget", FieldKind::Toggle, false),
                FieldDefinition {
                    hidden: true,
                    ..single("budget", false)
                },
            ],
        ),
        step(
            "contact",
            vec![
                text("name", TextFormat::Plain, true),
                text("email", TextFormat::Email, true),
                field("consent", FieldKind::Toggle, true),
            ],
        ),
    ];
    let rules = vec![
        other_rule("industry", "industry_other"),
        DependencyRule::show_when("has_budget", TriggerPredicate::IsTrue, ["budget"]),
    ];

    let en = labels(
        LocaleBundle::new(Messages::english()),
        &[
            ("business", "Your business"),
            ("objectives", "Your goals"),
            ("contact", "Where should we send the assessment?"),
            ("company", "Company"),
            ("website", "Website"),
            ("industry", "Industry"),
            ("industry_other", "Describe your industry"),
            ("goals", "Top goals (up to three)"),
            ("channels", "Channels in use"),
            ("has_budget", "We have a marketing budget"),
            ("budget", "Monthly budget"),
            ("name", "Full name"),
            ("email", "Email"),
            ("consent", "Email me the assessment"),
        ],
    )
    .with_options(
        "industry",
        [
            ("retail", "Retail"),
            ("services", "Professional services"),
            ("manufacturing", "Manufacturing"),
            ("other", "Other"),
        ],
    )
    .with_options(
        "goals",
        [
            ("leads", "More leads"),
            ("brand", "Brand awareness"),
            ("sales", "Online sales"),
            ("retention", "Customer retention"),
            ("seo", "Search ranking"),
        ],
    )
    .with_options(
        "channels",
        [
            ("social", "Social media"),
            ("email", "Email"),
            ("search", "Paid search"),
            ("events", "Events"),
        ],
    )
    .with_options(
        "budget",
        [
            ("under_1k", "Under 1k"),
            ("1k_5k", "1k to 5k"),
            ("over_5k", "Over 5k"),
        ],
    );

    let fr = labels(
        LocaleBundle::new(Messages::french()),
        &[
            ("business", "Votre entreprise"),
            ("objectives", "Vos objectifs"),
            ("contact", "Où envoyer le diagnostic ?"),
            ("company", "Entreprise"),
            ("website", "Site web"),
            ("industry", "Secteur"),
            ("industry_other", "Précisez votre secteur"),
            ("goals", "Objectifs principaux (trois au plus)"),
            ("channels", "Canaux utilisés"),
            ("has_budget", "Nous avons un budget marketing"),
            ("budget", "Budget mensuel"),
            ("name", "Nom complet"),
            ("email", "Courriel"),
            ("consent", "Envoyez-moi le diagnostic par courriel"),
        ],
    )
    .with_options(
        "industry",
        [
            ("retail", "Commerce de détail"),
            ("services", "Services professionnels"),
            ("manufacturing", "Industrie"),
            ("other", "Autre"),
        ],
    )
    .with_options(
        "goals",
        [
            ("leads", "Plus de prospects"),
            ("brand", "Notoriété"),
            ("sales", "Ventes en ligne"),
            ("retention", "Fidélisation"),
            ("seo", "Référencement"),
        ],
    )
    .with_options(
        "channels",
        [
            ("social", "Réseaux sociaux"),
            ("email", "Courriel"),
            ("search", "Publicité sur moteurs"),
            ("events", "Événements"),
        ],
    )
    .with_options(
        "budget",
        [
            ("under_1k", "Moins de 1k"),
            ("1k_5k", "De 1k à 5k"),
            ("over_5k", "Plus de 5k"),
        ],
    );

    wizard("marketing_assessment", steps, rules, en, fr)
}
