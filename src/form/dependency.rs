use std::collections::HashSet;

use crate::domain::{DependencyRule, RuleEffect, TriggerPredicate};

use super::{field::FieldValue, step::StepState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityChange {
    pub field_id: String,
    pub visible: bool,
    /// `None` restores the field's declared requiredness.
    pub required: Option<bool>,
}

impl TriggerPredicate {
    pub fn matches(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (TriggerPredicate::NotEmpty, value) => !value.is_empty(),
            (TriggerPredicate::IsTrue, FieldValue::Toggle(flag)) => *flag,
            (TriggerPredicate::Equals { value: expected }, FieldValue::Text(text)) => {
                text.trim() == expected
            }
            (TriggerPredicate::Equals { value: expected }, FieldValue::Toggle(flag)) => {
                expected.parse::<bool>().map(|parsed| parsed == *flag).unwrap_or(false)
            }
            (TriggerPredicate::Equals { value: expected }, FieldValue::Choice(picker)) => {
                picker.selected_ids() == [expected.as_str()]
            }
            (TriggerPredicate::AnyOf { values }, FieldValue::Text(text)) => {
                values.iter().any(|candidate| candidate == text.trim())
            }
            (TriggerPredicate::AnyOf { values }, FieldValue::Choice(picker)) => {
                values.iter().any(|candidate| picker.is_selected(candidate))
            }
            (TriggerPredicate::Contains { value: needle }, FieldValue::Choice(picker)) => {
                picker.is_selected(needle)
            }
            (TriggerPredicate::Contains { value: needle }, FieldValue::Text(text)) => {
                text.contains(needle.as_str())
            }
            _ => false,
        }
    }
}

/// Declarative trigger → dependent visibility rules.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    rules: Vec<DependencyRule>,
}

impl DependencyGraph {
    pub fn new(rules: Vec<DependencyRule>) -> Self {
        Self { rules }
    }

    /// Visibility changes implied by `value` for the rules triggered by
    /// `field_id`. `None` stands for a hidden trigger, whose predicates never
    /// hold.
    pub fn plan(&self, field_id: &str, value: Option<&FieldValue>) -> Vec<VisibilityChange> {
        self.rules
            .iter()
            .filter(|rule| rule.trigger == field_id)
            .flat_map(|rule| {
                let holds = value.is_some_and(|value| rule.when.matches(value));
                let (visible, required) = match (rule.effect, holds) {
                    (RuleEffect::ShowRequire, true) => (true, Some(true)),
                    (RuleEffect::ShowRequire, false) => (false, Some(false)),
                    (RuleEffect::HideOptional, true) => (false, Some(false)),
                    (RuleEffect::HideOptional, false) => (true, None),
                };
                rule.dependents.iter().map(move |dependent| VisibilityChange {
                    field_id: dependent.clone(),
                    visible,
                    required,
                })
            })
            .collect()
    }

    /// Re-applies the rules triggered by `field_id` using its current value,
    /// then cascades into dependents that are themselves triggers. Returns
    /// the ids whose visibility or requiredness changed.
    pub fn evaluate(&self, field_id: &str, steps: &mut [StepState]) -> Vec<String> {
        self.cascade(vec![field_id.to_string()], steps)
    }

    pub fn evaluate_all(&self, steps: &mut [StepState]) -> Vec<String> {
        let mut triggers: Vec<String> = Vec::new();
        for rule in &self.rules {
            if !triggers.contains(&rule.trigger) {
                triggers.push(rule.trigger.clone());
            }
        }
        self.cascade(triggers, steps)
    }

    fn cascade(&self, mut pending: Vec<String>, steps: &mut [StepState]) -> Vec<String> {
        pending.reverse();
        // A trigger's rules depend only on its value and visibility, and the
        // value is fixed during a cascade, so each pair runs at most once.
        let mut visited: HashSet<(String, bool)> = HashSet::new();
        let mut changed = Vec::new();
        while let Some(trigger) = pending.pop() {
            let Some(visible) = steps
                .iter()
                .find_map(|step| step.field(&trigger))
                .map(|field| field.visible)
            else {
                continue;
            };
            if !visited.insert((trigger.clone(), visible)) {
                continue;
            }
            for id in self.apply(&trigger, steps) {
                if !pending.contains(&id) {
                    pending.push(id.clone());
                }
                if !changed.contains(&id) {
                    changed.push(id);
                }
            }
        }
        changed
    }

    fn apply(&self, trigger: &str, steps: &mut [StepState]) -> Vec<String> {
        let Some(value) = steps
            .iter()
            .find_map(|step| step.field(trigger))
            .map(|field| field.visible.then(|| field.value.clone()))
        else {
            return Vec::new();
        };
        let mut changed = Vec::new();
        for change in self.plan(trigger, value.as_ref()) {
            let Some(field) = steps
                .iter_mut()
                .find_map(|step| step.field_mut(&change.field_id))
            else {
                continue;
            };
            let required = change.required.unwrap_or(field.base_required);
            if field.visible != change.visible || field.required != required {
                field.visible = change.visible;
                field.required = required;
                if !field.visible {
                    // The stored value survives so it can come back when re-shown.
                    field.clear_error();
                }
                changed.push(change.field_id);
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldDefinition, FieldKind, LocaleBundle, SessionSettings, StepDefinition, TextFormat};
    use chrono::NaiveDate;

    fn steps() -> Vec<StepState> {
        let mut bundle = LocaleBundle::default();
        bundle = bundle.with_options("topic", [("buy", "Buy"), ("other", "Other")]);
        let definition = StepDefinition {
            id: "one".into(),
            heading: None,
            fields: vec![
                FieldDefinition {
                    id: "topic".into(),
                    label: None,
                    kind: FieldKind::Choice { multiple: true, max: None },
                    required: true,
                    hidden: false,
                },
                FieldDefinition {
                    id: "topic_other".into(),
                    label: None,
                    kind: FieldKind::Text { format: TextFormat::Plain, multiline: false },
                    required: false,
                    hidden: true,
                },
            ],
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).expect("date");
        vec![StepState::from_definition(&definition, 1, &bundle, &SessionSettings::default(), today)]
    }

    fn other_rule() -> DependencyGraph {
        DependencyGraph::new(vec![DependencyRule::show_when(
            "topic",
            TriggerPredicate::Contains { value: "other".into() },
            ["topic_other"],
        )])
    }

    #[test]
    fn selecting_other_reveals_and_requires_free_text() {
        let mut steps = steps();
        let graph = other_rule();
        steps[0].field_mut("topic").unwrap().picker_mut().unwrap().toggle("other");
        assert_eq!(graph.evaluate("topic", &mut steps), vec!["topic_other"]);
        let other = steps[0].field("topic_other").unwrap();
        assert!(other.visible && other.required);

        assert!(graph.evaluate("topic", &mut steps).is_empty(), "idempotent");
    }

    #[test]
    fn hiding_clears_error_but_keeps_value() {
        let mut steps = steps();
        let graph = other_rule();
        steps[0].field_mut("topic").unwrap().picker_mut().unwrap().toggle("other");
        graph.evaluate("topic", &mut steps);
        {
            let other = steps[0].field_mut("topic_other").unwrap();
            other.set_text("Commercial lease");
            other.set_error("required");
        }
        steps[0].field_mut("topic").unwrap().picker_mut().unwrap().toggle("other");
        graph.evaluate("topic", &mut steps);
        let other = steps[0].field("topic_other").unwrap();
        assert!(!other.visible && !other.required);
        assert!(!other.error_visible());
        assert_eq!(other.text(), Some("Commercial lease"));

        steps[0].field_mut("topic").unwrap().picker_mut().unwrap().toggle("other");
        graph.evaluate("topic", &mut steps);
        assert_eq!(steps[0].field("topic_other").unwrap().text(), Some("Commercial lease"));
    }

    #[test]
    fn hide_rule_restores_declared_requiredness() {
        let mut steps = steps();
        let graph = DependencyGraph::new(vec![DependencyRule::hide_when(
            "topic",
            TriggerPredicate::Equals { value: "buy".into() },
            ["topic_other"],
        )]);
        steps[0].field_mut("topic_other").unwrap().base_required = true;
        graph.evaluate_all(&mut steps);
        let other = steps[0].field("topic_other").unwrap();
        assert!(other.visible && other.required);

        steps[0].field_mut("topic").unwrap().picker_mut().unwrap().toggle("buy");
        graph.evaluate("topic", &mut steps);
        assert!(!steps[0].field("topic_other").unwrap().visible);
    }

    fn chained_steps() -> Vec<StepState> {
        let bundle = LocaleBundle::default().with_options("topic", [("buy", "Buy"), ("other", "Other")]);
        let field = |id: &str, kind: FieldKind, hidden: bool| FieldDefinition {
            id: id.into(),
            label: None,
            kind,
            required: false,
            hidden,
        };
        let definition = StepDefinition {
            id: "one".into(),
            heading: None,
            fields: vec![
                field("has_topic", FieldKind::Toggle, false),
                field("topic", FieldKind::Choice { multiple: false, max: None }, true),
                field(
                    "topic_other",
                    FieldKind::Text { format: TextFormat::Plain, multiline: false },
                    true,
                ),
            ],
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).expect("date");
        vec![StepState::from_definition(&definition, 1, &bundle, &SessionSettings::default(), today)]
    }

    fn chained_graph() -> DependencyGraph {
        DependencyGraph::new(vec![
            DependencyRule::show_when("has_topic", TriggerPredicate::IsTrue, ["topic"]),
            DependencyRule::show_when(
                "topic",
                TriggerPredicate::Equals { value: "other".into() },
                ["topic_other"],
            ),
        ])
    }

    #[test]
    fn hiding_a_trigger_hides_its_own_dependents() {
        let mut steps = chained_steps();
        let graph = chained_graph();
        steps[0].field_mut("has_topic").unwrap().set_toggle(true);
        graph.evaluate("has_topic", &mut steps);
        steps[0].field_mut("topic").unwrap().picker_mut().unwrap().toggle("other");
        assert_eq!(graph.evaluate("topic", &mut steps), vec!["topic_other"]);

        steps[0].field_mut("has_topic").unwrap().set_toggle(false);
        assert_eq!(
            graph.evaluate("has_topic", &mut steps),
            vec!["topic", "topic_other"]
        );
        let other = steps[0].field("topic_other").unwrap();
        assert!(!other.visible && !other.required);

        steps[0].field_mut("has_topic").unwrap().set_toggle(true);
        graph.evaluate("has_topic", &mut steps);
        assert!(steps[0].field("topic_other").unwrap().visible, "selection still says other");
    }

    #[test]
    fn evaluate_all_settles_regardless_of_rule_order() {
        let mut steps = chained_steps();
        steps[0].field_mut("topic").unwrap().picker_mut().unwrap().toggle("other");
        let mut rules = chained_graph().rules;
        rules.reverse();
        let graph = DependencyGraph::new(rules);
        graph.evaluate_all(&mut steps);
        assert!(!steps[0].field("topic_other").unwrap().visible, "parent is hidden");

        steps[0].field_mut("has_topic").unwrap().set_toggle(true);
        graph.evaluate_all(&mut steps);
        let other = steps[0].field("topic_other").unwrap();
        assert!(other.visible && other.required);
    }

    #[test]
    fn mutual_rules_terminate() {
        let mut steps = chained_steps();
        let graph = DependencyGraph::new(vec![
            DependencyRule::show_when("has_topic", TriggerPredicate::IsTrue, ["topic"]),
            DependencyRule::hide_when("topic", TriggerPredicate::NotEmpty, ["has_topic"]),
        ]);
        steps[0].field_mut("has_topic").unwrap().set_toggle(true);
        steps[0].field_mut("topic").unwrap().picker_mut().unwrap().toggle("buy");
        graph.evaluate_all(&mut steps);
        graph.evaluate("has_topic", &mut steps);
    }

    #[test]
    fn predicates_cover_text_and_toggle_values() {
        let text = FieldValue::Text(" yes ".into());
        assert!(TriggerPredicate::Equals { value: "yes".into() }.matches(&text));
        assert!(TriggerPredicate::AnyOf { values: vec!["no".into(), "yes".into()] }.matches(&text));
        assert!(TriggerPredicate::NotEmpty.matches(&text));
        assert!(TriggerPredicate::IsTrue.matches(&FieldValue::Toggle(true)));
        assert!(TriggerPredicate::Equals { value: "false".into() }.matches(&FieldValue::Toggle(false)));
        assert!(!TriggerPredicate::IsTrue.matches(&text));
    }
}
