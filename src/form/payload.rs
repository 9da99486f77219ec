use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;

use super::{calendar::Slot, step::StepState};

/// Key under which [`PayloadMeta`] is serialized next to the field values.
/// Field ids must start with a letter so they cannot collide with it.
pub const META_KEY: &str = "_meta";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Text(String),
    Bool(bool),
    Options(Vec<String>),
    Slots(Vec<Slot>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayloadMeta {
    pub widget: String,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_cost: Option<f64>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub context: IndexMap<String, Value>,
}

/// Form data assembled step by step as each step is confirmed. Serializes to
/// a flat `field id → value` map in step order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub meta: PayloadMeta,
    steps: Vec<IndexMap<String, PayloadValue>>,
}

impl Payload {
    pub fn new(meta: PayloadMeta, step_count: usize) -> Self {
        Self {
            meta,
            steps: vec![IndexMap::new(); step_count],
        }
    }

    /// Replaces whatever was recorded for `step`. Hidden fields are left out
    /// even when they still hold a value.
    pub fn record_step(&mut self, index: usize, step: &StepState) {
        let Some(slot) = self.steps.get_mut(index) else {
            return;
        };
        slot.clear();
        for field in step.visible_fields() {
            if let Some(value) = field.payload_value() {
                slot.insert(field.id.clone(), value);
            }
        }
    }

    pub fn get(&self, field_id: &str) -> Option<&PayloadValue> {
        self.steps.iter().find_map(|step| step.get(field_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PayloadValue)> {
        self.steps.iter().flat_map(|step| step.iter())
    }

    pub fn len(&self) -> usize {
        self.steps.iter().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len() + 1))?;
        map.serialize_entry(META_KEY, &self.meta)?;
        for (id, value) in self.iter() {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}
