//! Attribute declarations handed to the host: names, types, flags, defaults,
//! and plan modifiers.

use crate::error::{Diagnostic, Diagnostics};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
    Int64,
}

impl AttributeType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int64 => value.is_i64(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
    /// Keep the prior state value while the planned value is unknown.
    UseStateForUnknown,
    /// A change to this attribute destroys and recreates the resource.
    RequiresReplace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType) -> Self {
        Self {
            name,
            kind,
            description: "",
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            default: None,
            plan_modifiers: Vec::new(),
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn bool(name: &'static str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn int64(name: &'static str) -> Self {
        Self::new(name, AttributeType::Int64)
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// A default makes the attribute computed as well.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.computed = true;
        self
    }

    pub fn plan_modifier(mut self, modifier: PlanModifier) -> Self {
        self.plan_modifiers.push(modifier);
        self
    }

    pub fn requires_replace(&self) -> bool {
        self.plan_modifiers.contains(&PlanModifier::RequiresReplace)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str, attributes: Vec<Attribute>) -> Self {
        Self {
            description,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration object: required attributes present, no unknown
    /// attributes, and every set value of the declared type.
    pub fn validate(&self, config: &Value) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(object) = config.as_object() else {
            diags.push(Diagnostic::error(
                "Invalid configuration",
                "Expected a JSON object of attribute values.",
            ));
            return diags;
        };

        for key in object.keys() {
            if self.attribute(key).is_none() {
                diags.push(Diagnostic::attribute_error(
                    key.as_str(),
                    "Unsupported argument",
                    format!("An argument named \"{key}\" is not expected here."),
                ));
            }
        }

        for attr in &self.attributes {
            match object.get(attr.name) {
                None | Some(Value::Null) if attr.required => {
                    diags.push(Diagnostic::attribute_error(
                        attr.name,
                        "Missing required argument",
                        format!(
                            "The argument \"{}\" is required, but no definition was found.",
                            attr.name
                        ),
                    ));
                }
                Some(value) if !value.is_null() && !attr.kind.matches(value) => {
                    diags.push(Diagnostic::attribute_error(
                        attr.name,
                        "Incorrect attribute value type",
                        format!(
                            "Inappropriate value for attribute \"{}\": {:?} required.",
                            attr.name, attr.kind
                        ),
                    ));
                }
                _ => {}
            }
        }
        diags
    }

    /// Attributes whose change between `prior` and `planned` forces replacement.
    pub fn replaced_attributes(&self, prior: &Value, planned: &Value) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.requires_replace())
            .filter(|a| prior.get(a.name) != planned.get(a.name))
            .map(|a| a.name)
            .collect()
    }

    /// Fill unset attributes that declare a default.
    pub fn apply_defaults(&self, config: &mut Value) {
        let Some(object) = config.as_object_mut() else {
            return;
        };
        for attr in &self.attributes {
            if let Some(default) = attr.default.as_ref() {
                let slot = object.entry(attr.name).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = default.clone();
                }
            }
        }
    }
}
