//! Property values and hook detection.
//!
//! A property is either plain data (`Str`, `Bool`, `Number`) or an object
//! supplied by application code. Objects opt into capabilities through
//! [`ObjectProperty`]; the only capability the tree cares about is the hook
//! capability, queried with [`ObjectProperty::as_hook`].

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Lifecycle callbacks attached to a node through one of its properties.
///
/// The applier decides when to call these and what the target is.
pub trait VirtualHook: fmt::Debug + Send + Sync {
    fn hook(&self, target: &mut dyn Any, property: &str);
    fn unhook(&self, target: &mut dyn Any, property: &str);
}

/// An application-supplied property value.
pub trait ObjectProperty: fmt::Debug + Send + Sync {
    /// Returns the hook view of this value when it exposes both `hook` and
    /// `unhook`.
    fn as_hook(&self) -> Option<&dyn VirtualHook> {
        None
    }
}

/// Adapts any [`VirtualHook`] into a hook-capable property object.
#[derive(Debug)]
pub struct HookProperty<H>(pub H);

impl<H: VirtualHook> ObjectProperty for HookProperty<H> {
    fn as_hook(&self) -> Option<&dyn VirtualHook> {
        Some(&self.0)
    }
}

#[derive(Clone, Debug)]
pub enum PropertyValue {
    Str(Arc<str>),
    Bool(bool),
    Number(f64),
    Object(Arc<dyn ObjectProperty>),
}

impl PropertyValue {
    pub fn hook<H: VirtualHook + 'static>(hook: H) -> Self {
        PropertyValue::Object(Arc::new(HookProperty(hook)))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<dyn ObjectProperty>> {
        match self {
            PropertyValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_hook(&self) -> Option<&dyn VirtualHook> {
        match self {
            PropertyValue::Object(object) => object.as_hook(),
            PropertyValue::Str(_) | PropertyValue::Bool(_) | PropertyValue::Number(_) => None,
        }
    }

    pub fn is_hook(&self) -> bool {
        self.as_hook().is_some()
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(Arc::from(value))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(Arc::from(value))
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Number(f64::from(value))
    }
}

impl From<Arc<dyn ObjectProperty>> for PropertyValue {
    fn from(value: Arc<dyn ObjectProperty>) -> Self {
        PropertyValue::Object(value)
    }
}

/// Property mapping keyed by property name.
///
/// Ordered so that iteration, snapshots and patch payloads are deterministic.
pub type PropertyMap = BTreeMap<Arc<str>, PropertyValue>;

/// The hook-capable subset of one node's own properties.
///
/// Never empty: nodes without hooks carry no `HookMap` at all.
#[derive(Clone, Debug)]
pub struct HookMap {
    entries: BTreeMap<Arc<str>, Arc<dyn ObjectProperty>>,
}

impl HookMap {
    /// Collects the hook-capable values of `properties`, or `None` when there
    /// are none.
    pub(crate) fn collect(properties: &PropertyMap) -> Option<Self> {
        let mut entries = BTreeMap::new();
        for (name, value) in properties {
            if let PropertyValue::Object(object) = value {
                if object.as_hook().is_some() {
                    entries.insert(Arc::clone(name), Arc::clone(object));
                }
            }
        }
        if entries.is_empty() {
            return None;
        }
        Some(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn VirtualHook> {
        self.entries.get(name).and_then(|object| object.as_hook())
    }

    /// The property object the hook was read from, for identity checks.
    pub fn get_property(&self, name: &str) -> Option<&Arc<dyn ObjectProperty>> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|name| name.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn VirtualHook)> {
        self.entries
            .iter()
            .filter_map(|(name, object)| object.as_hook().map(|hook| (name.as_ref(), hook)))
    }
}
