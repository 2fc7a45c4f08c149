use alloc::boxed::Box;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Configured shape of a [`GameVariable`]: its initial value and optional clamping bounds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec<T> {
    pub initial: T,
    #[serde(default)]
    pub min: Option<T>,
    #[serde(default)]
    pub max: Option<T>,
}

impl<T> VariableSpec<T> {
    pub const fn unbounded(initial: T) -> Self {
        Self {
            initial,
            min: None,
            max: None,
        }
    }

    pub const fn at_least(initial: T, min: T) -> Self {
        Self {
            initial,
            min: Some(min),
            max: None,
        }
    }
}

impl<T: Copy + PartialOrd> VariableSpec<T> {
    /// Clamps `value` into the configured bounds, upper bound first.
    pub fn settle(&self, value: T) -> T {
        let mut value = value;
        if let Some(max) = self.max {
            if value > max {
                value = max;
            }
        }
        if let Some(min) = self.min {
            if value < min {
                value = min;
            }
        }
        value
    }
}

type Handler<T> = Box<dyn FnMut(&'static str, T)>;

/// Named, bounded session value such as a score, a timer or a counter.
///
/// Every write is clamped before it is stored, then the optional change handler sees the settled
/// value once.
pub struct GameVariable<T> {
    name: &'static str,
    spec: VariableSpec<T>,
    value: T,
    on_set: Option<Handler<T>>,
}

impl<T: Copy + PartialOrd> GameVariable<T> {
    pub fn new(name: &'static str, spec: VariableSpec<T>) -> Self {
        let value = spec.settle(spec.initial);
        Self {
            name,
            spec,
            value,
            on_set: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn spec(&self) -> &VariableSpec<T> {
        &self.spec
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// Stores `value` after clamping and returns what was stored.
    pub fn set(&mut self, value: T) -> T {
        self.value = self.spec.settle(value);
        if let Some(handler) = self.on_set.as_mut() {
            handler(self.name, self.value);
        }
        self.value
    }

    pub fn update(&mut self, f: impl FnOnce(T) -> T) -> T {
        self.set(f(self.value))
    }

    /// Resets to the configured initial value.
    pub fn init(&mut self) -> T {
        self.set(self.spec.initial)
    }

    /// Registers the change handler, replacing any previous one.
    pub fn on_set(&mut self, handler: impl FnMut(&'static str, T) + 'static) {
        self.on_set = Some(Box::new(handler));
    }

    pub fn clear_handler(&mut self) {
        self.on_set = None;
    }
}

impl<T: fmt::Debug> fmt::Debug for GameVariable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameVariable")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("spec", &self.spec)
            .field("has_handler", &self.on_set.is_some())
            .finish()
    }
}
