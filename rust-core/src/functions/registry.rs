//! Name-keyed table of available window functions

use super::window::WindowFunction;
use super::FunctionError;

/// Constructor for a fresh window with default parameters
pub type FunctionConstructor = fn() -> WindowFunction;

/// Registration table of window functions, in insertion order
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    entries: Vec<(String, FunctionConstructor)>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("FID", WindowFunction::fid);
        registry.register("Gaussian", WindowFunction::gaussian);
        registry.register("Custom", WindowFunction::custom_default);
        registry
    }
}

impl FunctionRegistry {
    /// Registry without any functions
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a constructor under `name`, replacing an existing entry
    pub fn register(&mut self, name: &str, constructor: FunctionConstructor) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = constructor;
        } else {
            self.entries.push((name.to_string(), constructor));
        }
    }

    /// Create a new window by name (case-insensitive)
    pub fn create(&self, name: &str) -> Result<WindowFunction, FunctionError> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, ctor)| ctor())
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Fresh instance of the first registered function
    pub fn default_function(&self) -> Option<WindowFunction> {
        self.entries.first().map(|(_, ctor)| ctor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = FunctionRegistry::default();
        assert_eq!(registry.names(), vec!["FID", "Gaussian", "Custom"]);

        assert_eq!(registry.create("fid").unwrap(), WindowFunction::fid());
        assert_eq!(registry.create("Gaussian").unwrap().name(), "Gaussian");
        assert_eq!(registry.default_function().unwrap().name(), "FID");

        assert!(matches!(
            registry.create("Lorentzian"),
            Err(FunctionError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_register_replaces() {
        fn long_fid() -> WindowFunction {
            WindowFunction::fid_with(50.0)
        }

        let mut registry = FunctionRegistry::default();
        registry.register("FID", long_fid);

        assert_eq!(registry.names().len(), 3);
        assert_eq!(registry.create("FID").unwrap().parameters()[0].value, 50.0);

        let empty = FunctionRegistry::empty();
        assert!(empty.default_function().is_none());
    }
}
