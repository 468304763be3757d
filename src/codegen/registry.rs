use super::CodeGenerator;
use super::generators::{create_generator_by_name, register_default_generators};
use ahash::AHashMap;
use std::sync::{Arc, OnceLock};
use tracing::warn;

static GLOBAL_REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();

/// An immutable lookup table from type identifier to code generator.
///
/// A registry is fully populated when it is built and never changes
/// afterwards, so it can be shared freely between threads.
pub struct Registry {
    generators: AHashMap<String, Arc<dyn CodeGenerator>>,
}

impl Registry {
    /// The process-wide registry holding the built-in generators.
    ///
    /// It is built on first access and is read-only from then on.
    pub fn global() -> Arc<Registry> {
        GLOBAL_REGISTRY
            .get_or_init(|| Arc::new(RegistryBuilder::new().build()))
            .clone()
    }

    /// Starts a registry pre-populated with the built-in generators.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, node_type: &str) -> Option<&dyn CodeGenerator> {
        self.generators.get(node_type).map(|g| g.as_ref())
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.generators.contains_key(node_type)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// All registered type identifiers, sorted.
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

/// Collects generators before freezing them into a `Registry`.
pub struct RegistryBuilder {
    generators: AHashMap<String, Arc<dyn CodeGenerator>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        let mut generators: AHashMap<String, Arc<dyn CodeGenerator>> = AHashMap::new();
        register_default_generators(&mut generators);
        Self { generators }
    }

    /// Starts without any generators.
    pub fn empty() -> Self {
        Self {
            generators: AHashMap::new(),
        }
    }

    /// Resolves `user_type` with the generator already known as `known_type`.
    ///
    /// Unknown targets are logged and ignored; nodes of `user_type` then
    /// resolve as `IDLE`.
    pub fn with_type_mapping(mut self, user_type: &str, known_type: &str) -> Self {
        let generator = self
            .generators
            .get(known_type)
            .cloned()
            .or_else(|| create_generator_by_name(known_type));
        match generator {
            Some(generator) => {
                self.generators.insert(user_type.to_string(), generator);
            }
            None => warn!(
                user_type,
                known_type, "ignoring type mapping to an unregistered generator"
            ),
        }
        self
    }

    /// Registers a generator under its own `node_type()`, replacing any
    /// generator previously registered for that type.
    pub fn with_custom_generator(mut self, generator: Box<dyn CodeGenerator>) -> Self {
        let generator: Arc<dyn CodeGenerator> = Arc::from(generator);
        self.generators
            .insert(generator.node_type().to_string(), generator);
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            generators: self.generators,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
