use crate::{LangError, LanguageDefinition, builtin};

#[derive(Debug, Clone, Default)]
/// A set of language definitions, looked up by name or file name.
///
/// Later registrations win: registering a definition whose name is already present replaces the
/// earlier one, and file-name lookups prefer the most recently registered match.
pub struct LanguageRegistry {
    definitions: Vec<LanguageDefinition>,
}

impl LanguageRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with [`builtin::all`].
    pub fn with_builtins() -> Self {
        Self {
            definitions: builtin::all(),
        }
    }

    /// Validates and adds `definition`, replacing any definition with the same name.
    pub fn register(&mut self, definition: LanguageDefinition) -> Result<(), LangError> {
        definition.validate()?;
        self.definitions.retain(|d| d.name != definition.name);
        self.definitions.push(definition);
        Ok(())
    }

    /// Parses a YAML definition and registers it, returning its name.
    pub fn register_yaml(&mut self, yaml: &str) -> Result<String, LangError> {
        let definition = LanguageDefinition::from_yaml_str(yaml)?;
        let name = definition.name.clone();
        self.register(definition)?;
        Ok(name)
    }

    /// Looks a definition up by name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<&LanguageDefinition> {
        self.definitions
            .iter()
            .rev()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Finds the definition for a file name or path.
    pub fn for_file_name(&self, path: &str) -> Option<&LanguageDefinition> {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        self.definitions
            .iter()
            .rev()
            .find(|d| d.matches_file_name(file_name))
    }

    /// Names of all registered definitions, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
