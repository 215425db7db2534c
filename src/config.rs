//! Container options.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::internal::circular::MAX_DEPTH;

/// Tunables of one container.
///
/// Set with [`ContainerBuilder::with_options`](crate::ContainerBuilder::with_options).
/// Facade sub-containers inherit the options of the container that declared
/// them, with the facade type appended to the name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Name used in log output
    pub name: Option<String>,
    /// Longest dependency chain a single resolve may walk
    pub max_depth: usize,
    /// Log a warning when a container is dropped with pending disposal hooks
    pub warn_on_undisposed: bool,
}

impl ContainerOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name used in log output.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the longest dependency chain a resolve may walk.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables the undisposed-drop warning.
    pub fn with_warn_on_undisposed(mut self, warn: bool) -> Self {
        self.warn_on_undisposed = warn;
        self
    }

    /// Parses options from JSON. Missing fields take their defaults.
    ///
    /// ```rust
    /// use bindery::ContainerOptions;
    ///
    /// let options = ContainerOptions::from_json_str(r#"{ "name": "game", "max_depth": 64 }"#).unwrap();
    /// assert_eq!(options.name.as_deref(), Some("game"));
    /// assert_eq!(options.max_depth, 64);
    /// assert!(options.warn_on_undisposed);
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> crate::DiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Name for log output, `"container"` when unset.
    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("container")
    }

    /// Options for a facade child declared by `facade`.
    pub(crate) fn for_child(&self, facade: &str) -> Self {
        Self {
            name: Some(format!("{}/{}", self.display_name(), facade)),
            ..self.clone()
        }
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            name: None,
            max_depth: MAX_DEPTH,
            warn_on_undisposed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_options_extend_the_name() {
        let parent = ContainerOptions::new().with_name("root").with_max_depth(32);
        let child = parent.for_child("Renderer");
        assert_eq!(child.name.as_deref(), Some("root/Renderer"));
        assert_eq!(child.max_depth, 32);

        let unnamed = ContainerOptions::default().for_child("Audio");
        assert_eq!(unnamed.name.as_deref(), Some("container/Audio"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ContainerOptions::from_json_str("{ max_depth: }"),
            Err(crate::DiError::InvalidOptions(_))
        ));
    }
}
