use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a biome in the shared, process-wide id namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeId(pub u32);

impl BiomeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for BiomeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Errors from validating a world name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name {0:?} contains a path separator")]
    PathSeparator(String),
}

/// Check that `name` can be used as a single file or directory name.
pub fn check_path_component(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(NameError::PathSeparator(name.to_owned()));
    }
    Ok(())
}

/// Stable name of a world.
///
/// The name doubles as a directory component under `worlds/`, so it may not
/// contain `/` or `\` and may not be `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorldName(String);

impl WorldName {
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        check_path_component(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorldName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorldName> for String {
    fn from(name: WorldName) -> Self {
        name.0
    }
}

impl AsRef<str> for WorldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for WorldName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WorldName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for WorldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the host reports at the pre-registration hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    /// Dedicated hosts must register identifiers before the world object exists.
    pub is_dedicated_mode: bool,
    /// Folder name of the current session; used as the candidate world name.
    pub session_folder_name: String,
}

impl HostContext {
    pub fn dedicated(session_folder_name: impl Into<String>) -> Self {
        Self {
            is_dedicated_mode: true,
            session_folder_name: session_folder_name.into(),
        }
    }

    pub fn integrated(session_folder_name: impl Into<String>) -> Self {
        Self {
            is_dedicated_mode: false,
            session_folder_name: session_folder_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_name_rejects_empty() {
        assert_eq!(WorldName::new(""), Err(NameError::Empty));
    }

    #[test]
    fn world_name_rejects_separators() {
        assert!(matches!(
            WorldName::new("a/b"),
            Err(NameError::PathSeparator(_))
        ));
        assert!(matches!(
            WorldName::new("a\\b"),
            Err(NameError::PathSeparator(_))
        ));
        assert!(WorldName::new("..").is_err());
    }

    #[test]
    fn path_component_check() {
        assert!(check_path_component("Swamp Lake").is_ok());
        assert!(check_path_component("../../escaped").is_err());
        assert!(check_path_component(".").is_err());
        assert_eq!(check_path_component(""), Err(NameError::Empty));
    }

    #[test]
    fn world_name_compares_with_str() {
        let name = WorldName::new("alpha").unwrap();
        assert_eq!(name, "alpha");
        assert_eq!(name.to_string(), "alpha");
    }

    #[test]
    fn world_name_serde_validates() {
        let name: WorldName = serde_json::from_str("\"beta\"").unwrap();
        assert_eq!(name.as_str(), "beta");
        assert!(serde_json::from_str::<WorldName>("\"\"").is_err());
    }

    #[test]
    fn biome_id_is_transparent() {
        let id: BiomeId = serde_json::from_str("40").unwrap();
        assert_eq!(id, BiomeId(40));
        assert_eq!(id.to_string(), "#40");
    }

    #[test]
    fn host_context_constructors() {
        assert!(HostContext::dedicated("alpha").is_dedicated_mode);
        assert!(!HostContext::integrated("alpha").is_dedicated_mode);
    }
}
