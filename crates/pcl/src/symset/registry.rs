//! # Symbol set registry
//!
//! The built-in sets by id, and one slot for a set loaded from a download
//! symbol set file. A loaded set shadows a built-in set with the same id.

use std::{collections::BTreeMap, path::Path};

use log::info;

use super::{
    file::{check_symbol_set_file, DownloadSymbolSet},
    library, SymbolSetFileError, SymbolSetId, SymbolSetMap, SymbolSetMapError, SymbolSetType,
    UserDefinedMap,
};

/// A symbol set known to the registry
#[derive(Debug, Clone)]
pub struct SymbolSetEntry {
    /// The numeric id
    pub id: SymbolSetId,
    /// Human readable name
    pub name: String,
    /// The addressing scheme
    pub kind: SymbolSetType,
    /// The code point mapping
    pub map: SymbolSetMap,
}

/// All symbol sets available for font generation
///
/// Built-in sets are keyed by their id. There is one additional slot for a
/// user-defined set, which is replaced by every successful file load.
#[derive(Debug, Clone)]
pub struct SymbolSetRegistry {
    sets: BTreeMap<SymbolSetId, SymbolSetEntry>,
    user_defined: Option<(SymbolSetId, SymbolSetType)>,
    user_map: UserDefinedMap,
}

impl SymbolSetRegistry {
    /// Create a registry with the built-in sets
    pub fn new() -> Result<Self, SymbolSetMapError> {
        let sets = library::entries()?
            .into_iter()
            .map(|entry| (entry.id, entry))
            .collect();
        Ok(Self {
            sets,
            user_defined: None,
            user_map: UserDefinedMap::new(0xFF),
        })
    }

    /// Iterate over the built-in sets
    pub fn entries(&self) -> impl Iterator<Item = &SymbolSetEntry> {
        self.sets.values()
    }

    /// Find a built-in set
    pub fn get(&self, id: SymbolSetId) -> Option<&SymbolSetEntry> {
        self.sets.get(&id)
    }

    /// The user-defined map
    pub fn user_defined(&self) -> &UserDefinedMap {
        &self.user_map
    }

    /// Find a set, including the user-defined one
    ///
    /// The user-defined set shadows a built-in set with the same id.
    pub fn resolve(&self, id: SymbolSetId) -> Option<(SymbolSetType, &SymbolSetMap)> {
        match self.user_defined {
            Some((user_id, kind)) if user_id == id => Some((kind, self.user_map.map())),
            _ => self.get(id).map(|entry| (entry.kind, &entry.map)),
        }
    }

    /// Install a parsed download symbol set into the user-defined slot
    pub fn install(&mut self, set: &DownloadSymbolSet) -> Result<(), SymbolSetMapError> {
        self.user_map.assign(set.lookup.clone())?;
        self.user_defined = Some((set.id, set.kind));
        Ok(())
    }

    /// Parse a download symbol set file and install it
    pub fn load_user_defined(
        &mut self,
        path: &Path,
    ) -> Result<DownloadSymbolSet, SymbolSetFileError> {
        let set = check_symbol_set_file(path)?;
        self.install(&set)?;
        info!("Installed {} as the user-defined symbol set", set.id);
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::SymbolSetRegistry;
    use crate::symset::{
        file::parse_symbol_set, MapVariant, SymbolSetId, SymbolSetType, NOT_MAPPED,
    };

    #[test]
    fn test_builtin() {
        let registry = SymbolSetRegistry::new().unwrap();
        assert_eq!(registry.entries().count(), 4);
        let (kind, map) = registry.resolve(SymbolSetId::ASCII).unwrap();
        assert_eq!(kind, SymbolSetType::Bound7Bit);
        assert_eq!(map.lookup(0x41, MapVariant::Standard), 0x41);
        assert!(registry.resolve(SymbolSetId::ROMAN_8).is_none());
        assert_eq!(registry.user_defined().code_max(), 0xFF);
    }

    #[test]
    fn test_install_shadows() {
        let mut registry = SymbolSetRegistry::new().unwrap();
        let mut bytes = b"\x1B*c21R\x1B(f22W".to_vec();
        bytes.extend_from_slice(&[0, 18, 0, 21, 3, 0, 0, 0x41, 0, 0x42]);
        bytes.extend_from_slice(&[0; 8]);
        bytes.extend_from_slice(&[0x00, 0xC4, 0x00, 0xD6]);
        let set = parse_symbol_set(&bytes).unwrap();
        registry.install(&set).unwrap();

        let (kind, map) = registry.resolve(SymbolSetId::ASCII).unwrap();
        assert_eq!(kind, SymbolSetType::Bound7Bit);
        assert_eq!(map.code_max(), 0x42);
        assert_eq!(map.lookup(0x41, MapVariant::Standard), 0xC4);
        assert_eq!(map.lookup(0x40, MapVariant::Standard), NOT_MAPPED);
    }
}
