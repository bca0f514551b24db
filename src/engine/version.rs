//! Version key derivation
//!
//! The engine reports a packed numeric version (`major*10000 + minor*100 +
//! patch`). The derived result key (e.g. `engine2_3`) selects the column of
//! the expectation ledger that this run reads and patches.

/// Registry family of the engine under test
pub const FAMILY: &str = "Engine";

/// Normalized engine version with its packed components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineVersion {
    major: u64,
    minor: u64,
    patch: u64,
}

impl EngineVersion {
    /// Build from the packed numeric version reported by the engine
    ///
    /// A patch component of 99 marks a snapshot built from the development
    /// branch; it is bumped so that e.g. 2.2.99 keys as 2.3.0.
    pub fn from_raw(raw: u64) -> Self {
        let value = if raw % 100 == 99 { raw + 1 } else { raw };
        Self {
            major: value / 10000,
            minor: value / 100 % 100,
            patch: value % 100,
        }
    }

    /// The environment key this version reads and patches (`engine<M>_<m>`)
    pub fn result_key(&self) -> String {
        format!("{}{}_{}", FAMILY.to_lowercase(), self.major, self.minor)
    }

    /// Whether this engine generation needs the compat prelude script
    pub fn is_legacy(&self) -> bool {
        self.major < 2
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_packed_version() {
        assert_eq!(EngineVersion::from_raw(20300).result_key(), "engine2_3");
        assert_eq!(EngineVersion::from_raw(20301).result_key(), "engine2_3");
        assert_eq!(EngineVersion::from_raw(10005).result_key(), "engine1_0");
    }

    #[test]
    fn test_snapshot_patch_keys_as_next_minor() {
        // X.Y.99 must derive the same key as X.(Y+1).0
        for raw in [10099u64, 20299, 21299, 39999] {
            let snapshot = EngineVersion::from_raw(raw);
            let next = EngineVersion::from_raw(raw + 1);
            assert_eq!(snapshot.result_key(), next.result_key(), "raw={raw}");
        }
        assert_eq!(EngineVersion::from_raw(20299).result_key(), "engine2_3");
    }

    #[test]
    fn test_non_snapshot_patch_untouched() {
        let v = EngineVersion::from_raw(20398);
        assert_eq!(v.major(), 2);
        assert_eq!(v.minor(), 3);
        assert_eq!(v.patch(), 98);
    }

    #[test]
    fn test_legacy_generations() {
        assert!(EngineVersion::from_raw(10500).is_legacy());
        assert!(!EngineVersion::from_raw(20000).is_legacy());
        // 1.9.99 snapshot promotes into the 2.x generation
        assert!(!EngineVersion::from_raw(19999).is_legacy());
    }
}
