//! Chooses between the legacy single file and the current profile/cluster
//! documents. Migration is all or nothing: the two formats are never merged.

use crate::destination::Destination;

/// Which configuration files are present in a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePresence {
    pub legacy: bool,
    pub cluster_document: bool,
}

impl FilePresence {
    pub fn detect(destination: &Destination) -> Self {
        Self {
            legacy: destination.legacy_config_path().is_file(),
            cluster_document: destination.cluster_config_path().is_file(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Legacy,
    Current,
}

/// The current format wins whenever its cluster document exists. With
/// neither file present the current format is chosen so the read reports
/// the missing document.
pub fn select_format(presence: FilePresence) -> ConfigFormat {
    match (presence.legacy, presence.cluster_document) {
        (true, false) => ConfigFormat::Legacy,
        (true, true) | (false, true) | (false, false) => ConfigFormat::Current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presence(legacy: bool, cluster_document: bool) -> FilePresence {
        FilePresence {
            legacy,
            cluster_document,
        }
    }

    #[test]
    fn legacy_only() {
        assert_eq!(select_format(presence(true, false)), ConfigFormat::Legacy);
    }

    #[test]
    fn both_present_prefers_current() {
        assert_eq!(select_format(presence(true, true)), ConfigFormat::Current);
    }

    #[test]
    fn current_only() {
        assert_eq!(select_format(presence(false, true)), ConfigFormat::Current);
    }

    #[test]
    fn nothing_present_reads_current() {
        assert_eq!(select_format(presence(false, false)), ConfigFormat::Current);
    }

    #[test]
    fn detect_sees_files_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = Destination::at(tmp.path());
        assert_eq!(FilePresence::detect(&dest), presence(false, false));

        std::fs::write(dest.legacy_config_path(), "[ecs]\n").unwrap();
        assert_eq!(FilePresence::detect(&dest), presence(true, false));

        std::fs::write(dest.cluster_config_path(), "clusters: {}\n").unwrap();
        assert_eq!(FilePresence::detect(&dest), presence(true, true));
    }
}
