//! Output vocabulary for the per-subject sheet variant.
//!
//! Each subject owns a fixed `(grade, teacher, course code)` column triple
//! in the output sheet. Matching is a case-insensitive exact match against
//! this vocabulary; names outside it are reported by the sink, never
//! silently dropped.

use phf::phf_map;

/// Tracked subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    DeepLearning,
    DeepLearningLab,
    MobileDevelopment,
    DataMining,
    NetworkAdministration,
    NetworkAdministrationLab,
    SystemsAnalysis,
    SystemsAnalysisLab,
}

static SUBJECT_NAMES: phf::Map<&'static str, Subject> = phf_map! {
    "deep learning" => Subject::DeepLearning,
    "thực hành deep learning" => Subject::DeepLearningLab,
    "lập trình di động" => Subject::MobileDevelopment,
    "khai phá dữ liệu" => Subject::DataMining,
    "quản trị hệ thống mạng" => Subject::NetworkAdministration,
    "thực hành quản trị hệ thống mạng" => Subject::NetworkAdministrationLab,
    "phân tích thiết kế hệ thống" => Subject::SystemsAnalysis,
    "thực hành phân tích thiết kế hệ thống" => Subject::SystemsAnalysisLab,
};

impl Subject {
    /// Canonical roster name.
    pub fn name(self) -> &'static str {
        match self {
            Subject::DeepLearning => "Deep learning",
            Subject::DeepLearningLab => "Thực hành Deep learning",
            Subject::MobileDevelopment => "Lập trình di động",
            Subject::DataMining => "Khai phá dữ liệu",
            Subject::NetworkAdministration => "Quản trị hệ thống mạng",
            Subject::NetworkAdministrationLab => "Thực hành Quản trị hệ thống mạng",
            Subject::SystemsAnalysis => "Phân tích thiết kế hệ thống",
            Subject::SystemsAnalysisLab => "Thực hành Phân tích thiết kế hệ thống",
        }
    }

    /// `(grade, teacher, course code)` output columns, 1-indexed.
    pub fn columns(self) -> (usize, usize, usize) {
        match self {
            Subject::DeepLearning => (5, 6, 7),
            Subject::DeepLearningLab => (8, 9, 10),
            Subject::MobileDevelopment => (11, 12, 13),
            Subject::DataMining => (14, 15, 16),
            Subject::NetworkAdministration => (17, 18, 19),
            Subject::NetworkAdministrationLab => (20, 21, 22),
            Subject::SystemsAnalysis => (23, 24, 25),
            Subject::SystemsAnalysisLab => (26, 27, 28),
        }
    }

    /// Look a subject up by name, case-insensitively. Exact match only:
    /// lab variants contain their base name, so containment would
    /// misattribute them.
    pub fn find(name: &str) -> Option<Self> {
        SUBJECT_NAMES.get(name.trim().to_lowercase().as_str()).copied()
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Subject::find("Deep Learning"), Some(Subject::DeepLearning));
        assert_eq!(Subject::find("KHAI PHÁ DỮ LIỆU"), Some(Subject::DataMining));
    }

    #[test]
    fn lab_and_base_subjects_stay_distinct() {
        assert_eq!(
            Subject::find("Thực hành Deep learning"),
            Some(Subject::DeepLearningLab)
        );
        assert_ne!(
            Subject::find("Thực hành Deep learning"),
            Subject::find("Deep learning")
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(Subject::find("Triết học"), None);
    }

    #[test]
    fn column_triples_do_not_overlap() {
        let all = [
            Subject::DeepLearning,
            Subject::DeepLearningLab,
            Subject::MobileDevelopment,
            Subject::DataMining,
            Subject::NetworkAdministration,
            Subject::NetworkAdministrationLab,
            Subject::SystemsAnalysis,
            Subject::SystemsAnalysisLab,
        ];
        let mut seen = std::collections::HashSet::new();
        for subject in all {
            let (g, t, c) = subject.columns();
            assert!(seen.insert(g) && seen.insert(t) && seen.insert(c));
        }
    }
}
