use strum::{Display, EnumString};

/// Target languages as they appear in the `language` column of the CodeNet
/// metadata (and as directory names under `data/<problem_id>/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Language {
    Python,
    C,
    #[strum(serialize = "C++")]
    Cpp,
    Java,
}

/// Execution/classification family a language belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LanguageFamily {
    /// Source is handed straight to an interpreter binary.
    Interpreted,
    /// C/C++: compiled to a native binary.
    Native,
    /// JVM-hosted.
    Managed,
}

impl Language {
    pub fn family(self) -> LanguageFamily {
        match self {
            Language::Python => LanguageFamily::Interpreted,
            Language::C | Language::Cpp => LanguageFamily::Native,
            Language::Java => LanguageFamily::Managed,
        }
    }

    /// Parses a metadata language string; unknown languages yield `None`.
    pub fn from_codenet(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

/// Target languages pairs are generated for.
pub const SUPPORTED_LANGUAGES: &[&str] = &["Python"];

/// Compiler/interpreter variants (the `original_language` column) whose
/// submissions are kept. Python 2 and PyPy variants are left out on purpose.
pub const SUPPORTED_ORIGINAL_LANGUAGES: &[&str] = &[
    "C++14 (GCC 5.4.1)",
    "C++ (GCC 9.2.1)",
    "C++",
    "JAVA",
    "Python (3.8.2)",
    "C++11",
    "C",
    "C (GCC 9.2.1)",
    "C++14 (Clang 3.8.0)",
    "Python",
    "Java (OpenJDK 11.0.6)",
    "C (GCC 5.4.1)",
    "C++ (Clang 10.0.0)",
    "Java8 (OpenJDK 1.8.0)",
    "Python3",
    "C++ (GCC 9.2.1 with AC Library v1.1)",
    "C++14",
    "Java (OpenJDK 1.8.0)",
    "C++ (GCC 5.4.1)",
    "C (Clang 3.8.0)",
    "C (Clang 10.0.0)",
    "C++ (Clang 3.8.0)",
    "Java7 (OpenJDK 1.7.0)",
    "C++ (G++ 4.6.4)",
    "C++ (Clang 10.0.0 with AC Library v1.1)",
    "C++11 (GCC 4.8.1)",
];

pub fn is_supported_language(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}

pub fn is_supported_original_language(original_language: &str) -> bool {
    SUPPORTED_ORIGINAL_LANGUAGES.contains(&original_language)
}
