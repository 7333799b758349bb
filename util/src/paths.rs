use crate::config::AppConfig;
use std::{fs, io, path::{Path, PathBuf}};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Global input root (absolute), from `AppConfig::input_root`.
/// If relative in env, resolve against current_dir().
pub fn input_root() -> PathBuf {
    let p = PathBuf::from(AppConfig::global().input_root.clone());
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

// ─── Extracted dataset layout ───────────────────────────────────────

// {INPUT_ROOT}/Project_CodeNet
pub fn codenet_root() -> PathBuf {
    input_root().join("Project_CodeNet")
}

pub fn data_dir() -> PathBuf {
    codenet_root().join("data")
}

pub fn metadata_dir() -> PathBuf {
    codenet_root().join("metadata")
}

pub fn derived_dir() -> PathBuf {
    codenet_root().join("derived")
}

/// Global problem table: .../metadata/problem_list.csv
pub fn problem_list_path() -> PathBuf {
    metadata_dir().join("problem_list.csv")
}

/// Per-problem submission metadata: .../metadata/{problem_id}.csv
pub fn problem_metadata_path(problem_id: &str) -> PathBuf {
    metadata_dir().join(format!("{problem_id}.csv"))
}

/// Input/output fixture: .../derived/input_output/data/{problem_id}/{name}.txt
pub fn fixture_path(problem_id: &str, name: &str) -> PathBuf {
    derived_dir()
        .join("input_output")
        .join("data")
        .join(problem_id)
        .join(format!("{name}.txt"))
}

/// Shorthand for the stdin fixture of a problem.
pub fn input_fixture_path(problem_id: &str) -> PathBuf {
    fixture_path(problem_id, "input")
}

/// Source file of one submission: .../data/{problem_id}/{language}/{submission_id}.{ext}
pub fn submission_path(
    problem_id: &str,
    language: &str,
    submission_id: &str,
    filename_ext: &str,
) -> PathBuf {
    data_dir()
        .join(problem_id)
        .join(language)
        .join(format!("{submission_id}.{filename_ext}"))
}

// ─── Generated artifacts ────────────────────────────────────────────

// {INPUT_ROOT}/generated
pub fn generated_dir() -> PathBuf {
    input_root().join("generated")
}

pub fn problem_list_clean_path() -> PathBuf {
    generated_dir().join("problem_list_clean.csv")
}

pub fn generated_pairs_path() -> PathBuf {
    generated_dir().join("generated_pairs.csv")
}

pub fn error_pairs_path() -> PathBuf {
    generated_dir().join("error_pairs.csv")
}

pub fn generated_labels_path() -> PathBuf {
    generated_dir().join("generated_labels.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_test_input_root;
    use serial_test::serial;

    #[test]
    #[serial]
    fn submission_path_follows_codenet_layout() {
        let tmp = setup_test_input_root();
        let p = submission_path("p00001", "Python", "s123", "py");
        assert!(p.starts_with(tmp.path().canonicalize().unwrap()));
        assert!(p.ends_with("Project_CodeNet/data/p00001/Python/s123.py"));
    }

    #[test]
    #[serial]
    fn fixture_and_artifact_paths() {
        let _tmp = setup_test_input_root();
        assert!(input_fixture_path("p00002")
            .ends_with("derived/input_output/data/p00002/input.txt"));
        assert!(fixture_path("p00002", "output")
            .ends_with("derived/input_output/data/p00002/output.txt"));
        assert!(generated_labels_path().ends_with("generated/generated_labels.json"));
        assert!(problem_metadata_path("p00003").ends_with("metadata/p00003.csv"));
    }

    #[test]
    #[serial]
    fn ensure_parent_dir_creates_missing_dirs() {
        let tmp = setup_test_input_root();
        let file = tmp.path().join("a").join("b").join("c.csv");
        ensure_parent_dir(&file).unwrap();
        assert!(tmp.path().join("a").join("b").is_dir());
    }
}
