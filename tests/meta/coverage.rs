//! Keeps `tests/unit` a one-to-one mirror of `src`

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Entry points and module organization files need no mirror of their own
    fn is_structural(relative: &str) -> bool {
        relative == "lib.rs" || relative == "main.rs" || relative.ends_with("mod.rs")
    }

    fn relative_sources(root: &str) -> BTreeSet<String> {
        let root = Path::new(root);
        let mut found = BTreeSet::new();
        collect(root, root, &mut found).expect("failed to scan source tree");
        found
    }

    fn collect(dir: &Path, root: &Path, found: &mut BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(root)
                .map_err(|_| io::Error::other("path escaped its root"))?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                found.insert(relative);
                collect(&path, root, found)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                found.insert(relative);
            }
        }
        Ok(())
    }

    fn declared_modules(path: &Path) -> BTreeSet<String> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .filter_map(|line| {
                line.trim()
                    .trim_start_matches("pub ")
                    .strip_prefix("mod ")
                    .and_then(|rest| rest.strip_suffix(';'))
                    .map(str::to_string)
            })
            .collect()
    }

    // Every source file has a unit test file at the same relative path
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let tests = relative_sources(UNIT_DIR);
        let missing: Vec<_> = relative_sources(SRC_DIR)
            .into_iter()
            .filter(|path| !is_structural(path) && !tests.contains(path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    // Every unit test file still has a source file to test
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let sources = relative_sources(SRC_DIR);
        let orphaned: Vec<_> = relative_sources(UNIT_DIR)
            .into_iter()
            .filter(|path| !path.ends_with("mod.rs") && !sources.contains(path))
            .map(|path| format!("  - tests/unit/{path} (no src/{path})"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "unit tests without a source file:\n{}",
            orphaned.join("\n")
        );
    }

    // Each unit test directory declares the same submodules as its source directory
    #[test]
    fn test_unit_mod_files_declare_every_mirror() {
        let mut mismatched = Vec::new();

        for path in relative_sources(SRC_DIR) {
            if !path.ends_with("/mod.rs") {
                continue;
            }
            let src_modules = declared_modules(&Path::new(SRC_DIR).join(&path));
            let unit_modules = declared_modules(&Path::new(UNIT_DIR).join(&path));
            if src_modules != unit_modules {
                mismatched.push(format!(
                    "  - {path}: src {src_modules:?} vs unit {unit_modules:?}"
                ));
            }
        }

        assert!(
            mismatched.is_empty(),
            "unit mod.rs files out of sync:\n{}",
            mismatched.join("\n")
        );
    }

    // Every test file outside harness roots holds at least one test
    #[test]
    fn test_all_test_files_contain_tests() {
        let root = Path::new("tests");
        let mut files = BTreeSet::new();
        collect(root, root, &mut files).expect("failed to scan tests directory");

        let empty: Vec<_> = files
            .into_iter()
            .filter(|path| {
                Path::new(path)
                    .extension()
                    .is_some_and(|ext| ext == "rs")
                    && !path.ends_with("main.rs")
                    && !path.ends_with("mod.rs")
            })
            .filter(|path| {
                !fs::read_to_string(root.join(path))
                    .unwrap_or_default()
                    .contains("#[test]")
            })
            .map(|path| format!("  - tests/{path}"))
            .collect();

        assert!(
            empty.is_empty(),
            "test files without any #[test] function:\n{}",
            empty.join("\n")
        );
    }
}
