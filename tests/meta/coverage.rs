//! Tests that every source file has a unit test file and that every unit
//! test file is compiled

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    fn crate_dir(relative: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
    }

    // Entry points and module files hold declarations only
    fn is_declaration_file(path: &str) -> bool {
        path == "lib.rs"
            || path == "main.rs"
            || path.ends_with("/main.rs")
            || path.ends_with("mod.rs")
    }

    // Relative paths of `.rs` files below `root`, with '/' separators
    fn rust_files(root: &Path) -> io::Result<BTreeSet<String>> {
        let mut files = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "rs") {
                    let relative = path
                        .strip_prefix(root)
                        .map_err(|_strip_error| io::Error::other("path outside root"))?;
                    let parts: Vec<_> = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect();
                    files.insert(parts.join("/"));
                }
            }
        }

        Ok(files)
    }

    // Tests each source file has a unit test file at the mirrored path
    // Verified by adding src/plot/legend.rs without tests
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let sources = rust_files(&crate_dir("src")).expect("Failed to read src");
        let unit_tests = rust_files(&crate_dir("tests/unit")).expect("Failed to read tests/unit");

        let missing: Vec<_> = sources
            .iter()
            .filter(|path| !is_declaration_file(path) && !unit_tests.contains(*path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    // Tests each unit test file mirrors an existing source file
    // Verified by renaming src/io/progress.rs
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let sources = rust_files(&crate_dir("src")).expect("Failed to read src");
        let unit_tests = rust_files(&crate_dir("tests/unit")).expect("Failed to read tests/unit");

        let orphaned: Vec<_> = unit_tests
            .iter()
            .filter(|path| !is_declaration_file(path) && !sources.contains(*path))
            .map(|path| format!("  - tests/unit/{path}"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source file:\n{}",
            orphaned.join("\n")
        );
    }

    // Tests each unit test file is declared by its parent module
    // Verified by removing `mod svg;` from tests/unit/plot/mod.rs
    #[test]
    fn test_all_unit_tests_are_declared() {
        let root = crate_dir("tests/unit");
        let unit_tests = rust_files(&root).expect("Failed to read tests/unit");

        let mut undeclared = Vec::new();
        for path in unit_tests.iter().filter(|path| !is_declaration_file(path)) {
            let file = Path::new(path);
            let (Some(parent), Some(stem)) = (file.parent(), file.file_stem()) else {
                continue;
            };
            let declaring = if parent.as_os_str().is_empty() {
                root.join("main.rs")
            } else {
                root.join(parent).join("mod.rs")
            };
            let declaration = format!("mod {};", stem.to_string_lossy());
            let declared = fs::read_to_string(&declaring)
                .is_ok_and(|content| content.lines().any(|line| line.trim() == declaration));
            if !declared {
                undeclared.push(format!("  - tests/unit/{path} (in {})", declaring.display()));
            }
        }

        // Directories are declared from main.rs
        let main = fs::read_to_string(root.join("main.rs")).expect("Failed to read main.rs");
        let directories = fs::read_dir(&root)
            .expect("Failed to read tests/unit")
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()));
        for name in directories {
            let declaration = format!("mod {name};");
            if !main.lines().any(|line| line.trim() == declaration) {
                undeclared.push(format!("  - tests/unit/{name}/"));
            }
        }

        assert!(
            undeclared.is_empty(),
            "Unit test files that are never compiled:\n{}",
            undeclared.join("\n")
        );
    }

    // Tests every test file other than module declarations contains tests
    // Verified by emptying tests/unit/io/error.rs
    #[test]
    fn test_all_test_files_contain_tests() {
        let root = crate_dir("tests");
        let files = rust_files(&root).expect("Failed to read tests");

        let empty: Vec<_> = files
            .iter()
            .filter(|path| !is_declaration_file(path))
            .filter(|path| {
                !fs::read_to_string(root.join(path.as_str()))
                    .is_ok_and(|content| content.contains("#[test]"))
            })
            .map(|path| format!("  - tests/{path}"))
            .collect();

        assert!(
            empty.is_empty(),
            "Test files without any #[test] functions:\n{}",
            empty.join("\n")
        );
    }
}
