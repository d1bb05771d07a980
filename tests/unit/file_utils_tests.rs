/*!
 * Tests for file utilities
 */

use romloc::file_utils::FileManager;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_generate_output_path_shouldInsertLanguageBeforeExtension() {
    let output = FileManager::generate_output_path("scripts/intro.asm", "da");
    assert_eq!(output, Path::new("scripts/intro.da.asm"));
}

#[test]
fn test_generate_output_path_withoutExtension_shouldDefaultToAsm() {
    let output = FileManager::generate_output_path("scripts/intro", "da");
    assert_eq!(output, Path::new("scripts/intro.da.asm"));
}

#[test]
fn test_file_exists_shouldDistinguishFilesFromDirectories() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("script.asm");
    fs::write(&file_path, "A::\n").unwrap();

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(dir.path()));
    assert!(!FileManager::file_exists(dir.path().join("missing.asm")));
}

#[test]
fn test_find_files_shouldReturnSortedMatchesRecursively() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(dir.path().join("b.asm"), "").unwrap();
    fs::write(dir.path().join("a.asm"), "").unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();
    fs::write(nested.join("c.ASM"), "").unwrap();

    let found = FileManager::find_files(dir.path(), "asm").unwrap();

    assert_eq!(found.len(), 3);
    assert_eq!(found[0].file_name().unwrap(), "a.asm");
    assert_eq!(found[1].file_name().unwrap(), "b.asm");
    // Extension matching is case-insensitive
    assert_eq!(found[2].file_name().unwrap(), "c.ASM");
}

#[test]
fn test_write_atomic_shouldCreateFileWithContent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.asm");

    FileManager::write_atomic(&path, "A::\n\ttext \"HEJ\"\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "A::\n\ttext \"HEJ\"\n");
}

#[test]
fn test_write_atomic_shouldReplaceExistingContent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.asm");
    fs::write(&path, "OLD").unwrap();

    FileManager::write_atomic(&path, "NEW").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "NEW");
    // No temp files left behind next to the output
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_write_atomic_withMissingParent_shouldCreateDirectories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deep/nested/out.asm");

    FileManager::write_atomic(&path, "content").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "content");
}

#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("/nonexistent/script.asm").is_err());
}
