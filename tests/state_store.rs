// tests/state_store.rs

use std::fs;
use std::sync::Arc;

use zapret_adapter::fs::RealFileSystem;
use zapret_adapter::state::{FileStateStore, StateStore};
use zapret_adapter::types::ActiveState;

type TestResult = anyhow::Result<()>;

fn store_in(root: &std::path::Path) -> FileStateStore {
    FileStateStore::with_paths(
        Arc::new(RealFileSystem),
        root.join("appdata").join("zapret-gui").join("last-state.json"),
        root.join("install").join("last-state.json"),
    )
}

#[test]
fn save_creates_the_profile_directory_and_round_trips() -> TestResult {
    let root = tempfile::tempdir()?;
    let store = store_in(root.path());

    store.save(&ActiveState::active("general (ALT3).bat"))?;

    assert!(store.primary_path().is_file());
    assert_eq!(store.load(), ActiveState::active("general (ALT3).bat"));
    assert_eq!(
        fs::read_to_string(store.primary_path())?,
        r#"{"activeStrategy":"general (ALT3).bat"}"#
    );
    Ok(())
}

#[test]
fn cleared_state_is_written_without_a_strategy() -> TestResult {
    let root = tempfile::tempdir()?;
    let store = store_in(root.path());

    store.save(&ActiveState::active("general (ALT).bat"))?;
    store.save(&ActiveState::cleared())?;

    assert_eq!(fs::read_to_string(store.primary_path())?, "{}");
    assert_eq!(store.load(), ActiveState::default());
    Ok(())
}

#[test]
fn fallback_is_read_but_never_written() -> TestResult {
    let root = tempfile::tempdir()?;
    let store = store_in(root.path());
    fs::create_dir_all(root.path().join("install"))?;
    fs::write(
        store.fallback_path(),
        r#"{"activeStrategy":"general (ALT2).bat"}"#,
    )?;

    assert_eq!(store.load(), ActiveState::active("general (ALT2).bat"));

    store.save(&ActiveState::active("general (ALT).bat"))?;
    assert_eq!(store.load(), ActiveState::active("general (ALT).bat"));
    assert_eq!(
        fs::read_to_string(store.fallback_path())?,
        r#"{"activeStrategy":"general (ALT2).bat"}"#
    );
    Ok(())
}

#[test]
fn corrupt_or_null_files_load_as_idle() -> TestResult {
    let root = tempfile::tempdir()?;
    let store = store_in(root.path());
    fs::create_dir_all(store.primary_path().parent().expect("parent"))?;

    fs::write(store.primary_path(), "null")?;
    assert_eq!(store.load(), ActiveState::default());

    fs::write(store.primary_path(), "{ broken")?;
    assert_eq!(store.load(), ActiveState::default());
    Ok(())
}

#[test]
fn no_temp_file_is_left_behind() -> TestResult {
    let root = tempfile::tempdir()?;
    let store = store_in(root.path());

    store.save(&ActiveState::active("general (ALT).bat"))?;

    let dir = store.primary_path().parent().expect("parent");
    let names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["last-state.json"]);
    Ok(())
}
