#![allow(dead_code)]

pub mod command;
pub mod file;

/// Timestamp every commit made through the test helpers carries
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";
pub const READABLE_COMMIT_DATE: &str = "Sun Jan 1 12:00:00 2023 +0000";

pub fn read_snapshot(dir: &std::path::Path) -> Vec<u8> {
    std::fs::read(dir.join(".gitlet").join("repository")).expect("Failed to read snapshot file")
}

/// Every object file name in the store, per namespace, sorted
pub fn store_listing(dir: &std::path::Path) -> Vec<String> {
    let mut names = ["blobs", "commits"]
        .iter()
        .flat_map(|namespace| {
            std::fs::read_dir(dir.join(".gitlet").join(namespace))
                .expect("Failed to list object store")
                .map(move |entry| {
                    let entry = entry.expect("Failed to read store entry");
                    format!("{}/{}", namespace, entry.file_name().to_string_lossy())
                })
        })
        .collect::<Vec<_>>();
    names.sort();
    names
}
