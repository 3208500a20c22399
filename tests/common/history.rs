use assert_fs::TempDir;
use bit_filter::areas::database::Database;
use bit_filter::areas::refs::Refs;
use bit_filter::artifacts::objects::commit::{Author, Commit};
use bit_filter::artifacts::objects::object_id::ObjectId;
use chrono::DateTime;
use derive_new::new;
use rstest::fixture;
use std::path::Path;

pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// One commit of a seeded history; `None` leaves the identity header out
#[derive(Debug, Clone, new)]
pub struct CommitSpec {
    pub message: &'static str,
    pub author_secs: Option<i64>,
    pub committer_secs: Option<i64>,
}

impl CommitSpec {
    pub fn dated(message: &'static str, secs: i64) -> Self {
        CommitSpec::new(message, Some(secs), Some(secs))
    }
}

pub fn identity(secs: i64) -> Author {
    let timestamp = DateTime::from_timestamp(secs, 0)
        .expect("Invalid timestamp")
        .fixed_offset();

    Author::new(
        "Alice".to_string(),
        "alice@example.com".to_string(),
        Some(timestamp),
    )
}

pub fn database(repository_dir: &Path) -> Database {
    Database::new(
        repository_dir
            .join(".git")
            .join("objects")
            .into_boxed_path(),
    )
}

/// Write a linear history (oldest first) and point `master` at its tip
pub fn write_history(
    repository_dir: &Path,
    specs: &[CommitSpec],
) -> anyhow::Result<Vec<ObjectId>> {
    let database = database(repository_dir);
    let refs = Refs::new(repository_dir.join(".git").into_boxed_path());
    refs.set_head_symref("refs/heads/master")?;

    let tree_oid = ObjectId::try_parse(EMPTY_TREE.to_string())?;
    let mut oids: Vec<ObjectId> = Vec::new();

    for spec in specs {
        let commit = Commit::new(
            oids.last().cloned().into_iter().collect(),
            tree_oid.clone(),
            spec.author_secs.map(identity),
            spec.committer_secs.map(identity),
            spec.message.to_string(),
        );
        let oid = database.store(&commit)?;
        refs.update_head(&oid)?;
        oids.push(oid);
    }

    Ok(oids)
}

/// Replace an object file with bytes that are not zlib data
pub fn corrupt_object(repository_dir: &Path, oid: &ObjectId) -> anyhow::Result<()> {
    let object_path = database(repository_dir).objects_path().join(oid.to_path());
    std::fs::write(object_path, b"corrupt")?;

    Ok(())
}
