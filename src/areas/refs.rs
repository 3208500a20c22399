//! Git references
//!
//! References are text files under `.git` holding either a 40-character
//! object ID or `ref: <path>` pointing at another reference. Walks start from
//! whatever `HEAD` finally resolves to.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Symbolic references followed before giving up, as git does
const MAX_SYMREF_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    SymRef(String),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef(symref_match[1].to_string())))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

/// Git references manager
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    /// Resolve HEAD to a commit ID, following symbolic references
    ///
    /// Returns `None` for an unborn branch or a missing HEAD.
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        let (_, oid) = self.resolve_symref(self.head_path())?;
        Ok(oid)
    }

    /// Point HEAD (or the branch it refers to) at `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let (path, _) = self.resolve_symref(self.head_path())?;

        self.update_ref_file(&path, oid.as_ref())
    }

    /// Follow symbolic references from `start` to the ref file that holds
    /// (or would hold) an object ID
    fn resolve_symref(&self, start: PathBuf) -> anyhow::Result<(PathBuf, Option<ObjectId>)> {
        let mut path = start.clone();

        for _ in 0..=MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&path)? {
                Some(SymRefOrOid::SymRef(target)) => path = self.path.join(target),
                Some(SymRefOrOid::Oid(oid)) => return Ok((path, Some(oid))),
                None => return Ok((path, None)),
            }
        }

        Err(anyhow::anyhow!(
            "Too many levels of symbolic references at {:?}",
            start
        ))
    }

    /// Make HEAD a symbolic reference to `target`, e.g. `refs/heads/master`
    pub fn set_head_symref(&self, target: &str) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), &format!("ref: {target}"))
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(format!("{raw_ref}\n").as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    fn oid() -> ObjectId {
        ObjectId::try_parse("0123456789abcdef0123456789abcdef01234567".to_string()).unwrap()
    }

    #[test]
    fn missing_head_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());

        assert_eq!(refs.read_head().unwrap(), None);
    }

    #[test]
    fn unborn_branch_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        refs.set_head_symref("refs/heads/master").unwrap();

        assert_eq!(refs.read_head().unwrap(), None);
    }

    #[test]
    fn update_head_writes_through_symref() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        refs.set_head_symref("refs/heads/master").unwrap();

        refs.update_head(&oid()).unwrap();

        assert_eq!(refs.read_head().unwrap(), Some(oid()));
        let branch = std::fs::read_to_string(dir.path().join("refs/heads/master")).unwrap();
        assert_eq!(branch.trim(), oid().as_ref());
    }

    #[test]
    fn detached_head_holds_oid() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());

        refs.update_head(&oid()).unwrap();

        assert_eq!(refs.read_head().unwrap(), Some(oid()));
    }

    #[test]
    fn head_pointing_at_itself_is_an_error() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        refs.set_head_symref(HEAD_REF_NAME).unwrap();

        let error = refs.read_head().unwrap_err();
        assert!(error.to_string().contains("Too many levels of symbolic references"));
        assert!(refs.update_head(&oid()).is_err());
    }

    #[test]
    fn symref_cycle_between_branches_is_an_error() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        refs.set_head_symref("refs/heads/a").unwrap();
        std::fs::create_dir_all(dir.path().join("refs/heads")).unwrap();
        std::fs::write(dir.path().join("refs/heads/a"), "ref: refs/heads/b\n").unwrap();
        std::fs::write(dir.path().join("refs/heads/b"), "ref: refs/heads/a\n").unwrap();

        assert!(refs.read_head().is_err());
        assert!(refs.update_head(&oid()).is_err());
    }

    #[test]
    fn symref_chain_within_limit_resolves() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        refs.set_head_symref("refs/heads/a").unwrap();
        std::fs::create_dir_all(dir.path().join("refs/heads")).unwrap();
        std::fs::write(dir.path().join("refs/heads/a"), "ref: refs/heads/b\n").unwrap();
        std::fs::write(dir.path().join("refs/heads/b"), format!("{}\n", oid().as_ref())).unwrap();

        assert_eq!(refs.read_head().unwrap(), Some(oid()));
    }
}
