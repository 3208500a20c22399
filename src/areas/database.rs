use crate::artifacts::log::rev_list::CommitSource;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Loose-object store rooted at `.git/objects`
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        self.read_object(object_path)
    }

    /// Write an object unless it is already present, returning its ID
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(object_id)
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader).context(
                format!("Unable to parse commit {}", object_id.as_ref()),
            )?)),
            _ => Ok(None),
        }
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

impl CommitSource for Database {
    fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        match self.parse_object_as_commit(oid)? {
            Some(commit) => Ok(commit),
            None => Err(anyhow::anyhow!(
                "Object {} is a {}, not a commit",
                oid.as_ref(),
                self.get_object_type(oid)?
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Author;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn sample_commit() -> Commit {
        let author = Author::try_from("A <a@x> 1000 +0000").unwrap();
        Commit::new(
            vec![],
            ObjectId::try_parse("4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string()).unwrap(),
            Some(author.clone()),
            Some(author),
            "Initial".to_string(),
        )
    }

    #[test]
    fn stores_and_loads_commit() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let commit = sample_commit();

        let oid = database.store(&commit).unwrap();

        assert!(database.objects_path().join(oid.to_path()).exists());
        assert_eq!(database.load_commit(&oid).unwrap(), commit);
        assert_eq!(database.get_object_type(&oid).unwrap(), ObjectType::Commit);
    }

    #[test]
    fn storing_twice_keeps_single_object() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let commit = sample_commit();

        let first = database.store(&commit).unwrap();
        let second = database.store(&commit).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn missing_object_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let oid =
            ObjectId::try_parse("0123456789abcdef0123456789abcdef01234567".to_string()).unwrap();

        let error = database.load_commit(&oid).unwrap_err();

        assert!(error.root_cause().downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn corrupt_object_fails_to_decompress() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let oid =
            ObjectId::try_parse("0123456789abcdef0123456789abcdef01234567".to_string()).unwrap();
        let object_path = dir.path().join(oid.to_path());
        std::fs::create_dir_all(object_path.parent().unwrap()).unwrap();
        std::fs::write(&object_path, b"not zlib").unwrap();

        assert!(database.load_commit(&oid).is_err());
    }

    #[test]
    fn non_commit_object_is_rejected() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().to_path_buf().into_boxed_path());
        let oid =
            ObjectId::try_parse("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0".to_string()).unwrap();
        let object_path = dir.path().join(oid.to_path());
        std::fs::create_dir_all(object_path.parent().unwrap()).unwrap();
        database
            .write_object(object_path, Bytes::from_static(b"blob 5\0hello"))
            .unwrap();

        assert_eq!(database.get_object_type(&oid).unwrap(), ObjectType::Blob);
        let error = database.load_commit(&oid).unwrap_err();
        assert_eq!(
            error.to_string(),
            format!("Object {} is a blob, not a commit", oid.as_ref())
        );
    }
}
