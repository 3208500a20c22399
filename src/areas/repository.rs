use crate::areas::database::Database;
use crate::areas::refs::Refs;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

pub struct Repository {
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    refs: Refs,
}

impl Repository {
    /// Open the repository rooted at `path`, which must contain a `.git` directory
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path)
            .canonicalize()
            .with_context(|| format!("Unable to open repository at {path}"))?;

        let git_path = path.join(".git");
        if !git_path.is_dir() {
            return Err(anyhow::anyhow!(
                "Not a git repository: {}",
                path.display()
            ));
        }

        let database = Database::new(git_path.join("objects").into_boxed_path());
        let refs = Refs::new(git_path.into_boxed_path());

        Ok(Repository {
            writer: RefCell::new(writer),
            database,
            refs,
        })
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
