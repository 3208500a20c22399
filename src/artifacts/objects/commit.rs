//! Git commit object
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! The `author` and `committer` headers are optional when reading: objects
//! written by other tools may lack them, and an identity may lack its
//! timestamp. Both cases surface as `None` rather than as parse errors.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use derive_new::new;
use std::io::{BufRead, Write};

/// Author or committer identity
#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Author {
    name: String,
    email: String,
    timestamp: Option<DateTime<FixedOffset>>,
}

impl Author {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp
    }

    /// Format author name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Header form: "Name <email> timestamp timezone", or just the name part
    /// when the identity carries no timestamp
    pub fn display(&self) -> String {
        match self.timestamp {
            Some(timestamp) => format!(
                "{} {} {}",
                self.display_name(),
                timestamp.timestamp(),
                timestamp.format("%z")
            ),
            None => self.display_name(),
        }
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000", if a timestamp is present
    pub fn readable_timestamp(&self) -> Option<String> {
        self.timestamp
            .map(|timestamp| timestamp.format("%a %b %-d %H:%M:%S %Y %z").to_string())
    }

    fn parse_offset(timezone: &str) -> anyhow::Result<FixedOffset> {
        let (sign, digits) = match timezone.split_at_checked(1) {
            Some(("+", digits)) => (1, digits),
            Some(("-", digits)) => (-1, digits),
            _ => return Err(anyhow::anyhow!("Invalid timezone: {timezone}")),
        };
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(anyhow::anyhow!("Invalid timezone: {timezone}"));
        }

        let hours: i32 = digits[..2].parse()?;
        let minutes: i32 = digits[2..].parse()?;

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .ok_or_else(|| anyhow::anyhow!("Invalid timezone: {timezone}"))
    }

    fn parse_timestamp(raw: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        let mut parts = raw.split_whitespace();
        let seconds = parts
            .next()
            .context("Invalid author format: missing timestamp")?
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp: {raw}"))?;
        let offset = match parts.next() {
            Some(timezone) => Self::parse_offset(timezone)?,
            None => FixedOffset::east_opt(0).context("Invalid timezone")?,
        };

        let datetime = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp: {seconds}"))?;
        Ok(datetime.with_timezone(&offset))
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> [timestamp timezone]"
        let email_start = value
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<'"))?;
        let email_end = value[email_start..]
            .find('>')
            .map(|offset| email_start + offset)
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>'"))?;

        let name = value[..email_start].trim().to_string();
        let email = value[email_start + 1..email_end].to_string();

        let rest = value[email_end + 1..].trim();
        let timestamp = if rest.is_empty() {
            None
        } else {
            Some(Self::parse_timestamp(rest)?)
        };

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Git commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for initial commit, multiple for merge commits)
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Option<Author>,
    committer: Option<Author>,
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Option<Author>,
        committer: Option<Author>,
        message: String,
    ) -> Self {
        Commit {
            parents,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    pub fn committer(&self) -> Option<&Author> {
        self.committer.as_ref()
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid.as_ref())];
        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        if let Some(author) = &self.author {
            lines.push(format!("author {}", author.display()));
        }
        if let Some(committer) = &self.committer {
            lines.push(format!("committer {}", committer.display()));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let object_content = self.header_lines().join("\n");

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), object_content.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(object_content.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .unwrap_or((content.as_str(), ""));

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            // continuation of a multi-line header such as gpgsig
            if line.starts_with(' ') {
                continue;
            }

            let Some((key, value)) = line.split_once(' ') else {
                continue;
            };
            match key {
                "tree" => tree_oid = Some(ObjectId::try_parse(value.to_string())?),
                "parent" => parents.push(ObjectId::try_parse(value.to_string())?),
                "author" => author = Some(Author::try_from(value)?),
                "committer" => committer = Some(Author::try_from(value)?),
                _ => {}
            }
        }

        let tree_oid = tree_oid.context("Invalid commit object: missing tree line")?;

        Ok(Self::new(
            parents,
            tree_oid,
            author,
            committer,
            message.to_string(),
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
