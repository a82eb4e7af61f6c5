//! Parsing of `ls -l` output from the device.
//!
//! Only lines with more than four whitespace-separated fields are treated as
//! files: field 4 is the size in bytes and the last field is the name.
//! Anything shorter (the `total N` header, blank lines) is noise.

use std::collections::HashMap;

use tracing::warn;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub size: u64,
}

/// One classified listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingLine {
    Noise,
    Entry(ListingEntry),
    /// A file line whose size field is not an integer.
    BadSize { name: String, line: String },
}

impl ListingLine {
    pub fn parse(line: &str) -> Self {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() <= 4 {
            return Self::Noise;
        }

        let name = parts[parts.len() - 1].to_string();
        match parts[4].parse::<u64>() {
            Ok(size) => Self::Entry(ListingEntry { name, size }),
            Err(_) => Self::BadSize {
                name,
                line: line.to_string(),
            },
        }
    }

    /// Name of the file this line describes, if it describes one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Noise => None,
            Self::Entry(entry) => Some(&entry.name),
            Self::BadSize { name, .. } => Some(name),
        }
    }
}

/// A parsed directory listing: file lines in order plus the size table.
#[derive(Debug, Default, Clone)]
pub struct Listing {
    names: Vec<String>,
    sizes: HashMap<String, u64>,
}

impl Listing {
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut listing = Self::default();

        for line in lines {
            let parsed = ListingLine::parse(line.as_ref());
            match &parsed {
                ListingLine::Noise => continue,
                ListingLine::Entry(entry) => {
                    listing.sizes.insert(entry.name.clone(), entry.size);
                }
                ListingLine::BadSize { line, .. } => {
                    warn!("{}", Error::SizeParse { line: line.clone() });
                }
            }
            if let Some(name) = parsed.name() {
                listing.names.push(name.to_string());
            }
        }

        listing
    }

    /// File names in listing order, including those without a usable size.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn size_of(&self, name: &str) -> Option<u64> {
        self.sizes.get(name).copied()
    }

    pub fn total_bytes(&self) -> u64 {
        self.sizes.values().sum()
    }

    pub fn total_files(&self) -> usize {
        self.sizes.len()
    }
}
