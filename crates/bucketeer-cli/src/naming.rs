//! Random bucket names and the local name log.
//!
//! Names look like `brave-teal-otter-48213007`: a descriptor, a colour and an
//! animal from built-in dictionaries, then a random suffix below one hundred
//! million. Every generated name is appended to a local log so leftover
//! buckets can be found and removed by hand.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Separator between name segments.
pub const SEPARATOR: char = '-';

/// Exclusive upper bound of the numeric suffix.
const SUFFIX_BOUND: u32 = 100_000_000;

const DESCRIPTORS: &[&str] = &[
    "able", "agile", "ancient", "big", "bold", "brave", "bright", "calm", "clever", "cosmic",
    "crisp", "daring", "eager", "early", "fancy", "fierce", "gentle", "giant", "glad", "grand",
    "happy", "hidden", "humble", "jolly", "keen", "kind", "lazy", "lively", "lucky", "mighty",
    "modern", "noble", "polite", "proud", "quick", "quiet", "rapid", "shy", "silent", "smooth",
    "steady", "swift", "tender", "tidy", "vivid", "wild", "wise", "witty", "young", "zealous",
];

const COLORS: &[&str] = &[
    "amber", "aqua", "azure", "beige", "black", "blue", "bronze", "brown", "coral", "crimson",
    "cyan", "gold", "gray", "green", "indigo", "ivory", "jade", "lavender", "lime", "magenta",
    "maroon", "olive", "orange", "pink", "plum", "purple", "red", "rose", "ruby", "salmon",
    "silver", "tan", "teal", "turquoise", "violet", "white", "yellow",
];

const ANIMALS: &[&str] = &[
    "albatross", "ant", "badger", "bat", "bear", "beaver", "bison", "camel", "cat", "cobra",
    "crane", "crow", "deer", "dingo", "dolphin", "eagle", "falcon", "ferret", "fox", "gecko",
    "gerbil", "hare", "hawk", "heron", "ibis", "jackal", "koala", "lemur", "lion", "llama",
    "lynx", "mole", "moose", "newt", "octopus", "otter", "owl", "panda", "puffin", "quail",
    "rabbit", "raven", "salmon", "seal", "shark", "sloth", "tiger", "toad", "walrus", "wolf",
    "yak", "zebra",
];

/// A generated bucket name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    /// Generates a fresh random name.
    pub fn generate() -> Self {
        Self::from_parts(
            pick(DESCRIPTORS),
            pick(COLORS),
            pick(ANIMALS),
            rand::random_range(0..SUFFIX_BOUND),
        )
    }

    /// Builds a name from its segments, lower-casing the result.
    pub fn from_parts(descriptor: &str, color: &str, noun: &str, suffix: u32) -> Self {
        let name = format!("{descriptor}{SEPARATOR}{color}{SEPARATOR}{noun}{SEPARATOR}{suffix}");
        Self(name.to_lowercase())
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn pick(words: &[&'static str]) -> &'static str {
    words[rand::random_range(0..words.len())]
}

/// Append-only file of generated names.
#[derive(Debug, Clone)]
pub struct NameLog {
    path: PathBuf,
}

impl NameLog {
    /// Creates a log writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `name` as a single line, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub async fn append(&self, name: &ResourceName) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{name}\n").as_bytes()).await?;
        file.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts `name` is three dictionary words and a numeric suffix.
    fn assert_well_formed(name: &str) {
        let segments: Vec<&str> = name.split(SEPARATOR).collect();
        let &[descriptor, color, noun, suffix] = segments.as_slice() else {
            panic!("expected 4 segments in {name}");
        };

        assert!(DESCRIPTORS.contains(&descriptor), "{descriptor}");
        assert!(COLORS.contains(&color), "{color}");
        assert!(ANIMALS.contains(&noun), "{noun}");
        assert!(suffix.chars().all(|c| c.is_ascii_digit()), "{suffix}");
        assert!(suffix.parse::<u32>().unwrap() < SUFFIX_BOUND);
    }

    #[test]
    fn generated_names_are_well_formed() {
        for _ in 0..200 {
            let name = ResourceName::generate();
            assert_eq!(name.as_str(), name.as_str().to_lowercase());
            assert_well_formed(name.as_str());
        }
    }

    #[test]
    fn dictionary_words_fit_bucket_rules() {
        for words in [DESCRIPTORS, COLORS, ANIMALS] {
            assert!(words.iter().all(|w| w.chars().all(|c| c.is_ascii_lowercase())));
        }

        let longest = |words: &[&str]| words.iter().map(|w| w.len()).max().unwrap_or(0);
        let max_len = longest(DESCRIPTORS) + longest(COLORS) + longest(ANIMALS) + 8 + 3;
        assert!(max_len <= 63);
    }

    #[test]
    fn from_parts_lowercases() {
        let name = ResourceName::from_parts("ABC", "Blue", "FOX", 42);
        assert_eq!(name.as_str(), "abc-blue-fox-42");
    }

    #[tokio::test]
    async fn name_log_appends_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let log = NameLog::new(dir.path().join("randomBucketName.txt"));

        let first = ResourceName::from_parts("abc", "blue", "fox", 42);
        let second = ResourceName::from_parts("brave", "teal", "otter", 7);
        log.append(&first).await.unwrap();
        log.append(&second).await.unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "abc-blue-fox-42\nbrave-teal-otter-7\n");
    }
}
