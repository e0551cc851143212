use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

use crate::ObfuscateError;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const FILE_NAME_LENGTH: usize = 10;
pub const DEFAULT_CLASS_NAME_LENGTH: usize = 8;

/// Consecutive collisions tolerated before the token space counts as used up.
pub const MAX_ATTEMPTS: usize = 10_000;

fn pick<R: Rng>(rng: &mut R, alphabet: &[u8]) -> char {
    alphabet[rng.gen_range(0..alphabet.len())] as char
}

/// Random alphanumeric base name, with `.extension` appended when one is given.
pub fn random_file_name<R: Rng>(rng: &mut R, extension: Option<&str>) -> String {
    let mut name: String = (0..FILE_NAME_LENGTH)
        .map(|_| pick(rng, ALPHANUMERIC))
        .collect();
    if let Some(ext) = extension.filter(|ext| !ext.is_empty()) {
        name.push('.');
        name.push_str(ext);
    }
    name
}

/// Random class name whose first character is always a letter.
pub fn random_class_name<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|i| {
            if i == 0 {
                pick(rng, LETTERS)
            } else {
                pick(rng, ALPHANUMERIC)
            }
        })
        .collect()
}

/// Hands out replacement tokens that never repeat within a run.
///
/// Every token returned is remembered, and callers can reserve names that
/// already exist in the project so a fresh token never shadows one of them.
pub struct NameGenerator<R = StdRng> {
    rng: R,
    seen: HashSet<String>,
}

impl NameGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NameGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            seen: HashSet::new(),
        }
    }

    pub fn reserve(&mut self, name: &str) {
        self.seen.insert(name.to_string());
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn class_name(&mut self) -> Result<String, ObfuscateError> {
        self.class_name_with_length(DEFAULT_CLASS_NAME_LENGTH)
    }

    pub fn class_name_with_length(&mut self, length: usize) -> Result<String, ObfuscateError> {
        if length == 0 {
            return Err(ObfuscateError::Options {
                message: "class name length must be at least 1".to_string(),
            });
        }
        self.unused("class name", |rng| random_class_name(rng, length))
    }

    pub fn file_name(&mut self, extension: Option<&str>) -> Result<String, ObfuscateError> {
        self.unused("file name", |rng| random_file_name(rng, extension))
    }

    fn unused<F>(&mut self, kind: &'static str, mut make: F) -> Result<String, ObfuscateError>
    where
        F: FnMut(&mut R) -> String,
    {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = make(&mut self.rng);
            if self.seen.insert(candidate.clone()) {
                return Ok(candidate);
            }
            debug!("{} collision on '{}', regenerating", kind, candidate);
        }
        Err(ObfuscateError::NameSpaceExhausted {
            kind,
            attempts: MAX_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for length in [1, 2, 8, 32] {
            for _ in 0..200 {
                let name = random_class_name(&mut rng, length);
                assert_eq!(name.len(), length);
                let mut chars = name.chars();
                assert!(chars.next().unwrap().is_ascii_alphabetic());
                assert!(chars.all(|c| c.is_ascii_alphanumeric()));
            }
        }
    }

    #[test]
    fn test_file_name_with_extension() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = random_file_name(&mut rng, Some("png"));

        let (base, ext) = name.split_once('.').unwrap();
        assert_eq!(base.len(), FILE_NAME_LENGTH);
        assert!(base.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_file_name_without_extension() {
        let mut rng = StdRng::seed_from_u64(7);

        let bare = random_file_name(&mut rng, None);
        assert_eq!(bare.len(), FILE_NAME_LENGTH);
        assert!(bare.chars().all(|c| c.is_ascii_alphanumeric()));

        let empty = random_file_name(&mut rng, Some(""));
        assert_eq!(empty.len(), FILE_NAME_LENGTH);
        assert!(!empty.contains('.'));
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = NameGenerator::seeded(42);
        let mut b = NameGenerator::seeded(42);

        assert_eq!(a.class_name().unwrap(), b.class_name().unwrap());
        assert_eq!(a.file_name(Some("gif")).unwrap(), b.file_name(Some("gif")).unwrap());
    }

    #[test]
    fn test_generator_never_repeats() {
        // A single-letter alphabet space is small enough to force collisions.
        let mut generator = NameGenerator::seeded(3);
        let mut issued = HashSet::new();
        for _ in 0..52 {
            let name = generator.class_name_with_length(1).unwrap();
            assert!(issued.insert(name));
        }
    }

    #[test]
    fn test_generator_skips_reserved_names() {
        let mut generator = NameGenerator::seeded(3);
        let reserved: Vec<String> = LETTERS[..51].iter().map(|b| (*b as char).to_string()).collect();
        for name in &reserved {
            generator.reserve(name);
        }

        let name = generator.class_name_with_length(1).unwrap();
        assert_eq!(name, "Z");
        assert!(generator.is_taken("Z"));
    }

    #[test]
    fn test_exhausted_space_is_an_error() {
        let mut generator = NameGenerator::seeded(3);
        for _ in 0..52 {
            generator.class_name_with_length(1).unwrap();
        }

        let err = generator.class_name_with_length(1).unwrap_err();
        assert!(matches!(err, ObfuscateError::NameSpaceExhausted { kind: "class name", .. }));
    }

    #[test]
    fn test_zero_length_is_rejected() {
        let mut generator = NameGenerator::seeded(3);

        let err = generator.class_name_with_length(0).unwrap_err();
        assert!(matches!(err, ObfuscateError::Options { .. }));
    }
}
