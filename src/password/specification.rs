// src/password/specification.rs
//! Password specification: validation, generation, conformance.
//!
//! A specification is built through a deferred-validation builder:
//! `allow()` and `require()` calls accumulate character sets, and
//! `build()` verifies the structural invariants in one place:
//! - every character is ASCII printable (0x20-0x7E)
//! - required subsets are pairwise disjoint
//! - the sum of required counts fits within the maximum length
//! - the length range satisfies `1 <= min <= max`
//!
//! The allowed set is always the union of all allowed and required
//! characters, so "required" implies "allowed" without a separate
//! `allow()` call. A specification with no required subsets is valid and
//! acts as a pure allow-list.

use crate::error::{ProtocolError, Result};
use crate::protocol::wire;
use once_cell::sync::{Lazy, OnceCell};
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// First ASCII printable character (space).
const PRINTABLE_START: u8 = 0x20;
/// Number of ASCII printable characters (0x20 through 0x7E inclusive).
const PRINTABLE_COUNT: usize = 0x5F;

/// Well-known character sets for building password specifications.
pub mod charsets {
    /// The ten decimal digits.
    pub const NUMERALS: &str = "0123456789";

    /// Lowercase ASCII letters.
    pub const LOWER_ALPHA: &str = "abcdefghijklmnopqrstuvwxyz";

    /// Uppercase ASCII letters.
    pub const UPPER_ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Lowercase letters minus the visually ambiguous `i`, `l`, `o`.
    pub const LOWER_ALPHA_DISTINGUISHABLE: &str = "abcdefghjkmnpqrstuvwxyz";

    /// Uppercase letters minus the visually ambiguous `I`, `L`, `O`.
    pub const UPPER_ALPHA_DISTINGUISHABLE: &str = "ABCDEFGHJKMNPQRSTUVWXYZ";

    /// Numerals minus the visually ambiguous `0` and `1`.
    pub const NUMERALS_DISTINGUISHABLE: &str = "23456789";

    /// Punctuation broadly accepted by password forms.
    pub const SYMBOLS: &str = "-_.";
}

/// Default specification used when a requester expresses no preference:
/// 12-16 characters from the distinguishable alphanumerics plus symbols,
/// with at least one lowercase letter, one uppercase letter and one digit.
static DEFAULT_SPECIFICATION: Lazy<PasswordSpecification> = Lazy::new(|| {
    PasswordSpecification::builder()
        .allow(charsets::SYMBOLS)
        .require(charsets::LOWER_ALPHA_DISTINGUISHABLE, 1)
        .require(charsets::UPPER_ALPHA_DISTINGUISHABLE, 1)
        .require(charsets::NUMERALS_DISTINGUISHABLE, 1)
        .length_range(12, 16)
        .build()
        .expect("default password specification is structurally valid")
});

/// Bitwise result of a conformance check. Zero means the candidate fully
/// conforms; the three failure bits are independent and may combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConformanceFlags(u32);

impl ConformanceFlags {
    /// The candidate satisfies every constraint.
    pub const CONFORMS: ConformanceFlags = ConformanceFlags(0);
    /// The candidate is empty or its length lies outside `[min, max]`.
    pub const LENGTH_MISMATCH: ConformanceFlags = ConformanceFlags(1);
    /// The candidate contains a character outside the allowed set.
    pub const DISALLOWED_CHARACTER: ConformanceFlags = ConformanceFlags(1 << 1);
    /// A required subset is not represented the minimum number of times.
    pub const REQUIRED_CHARACTER_MISSING: ConformanceFlags = ConformanceFlags(1 << 2);

    /// Whether the candidate fully conforms (no failure bit set).
    pub fn conforms(self) -> bool {
        self.0 == 0
    }

    /// Whether all bits of `flag` are set in this result.
    pub fn contains(self, flag: ConformanceFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Raw bit value, as carried on the wire.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for ConformanceFlags {
    type Output = ConformanceFlags;

    fn bitor(self, rhs: ConformanceFlags) -> ConformanceFlags {
        ConformanceFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ConformanceFlags {
    fn bitor_assign(&mut self, rhs: ConformanceFlags) {
        self.0 |= rhs.0;
    }
}

/// One required subset with its minimum occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequiredSet {
    /// Sorted, deduplicated ASCII-printable bytes
    chars: Vec<u8>,
    count: usize,
}

/// Per-character classification, computed once on first conformance check.
#[derive(Debug)]
struct Classifier {
    /// Whether each printable character is in the allowed set
    allowed: [bool; PRINTABLE_COUNT],
    /// Index of the required subset each printable character belongs to
    required_index: [Option<usize>; PRINTABLE_COUNT],
}

/// An immutable, validated password specification.
///
/// Construct via [`PasswordSpecification::builder`]. Generation draws from
/// a cryptographically secure random source and always produces a string
/// that its own [`check_conformance`](PasswordSpecification::check_conformance)
/// reports as conforming.
#[derive(Debug)]
pub struct PasswordSpecification {
    /// Sorted, deduplicated union of all allowed and required characters
    allowed: Vec<u8>,
    /// Required subsets, sorted by count then lexicographically
    required: Vec<RequiredSet>,
    min_length: usize,
    max_length: usize,
    /// Lazily built per-character classification; first access from any
    /// thread wins, later racers observe the same instance
    classifier: OnceCell<Classifier>,
}

/// Wire form of a [`PasswordSpecification`], carried inside hint requests.
#[derive(Serialize, Deserialize)]
pub(crate) struct PasswordSpecificationWire {
    pub allowed: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<RequiredSetWire>,
    pub min_length: u32,
    pub max_length: u32,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct RequiredSetWire {
    pub chars: String,
    pub count: u32,
}

impl PartialEq for PasswordSpecification {
    fn eq(&self, other: &Self) -> bool {
        // The classifier cache is derived state and never participates.
        self.allowed == other.allowed
            && self.required == other.required
            && self.min_length == other.min_length
            && self.max_length == other.max_length
    }
}

impl Eq for PasswordSpecification {}

impl Clone for PasswordSpecification {
    fn clone(&self) -> Self {
        PasswordSpecification {
            allowed: self.allowed.clone(),
            required: self.required.clone(),
            min_length: self.min_length,
            max_length: self.max_length,
            classifier: OnceCell::new(),
        }
    }
}

impl PasswordSpecification {
    /// Starts an empty builder.
    pub fn builder() -> PasswordSpecificationBuilder {
        PasswordSpecificationBuilder {
            allowed: Vec::new(),
            required: Vec::new(),
            min_length: 1,
            max_length: 0,
            length_range_set: false,
        }
    }

    /// The crate-default specification (12-16 distinguishable
    /// alphanumerics plus symbols, one lower/upper/digit required).
    pub fn default_specification() -> &'static PasswordSpecification {
        &DEFAULT_SPECIFICATION
    }

    /// Generates a random password conforming to this specification.
    ///
    /// Uses the thread-local CSPRNG. See
    /// [`generate_with`](PasswordSpecification::generate_with) for the
    /// algorithm.
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generates a random password using the supplied secure source.
    ///
    /// # Algorithm
    /// 1. Pick a uniformly random length in `[min, max]`.
    /// 2. For each required subset, draw exactly `count` characters
    ///    uniformly (with replacement) from that subset.
    /// 3. Fill the remaining slots uniformly from the full allowed set.
    /// 4. Shuffle the whole sequence, so required characters do not
    ///    cluster in a predictable position.
    ///
    /// # Postcondition
    /// `check_conformance` on the returned string is always `CONFORMS`.
    pub fn generate_with<R: Rng + CryptoRng>(&self, rng: &mut R) -> String {
        let length = rng.gen_range(self.min_length..=self.max_length);
        let mut chars: Vec<u8> = Vec::with_capacity(length);

        for set in &self.required {
            for _ in 0..set.count {
                chars.push(set.chars[rng.gen_range(0..set.chars.len())]);
            }
        }
        while chars.len() < length {
            chars.push(self.allowed[rng.gen_range(0..self.allowed.len())]);
        }
        chars.shuffle(rng);

        chars.into_iter().map(char::from).collect()
    }

    /// Checks a candidate password against this specification.
    ///
    /// # Returns
    /// The bitwise OR of all applicable failure flags; zero
    /// ([`ConformanceFlags::CONFORMS`]) means the candidate satisfies
    /// every constraint. The flags are independent: a candidate can be
    /// simultaneously too short, contain a disallowed character, and miss
    /// a required character class.
    pub fn check_conformance(&self, candidate: &str) -> ConformanceFlags {
        let classifier = self.classifier.get_or_init(|| self.build_classifier());
        let mut flags = ConformanceFlags::CONFORMS;

        let length = candidate.chars().count();
        if length < self.min_length || length > self.max_length {
            flags |= ConformanceFlags::LENGTH_MISMATCH;
        }

        let mut remaining: Vec<usize> = self.required.iter().map(|s| s.count).collect();
        for c in candidate.chars() {
            match printable_index(c) {
                Some(i) if classifier.allowed[i] => {
                    if let Some(set_index) = classifier.required_index[i] {
                        remaining[set_index] = remaining[set_index].saturating_sub(1);
                    }
                }
                _ => flags |= ConformanceFlags::DISALLOWED_CHARACTER,
            }
        }
        if remaining.iter().any(|&r| r > 0) {
            flags |= ConformanceFlags::REQUIRED_CHARACTER_MISSING;
        }
        flags
    }

    /// Encodes to the binary wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wire::encode(&self.to_wire())
    }

    /// Reconstructs from the binary wire form, re-running every build-time
    /// invariant check.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_wire(wire::decode(bytes)?).map_err(ProtocolError::into_malformed)
    }

    pub(crate) fn to_wire(&self) -> PasswordSpecificationWire {
        PasswordSpecificationWire {
            allowed: self.allowed.iter().map(|&b| char::from(b)).collect(),
            required: self
                .required
                .iter()
                .map(|set| RequiredSetWire {
                    chars: set.chars.iter().map(|&b| char::from(b)).collect(),
                    count: set.count as u32,
                })
                .collect(),
            min_length: self.min_length as u32,
            max_length: self.max_length as u32,
        }
    }

    pub(crate) fn from_wire(wire: PasswordSpecificationWire) -> Result<Self> {
        let mut builder = PasswordSpecification::builder()
            .allow(&wire.allowed)
            .length_range(wire.min_length as usize, wire.max_length as usize);
        for set in &wire.required {
            builder = builder.require(&set.chars, set.count as usize);
        }
        builder.build()
    }

    /// The allowed character set, sorted and deduplicated.
    pub fn allowed_chars(&self) -> String {
        self.allowed.iter().map(|&b| char::from(b)).collect()
    }

    /// Inclusive length range `[min, max]`.
    pub fn length_range(&self) -> (usize, usize) {
        (self.min_length, self.max_length)
    }

    fn build_classifier(&self) -> Classifier {
        let mut allowed = [false; PRINTABLE_COUNT];
        let mut required_index = [None; PRINTABLE_COUNT];
        for &b in &self.allowed {
            allowed[(b - PRINTABLE_START) as usize] = true;
        }
        for (set_index, set) in self.required.iter().enumerate() {
            for &b in &set.chars {
                required_index[(b - PRINTABLE_START) as usize] = Some(set_index);
            }
        }
        Classifier {
            allowed,
            required_index,
        }
    }
}

/// Maps an ASCII printable character to its classifier index.
fn printable_index(c: char) -> Option<usize> {
    let code = c as u32;
    if (PRINTABLE_START as u32..PRINTABLE_START as u32 + PRINTABLE_COUNT as u32).contains(&code) {
        Some((code - PRINTABLE_START as u32) as usize)
    } else {
        None
    }
}

/// Staged construction of a [`PasswordSpecification`]; all invariants are
/// checked in [`build`](PasswordSpecificationBuilder::build).
#[derive(Debug, Clone)]
pub struct PasswordSpecificationBuilder {
    /// Raw characters from every `allow()` call
    allowed: Vec<char>,
    /// Raw (characters, count) pairs from every `require()` call
    required: Vec<(Vec<char>, usize)>,
    min_length: usize,
    max_length: usize,
    length_range_set: bool,
}

impl PasswordSpecificationBuilder {
    /// Adds characters to the allowed set.
    pub fn allow(mut self, chars: &str) -> Self {
        self.allowed.extend(chars.chars());
        self
    }

    /// Adds a required subset: at least `count` of the password's
    /// characters must come from `chars`. The characters are implicitly
    /// allowed.
    pub fn require(mut self, chars: &str, count: usize) -> Self {
        self.required.push((chars.chars().collect(), count));
        self
    }

    /// Sets the inclusive length range.
    pub fn length_range(mut self, min: usize, max: usize) -> Self {
        self.min_length = min;
        self.max_length = max;
        self.length_range_set = true;
        self
    }

    /// Validates all accumulated constraints and produces the
    /// specification.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidSpecification`] if:
    /// - no length range was set, or `min < 1`, or `min > max`
    /// - any character is outside ASCII printable (0x20-0x7E)
    /// - the allowed set ends up empty
    /// - any required subset is empty or has a zero count
    /// - two required subsets share a character
    /// - the sum of required counts exceeds the maximum length
    pub fn build(self) -> Result<PasswordSpecification> {
        if !self.length_range_set {
            return Err(invalid("no length range specified"));
        }
        if self.min_length < 1 {
            return Err(invalid("minimum length must be at least 1"));
        }
        if self.min_length > self.max_length {
            return Err(invalid("minimum length exceeds maximum length"));
        }

        let mut allowed = sorted_printable_bytes(&self.allowed)?;
        let mut required = Vec::with_capacity(self.required.len());
        for (chars, count) in &self.required {
            let set = sorted_printable_bytes(chars)?;
            if set.is_empty() {
                return Err(invalid("required subset must not be empty"));
            }
            if *count < 1 {
                return Err(invalid("required count must be at least 1"));
            }
            allowed.extend_from_slice(&set);
            required.push(RequiredSet {
                chars: set,
                count: *count,
            });
        }
        allowed.sort_unstable();
        allowed.dedup();
        if allowed.is_empty() {
            return Err(invalid("allowed character set must not be empty"));
        }

        // Pairwise disjointness over the required subsets.
        let mut seen = [false; PRINTABLE_COUNT];
        for set in &required {
            for &b in &set.chars {
                let i = (b - PRINTABLE_START) as usize;
                if seen[i] {
                    return Err(invalid(&format!(
                        "character {:?} appears in more than one required subset",
                        char::from(b)
                    )));
                }
                seen[i] = true;
            }
        }

        let required_total: usize = required.iter().map(|s| s.count).sum();
        if required_total > self.max_length {
            return Err(invalid(
                "sum of required counts exceeds the maximum length",
            ));
        }

        // Deterministic iteration order: by count, then lexicographically.
        required.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.chars.cmp(&b.chars)));

        Ok(PasswordSpecification {
            allowed,
            required,
            min_length: self.min_length,
            max_length: self.max_length,
            classifier: OnceCell::new(),
        })
    }
}

fn invalid(reason: &str) -> ProtocolError {
    ProtocolError::InvalidSpecification(reason.to_string())
}

/// Converts characters to sorted, deduplicated ASCII-printable bytes.
fn sorted_printable_bytes(chars: &[char]) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(chars.len());
    for &c in chars {
        if printable_index(c).is_none() {
            return Err(invalid(&format!(
                "character {:?} is outside ASCII printable range",
                c
            )));
        }
        bytes.push(c as u8);
    }
    bytes.sort_unstable();
    bytes.dedup();
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_spec() -> PasswordSpecification {
        PasswordSpecification::builder()
            .allow(charsets::LOWER_ALPHA)
            .require(charsets::NUMERALS, 2)
            .require(charsets::UPPER_ALPHA, 1)
            .length_range(8, 12)
            .build()
            .unwrap()
    }

    #[test]
    fn test_required_implies_allowed() {
        let spec = simple_spec();
        let allowed = spec.allowed_chars();
        // Digits and uppercase were never passed to allow(), only require().
        assert!(allowed.contains('0'));
        assert!(allowed.contains('Z'));
        assert!(allowed.contains('a'));
    }

    #[test]
    fn test_pure_allow_list_is_valid() {
        let spec = PasswordSpecification::builder()
            .allow(charsets::NUMERALS)
            .length_range(4, 8)
            .build()
            .unwrap();
        assert!(spec.check_conformance("123456").conforms());
    }

    #[test]
    fn test_overlapping_required_sets_rejected() {
        let err = PasswordSpecification::builder()
            .require("abc", 1)
            .require("cde", 1)
            .length_range(8, 12)
            .build()
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidSpecification(_)));
    }

    #[test]
    fn test_required_counts_exceeding_max_length_rejected() {
        let err = PasswordSpecification::builder()
            .require(charsets::NUMERALS, 5)
            .require(charsets::LOWER_ALPHA, 4)
            .length_range(4, 8)
            .build()
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidSpecification(_)));
    }

    #[test]
    fn test_invalid_length_ranges_rejected() {
        let base = || PasswordSpecification::builder().allow(charsets::NUMERALS);
        assert!(base().length_range(0, 8).build().is_err());
        assert!(base().length_range(9, 8).build().is_err());
        assert!(base().build().is_err()); // no range at all
    }

    #[test]
    fn test_non_printable_characters_rejected() {
        assert!(PasswordSpecification::builder()
            .allow("abc\u{7f}")
            .length_range(4, 8)
            .build()
            .is_err());
        assert!(PasswordSpecification::builder()
            .allow("abcé")
            .length_range(4, 8)
            .build()
            .is_err());
    }

    #[test]
    fn test_empty_candidate_flags_length_mismatch() {
        let flags = simple_spec().check_conformance("");
        assert!(flags.contains(ConformanceFlags::LENGTH_MISMATCH));
        assert!(!flags.conforms());
    }

    #[test]
    fn test_disallowed_character_flagged() {
        let flags = simple_spec().check_conformance("abcdE!12");
        assert!(flags.contains(ConformanceFlags::DISALLOWED_CHARACTER));
    }

    #[test]
    fn test_missing_required_character_flagged() {
        // Long enough, all allowed, but no digits and no uppercase.
        let flags = simple_spec().check_conformance("abcdefgh");
        assert!(flags.contains(ConformanceFlags::REQUIRED_CHARACTER_MISSING));
        assert!(!flags.contains(ConformanceFlags::LENGTH_MISMATCH));
        assert!(!flags.contains(ConformanceFlags::DISALLOWED_CHARACTER));
    }

    #[test]
    fn test_flags_are_independent_and_combine() {
        // Too short, contains a disallowed character, misses digits.
        let flags = simple_spec().check_conformance("aB!");
        assert!(flags.contains(ConformanceFlags::LENGTH_MISMATCH));
        assert!(flags.contains(ConformanceFlags::DISALLOWED_CHARACTER));
        assert!(flags.contains(ConformanceFlags::REQUIRED_CHARACTER_MISSING));
    }

    #[test]
    fn test_conforming_candidate() {
        let flags = simple_spec().check_conformance("abcDef12");
        assert!(flags.conforms());
        assert_eq!(flags.bits(), 0);
    }

    #[test]
    fn test_generated_passwords_always_conform() {
        let shapes = vec![
            simple_spec(),
            PasswordSpecification::default_specification().clone(),
            PasswordSpecification::builder()
                .allow(charsets::NUMERALS)
                .length_range(4, 4)
                .build()
                .unwrap(),
        ];
        for spec in &shapes {
            for _ in 0..10_000 {
                let password = spec.generate();
                assert!(
                    spec.check_conformance(&password).conforms(),
                    "generated password {:?} does not conform",
                    password
                );
            }
        }
    }

    #[test]
    fn test_generated_length_within_range() {
        let spec = simple_spec();
        for _ in 0..200 {
            let len = spec.generate().len();
            assert!((8..=12).contains(&len));
        }
    }

    #[test]
    fn test_all_required_slots_spec_still_generates() {
        // Required counts exactly fill the maximum length.
        let spec = PasswordSpecification::builder()
            .require(charsets::NUMERALS, 2)
            .require(charsets::LOWER_ALPHA, 2)
            .length_range(4, 4)
            .build()
            .unwrap();
        for _ in 0..100 {
            assert!(spec.check_conformance(&spec.generate()).conforms());
        }
    }

    #[test]
    fn test_wire_round_trip() {
        let spec = simple_spec();
        let decoded = PasswordSpecification::from_bytes(&spec.to_bytes().unwrap()).unwrap();
        assert_eq!(spec, decoded);
    }

    #[test]
    fn test_tampered_wire_form_fails_revalidation() {
        // Force overlapping required sets into the wire form.
        let mut wire = simple_spec().to_wire();
        wire.required.push(RequiredSetWire {
            chars: "0a".into(),
            count: 1,
        });
        let bytes = crate::protocol::wire::encode(&wire).unwrap();
        assert!(matches!(
            PasswordSpecification::from_bytes(&bytes).unwrap_err(),
            ProtocolError::MalformedData(_)
        ));
    }

    #[test]
    fn test_default_specification_shape() {
        let spec = PasswordSpecification::default_specification();
        assert_eq!(spec.length_range(), (12, 16));
        assert!(spec.check_conformance("abcXYZ234-_.x").conforms());
    }
}
