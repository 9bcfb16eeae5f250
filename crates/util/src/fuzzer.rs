use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Characters drawn by [`Fuzzer::random_text`]. Mixes ASCII, newlines and
/// astral-plane symbols so generated text exercises surrogate pairs.
pub const TEXT_ALPHABET: &str = "abcdxy \né中😀👍🏽";

const ATTRIBUTE_KEYS: &[&str] = &["bold", "italic", "color", "link"];

/// A fuzzer for generating random test data.
///
/// Uses the xoshiro256** PRNG for reproducible random sequences when seeded.
///
/// # Examples
///
/// ```
/// use rich_delta_util::fuzzer::Fuzzer;
///
/// // Create a fuzzer with a random seed
/// let fuzzer = Fuzzer::new(None);
///
/// // Generate random integers
/// let n = fuzzer.random_int(1, 10);
/// assert!(n >= 1 && n <= 10);
///
/// // Pick a random element from a slice
/// let choices = vec!["a", "b", "c"];
/// let picked = fuzzer.pick(&choices);
/// assert!(choices.contains(&picked));
/// ```
#[derive(Clone)]
pub struct Fuzzer {
    /// The seed used to initialize the PRNG.
    pub seed: [u8; 32],
    rng: Arc<Mutex<Xoshiro256StarStar>>,
}

impl Fuzzer {
    /// Create a new fuzzer with an optional seed.
    ///
    /// If no seed is provided, a random seed will be generated using `OsRng`.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });

        let rng = Xoshiro256StarStar::from_seed(seed);

        Self {
            seed,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Convenience constructor spreading a `u64` over the 32-byte seed.
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        for chunk in bytes.chunks_mut(8) {
            chunk.copy_from_slice(&seed.to_le_bytes());
        }
        Self::new(Some(bytes))
    }

    fn rng(&self) -> MutexGuard<'_, Xoshiro256StarStar> {
        // The generator holds no invariant a panicking holder could break.
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate a random integer in the range [min, max] (inclusive).
    pub fn random_int(&self, min: i64, max: i64) -> i64 {
        self.rng().gen_range(min..=max)
    }

    /// Generate a random length in the range [min, max] (inclusive).
    pub fn random_len(&self, min: usize, max: usize) -> usize {
        self.rng().gen_range(min..=max)
    }

    /// Pick a random element from a non-empty slice.
    pub fn pick<'a, T>(&self, elements: &'a [T]) -> &'a T {
        let idx = self.rng().gen_range(0..elements.len());
        &elements[idx]
    }

    /// Generate a random boolean with the given probability of being true.
    pub fn random_bool(&self, probability: f64) -> bool {
        self.rng().gen_bool(probability)
    }

    /// Generate a random string of `len` characters from the given characters.
    pub fn random_string(&self, len: usize, chars: &str) -> String {
        let chars: Vec<char> = chars.chars().collect();
        let mut rng = self.rng();
        (0..len)
            .map(|_| chars[rng.gen_range(0..chars.len())])
            .collect()
    }

    /// Generate `len` characters of document-like text from [`TEXT_ALPHABET`].
    pub fn random_text(&self, len: usize) -> String {
        self.random_string(len, TEXT_ALPHABET)
    }

    /// Generate a small formatting attribute map, possibly empty.
    ///
    /// When `allow_null` is set some keys map to `null`, the removal marker
    /// used by retain operations.
    pub fn random_attributes(&self, allow_null: bool) -> Map<String, Value> {
        let mut map = Map::new();
        let count = self.random_len(0, 2);
        for _ in 0..count {
            let key = *self.pick(ATTRIBUTE_KEYS);
            let value = if allow_null && self.random_bool(0.25) {
                Value::Null
            } else {
                match key {
                    "bold" | "italic" => Value::Bool(true),
                    "color" => Value::from(*self.pick(&["red", "blue", "#fff"])),
                    _ => Value::from(*self.pick(&["https://a.test", "https://b.test"])),
                }
            };
            map.insert(key.to_string(), value);
        }
        map
    }
}
