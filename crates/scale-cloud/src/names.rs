//! Host name generation
//!
//! New hosts get short two-word slugs like `brave-otter`. Uniqueness against
//! the registry is checked by the caller ([`crate::Fleet::create`]); a
//! generator only needs to make collisions unlikely.

use rand::seq::SliceRandom;
use rand::Rng;

/// Source of candidate host names
pub trait NameGenerator {
    /// Produce the next candidate, or `None` if no name could be produced
    fn generate(&mut self) -> Option<String>;
}

impl<F> NameGenerator for F
where
    F: FnMut() -> Option<String>,
{
    fn generate(&mut self) -> Option<String> {
        self()
    }
}

const ADJECTIVES: &[&str] = &[
    "able", "amber", "ancient", "arctic", "azure", "bold", "brave", "bright", "brisk", "calm",
    "clever", "cosmic", "crimson", "curious", "daring", "dapper", "eager", "electric", "fancy",
    "fearless", "fierce", "gentle", "gifted", "golden", "grand", "happy", "hidden", "humble",
    "jolly", "keen", "kind", "lively", "lucky", "merry", "mighty", "misty", "modest", "nimble",
    "noble", "polite", "proud", "quick", "quiet", "rapid", "rustic", "scarlet", "shiny", "silent",
    "silver", "smart", "snowy", "solid", "spry", "stellar", "sturdy", "sunny", "swift", "tidy",
    "tranquil", "vivid", "wandering", "witty", "zealous", "zesty",
];

const NOUNS: &[&str] = &[
    "albatross", "badger", "beaver", "bison", "buffalo", "caribou", "cheetah", "condor",
    "coyote", "crane", "dingo", "dolphin", "eagle", "falcon", "ferret", "finch", "gazelle",
    "gecko", "gibbon", "heron", "hornet", "ibis", "jackal", "jaguar", "kestrel", "koala",
    "lemur", "leopard", "lynx", "magpie", "marmot", "meerkat", "mongoose", "moose", "narwhal",
    "ocelot", "octopus", "orca", "osprey", "otter", "owl", "panda", "panther", "pelican",
    "penguin", "puffin", "quail", "raccoon", "raven", "salmon", "seal", "sparrow", "squid",
    "stork", "swan", "tapir", "tiger", "toucan", "turtle", "viper", "walrus", "weasel", "wolf",
    "yak",
];

/// Random `adjective-noun` slugs
#[derive(Debug, Default)]
pub struct SlugGenerator {
    /// Append a two-digit suffix (`brave-otter-42`) to widen the name space
    numbered: bool,
}

impl SlugGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numbered() -> Self {
        Self { numbered: true }
    }
}

impl NameGenerator for SlugGenerator {
    fn generate(&mut self) -> Option<String> {
        let mut rng = rand::thread_rng();
        let adjective = ADJECTIVES.choose(&mut rng)?;
        let noun = NOUNS.choose(&mut rng)?;
        if self.numbered {
            Some(format!("{}-{}-{:02}", adjective, noun, rng.gen_range(0..100)))
        } else {
            Some(format!("{}-{}", adjective, noun))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_shape() {
        let mut names = SlugGenerator::new();
        for _ in 0..50 {
            let name = names.generate().unwrap();
            let parts: Vec<&str> = name.split('-').collect();
            assert_eq!(parts.len(), 2, "unexpected slug {}", name);
            assert!(ADJECTIVES.contains(&parts[0]));
            assert!(NOUNS.contains(&parts[1]));
        }
    }

    #[test]
    fn test_numbered_slug() {
        let name = SlugGenerator::numbered().generate().unwrap();
        let suffix = name.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 2);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_words_are_slug_safe() {
        for word in ADJECTIVES.iter().chain(NOUNS) {
            assert!(word.chars().all(|c| c.is_ascii_lowercase()), "{}", word);
        }
        assert_ne!(ADJECTIVES.len() * NOUNS.len(), 0);
    }

    #[test]
    fn test_closure_generator() {
        let mut n = 0;
        let mut names = || {
            n += 1;
            Some(format!("host-{}", n))
        };
        assert_eq!(names.generate().as_deref(), Some("host-1"));
        assert_eq!(names.generate().as_deref(), Some("host-2"));
    }
}
