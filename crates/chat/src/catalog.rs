use rand::Rng;
use rand::seq::SliceRandom;

const RESPONSES: &[&str] = &[
    "According to Section 107 of the Copyright Act, fair use is determined by four factors: purpose of use, nature of the copyrighted work, amount used, and effect on the market.",
    "The statute of limitations for personal injury claims in most states is typically between 1-3 years, but it's important to check your specific jurisdiction.",
    "In contract law, the doctrine of promissory estoppel can be invoked when there's a clear and definite promise, reasonable reliance on that promise, and injustice can only be avoided by enforcing the promise.",
    "The Fourth Amendment protects against unreasonable searches and seizures. Generally, law enforcement needs a warrant to search private property, with some exceptions like exigent circumstances.",
    "Under the at-will employment doctrine, an employer can terminate an employee for any reason or no reason, as long as it's not for an illegal reason such as discrimination.",
    "In intellectual property law, trade secrets are protected as long as they remain secret. Unlike patents, there's no time limit on trade secret protection.",
];

const _: () = assert!(!RESPONSES.is_empty());

/// Canned legal-topic replies served by the simulator.
pub static RESPONSE_CATALOG: ResponseCatalog = ResponseCatalog::new(RESPONSES);

/// Read-only list of reply strings.
#[derive(Debug)]
pub struct ResponseCatalog {
    entries: &'static [&'static str],
}

impl ResponseCatalog {
    const fn new(entries: &'static [&'static str]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [&'static str] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, content: &str) -> bool {
        self.entries.contains(&content)
    }

    /// Uniform pick; the catalog is never empty.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.entries.choose(rng).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn picks_are_catalog_members() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let picked = RESPONSE_CATALOG.pick(&mut rng);
            assert!(RESPONSE_CATALOG.contains(picked));
        }
    }

    #[test]
    fn selection_eventually_covers_every_entry() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen = (0..2_000)
            .map(|_| RESPONSE_CATALOG.pick(&mut rng))
            .collect::<HashSet<_>>();

        assert_eq!(seen.len(), RESPONSE_CATALOG.len());
    }

    #[test]
    fn unknown_text_is_not_a_member() {
        assert!(!RESPONSE_CATALOG.contains("What is fair use?"));
        assert_eq!(RESPONSE_CATALOG.len(), 6);
    }
}
