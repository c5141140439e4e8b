use rand::seq::IndexedRandom;
use rand::Rng;

const FIRST_NAMES: [&str; 12] = [
    "ana", "luis", "maria", "jorge", "sofia", "diego", "lucia", "carlos", "elena", "pablo",
    "valeria", "miguel",
];

const LAST_NAMES: [&str; 10] = [
    "garcia", "lopez", "martinez", "hernandez", "gonzalez", "perez", "sanchez", "ramirez",
    "torres", "flores",
];

const DOMAINS: [&str; 3] = ["example.com", "example.org", "example.net"];

/// A random, plausible-looking address on a reserved example domain.
pub fn random_email() -> String {
    let mut rng = rand::rng();
    let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("user");
    let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("load");
    let domain = DOMAINS.choose(&mut rng).copied().unwrap_or("example.com");
    let suffix: u16 = rng.random_range(0..10_000);

    format!("{}.{}{}@{}", first, last, suffix, domain)
}
