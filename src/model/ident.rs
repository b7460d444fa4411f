//! Ident generation: three dictionary-style tokens joined by a single
//! delimiter, chosen to read well in logs and resist naive tokenizer
//! splitting (unlike a UUID or a bare counter).

use rand::seq::SliceRandom;

const DELIMITER: char = '_';

const SIZES: &[&str] = &[
    "tiny", "small", "medium", "large", "huge", "gigantic", "petite", "enormous",
];
const COLORS: &[&str] = &[
    "red", "green", "blue", "yellow", "black", "white", "purple", "orange", "pink", "gray",
];
const NOUNS: &[&str] = &[
    "fox", "owl", "wolf", "bear", "hawk", "otter", "heron", "lynx", "raven", "stag", "harbor",
    "ridge", "meadow", "summit", "delta", "canyon",
];

/// Generate a new ident: three tokens separated by [`DELIMITER`], e.g.
/// `quiet_amber_harbor`. The exact word lists are an implementation
/// detail; any generator producing three tokens plus a delimiter
/// satisfies the identity requirements placed on idents elsewhere in
/// this crate (non-empty, stable, human-distinguishable).
pub fn generate_ident() -> String {
    let mut rng = rand::thread_rng();
    let size = SIZES.choose(&mut rng).expect("SIZES is non-empty");
    let color = COLORS.choose(&mut rng).expect("COLORS is non-empty");
    let noun = NOUNS.choose(&mut rng).expect("NOUNS is non-empty");
    format!("{size}{DELIMITER}{color}{DELIMITER}{noun}")
}
