//! Address text normalization.
//!
//! Free text typed by a user and street names stored in the address index are
//! both reduced to the same canonical form before matching, so that case,
//! accents and punctuation never decide whether an address is found.
//!
//! ## What we do
//!
//! - Unicode lowercasing
//! - Canonical decomposition (NFD) followed by removal of combining marks
//! - Anything that is not an ASCII word character (`[a-z0-9_]`) becomes a
//!   separator
//! - Separator runs collapse to a single space, edges are trimmed
//!
//! ## Pure function guarantee
//!
//! No I/O, no locale, no configuration. [`normalize`] is total and
//! idempotent: `normalize(&normalize(x)) == normalize(x)` for every input.
//!
//! ```rust
//! use canonical::normalize;
//!
//! assert_eq!(normalize("Rua das Flores, 123"), "rua das flores 123");
//! assert_eq!(normalize("  Avenida São João  "), "avenida sao joao");
//! ```

mod normalize;
mod token;

pub use crate::normalize::{is_word_char, normalize};
pub use crate::token::{query_tokens, tokens};
