//! Title → URL-fragment transform.

/// Separator inserted in place of each run of non-alphanumeric characters.
pub const SEPARATOR: char = '-';

/// Turn a title into a lowercase, hyphen-separated URL fragment.
///
/// Runs of characters that are not lowercase alphanumerics collapse into a
/// single [`SEPARATOR`]; separators never lead or trail. A title with no
/// alphanumerics yields an empty string, which callers treat as "no
/// canonical slug".
///
/// ```
/// assert_eq!(blogr_core::slug::slugify("Hello, World!"), "hello-world");
/// ```
pub fn slugify(title: &str) -> String {
  let mut slug = String::with_capacity(title.len());
  let mut pending_separator = false;

  for c in title.chars().flat_map(char::to_lowercase) {
    // Some uppercase letters have no lowercase mapping; drop them with the
    // punctuation so the output never carries uppercase.
    if c.is_alphanumeric() && !c.is_uppercase() {
      if pending_separator && !slug.is_empty() {
        slug.push(SEPARATOR);
      }
      pending_separator = false;
      slug.push(c);
    } else {
      pending_separator = true;
    }
  }

  slug
}

#[cfg(test)]
mod tests {
  use super::*;

  const TITLES: &[&str] = &[
    "Hello World",
    "  Leading and trailing  ",
    "Rust 2024: what's new?",
    "---already-slugged---",
    "Ünïcödé Títle",
    "ΣΊΣΥΦΟΣ",
    "tabs\tand\nnewlines",
    "Straße",
    "日本語 タイトル",
    "a",
    "",
  ];

  #[test]
  fn basic_title() {
    assert_eq!(slugify("Hello World"), "hello-world");
  }

  #[test]
  fn collapses_runs_and_trims() {
    assert_eq!(slugify("  Rust --  is   fun!!! "), "rust-is-fun");
  }

  #[test]
  fn keeps_digits() {
    assert_eq!(slugify("Top 10 crates of 2024"), "top-10-crates-of-2024");
  }

  #[test]
  fn keeps_unicode_letters() {
    assert_eq!(slugify("Crème Brûlée"), "crème-brûlée");
  }

  #[test]
  fn punctuation_only_is_empty() {
    assert_eq!(slugify("!!! ??? ..."), "");
    assert_eq!(slugify(""), "");
    assert_eq!(slugify("   "), "");
  }

  #[test]
  fn no_uppercase_or_whitespace() {
    for title in TITLES {
      let slug = slugify(title);
      assert!(!slug.chars().any(char::is_uppercase), "{title:?} -> {slug:?}");
      assert!(!slug.chars().any(char::is_whitespace), "{title:?} -> {slug:?}");
    }
  }

  #[test]
  fn idempotent() {
    for title in TITLES {
      let once = slugify(title);
      assert_eq!(slugify(&once), once, "title {title:?}");
    }
  }

  #[test]
  fn never_leads_or_trails_with_separator() {
    for title in TITLES {
      let slug = slugify(title);
      assert!(!slug.starts_with(SEPARATOR), "{slug:?}");
      assert!(!slug.ends_with(SEPARATOR), "{slug:?}");
      assert!(!slug.contains("--"), "{slug:?}");
    }
  }
}
