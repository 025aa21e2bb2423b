// core/src/models/tag.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub tag_type: Option<String>,
}

impl Tag {
  /// Lowercase, alphanumeric runs joined by single dashes.
  pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
      if ch.is_alphanumeric() {
        slug.extend(ch.to_lowercase());
      } else if !slug.is_empty() && !slug.ends_with('-') {
        slug.push('-');
      }
    }
    while slug.ends_with('-') {
      slug.pop();
    }
    slug
  }
}

#[cfg(test)]
mod tests {
  use super::Tag;

  #[test]
  fn slugify_collapses_separators() {
    assert_eq!(Tag::slugify("Telescope"), "telescope");
    assert_eq!(Tag::slugify("  Space & Astronomy!! "), "space-astronomy");
    assert_eq!(Tag::slugify("Intro to C++ 101"), "intro-to-c-101");
  }
}
