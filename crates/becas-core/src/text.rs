//! Text normalisation used when comparing stored and incoming values.

/// Lowercase `text` and strip surrounding whitespace.
pub fn normalize(text: &str) -> String { text.trim().to_lowercase() }

/// `true` if both strings are equal once normalised.
pub fn same_text(a: &str, b: &str) -> bool {
  a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_folds_case_and_trims() {
    assert_eq!(normalize("  García López \t"), "garcía lópez");
    assert_eq!(normalize("ABC"), "abc");
    assert_eq!(normalize(""), "");
  }

  #[test]
  fn same_text_ignores_case_and_padding() {
    assert!(same_text("Oaxaca", " oaxaca "));
    assert!(same_text("ÑANDÚ", "ñandú"));
    assert!(!same_text("Oaxaca", "Oaxaca de Juárez"));
    // Inner whitespace is significant.
    assert!(!same_text("Juan  Carlos", "Juan Carlos"));
  }
}
