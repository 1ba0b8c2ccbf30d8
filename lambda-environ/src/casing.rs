use std::iter::FusedIterator;

/// Enumerate every upper/lower-case spelling of `input`.
///
/// Characters without distinct upper- and lower-case forms (digits, punctuation, etc.) are held
/// fixed, so an input with `c` case-sensitive characters yields exactly `2^c` spellings. The order
/// is deterministic: the first case-sensitive character varies fastest, and lower case precedes
/// upper case at each position. For `"AB"`, the spellings are `ab`, `Ab`, `aB`, `AB`. An empty
/// input yields a single empty string.
///
/// The returned iterator is lazy. Clone it (or call this function again) to restart the sequence.
pub fn all_casings(input: &str) -> Casings {
  let slots = input
    .chars()
    .map(|c| {
      if c.to_lowercase().eq(c.to_uppercase()) {
        Slot::Fixed(c)
      } else {
        Slot::Cased {
          lower: c.to_lowercase().collect(),
          upper: c.to_uppercase().collect(),
        }
      }
    })
    .collect::<Vec<_>>();
  let cased_count = slots
    .iter()
    .filter(|slot| matches!(slot, Slot::Cased { .. }))
    .count();

  Casings {
    slots,
    upper: vec![false; cased_count],
    done: false,
  }
}

/// Iterator returned by [`all_casings`].
#[derive(Clone, Debug)]
pub struct Casings {
  slots: Vec<Slot>,
  /// Current case choice for each case-sensitive slot, in input order.
  upper: Vec<bool>,
  done: bool,
}

#[derive(Clone, Debug)]
enum Slot {
  Fixed(char),
  Cased { lower: String, upper: String },
}

impl Casings {
  /// Total number of spellings in the full sequence, or `None` if it doesn't fit in a `usize`.
  pub fn variant_count(&self) -> Option<usize> {
    u32::try_from(self.upper.len())
      .ok()
      .and_then(|bits| 1usize.checked_shl(bits))
  }

  fn render(&self) -> String {
    let mut choices = self.upper.iter().copied();
    self
      .slots
      .iter()
      .fold(String::new(), |mut spelling, slot| {
        match slot {
          Slot::Fixed(c) => spelling.push(*c),
          Slot::Cased { lower, upper } => {
            spelling.push_str(if choices.next() == Some(true) {
              upper
            } else {
              lower
            })
          }
        }
        spelling
      })
  }

  // Binary increment with the first slot as the least significant bit. This reproduces the order
  // of peeling off the first character and prefixing its lower/upper forms to each suffix casing.
  fn advance(&mut self) {
    for choice in self.upper.iter_mut() {
      if *choice {
        *choice = false;
      } else {
        *choice = true;
        return;
      }
    }
    self.done = true;
  }
}

impl Iterator for Casings {
  type Item = String;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    let spelling = self.render();
    self.advance();
    Some(spelling)
  }
}

impl FusedIterator for Casings {}

#[cfg(test)]
mod tests {
  use super::all_casings;

  use pretty_assertions::assert_eq;

  use std::collections::HashSet;

  #[test]
  fn test_two_letters() {
    assert_eq!(
      all_casings("AB").collect::<Vec<_>>(),
      vec!["ab", "Ab", "aB", "AB"]
    );
  }

  #[test]
  fn test_empty() {
    assert_eq!(all_casings("").collect::<Vec<_>>(), vec![""]);
  }

  #[test]
  fn test_fixed_characters() {
    assert_eq!(all_casings("-1").collect::<Vec<_>>(), vec!["-1"]);
    assert_eq!(
      all_casings("a-1").collect::<Vec<_>>(),
      vec!["a-1", "A-1"]
    );
  }

  #[test]
  fn test_set_cookie() {
    let casings = all_casings("Set-Cookie");
    assert_eq!(casings.variant_count(), Some(512));

    let spellings = casings.clone().collect::<Vec<_>>();
    assert_eq!(spellings.len(), 512);
    assert_eq!(spellings[0], "set-cookie");
    assert_eq!(spellings[1], "Set-cookie");
    assert_eq!(spellings[511], "SET-COOKIE");
    assert_eq!(spellings.iter().collect::<HashSet<_>>().len(), 512);
    assert!(spellings
      .iter()
      .all(|spelling| spelling.eq_ignore_ascii_case("Set-Cookie")));
  }

  #[test]
  fn test_restartable() {
    let casings = all_casings("Xy");
    assert_eq!(
      casings.clone().collect::<Vec<_>>(),
      casings.collect::<Vec<_>>()
    );
    assert_eq!(
      all_casings("Xy").collect::<Vec<_>>(),
      all_casings("Xy").collect::<Vec<_>>()
    );
  }

  #[test]
  fn test_fused() {
    let mut casings = all_casings("a");
    assert_eq!(casings.next().as_deref(), Some("a"));
    assert_eq!(casings.next().as_deref(), Some("A"));
    assert_eq!(casings.next(), None);
    assert_eq!(casings.next(), None);
  }
}
