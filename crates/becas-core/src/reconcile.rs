//! The insert / update / no-op decision.

use serde::Serialize;

use crate::entity::{Entity, NaturalKey};

/// What reconciliation did (or will do) with an incoming entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
  /// No row with the natural key exists.
  Insert,
  /// A row exists and at least one column differs.
  Update,
  /// A row exists and every column matches.
  Unchanged,
}

/// Compare `incoming` against the row currently stored under its key.
pub fn decide<E: Entity>(existing: Option<&E>, incoming: &E) -> Decision {
  match existing {
    None => Decision::Insert,
    Some(current) if current.matches(incoming) => Decision::Unchanged,
    Some(_) => Decision::Update,
  }
}

/// A reconciled entity, as reported by [`crate::store::RecordStore::upsert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
  pub kind:     &'static str,
  pub key:      NaturalKey,
  pub decision: Decision,
}

impl Outcome {
  pub fn of<E: Entity>(entity: &E, decision: Decision) -> Self {
    Self { kind: E::KIND, key: entity.key(), decision }
  }
}

/// Per-table counters of reconciliation decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
  pub inserted:  usize,
  pub updated:   usize,
  pub unchanged: usize,
}

impl Tally {
  pub fn record(&mut self, decision: Decision) {
    match decision {
      Decision::Insert => self.inserted += 1,
      Decision::Update => self.updated += 1,
      Decision::Unchanged => self.unchanged += 1,
    }
  }

  /// Number of rows written.
  pub fn written(&self) -> usize { self.inserted + self.updated }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Recipient;

  fn recipient() -> Recipient {
    Recipient {
      worker_curp:   "AAAA010101HDFXXX01".into(),
      paternal_name: "Pérez".into(),
      maternal_name: "".into(),
      given_names:   "Luis".into(),
      curp:          "BBBB020202MDFXXX02".into(),
      birth_date:    "2002-02-02".into(),
      sex:           "H".into(),
    }
  }

  #[test]
  fn absent_row_is_inserted() {
    assert_eq!(decide(None, &recipient()), Decision::Insert);
  }

  #[test]
  fn equal_row_is_unchanged() {
    let stored = recipient();
    let mut incoming = recipient();
    incoming.paternal_name = "PÉREZ ".into();
    assert_eq!(decide(Some(&stored), &incoming), Decision::Unchanged);
  }

  #[test]
  fn differing_row_is_updated() {
    let stored = recipient();
    let mut incoming = recipient();
    incoming.birth_date = "2002-02-03".into();
    assert_eq!(decide(Some(&stored), &incoming), Decision::Update);
  }

  #[test]
  fn tally_counts_decisions() {
    let mut t = Tally::default();
    t.record(Decision::Insert);
    t.record(Decision::Unchanged);
    t.record(Decision::Update);
    t.record(Decision::Insert);
    assert_eq!(t, Tally { inserted: 2, updated: 1, unchanged: 1 });
    assert_eq!(t.written(), 3);
  }
}
