use chrono::{DateTime, Utc};

use crate::errors::{LedgerError, Result};

use super::item::{ItemDraft, LineItem};
use super::record::ItemRecord;

/// Result of an [`Ledger::add`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The entry was appended and a history snapshot recorded.
    Added,
    /// The draft carries no subcategory and the one-shot acknowledgment has
    /// not been given yet; nothing was appended and no error was raised.
    Deferred,
}

/// Deep copy of the ledger contents, taken after every successful append.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub taken_at: DateTime<Utc>,
    pub entries: Vec<LineItem>,
}

/// Ordered collection of budget line items plus its append-only audit
/// trail.
///
/// Entries mutate only by append, positional removal, clear, or bulk load;
/// there is no in-place edit. The history records one snapshot per append
/// and nothing else: removals, clears, and loads deliberately leave it
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LineItem>,
    history: Vec<HistorySnapshot>,
    allow_missing_subcategory: bool,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LineItem] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn history(&self) -> &[HistorySnapshot] {
        &self.history
    }

    /// Whether adds without a subcategory have been acknowledged.
    pub fn subcategory_acknowledged(&self) -> bool {
        self.allow_missing_subcategory
    }

    /// Acknowledges entry creation without a subcategory for the rest of
    /// this ledger's lifetime.
    ///
    /// The latch never resets, not even on [`clear`](Self::clear) or load:
    /// once the user has confirmed they are fine with placeholder
    /// subcategories, they are not asked again.
    pub fn allow_missing_subcategory(&mut self) {
        self.allow_missing_subcategory = true;
    }

    /// Validates the draft and appends the entry.
    ///
    /// A draft without a subcategory is deferred (`AddOutcome::Deferred`)
    /// until [`allow_missing_subcategory`](Self::allow_missing_subcategory)
    /// has been called; a deferred add mutates nothing. Successful appends
    /// push a deep-copy snapshot onto the history.
    pub fn add(&mut self, draft: ItemDraft) -> Result<AddOutcome> {
        draft.validate()?;
        if !draft.has_subcategory() && !self.allow_missing_subcategory {
            return Ok(AddOutcome::Deferred);
        }

        self.entries.push(LineItem::from_draft(draft));
        self.history.push(HistorySnapshot {
            taken_at: Utc::now(),
            entries: self.entries.clone(),
        });
        Ok(AddOutcome::Added)
    }

    /// Removes and returns the entry at `index`. Out-of-range indices fail
    /// with `IndexOutOfRange` and leave the ledger unchanged. History is
    /// not touched.
    pub fn remove(&mut self, index: usize) -> Result<LineItem> {
        if index >= self.entries.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Empties the ledger. History and the subcategory acknowledgment stay
    /// as they were.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the ledger contents with the given records.
    ///
    /// Every record is converted (validated, backfilled) before anything
    /// is replaced, so a malformed record leaves the current contents
    /// intact. A bulk replace is not an append: history is untouched.
    pub fn load_records(&mut self, records: Vec<ItemRecord>) -> Result<usize> {
        let mut items = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let item = record.into_item().map_err(|err| match err {
                LedgerError::MalformedInput(message) => {
                    LedgerError::MalformedInput(format!("record {index}: {message}"))
                }
                other => other,
            })?;
            items.push(item);
        }
        let count = items.len();
        self.entries = items;
        Ok(count)
    }

    /// Parses the persisted JSON array format and replaces the ledger
    /// contents. See [`load_records`](Self::load_records).
    pub fn load_json(&mut self, data: &str) -> Result<usize> {
        let records: Vec<ItemRecord> = serde_json::from_str(data)?;
        self.load_records(records)
    }

    /// Serializes the entries to the persisted format: a pretty-printed
    /// JSON array in insertion order, `total_cost` always present.
    /// Round-trips through [`load_json`](Self::load_json).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.entries)
            .map_err(|err| LedgerError::Storage(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::item::{UnitKind, NO_SUBCATEGORY};

    fn tile_draft() -> ItemDraft {
        ItemDraft::new("Kitchen", "Floors", "Tile", UnitKind::Length, 25.0)
            .with_subcategory("Parquet")
            .with_quantity(10.0)
    }

    #[test]
    fn add_computes_total_and_snapshots() {
        let mut ledger = Ledger::new();
        let outcome = ledger.add(tile_draft()).unwrap();
        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].total_cost, 250.0);
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.history()[0].entries, ledger.entries());
    }

    #[test]
    fn each_append_records_one_snapshot() {
        let mut ledger = Ledger::new();
        ledger.add(tile_draft()).unwrap();
        ledger.add(tile_draft()).unwrap();
        ledger.add(tile_draft()).unwrap();
        assert_eq!(ledger.history().len(), 3);
        assert_eq!(ledger.history()[1].entries.len(), 2);
    }

    #[test]
    fn add_without_subcategory_defers_until_acknowledged() {
        let mut ledger = Ledger::new();
        let draft = ItemDraft::new("Kitchen", "Floors", "Tile", UnitKind::Length, 25.0);

        let outcome = ledger.add(draft.clone()).unwrap();
        assert_eq!(outcome, AddOutcome::Deferred);
        assert!(ledger.is_empty());
        assert!(ledger.history().is_empty());

        ledger.allow_missing_subcategory();
        let outcome = ledger.add(draft.clone()).unwrap();
        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(ledger.entries()[0].subcategory, NO_SUBCATEGORY);

        // The acknowledgment is sticky: no further deferrals.
        let outcome = ledger.add(draft).unwrap();
        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn acknowledgment_survives_clear_and_load() {
        let mut ledger = Ledger::new();
        ledger.allow_missing_subcategory();
        ledger.add(tile_draft()).unwrap();

        ledger.clear();
        assert!(ledger.subcategory_acknowledged());

        ledger.load_records(Vec::new()).unwrap();
        assert!(ledger.subcategory_acknowledged());
    }

    #[test]
    fn invalid_draft_is_rejected_without_mutation() {
        let mut ledger = Ledger::new();
        let draft = ItemDraft::new("", "Floors", "Tile", UnitKind::Length, 25.0);
        assert!(matches!(ledger.add(draft), Err(LedgerError::Validation(_))));
        assert!(ledger.is_empty());
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn remove_takes_out_exactly_one_entry() {
        let mut ledger = Ledger::new();
        ledger.add(tile_draft()).unwrap();
        ledger
            .add(
                ItemDraft::new("Bathroom", "Walls", "Paint", UnitKind::Count, 12.0)
                    .with_subcategory("Ceramic"),
            )
            .unwrap();

        let removed = ledger.remove(0).unwrap();
        assert_eq!(removed.room, "Kitchen");
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].room, "Bathroom");
        // Removal is not an append; no new snapshot.
        assert_eq!(ledger.history().len(), 2);
    }

    #[test]
    fn remove_out_of_range_leaves_ledger_unchanged() {
        let mut ledger = Ledger::new();
        ledger.add(tile_draft()).unwrap();
        let err = ledger.remove(5).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::IndexOutOfRange { index: 5, len: 1 }
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn clear_empties_entries_but_not_history() {
        let mut ledger = Ledger::new();
        for _ in 0..5 {
            ledger.add(tile_draft()).unwrap();
        }
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.history().len(), 5);
    }

    #[test]
    fn serialize_then_load_reproduces_entries() {
        let mut ledger = Ledger::new();
        ledger.add(tile_draft()).unwrap();
        ledger
            .add(
                ItemDraft::new("Bathroom", "Walls", "Paint", UnitKind::Weight, 9.5)
                    .with_subcategory("Ceramic")
                    .with_quantity(2.5),
            )
            .unwrap();

        let json = ledger.to_json().unwrap();
        let mut reloaded = Ledger::new();
        reloaded.load_json(&json).unwrap();
        assert_eq!(reloaded.entries(), ledger.entries());
    }

    #[test]
    fn load_replaces_previous_contents() {
        let mut ledger = Ledger::new();
        ledger.add(tile_draft()).unwrap();
        let json = ledger.to_json().unwrap();

        let mut other = Ledger::new();
        other.allow_missing_subcategory();
        other
            .add(ItemDraft::new(
                "Garage",
                "Doors",
                "Hinge",
                UnitKind::Piece,
                3.0,
            ))
            .unwrap();
        let loaded = other.load_json(&json).unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(other.len(), 1);
        assert_eq!(other.entries()[0].room, "Kitchen");
        // Bulk replace does not append to history.
        assert_eq!(other.history().len(), 1);
    }

    #[test]
    fn malformed_record_fails_load_without_mutation() {
        let mut ledger = Ledger::new();
        ledger.add(tile_draft()).unwrap();

        let bad = r#"[{"room":"","category":"Floors","product":"Tile","unit_type":"length","quantity":1,"unit_price":5}]"#;
        let err = ledger.load_json(bad).unwrap_err();
        assert!(
            matches!(err, LedgerError::MalformedInput(message) if message.contains("record 0"))
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].room, "Kitchen");
    }

    #[test]
    fn unparseable_input_is_malformed() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.load_json("not json"),
            Err(LedgerError::MalformedInput(_))
        ));
    }

    #[test]
    fn serialized_records_carry_exactly_the_persisted_keys() {
        let mut ledger = Ledger::new();
        ledger.add(tile_draft()).unwrap();
        let json = ledger.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value[0].as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "category",
                "product",
                "quantity",
                "room",
                "subcategory",
                "total_cost",
                "unit_price",
                "unit_type"
            ]
        );
    }
}
