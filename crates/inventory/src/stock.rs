use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockpile_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ItemName, Quantity};
use stockpile_events::Event;

/// Aggregate root: the whole inventory mapping (item name -> quantity).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inventory {
    stock: BTreeMap<ItemName, Quantity>,
    version: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an inventory from its persisted form.
    ///
    /// Keys are kept exactly as stored; an empty key or a repeated key is
    /// rejected. The result has version zero.
    pub fn from_snapshot<I, K>(entries: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut stock = BTreeMap::new();
        for (raw, units) in entries {
            let name = ItemName::verbatim(raw)?;
            if stock.insert(name.clone(), Quantity::new(units)).is_some() {
                return Err(DomainError::invalid_name(format!("duplicate item name: '{name}'")));
            }
        }
        Ok(Self { stock, version: 0 })
    }

    /// Persisted form: plain names to unit counts, sorted by name.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.stock
            .iter()
            .map(|(name, qty)| (name.to_string(), qty.get()))
            .collect()
    }

    pub fn quantity(&self, item: &ItemName) -> Option<u64> {
        self.stock.get(item).map(|q| q.get())
    }

    /// Items in name order.
    pub fn items(&self) -> impl Iterator<Item = (&ItemName, u64)> + '_ {
        self.stock.iter().map(|(name, qty)| (name, qty.get()))
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    /// Items whose quantity is strictly below `threshold`, in name order.
    pub fn low_stock(&self, threshold: u64) -> Vec<(ItemName, u64)> {
        self.stock
            .iter()
            .filter(|(_, qty)| qty.get() < threshold)
            .map(|(name, qty)| (name.clone(), qty.get()))
            .collect()
    }
}

impl AggregateRoot for Inventory {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem (create the item or add units to it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub item: ItemName,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustQuantity (signed change to an existing item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustQuantity {
    pub item: ItemName,
    pub delta: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem (drop the item from the mapping).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub item: ItemName,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddItem(AddItem),
    AdjustQuantity(AdjustQuantity),
    RemoveItem(RemoveItem),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: ItemName,
    pub quantity: u64,
    pub previous: u64,
    pub current: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityAdjusted {
    pub item: ItemName,
    pub delta: i64,
    pub previous: u64,
    pub current: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub item: ItemName,
    pub previous: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemAdded(ItemAdded),
    QuantityAdjusted(QuantityAdjusted),
    ItemRemoved(ItemRemoved),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded(_) => "inventory.item.added",
            InventoryEvent::QuantityAdjusted(_) => "inventory.item.quantity_adjusted",
            InventoryEvent::ItemRemoved(_) => "inventory.item.removed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemAdded(e) => e.occurred_at,
            InventoryEvent::QuantityAdjusted(e) => e.occurred_at,
            InventoryEvent::ItemRemoved(e) => e.occurred_at,
        }
    }

    fn describe(&self) -> String {
        match self {
            InventoryEvent::ItemAdded(e) => format!(
                "Added {} of {} ({} -> {})",
                e.quantity, e.item, e.previous, e.current
            ),
            InventoryEvent::QuantityAdjusted(e) => format!(
                "Adjusted {} by {:+} ({} -> {})",
                e.item, e.delta, e.previous, e.current
            ),
            InventoryEvent::ItemRemoved(e) => {
                format!("Removed {} (had {})", e.item, e.previous)
            }
        }
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemAdded(e) => {
                self.stock.insert(e.item.clone(), Quantity::new(e.current));
            }
            InventoryEvent::QuantityAdjusted(e) => {
                self.stock.insert(e.item.clone(), Quantity::new(e.current));
            }
            InventoryEvent::ItemRemoved(e) => {
                self.stock.remove(&e.item);
            }
        }

        // +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddItem(cmd) => self.handle_add(cmd),
            InventoryCommand::AdjustQuantity(cmd) => self.handle_adjust(cmd),
            InventoryCommand::RemoveItem(cmd) => self.handle_remove(cmd),
        }
    }
}

impl Inventory {
    fn existing(&self, item: &ItemName) -> DomainResult<Quantity> {
        self.stock
            .get(item)
            .copied()
            .ok_or_else(|| DomainError::not_found(item.as_str()))
    }

    fn handle_add(&self, cmd: &AddItem) -> DomainResult<Vec<InventoryEvent>> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation(format!(
                "quantity to add for '{}' must be greater than zero",
                cmd.item
            )));
        }

        let previous = self.stock.get(&cmd.item).copied().unwrap_or(Quantity::ZERO);
        let current = previous.get().checked_add(cmd.quantity).ok_or_else(|| {
            DomainError::validation(format!("quantity for '{}' is too large", cmd.item))
        })?;

        Ok(vec![InventoryEvent::ItemAdded(ItemAdded {
            item: cmd.item.clone(),
            quantity: cmd.quantity,
            previous: previous.get(),
            current,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustQuantity) -> DomainResult<Vec<InventoryEvent>> {
        let previous = self.existing(&cmd.item)?;

        if cmd.delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }

        let current = previous.adjusted(cmd.delta).map_err(|err| match err {
            DomainError::Validation(msg) => {
                DomainError::validation(format!("cannot adjust '{}' by {}: {msg}", cmd.item, cmd.delta))
            }
            other => other,
        })?;

        Ok(vec![InventoryEvent::QuantityAdjusted(QuantityAdjusted {
            item: cmd.item.clone(),
            delta: cmd.delta,
            previous: previous.get(),
            current: current.get(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> DomainResult<Vec<InventoryEvent>> {
        let previous = self.existing(&cmd.item)?;

        Ok(vec![InventoryEvent::ItemRemoved(ItemRemoved {
            item: cmd.item.clone(),
            previous: previous.get(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> ItemName {
        ItemName::parse(raw).unwrap()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn stocked(entries: &[(&str, u64)]) -> Inventory {
        Inventory::from_snapshot(entries.iter().map(|(k, v)| (*k, *v))).unwrap()
    }

    fn add(item: &str, quantity: u64) -> InventoryCommand {
        InventoryCommand::AddItem(AddItem {
            item: name(item),
            quantity,
            occurred_at: test_time(),
        })
    }

    fn adjust(item: &str, delta: i64) -> InventoryCommand {
        InventoryCommand::AdjustQuantity(AdjustQuantity {
            item: name(item),
            delta,
            occurred_at: test_time(),
        })
    }

    fn remove(item: &str) -> InventoryCommand {
        InventoryCommand::RemoveItem(RemoveItem {
            item: name(item),
            occurred_at: test_time(),
        })
    }

    #[test]
    fn from_snapshot_mirrors_the_mapping() {
        let inventory = stocked(&[("apple", 10), ("banana", 0)]);
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.quantity(&name("apple")), Some(10));
        assert_eq!(inventory.quantity(&name("banana")), Some(0));
        assert_eq!(inventory.version(), 0);

        let snapshot = inventory.snapshot();
        assert_eq!(snapshot.get("apple"), Some(&10));
        assert_eq!(snapshot.get("banana"), Some(&0));
    }

    #[test]
    fn from_snapshot_rejects_empty_names() {
        let err = Inventory::from_snapshot([("", 1u64)]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidName(_)));
    }

    #[test]
    fn from_snapshot_keeps_padded_names_distinct() {
        let inventory = stocked(&[("apple", 1), (" apple", 2), ("apple ", 3)]);
        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory.quantity(&name("apple")), Some(1));

        let snapshot = inventory.snapshot();
        assert_eq!(snapshot.get(" apple"), Some(&2));
        assert_eq!(snapshot.get("apple "), Some(&3));
    }

    #[test]
    fn from_snapshot_rejects_repeated_names() {
        let err = Inventory::from_snapshot([("apple", 1u64), ("apple", 2)]).unwrap_err();
        match err {
            DomainError::InvalidName(msg) => assert!(msg.contains("duplicate")),
            other => panic!("Expected InvalidName error, got {other:?}"),
        }
    }

    #[test]
    fn add_item_creates_a_new_item() {
        let mut inventory = Inventory::new();
        let events = inventory.execute(&add("apple", 10)).unwrap();

        assert_eq!(events.len(), 1);
        match &events[0] {
            InventoryEvent::ItemAdded(e) => {
                assert_eq!(e.item, name("apple"));
                assert_eq!(e.previous, 0);
                assert_eq!(e.current, 10);
            }
            _ => panic!("Expected ItemAdded event"),
        }
        assert_eq!(inventory.quantity(&name("apple")), Some(10));
        assert_eq!(inventory.version(), 1);
    }

    #[test]
    fn add_item_increases_an_existing_item() {
        let mut inventory = stocked(&[("apple", 10)]);
        inventory.execute(&add("apple", 5)).unwrap();
        assert_eq!(inventory.quantity(&name("apple")), Some(15));
    }

    #[test]
    fn add_item_rejects_zero_quantity() {
        let inventory = Inventory::new();
        let err = inventory.handle(&add("apple", 0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn add_item_rejects_overflow() {
        let mut inventory = stocked(&[("apple", u64::MAX)]);
        let err = inventory.execute(&add("apple", 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(inventory.quantity(&name("apple")), Some(u64::MAX));
    }

    #[test]
    fn adjust_applies_positive_and_negative_deltas() {
        let mut inventory = stocked(&[("apple", 10)]);
        inventory.execute(&adjust("apple", -3)).unwrap();
        assert_eq!(inventory.quantity(&name("apple")), Some(7));
        inventory.execute(&adjust("apple", 4)).unwrap();
        assert_eq!(inventory.quantity(&name("apple")), Some(11));
        assert_eq!(inventory.version(), 2);
    }

    #[test]
    fn adjust_to_zero_is_rejected_and_leaves_state_unchanged() {
        let mut inventory = stocked(&[("apple", 3)]);
        let before = inventory.clone();

        let err = inventory.execute(&adjust("apple", -3)).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("apple")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
        assert_eq!(inventory, before);
    }

    #[test]
    fn adjust_below_zero_is_rejected() {
        let mut inventory = stocked(&[("apple", 3)]);
        let err = inventory.execute(&adjust("apple", -10)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(inventory.quantity(&name("apple")), Some(3));
    }

    #[test]
    fn adjust_unknown_item_is_not_found() {
        let mut inventory = stocked(&[("apple", 3)]);
        let before = inventory.clone();

        let err = inventory.execute(&adjust("orange", 1)).unwrap_err();
        assert_eq!(err, DomainError::NotFound("orange".to_string()));
        assert_eq!(inventory, before);
    }

    #[test]
    fn adjust_rejects_zero_delta() {
        let inventory = stocked(&[("apple", 3)]);
        let err = inventory.handle(&adjust("apple", 0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn adjust_can_raise_an_item_loaded_at_zero() {
        let mut inventory = stocked(&[("banana", 0)]);
        inventory.execute(&adjust("banana", 2)).unwrap();
        assert_eq!(inventory.quantity(&name("banana")), Some(2));
    }

    #[test]
    fn remove_item_drops_the_entry() {
        let mut inventory = stocked(&[("apple", 3), ("pear", 1)]);
        let events = inventory.execute(&remove("apple")).unwrap();

        match &events[0] {
            InventoryEvent::ItemRemoved(e) => assert_eq!(e.previous, 3),
            _ => panic!("Expected ItemRemoved event"),
        }
        assert_eq!(inventory.quantity(&name("apple")), None);
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn remove_unknown_item_is_not_found() {
        let inventory = Inventory::new();
        let err = inventory.handle(&remove("apple")).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn low_stock_is_strictly_below_threshold_in_name_order() {
        let inventory = stocked(&[("pear", 4), ("apple", 5), ("banana", 2), ("kiwi", 0)]);
        let low = inventory.low_stock(5);
        assert_eq!(
            low,
            vec![(name("banana"), 2), (name("kiwi"), 0), (name("pear"), 4)]
        );
    }

    #[test]
    fn describe_renders_readable_messages() {
        let mut inventory = stocked(&[("apple", 10)]);
        let added = inventory.execute(&add("banana", 2)).unwrap();
        let adjusted = inventory.execute(&adjust("apple", -3)).unwrap();
        let removed = inventory.execute(&remove("banana")).unwrap();

        assert_eq!(added[0].describe(), "Added 2 of banana (0 -> 2)");
        assert_eq!(adjusted[0].describe(), "Adjusted apple by -3 (10 -> 7)");
        assert_eq!(removed[0].describe(), "Removed banana (had 2)");
        assert_eq!(adjusted[0].event_type(), "inventory.item.quantity_adjusted");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_inventory() -> impl Strategy<Value = Inventory> {
            proptest::collection::btree_map("[a-z]{1,8}", 0u64..1_000, 0..8)
                .prop_map(|map| Inventory::from_snapshot(map).unwrap())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: handle never mutates and is deterministic.
            #[test]
            fn handle_is_pure(inventory in arb_inventory(), item in "[a-z]{1,8}", delta in -2_000i64..2_000) {
                let before = inventory.clone();
                let cmd = adjust(&item, delta);

                let first = inventory.handle(&cmd);
                let second = inventory.handle(&cmd);

                prop_assert_eq!(&inventory, &before);
                prop_assert_eq!(first, second);
            }

            /// Property: a successful adjustment leaves a positive quantity, a failed one changes nothing.
            #[test]
            fn adjust_keeps_quantities_positive(inventory in arb_inventory(), item in "[a-z]{1,8}", delta in -2_000i64..2_000) {
                let mut inventory = inventory;
                let before = inventory.clone();

                match inventory.execute(&adjust(&item, delta)) {
                    Ok(events) => {
                        prop_assert_eq!(events.len(), 1);
                        prop_assert!(inventory.quantity(&name(&item)).unwrap() > 0);
                        prop_assert_eq!(inventory.version(), before.version() + 1);
                    }
                    Err(_) => prop_assert_eq!(&inventory, &before),
                }
            }

            /// Property: snapshot -> from_snapshot reproduces the mapping.
            #[test]
            fn snapshot_rebuilds_the_same_mapping(inventory in arb_inventory()) {
                let rebuilt = Inventory::from_snapshot(inventory.snapshot()).unwrap();
                prop_assert_eq!(rebuilt.snapshot(), inventory.snapshot());
            }
        }
    }
}
