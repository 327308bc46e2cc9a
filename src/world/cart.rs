//! Order state: a cart of item trees.
//!
//! Every operation returns a new value and leaves the receiver untouched, so
//! a candidate interpretation can be evaluated against its own snapshot.

use super::attributes::{Key, KeyPattern};
use crate::Uid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInstance {
    /// `0` until the item is placed in a cart.
    pub uid: Uid,
    pub key: Key,
    /// `0` records an explicitly removed default option.
    pub quantity: u32,
    pub children: Vec<ItemInstance>,
}

impl ItemInstance {
    pub fn new(key: Key, quantity: u32) -> Self {
        ItemInstance { uid: 0, key, quantity, children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<ItemInstance>) -> Self {
        self.children = children;
        self
    }

    pub fn find(&self, uid: Uid) -> Option<&ItemInstance> {
        if self.uid == uid {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(uid))
    }

    /// Copy without `uid`s, ready to be placed again.
    pub fn detached(&self) -> ItemInstance {
        ItemInstance {
            uid: 0,
            key: self.key,
            quantity: self.quantity,
            children: self.children.iter().map(ItemInstance::detached).collect(),
        }
    }

    fn without(&self, uid: Uid) -> ItemInstance {
        ItemInstance {
            children: self.children.iter().filter(|c| c.uid != uid).map(|c| c.without(uid)).collect(),
            ..self.clone()
        }
    }

    fn replacing(&self, item: &ItemInstance) -> ItemInstance {
        if self.uid == item.uid {
            return item.clone();
        }
        ItemInstance { children: self.children.iter().map(|c| c.replacing(item)).collect(), ..self.clone() }
    }

    fn assign_uids(&mut self, next: &mut Uid) {
        if self.uid == 0 {
            self.uid = *next;
            *next += 1;
        }
        for child in &mut self.children {
            child.assign_uids(next);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<ItemInstance>,
    next_uid: Uid,
}

impl Default for Cart {
    fn default() -> Self {
        Cart { items: Vec::new(), next_uid: 1 }
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Append `item`, assigning fresh `uid`s to it and any unplaced descendants.
    pub fn add(&self, item: ItemInstance) -> Cart {
        let mut cart = self.clone();
        let mut item = item;
        item.assign_uids(&mut cart.next_uid);
        cart.items.push(item);
        cart
    }

    /// Drop the item (top-level or nested) with `uid`.
    pub fn remove(&self, uid: Uid) -> Cart {
        Cart {
            items: self.items.iter().filter(|i| i.uid != uid).map(|i| i.without(uid)).collect(),
            next_uid: self.next_uid,
        }
    }

    /// Swap in `item` where the item with the same `uid` sits.
    pub fn replace(&self, item: ItemInstance) -> Cart {
        let mut cart = self.clone();
        let mut item = item;
        item.assign_uids(&mut cart.next_uid);
        cart.items = cart.items.iter().map(|i| i.replacing(&item)).collect();
        cart
    }

    pub fn find(&self, uid: Uid) -> Option<&ItemInstance> {
        self.items.iter().find_map(|item| item.find(uid))
    }

    /// Top-level items whose key matches `pattern`, in cart order.
    pub fn find_by_pattern(&self, pattern: &KeyPattern) -> Vec<&ItemInstance> {
        self.items.iter().filter(|item| pattern.matches(&item.key)).collect()
    }

    /// Most recently added top-level item.
    pub fn last(&self) -> Option<&ItemInstance> {
        self.items.last()
    }

    /// Position of a top-level item; later items are more recent.
    pub fn recency(&self, uid: Uid) -> Option<usize> {
        self.items.iter().position(|item| item.uid == uid)
    }
}

/// Everything an utterance may edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub cart: Cart,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cart(cart: Cart) -> Self {
        State { cart }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee_with_milk() -> ItemInstance {
        ItemInstance::new(Key::new(9100, 1), 1).with_children(vec![ItemInstance::new(Key::new(5000, 0), 1)])
    }

    #[test]
    fn add_assigns_uids_depth_first() {
        let cart = Cart::new().add(coffee_with_milk()).add(ItemInstance::new(Key::new(9000, 1), 2));
        assert_eq!(cart.items[0].uid, 1);
        assert_eq!(cart.items[0].children[0].uid, 2);
        assert_eq!(cart.items[1].uid, 3);
        assert_eq!(cart.last().map(|i| i.uid), Some(3));
    }

    #[test]
    fn operations_leave_the_original_untouched() {
        let cart = Cart::new().add(coffee_with_milk());
        let without_milk = cart.remove(2);
        assert!(without_milk.items[0].children.is_empty());
        assert_eq!(cart.items[0].children.len(), 1);

        let mut bigger = cart.items[0].clone();
        bigger.key = Key::new(9100, 2);
        bigger.children.push(ItemInstance::new(Key::new(5500, 0), 2));
        let replaced = cart.replace(bigger);
        assert_eq!(replaced.items[0].uid, 1);
        assert_eq!(replaced.items[0].key, Key::new(9100, 2));
        assert_eq!(replaced.items[0].children[1].uid, 3);
        assert_eq!(cart.items[0].key, Key::new(9100, 1));
    }

    #[test]
    fn remove_of_unknown_uid_is_a_no_op() {
        let cart = Cart::new().add(coffee_with_milk());
        assert_eq!(cart.remove(42), cart);
    }
}
