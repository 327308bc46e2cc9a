//! Menu catalog: generic products and options, and the set of available SKUs.

use super::attributes::{AttributeInfo, Key};
use crate::{DataError, Mid, Pid};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Product,
    Option,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericItem {
    pub pid: Pid,
    pub name: String,
    pub kind: ItemKind,
    pub matrix: Mid,
    /// Options the product comes with unless asked otherwise.
    pub default_options: Vec<Pid>,
}

impl GenericItem {
    pub fn product(pid: Pid, name: &str, matrix: Mid) -> Self {
        GenericItem { pid, name: name.to_string(), kind: ItemKind::Product, matrix, default_options: Vec::new() }
    }

    pub fn option(pid: Pid, name: &str, matrix: Mid) -> Self {
        GenericItem { pid, name: name.to_string(), kind: ItemKind::Option, matrix, default_options: Vec::new() }
    }

    pub fn with_defaults(mut self, options: &[Pid]) -> Self {
        self.default_options = options.to_vec();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    generics: HashMap<Pid, GenericItem>,
    order: Vec<Pid>,
    keys: HashSet<Key>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generic item and every SKU of its matrix.
    pub fn add_generic(&mut self, item: GenericItem, attributes: &AttributeInfo) -> Result<(), DataError> {
        if self.generics.contains_key(&item.pid) {
            return Err(DataError::DuplicateEntity(item.pid));
        }
        let matrix = attributes.matrix(item.matrix).ok_or(DataError::UnknownMatrix(item.matrix))?;
        self.keys.extend((0..matrix.size()).map(|index| Key::new(item.pid, index)));
        self.order.push(item.pid);
        self.generics.insert(item.pid, item);
        Ok(())
    }

    /// Mark a SKU as not sold.
    pub fn exclude_key(&mut self, key: &Key) {
        self.keys.remove(key);
    }

    pub fn has_key(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    pub fn generic(&self, pid: Pid) -> Option<&GenericItem> {
        self.generics.get(&pid)
    }

    /// Generic items in registration order.
    pub fn generics(&self) -> impl Iterator<Item = &GenericItem> {
        self.order.iter().filter_map(|pid| self.generics.get(pid))
    }

    pub fn is_default_option(&self, parent: Pid, option: Pid) -> bool {
        self.generic(parent).is_some_and(|g| g.default_options.contains(&option))
    }
}
