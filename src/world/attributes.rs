//! Product configuration model.
//!
//! A [`Dimension`] is an ordered list of mutually exclusive attributes with
//! exactly one default. A [`Matrix`] is an ordered list of dimensions with
//! mixed-radix scale factors:
//!
//! ```text
//! size   = [small, medium*, large]     scale 1
//! flavor = [vanilla*, chocolate]       scale 3
//!
//! key(small, chocolate) = 0*1 + 1*3 = 3
//! key(chocolate)        = 1*1 + 1*3 = 4   (size defaults to medium)
//! ```
//!
//! The index is a bijection onto `0..size()`, so a concrete SKU is identified
//! by `Key { pid, index }`.

use crate::{Aid, DataError, Did, Mid, Pid};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub aid: Aid,
    pub name: String,
    pub is_default: bool,
}

impl Attribute {
    pub fn new(aid: Aid, name: &str) -> Self {
        Attribute { aid, name: name.to_string(), is_default: false }
    }

    pub fn default(aid: Aid, name: &str) -> Self {
        Attribute { aid, name: name.to_string(), is_default: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub id: Did,
    pub name: String,
    pub attributes: Vec<Attribute>,
    default: usize,
}

impl Dimension {
    pub fn new(id: Did, name: &str, attributes: Vec<Attribute>) -> Result<Self, DataError> {
        let defaults: Vec<usize> =
            attributes.iter().enumerate().filter(|(_, a)| a.is_default).map(|(i, _)| i).collect();
        if defaults.len() != 1 {
            return Err(DataError::BadDefault { did: id, found: defaults.len() });
        }
        Ok(Dimension { id, name: name.to_string(), attributes, default: defaults[0] })
    }

    pub fn default_position(&self) -> usize {
        self.default
    }

    pub fn position_of(&self, aid: Aid) -> Option<usize> {
        self.attributes.iter().position(|a| a.aid == aid)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Concrete SKU: a generic id plus its matrix index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub pid: Pid,
    pub index: usize,
}

impl Key {
    pub fn new(pid: Pid, index: usize) -> Self {
        Key { pid, index }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pid, self.index)
    }
}

/// Wildcard key: a generic id and every matrix index consistent with the
/// dimensions that were specified. Unspecified dimensions match any value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    pub pid: Pid,
    pub indices: BTreeSet<usize>,
}

impl KeyPattern {
    pub fn matches(&self, key: &Key) -> bool {
        key.pid == self.pid && self.indices.contains(&key.index)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alternatives: Vec<String> = self.indices.iter().map(|i| i.to_string()).collect();
        write!(f, "{}:({})", self.pid, alternatives.join("|"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    pub id: Mid,
    pub dimensions: Vec<Dimension>,
    scales: Vec<usize>,
    size: usize,
}

impl Matrix {
    pub fn new(id: Mid, dimensions: Vec<Dimension>) -> Self {
        let mut scales = Vec::with_capacity(dimensions.len());
        let mut size = 1;
        for dimension in &dimensions {
            scales.push(size);
            size *= dimension.len().max(1);
        }
        Matrix { id, dimensions, scales, size }
    }

    /// Number of distinct keys.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the dimension `aid` belongs to, if any.
    pub fn dimension_index(&self, aid: Aid) -> Option<usize> {
        self.dimensions.iter().position(|d| d.position_of(aid).is_some())
    }

    pub fn configures(&self, aid: Aid) -> bool {
        self.dimension_index(aid).is_some()
    }

    /// Per-dimension positions selected by `selections`; `None` where unselected.
    /// The first selection on a dimension wins.
    fn selected_positions(&self, selections: &[Aid]) -> Vec<Option<usize>> {
        self.dimensions
            .iter()
            .map(|d| selections.iter().find_map(|&aid| d.position_of(aid)))
            .collect()
    }

    /// Mixed-radix index: `sum(position_d * scale_d)`, defaulting unselected dimensions.
    pub fn index(&self, selections: &[Aid]) -> usize {
        self.selected_positions(selections)
            .iter()
            .zip(&self.dimensions)
            .zip(&self.scales)
            .map(|((position, dimension), scale)| position.unwrap_or(dimension.default) * scale)
            .sum()
    }

    pub fn get_key(&self, pid: Pid, selections: &[Aid]) -> Key {
        Key::new(pid, self.index(selections))
    }

    /// Inverse of [`Matrix::index`].
    pub fn positions(&self, index: usize) -> Vec<usize> {
        self.dimensions
            .iter()
            .zip(&self.scales)
            .map(|(dimension, scale)| (index / scale) % dimension.len().max(1))
            .collect()
    }

    /// The attribute ids encoded by `index`, one per dimension.
    pub fn attributes(&self, index: usize) -> Vec<Aid> {
        self.positions(index)
            .iter()
            .zip(&self.dimensions)
            .filter_map(|(&position, dimension)| dimension.attributes.get(position).map(|a| a.aid))
            .collect()
    }

    /// Wildcard pattern for `selections`: dimensions without a selection match any value.
    pub fn pattern(&self, pid: Pid, selections: &[Aid]) -> KeyPattern {
        let fixed = self.selected_positions(selections);
        let indices = (0..self.size)
            .filter(|&index| {
                self.positions(index).iter().zip(&fixed).all(|(position, wanted)| wanted.is_none_or(|w| w == *position))
            })
            .collect();
        KeyPattern { pid, indices }
    }
}

/// Registry of dimensions and matrices.
#[derive(Debug, Clone, Default)]
pub struct AttributeInfo {
    dimensions: HashMap<Did, Dimension>,
    matrices: HashMap<Mid, Matrix>,
    attributes: HashMap<Aid, Did>,
}

impl AttributeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dimension(&mut self, dimension: Dimension) -> Result<(), DataError> {
        if self.dimensions.contains_key(&dimension.id) {
            return Err(DataError::DuplicateDimension(dimension.id));
        }
        for attribute in &dimension.attributes {
            if let Some(&existing) = self.attributes.get(&attribute.aid) {
                return Err(DataError::DuplicateAttribute { aid: attribute.aid, existing });
            }
        }
        for attribute in &dimension.attributes {
            self.attributes.insert(attribute.aid, dimension.id);
        }
        self.dimensions.insert(dimension.id, dimension);
        Ok(())
    }

    pub fn add_matrix(&mut self, id: Mid, dimensions: &[Did]) -> Result<(), DataError> {
        if self.matrices.contains_key(&id) {
            return Err(DataError::DuplicateMatrix(id));
        }
        let dims = dimensions
            .iter()
            .map(|did| self.dimensions.get(did).cloned().ok_or(DataError::UnknownDimension(*did)))
            .collect::<Result<Vec<_>, _>>()?;
        self.matrices.insert(id, Matrix::new(id, dims));
        Ok(())
    }

    pub fn matrix(&self, id: Mid) -> Option<&Matrix> {
        self.matrices.get(&id)
    }

    /// Dimension id an attribute belongs to.
    pub fn dimension_of(&self, aid: Aid) -> Option<Did> {
        self.attributes.get(&aid).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn size() -> Dimension {
        Dimension::new(
            1,
            "size",
            vec![Attribute::new(1, "small"), Attribute::default(2, "medium"), Attribute::new(3, "large")],
        )
        .unwrap()
    }

    fn flavor() -> Dimension {
        Dimension::new(2, "flavor", vec![Attribute::default(10, "vanilla"), Attribute::new(11, "chocolate")]).unwrap()
    }

    fn cone() -> Matrix {
        Matrix::new(1, vec![size(), flavor()])
    }

    #[test]
    fn key_defaults_missing_dimensions() {
        let m = cone();
        assert_eq!(m.index(&[1, 11]), 3);
        assert_eq!(m.index(&[11]), 4);
        assert_eq!(m.index(&[]), 1);
        assert_eq!(m.attributes(4), vec![2, 11]);
    }

    #[test]
    fn first_selection_on_a_dimension_wins() {
        let m = cone();
        assert_eq!(m.index(&[3, 1]), m.index(&[3]));
    }

    #[test]
    fn pattern_wildcards_unspecified_dimensions() {
        let m = cone();
        let p = m.pattern(9000, &[11]);
        assert_eq!(p.indices.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(p.matches(&Key::new(9000, 5)));
        assert!(!p.matches(&Key::new(9001, 5)));
        assert!(!p.matches(&Key::new(9000, 0)));
    }

    #[test]
    fn dimension_requires_exactly_one_default() {
        let err = Dimension::new(7, "bad", vec![Attribute::new(1, "a"), Attribute::new(2, "b")]).unwrap_err();
        assert_eq!(err, DataError::BadDefault { did: 7, found: 0 });
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut info = AttributeInfo::new();
        info.add_dimension(size()).unwrap();
        assert_eq!(info.add_dimension(size()), Err(DataError::DuplicateDimension(1)));
        info.add_matrix(1, &[1]).unwrap();
        assert_eq!(info.add_matrix(1, &[1]), Err(DataError::DuplicateMatrix(1)));
        assert_eq!(info.add_matrix(2, &[99]), Err(DataError::UnknownDimension(99)));
    }

    proptest! {
        #[test]
        fn index_is_injective_over_full_selections(a in 0usize..3, b in 0usize..2, c in 0usize..3, d in 0usize..2) {
            let m = cone();
            let sizes = [1, 2, 3];
            let flavors = [10, 11];
            let left = m.index(&[sizes[a], flavors[b]]);
            let right = m.index(&[sizes[c], flavors[d]]);
            prop_assert!(left < m.size());
            prop_assert_eq!(left == right, (a, b) == (c, d));
            prop_assert_eq!(m.positions(left), vec![a, b]);
        }
    }
}
