//! Blankets: ordered collections of blocks covering a variable's term space.
//!
//! A [`Blanket`] carries the set/partition algebra the decomposition engine
//! is built from: the block-wise product, the refinement relation `<=`, exact
//! block-set equality, and the reduction pass that drops redundant blocks.
//!
//! Two sort orders appear throughout:
//!
//! - **presentation order**: ascending minimum term; the order results are
//!   reported in,
//! - **synthesis order**: ascending (rank, minimum term); used internally so
//!   that the greedy algorithms commit to the largest blocks first.
//!
//! Sorting and renaming never change the algebraic content.

use std::fmt;

use crate::block::Block;

/// An ordered collection of [`Block`]s for one variable or encoding.
///
/// Semantically a blanket is the unordered set of its blocks; the order is
/// presentation only. Block names need not be unique; the operators never
/// use them, only the name-based accessors do.
#[derive(Debug, Clone, Default)]
pub struct Blanket {
    blocks: Vec<Block>,
}

impl Blanket {
    /// Creates a blanket with no blocks.
    pub fn empty() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Parses a blanket descriptor: a `;`-terminated sequence of clauses
    /// `name:term,term,...;` with optional names and insignificant
    /// whitespace, e.g. `"A:1,2,3; B:1,4; 5,6;"`.
    ///
    /// Clauses without any valid (positive) term are dropped. Returns `None`
    /// when no block survives. The result is in presentation order.
    pub fn parse(descriptor: &str) -> Option<Self> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return None;
        }
        let mut result = Blanket::empty();
        for clause in descriptor.split(';') {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            let (name, terms) = match clause.split_once(':') {
                Some((name, terms)) => (name.trim(), terms),
                None => ("", clause),
            };
            let mut block = Block::new(name);
            for token in terms.split(',') {
                if let Ok(term) = token.trim().parse::<u32>() {
                    block.insert(term);
                }
            }
            if block.rank() > 0 {
                result.add_block(&block);
            }
        }
        if result.blocks.is_empty() {
            return None;
        }
        result.sort_presentation();
        Some(result)
    }

    /// Creates a blanket of empty blocks with the given names, to be filled
    /// through [`add_terms`](Blanket::add_terms). Returns `None` for an empty
    /// name list.
    pub fn from_names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let blocks: Vec<Block> = names.into_iter().map(Block::new).collect();
        if blocks.is_empty() {
            return None;
        }
        Some(Self { blocks })
    }

    /// Creates a one-block blanket holding a copy of the given block.
    pub fn from_block(block: &Block) -> Self {
        Self {
            blocks: vec![block.clone()],
        }
    }

    /// Returns an independent copy, normalized to presentation order.
    ///
    /// Distinct from `Clone`, which preserves the current order; the greedy
    /// algorithms depend on working over presentation-ordered copies.
    pub fn copy(&self) -> Self {
        let mut copy = self.clone();
        copy.sort_presentation();
        copy
    }

    /// Returns the blocks of the blanket.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the first block with the given name, if any.
    pub fn block(&self, name: &str) -> Option<&Block> {
        if name.is_empty() {
            return None;
        }
        self.blocks.iter().find(|b| b.name() == name)
    }

    /// Adds the given terms to every block carrying the given name.
    pub fn add_terms(&mut self, name: &str, terms: &[u32]) {
        for block in self.blocks.iter_mut().filter(|b| b.name() == name) {
            for &term in terms {
                block.insert(term);
            }
        }
    }

    /// Appends a fresh empty block with the given name.
    pub fn add_block_named(&mut self, name: impl Into<String>) {
        self.blocks.push(Block::new(name));
    }

    /// Appends a copy of the block and re-sorts into presentation order.
    pub fn add_block(&mut self, block: &Block) {
        self.blocks.push(block.clone());
        self.sort_presentation();
    }

    /// Appends a copy of the block without sorting.
    pub fn add_block_unsorted(&mut self, block: &Block) {
        self.blocks.push(block.clone());
    }

    /// Appends a copy of the block and re-sorts into synthesis order.
    pub fn add_block_synthesis(&mut self, block: &Block) {
        self.blocks.push(block.clone());
        self.sort_synthesis();
    }

    /// Replaces the block at `index` in place, keeping the current order.
    pub(crate) fn replace_block(&mut self, index: usize, block: Block) {
        self.blocks[index] = block;
    }

    /// Deletes the first block with the given name and re-sorts into
    /// presentation order.
    pub fn delete_block(&mut self, name: &str) {
        if let Some(pos) = self.blocks.iter().position(|b| b.name() == name) {
            self.blocks.remove(pos);
        }
        self.sort_presentation();
    }

    /// Renames all blocks sequentially: `prefix1`, `prefix2`, ...
    pub fn rename_blocks(&mut self, prefix: &str) {
        for (i, block) in self.blocks.iter_mut().enumerate() {
            block.set_name(format!("{}{}", prefix, i + 1));
        }
    }

    /// Renames all blocks as `prefix` + counter, starting at `start`.
    /// An all-whitespace prefix leaves the names untouched.
    pub fn set_block_names(&mut self, prefix: &str, start: usize) {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return;
        }
        for (i, block) in self.blocks.iter_mut().enumerate() {
            block.set_name(format!("{}{}", prefix, start + i));
        }
    }

    /// Sorts blocks by ascending minimum term (presentation order).
    pub fn sort_presentation(&mut self) {
        self.blocks.sort_by_key(|b| b.min_term().unwrap_or(u32::MAX));
    }

    /// Sorts blocks by ascending (rank, minimum term) (synthesis order), so
    /// the hardest-to-merge blocks sit at the tail.
    pub fn sort_synthesis(&mut self) {
        self.blocks.sort_by_key(|b| (b.rank(), b.min_term().unwrap_or(u32::MAX)));
    }

    // Removes redundant blocks: a block contained in another block of the
    // same list carries no information. Leaves the list in synthesis order.
    fn pack_blocks(blocks: &mut Vec<Block>) {
        if blocks.is_empty() {
            return;
        }
        blocks.sort_by_key(|b| (b.rank(), b.min_term().unwrap_or(u32::MAX)));
        let mut kept = Vec::with_capacity(blocks.len());
        for i in 0..blocks.len() {
            let redundant = (i + 1..blocks.len()).any(|j| blocks[i].is_subset(&blocks[j]));
            if !redundant {
                kept.push(blocks[i].clone());
            }
        }
        *blocks = kept;
    }

    /// The blanket product: pairwise intersections of blocks, reduced and
    /// renamed `B1..Bn`, re-sorted into presentation order. Returns `None`
    /// when every intersection is empty.
    pub fn product(&self, other: &Blanket) -> Option<Blanket> {
        let mut result = self.product_unsorted(other)?;
        result.sort_presentation();
        Some(result)
    }

    /// Like [`product`](Blanket::product) but keeps the reduction (synthesis)
    /// order. Used where only the block set matters, e.g. refinement guards.
    pub fn product_unsorted(&self, other: &Blanket) -> Option<Blanket> {
        let mut result: Vec<Block> = Vec::new();
        for other_block in &other.blocks {
            for block in &self.blocks {
                let p = block.intersection(other_block);
                if !p.is_empty() && !result.contains(&p) {
                    result.push(p);
                }
            }
        }
        if result.is_empty() {
            return None;
        }
        Self::pack_blocks(&mut result);
        for (i, block) in result.iter_mut().enumerate() {
            block.set_name(format!("B{}", i + 1));
        }
        Some(Blanket { blocks: result })
    }

    /// The refinement relation: `self <= other` iff every block of `self` is
    /// contained in some block of `other`. This is the central
    /// decomposability test.
    pub fn refines(&self, other: &Blanket) -> bool {
        self.blocks
            .iter()
            .all(|b| other.blocks.iter().any(|ob| b.is_subset(ob)))
    }

    /// Returns the blocks of `other` that are not individually refinable
    /// into `self`: the parts of `other` that cannot be expressed under
    /// `self`'s grouping.
    pub fn incompatible_blocks(&self, other: &Blanket) -> Vec<Block> {
        other
            .blocks
            .iter()
            .filter(|ob| !Blanket::from_block(ob).refines(self))
            .cloned()
            .collect()
    }

    /// Exact equality of block sets (bit content only, order- and
    /// name-independent).
    pub fn eq_blocks(&self, other: &Blanket) -> bool {
        self.blocks.len() == other.blocks.len()
            && self
                .blocks
                .iter()
                .all(|b| other.blocks.iter().any(|ob| b == ob))
    }

    /// Returns true if any two blocks of this blanket share a term.
    pub fn has_overlap(&self) -> bool {
        self.blocks.iter().enumerate().any(|(i, b)| {
            self.blocks[i + 1..].iter().any(|other| b.intersects(other))
        })
    }

    /// Collects every term that belongs to at least two blocks of this
    /// blanket into one block. Returns `None` for a blanket with no blocks;
    /// the returned block is empty when the blocks are pairwise disjoint.
    pub fn common_part(&self) -> Option<Block> {
        if self.blocks.is_empty() {
            return None;
        }
        let min = self.blocks.iter().filter_map(|b| b.min_term()).min();
        let max = self.blocks.iter().filter_map(|b| b.max_term()).max();
        let mut result = Block::new("");
        if let (Some(min), Some(max)) = (min, max) {
            for term in min..=max {
                let mut count = 0;
                for block in &self.blocks {
                    if block.contains(term) {
                        count += 1;
                        if count > 1 {
                            result.insert(term);
                            break;
                        }
                    }
                }
            }
        }
        Some(result)
    }

    /// Prints the blanket as space-separated block clauses, with or without
    /// block names.
    pub fn print(&self, with_names: bool) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&block.print(with_names));
        }
        out
    }
}

impl fmt::Display for Blanket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_print() {
        let blanket = Blanket::parse("A:1,2,3; B:1,4; 5,6;").unwrap();
        assert_eq!(blanket.len(), 3);
        assert_eq!(blanket.to_string(), "A:1,2,3; B:1,4; 5,6;");
        assert_eq!(blanket.print(false), "1,2,3; 1,4; 5,6;");
        // Round-trips structurally.
        let reparsed = Blanket::parse(&blanket.to_string()).unwrap();
        assert!(reparsed.eq_blocks(&blanket));
    }

    #[test]
    fn test_parse_rejects_blockless_input() {
        assert!(Blanket::parse("").is_none());
        assert!(Blanket::parse("   ").is_none());
        assert!(Blanket::parse("A:0;").is_none());
    }

    #[test]
    fn test_parse_sorts_by_min_term() {
        let blanket = Blanket::parse("B:4,5; A:1,2;").unwrap();
        assert_eq!(blanket.to_string(), "A:1,2; B:4,5;");
    }

    #[test]
    fn test_from_names_and_add_terms() {
        let mut blanket = Blanket::from_names(["A", "B"]).unwrap();
        blanket.add_terms("A", &[1, 2, 3]);
        blanket.add_terms("B", &[1, 2, 64]);
        assert_eq!(blanket.to_string(), "A:1,2,3; B:1,2,64;");
        let a = blanket.block("A").unwrap();
        let b = blanket.block("B").unwrap();
        assert_eq!(a.union(b).to_string(), "A+B:1,2,3,64;");
        assert_eq!(b.union(a).to_string(), "B+A:1,2,3,64;");
    }

    #[test]
    fn test_refines() {
        let b1 = Blanket::parse("0:1,2; 1:4,5;").unwrap();
        let b2 = Blanket::parse("0:1,2,3; 1:1,4,5,6;").unwrap();
        let b3 = Blanket::parse("0:1,2,3; 1:3,4,5;").unwrap();
        assert!(b1.refines(&b2));
        assert!(!b3.refines(&b2));
        assert!(b1.refines(&b1));
        assert!(b2.refines(&b2));
    }

    #[test]
    fn test_product_contents_and_names() {
        let b1 = Blanket::parse("0:1,2; 1:4,5;").unwrap();
        let b2 = Blanket::parse("0:1,2,3; 1:1,4,5,6;").unwrap();
        let b3 = Blanket::parse("0:1,2,3; 1:3,4,5;").unwrap();
        assert_eq!(b1.product(&b2).unwrap().to_string(), "B1:1,2; B2:4,5;");
        assert_eq!(b1.product(&b3).unwrap().to_string(), "B1:1,2; B2:4,5;");
        // Names are assigned in reduction (synthesis) order, then the blocks
        // are re-sorted for presentation.
        assert_eq!(b2.product(&b3).unwrap().to_string(), "B2:1,2,3; B1:4,5;");
    }

    #[test]
    fn test_product_commutes_up_to_naming() {
        let a = Blanket::parse("A1:1,2; A2:3,4; A3:5,9; A4:6,7,8;").unwrap();
        let f = Blanket::parse("F1:1,3,4,6,8; F2:2,5,7,9;").unwrap();
        let ab = a.product(&f).unwrap();
        let ba = f.product(&a).unwrap();
        assert!(ab.eq_blocks(&ba));
    }

    #[test]
    fn test_product_of_disjoint_blankets_is_none() {
        let a = Blanket::parse("A:1,2;").unwrap();
        let b = Blanket::parse("B:3,4;").unwrap();
        assert!(a.product(&b).is_none());
    }

    #[test]
    fn test_product_refines_operands() {
        let a = Blanket::parse("A1:1,2; A2:3,4; A3:5,9; A4:6,7,8;").unwrap();
        let f = Blanket::parse("F1:1,3,4,6,8; F2:2,5,7,9;").unwrap();
        let p = a.product(&f).unwrap();
        assert!(p.refines(&a));
        assert!(p.refines(&f));
    }

    #[test]
    fn test_eq_blocks_ignores_order_and_names() {
        let b3 = Blanket::parse("0:1,2,3; 1:3,4,5;").unwrap();
        let b4 = Blanket::parse("x:3,4,5; y:1,2,3;").unwrap();
        let b2 = Blanket::parse("0:1,2,3; 1:1,4,5,6;").unwrap();
        assert!(b3.eq_blocks(&b4));
        assert!(!b3.eq_blocks(&b2));
    }

    #[test]
    fn test_incompatible_blocks() {
        let a = Blanket::parse("A1:1,2; A2:3,4; A3:5,9; A4:6,7,8;").unwrap();
        let b = Blanket::parse("B1:1; B2:2; B3:3; B4:4; B5:5; B6:6,8; B7:7; B8:9;").unwrap();
        let f = Blanket::parse("F1:1,3,4,6,8; F2:2,5,7,9;").unwrap();
        let incompatible = f.incompatible_blocks(&a);
        assert_eq!(incompatible.len(), 2);
        assert_eq!(incompatible[0].to_string(), "A1:1,2;");
        assert_eq!(incompatible[1].to_string(), "A4:6,7,8;");
        assert!(f.incompatible_blocks(&b).is_empty());
    }

    #[test]
    fn test_common_part() {
        let blanket = Blanket::parse(
            "B2:1,2,4,5,6,7,8,9,13,15,17,19; B3:1,3,4,5,6,7,8,9,13,15,17,19; B1:10,11,12,14,16,18;",
        )
        .unwrap();
        assert!(blanket.has_overlap());
        let common = blanket.common_part().unwrap();
        assert_eq!(common.to_string(), "1,4,5,6,7,8,9,13,15,17,19;");

        // Subtracting the common part leaves the deterministic residue of
        // each block.
        let expected = ["B2:2;", "B3:3;", "B1:10,11,12,14,16,18;"];
        for (block, expected) in blanket.blocks().iter().zip(expected) {
            let residue = block.difference(&common);
            assert_eq!(format!("{}:{}", block.name(), residue.print(false)), expected);
        }
    }

    #[test]
    fn test_common_part_of_partition_is_empty() {
        let blanket = Blanket::parse("A:1,2; B:3,4;").unwrap();
        assert!(!blanket.has_overlap());
        assert!(blanket.common_part().unwrap().is_empty());
        assert!(Blanket::empty().common_part().is_none());
    }

    #[test]
    fn test_pack_is_idempotent() {
        // The product output is already reduced; packing it again must not
        // change the block set.
        let a = Blanket::parse("A1:1,2; A2:2,3; A3:3,4;").unwrap();
        let b = Blanket::parse("B1:1,3; B2:2,4;").unwrap();
        let reduced = a.product(&b).unwrap();
        let mut blocks = reduced.blocks().to_vec();
        Blanket::pack_blocks(&mut blocks);
        let repacked = Blanket { blocks };
        assert!(repacked.eq_blocks(&reduced));
    }

    #[test]
    fn test_delete_and_rename() {
        let mut blanket = Blanket::parse("A:1,2; B:3,4; C:5;").unwrap();
        blanket.delete_block("B");
        assert_eq!(blanket.to_string(), "A:1,2; C:5;");
        blanket.rename_blocks("B");
        assert_eq!(blanket.to_string(), "B1:1,2; B2:5;");
        blanket.set_block_names("Q", 0);
        assert_eq!(blanket.to_string(), "Q0:1,2; Q1:5;");
    }

    #[test]
    fn test_copy_is_independent() {
        let original = Blanket::parse("A:1,2; B:3,4;").unwrap();
        let mut copy = original.copy();
        copy.add_terms("A", &[9]);
        assert_eq!(original.block("A").unwrap().rank(), 2);
        assert_eq!(copy.block("A").unwrap().rank(), 3);
    }
}
