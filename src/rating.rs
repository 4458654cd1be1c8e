//! Rating-bucketed search tree.
//!
//! A binary search tree keyed by star rating (1-5); each node holds an
//! insertion-ordered bucket of track ids sharing that rating. With at most
//! five keys the tree stays tiny, but the descent/removal structure is kept
//! deliberate: O(log n) average lookup by key, O(total entries) removal by
//! id.

use log::trace;
use std::collections::HashMap;

#[derive(Debug)]
struct Node {
    rating: u8,
    bucket: Vec<String>,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(rating: u8, track_id: String) -> Box<Self> {
        Box::new(Self {
            rating,
            bucket: vec![track_id],
            left: None,
            right: None,
        })
    }
}

/// Multi-map from rating (1-5) to track ids, backed by a BST.
#[derive(Debug, Default)]
pub struct RatingTree {
    root: Option<Box<Node>>,
}

impl RatingTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `track_id` under `rating`. Ratings outside 1-5 are rejected
    /// (no-op, returns false).
    ///
    /// The tree does not detect a track already filed under another rating;
    /// on re-rate the caller must [`RatingTree::remove_id`] first, or the
    /// track ends up duplicated across buckets.
    pub fn insert(&mut self, track_id: impl Into<String>, rating: u8) -> bool {
        if !(1..=5).contains(&rating) {
            return false;
        }
        let id = track_id.into();
        trace!("rating tree insert: {id} @ {rating}");
        Self::insert_at(&mut self.root, id, rating);
        true
    }

    /// The bucket of ids rated exactly `rating`, empty when absent.
    /// O(log n) descent.
    #[must_use]
    pub fn bucket(&self, rating: u8) -> &[String] {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            if rating == node.rating {
                return &node.bucket;
            }
            cursor = if rating < node.rating {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
        }
        &[]
    }

    /// Remove the first bucket entry matching `track_id`, wherever it is
    /// filed. Walks the whole tree in the worst case; returns whether an
    /// entry was found.
    pub fn remove_id(&mut self, track_id: &str) -> bool {
        Self::remove_at(&mut self.root, track_id)
    }

    /// Entry counts for every rating 1-5; ratings with no bucket report 0.
    /// Full traversal.
    #[must_use]
    pub fn counts(&self) -> HashMap<u8, usize> {
        let mut counts: HashMap<u8, usize> = (1..=5).map(|r| (r, 0)).collect();
        Self::count_at(self.root.as_deref(), &mut counts);
        counts
    }

    fn insert_at(slot: &mut Option<Box<Node>>, id: String, rating: u8) {
        match slot {
            None => *slot = Some(Node::leaf(rating, id)),
            Some(node) => {
                if rating == node.rating {
                    node.bucket.push(id);
                } else if rating < node.rating {
                    Self::insert_at(&mut node.left, id, rating);
                } else {
                    Self::insert_at(&mut node.right, id, rating);
                }
            }
        }
    }

    fn remove_at(slot: &mut Option<Box<Node>>, track_id: &str) -> bool {
        let Some(node) = slot else {
            return false;
        };
        if let Some(pos) = node.bucket.iter().position(|id| id == track_id) {
            node.bucket.remove(pos);
            trace!("rating tree remove: {track_id} @ {}", node.rating);
            return true;
        }
        Self::remove_at(&mut node.left, track_id) || Self::remove_at(&mut node.right, track_id)
    }

    fn count_at(node: Option<&Node>, counts: &mut HashMap<u8, usize>) {
        let Some(node) = node else { return };
        counts.insert(node.rating, node.bucket.len());
        Self::count_at(node.left.as_deref(), counts);
        Self::count_at(node.right.as_deref(), counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_out_of_range_ratings() {
        let mut tree = RatingTree::new();
        assert!(!tree.insert("a", 0));
        assert!(!tree.insert("a", 6));
        assert!(tree.bucket(0).is_empty());
        assert!(tree.insert("a", 3));
    }

    #[test]
    fn buckets_share_a_rating_in_insertion_order() {
        let mut tree = RatingTree::new();
        tree.insert("a", 5);
        tree.insert("b", 3);
        tree.insert("c", 5);
        tree.insert("d", 4);

        assert_eq!(tree.bucket(5), ["a", "c"]);
        assert_eq!(tree.bucket(3), ["b"]);
        assert_eq!(tree.bucket(4), ["d"]);
        assert!(tree.bucket(1).is_empty());
    }

    #[test]
    fn remove_id_excises_exactly_one_entry() {
        let mut tree = RatingTree::new();
        tree.insert("a", 5);
        tree.insert("b", 5);
        tree.insert("c", 2);

        assert!(tree.remove_id("a"));
        assert_eq!(tree.bucket(5), ["b"]);
        assert!(!tree.remove_id("a"));
        assert!(tree.remove_id("c"));
        assert!(tree.bucket(2).is_empty());
    }

    #[test]
    fn counts_report_all_five_ratings() {
        let mut tree = RatingTree::new();
        tree.insert("a", 5);
        tree.insert("b", 5);
        tree.insert("c", 1);

        let counts = tree.counts();
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[&5], 2);
        assert_eq!(counts[&1], 1);
        assert_eq!(counts[&2], 0);
        assert_eq!(counts[&3], 0);
        assert_eq!(counts[&4], 0);
    }

    #[test]
    fn counts_on_empty_tree_are_all_zero() {
        let counts = RatingTree::new().counts();
        assert!(counts.values().all(|&c| c == 0));
        assert_eq!(counts.len(), 5);
    }
}
