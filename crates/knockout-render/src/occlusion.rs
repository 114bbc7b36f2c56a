#![forbid(unsafe_code)]

//! Occlusion tracking over previously painted opaque regions.
//!
//! The tracker keeps a forest of boxes describing which parts of earlier
//! opaque paint are still visible. Registering a new opaque rectangle
//! walks the forest: fully covered leaves are deleted, partially covered
//! leaves are replaced by up to four band-shaped children tiling their
//! uncovered remainder, and the new rectangle joins the forest as a
//! fresh root. At every moment the visible leaves (non-deleted,
//! childless boxes) are pairwise disjoint and exactly tile the union of
//! everything registered so far.
//!
//! Nodes live in a bounded pool and reference each other by index, so
//! the forest is a plain inspectable value; see `visible_leaves`.

use smallvec::SmallVec;

use knockout_core::geometry::Rect;

use crate::arena::{CapacityExceeded, Pool};

/// Stable reference to a box for the duration of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxId(u32);

/// One node of the occlusion forest.
#[derive(Debug, Clone)]
pub struct BoxNode {
    /// Region this node stands for. Inert once the node has children.
    pub bbox: Rect,
    /// Entirely covered by later opaque paint. Permanent.
    pub deleted: bool,
    /// Head of the child chain describing the uncovered remainder.
    pub child: Option<BoxId>,
    /// Next sibling at the same level.
    pub next: Option<BoxId>,
}

/// Forest of previously painted opaque regions for one session.
#[derive(Debug, Clone)]
pub struct OcclusionTracker {
    pool: Pool<BoxNode>,
    head: Option<BoxId>,
}

impl OcclusionTracker {
    /// Create a tracker bounded at `capacity` boxes.
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: Pool::new(capacity),
            head: None,
        }
    }

    /// Record that `rect` has been opaquely painted over everything
    /// registered before it.
    ///
    /// Earlier boxes are trimmed or deleted, then `rect` is inserted as
    /// a new root and its id returned. On `CapacityExceeded` the caller
    /// must flush the session (resetting this tracker) and retry; any
    /// half-finished trimming is discarded by that reset.
    pub fn register_opaque(&mut self, rect: &Rect) -> Result<BoxId, CapacityExceeded> {
        self.knockout(rect, None)?;
        let node = BoxNode {
            bbox: *rect,
            deleted: false,
            child: None,
            next: self.head,
        };
        let id = match self.pool.push(node) {
            Ok(idx) => BoxId(idx),
            Err(_) => return Err(CapacityExceeded),
        };
        self.head = Some(id);
        Ok(id)
    }

    /// Shared access to a node.
    #[inline]
    pub fn node(&self, id: BoxId) -> &BoxNode {
        self.pool.get(id.0)
    }

    #[inline]
    fn node_mut(&mut self, id: BoxId) -> &mut BoxNode {
        self.pool.get_mut(id.0)
    }

    /// Boxes currently allocated.
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Check if nothing has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Discard the whole forest in O(1), keeping the storage.
    pub fn reset(&mut self) {
        self.pool.reset();
        self.head = None;
    }

    /// Trim every box overlapping `rect`.
    ///
    /// `owner` selects the child chain to walk; `None` walks the roots.
    /// Deleted nodes encountered on the way are permanently delinked; an
    /// owner whose last child is delinked becomes deleted itself.
    fn knockout(&mut self, rect: &Rect, owner: Option<BoxId>) -> Result<(), CapacityExceeded> {
        let mut cur = match owner {
            Some(o) => self.node(o).child,
            None => self.head,
        };
        let mut prev: Option<BoxId> = None;

        while let Some(id) = cur {
            let next = self.node(id).next;

            if self.node(id).deleted {
                match prev {
                    Some(p) => self.node_mut(p).next = next,
                    None => match owner {
                        Some(o) => {
                            self.node_mut(o).child = next;
                            if next.is_none() {
                                self.node_mut(o).deleted = true;
                            }
                        }
                        None => self.head = next,
                    },
                }
                cur = next;
                continue;
            }
            prev = Some(id);

            let bbox = self.node(id).bbox;
            if !bbox.overlaps(rect) {
                cur = next;
                continue;
            }

            if rect.contains(&bbox) {
                self.node_mut(id).deleted = true;
                cur = next;
                continue;
            }

            if self.node(id).child.is_some() {
                self.knockout(rect, Some(id))?;
            } else {
                self.split_leaf(id, rect)?;
            }
            cur = next;
        }
        Ok(())
    }

    /// Replace a partially covered leaf with band children tiling its
    /// uncovered remainder: top and bottom bands at full width, then
    /// right and left bands between them.
    fn split_leaf(&mut self, id: BoxId, rect: &Rect) -> Result<(), CapacityExceeded> {
        // A split needs up to four boxes; an incomplete split would lose
        // painted area, so refuse unless all four could be allocated.
        if self.pool.remaining() < 4 {
            return Err(CapacityExceeded);
        }

        let bbox = self.node(id).bbox;
        let mut ny0 = bbox.y0;
        let mut ny1 = bbox.y1;

        if rect.y0 > ny0 {
            self.attach_child(id, Rect::new(bbox.x0, ny0, bbox.x1, rect.y0))?;
            ny0 = rect.y0;
        }
        if rect.y1 < ny1 {
            self.attach_child(id, Rect::new(bbox.x0, rect.y1, bbox.x1, ny1))?;
            ny1 = rect.y1;
        }
        if rect.x1 < bbox.x1 {
            self.attach_child(id, Rect::new(rect.x1, ny0, bbox.x1, ny1))?;
        }
        if rect.x0 > bbox.x0 {
            self.attach_child(id, Rect::new(bbox.x0, ny0, rect.x0, ny1))?;
        }
        Ok(())
    }

    fn attach_child(&mut self, parent: BoxId, bbox: Rect) -> Result<(), CapacityExceeded> {
        let node = BoxNode {
            bbox,
            deleted: false,
            child: None,
            next: self.node(parent).child,
        };
        let id = match self.pool.push(node) {
            Ok(idx) => BoxId(idx),
            Err(_) => return Err(CapacityExceeded),
        };
        self.node_mut(parent).child = Some(id);
        Ok(())
    }

    /// Visit every visible leaf reachable from `chain` (a node and its
    /// following siblings), recursing through split boxes.
    pub fn for_each_visible_leaf(&self, chain: BoxId, f: &mut impl FnMut(&Rect)) {
        let mut stack: SmallVec<[BoxId; 16]> = SmallVec::new();
        stack.push(chain);
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if let Some(next) = node.next {
                stack.push(next);
            }
            if node.deleted {
                continue;
            }
            match node.child {
                Some(child) => stack.push(child),
                None => f(&node.bbox),
            }
        }
    }

    /// All visible leaves of the forest, for inspection and testing.
    pub fn visible_leaves(&self) -> Vec<Rect> {
        let mut out = Vec::new();
        if let Some(head) = self.head {
            self.for_each_visible_leaf(head, &mut |r| out.push(*r));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> OcclusionTracker {
        OcclusionTracker::new(64)
    }

    fn leaves_of(t: &OcclusionTracker, id: BoxId) -> Vec<Rect> {
        let mut out = Vec::new();
        let node = t.node(id);
        if node.deleted {
            return out;
        }
        match node.child {
            Some(child) => t.for_each_visible_leaf(child, &mut |r| out.push(*r)),
            None => out.push(node.bbox),
        }
        out
    }

    #[test]
    fn first_registration_is_single_root() {
        let mut t = tracker();
        let a = Rect::new(0, 0, 100, 100);
        let id = t.register_opaque(&a).unwrap();
        assert_eq!(t.node(id).bbox, a);
        assert_eq!(t.visible_leaves(), vec![a]);
    }

    #[test]
    fn overlap_splits_into_top_and_left_bands() {
        let mut t = tracker();
        let a_id = t.register_opaque(&Rect::new(0, 0, 100, 100)).unwrap();
        let b_id = t.register_opaque(&Rect::new(50, 50, 150, 150)).unwrap();

        let mut a_leaves = leaves_of(&t, a_id);
        a_leaves.sort_by_key(|r| (r.y0, r.x0));
        assert_eq!(
            a_leaves,
            vec![Rect::new(0, 0, 100, 50), Rect::new(0, 50, 50, 100)]
        );

        let a = t.node(a_id);
        assert!(!a.deleted);
        assert!(a.child.is_some());

        let b = t.node(b_id);
        assert!(!b.deleted);
        assert!(b.child.is_none());
        assert_eq!(b.bbox, Rect::new(50, 50, 150, 150));
    }

    #[test]
    fn full_cover_deletes_never_splits() {
        let mut t = tracker();
        let a_id = t.register_opaque(&Rect::new(0, 0, 50, 50)).unwrap();
        t.register_opaque(&Rect::new(0, 0, 100, 100)).unwrap();

        let a = t.node(a_id);
        assert!(a.deleted);
        assert!(a.child.is_none());
        assert_eq!(t.visible_leaves(), vec![Rect::new(0, 0, 100, 100)]);
    }

    #[test]
    fn exact_cover_deletes() {
        let mut t = tracker();
        let a_id = t.register_opaque(&Rect::new(10, 10, 20, 20)).unwrap();
        t.register_opaque(&Rect::new(10, 10, 20, 20)).unwrap();
        assert!(t.node(a_id).deleted);
        assert!(t.node(a_id).child.is_none());
    }

    #[test]
    fn disjoint_boxes_left_untouched() {
        let mut t = tracker();
        let a_id = t.register_opaque(&Rect::new(0, 0, 10, 10)).unwrap();
        t.register_opaque(&Rect::new(20, 20, 30, 30)).unwrap();

        let a = t.node(a_id);
        assert!(!a.deleted);
        assert!(a.child.is_none());
        assert_eq!(t.visible_leaves().len(), 2);
    }

    #[test]
    fn interior_cover_produces_four_bands() {
        let mut t = tracker();
        let a_id = t.register_opaque(&Rect::new(0, 0, 100, 100)).unwrap();
        t.register_opaque(&Rect::new(25, 25, 75, 75)).unwrap();

        let mut bands = leaves_of(&t, a_id);
        bands.sort_by_key(|r| (r.y0, r.x0));
        assert_eq!(
            bands,
            vec![
                Rect::new(0, 0, 100, 25),
                Rect::new(0, 25, 25, 75),
                Rect::new(75, 25, 100, 75),
                Rect::new(0, 75, 100, 100),
            ]
        );
        // Bands plus the covering rectangle conserve the original area.
        let band_area: u64 = bands.iter().map(Rect::area).sum();
        assert_eq!(band_area + Rect::new(25, 25, 75, 75).area(), 100 * 100);
    }

    #[test]
    fn split_recursion_reaches_fragments() {
        let mut t = tracker();
        let a_id = t.register_opaque(&Rect::new(0, 0, 100, 100)).unwrap();
        // First split: knocks out the bottom-right quadrant.
        t.register_opaque(&Rect::new(50, 50, 150, 150)).unwrap();
        // Second overlap lands on the surviving top band fragment.
        t.register_opaque(&Rect::new(0, 0, 100, 50)).unwrap();

        // Nothing of A's top band survives; only the left band remains.
        assert_eq!(leaves_of(&t, a_id), vec![Rect::new(0, 50, 50, 100)]);
    }

    #[test]
    fn covering_everything_deletes_whole_forest() {
        let mut t = tracker();
        let a_id = t.register_opaque(&Rect::new(0, 0, 40, 40)).unwrap();
        let b_id = t.register_opaque(&Rect::new(10, 10, 30, 30)).unwrap();
        let c_id = t.register_opaque(&Rect::new(0, 0, 200, 200)).unwrap();

        assert!(t.node(a_id).deleted || t.node(a_id).child.is_some());
        assert!(leaves_of(&t, a_id).is_empty());
        assert!(t.node(b_id).deleted);
        assert_eq!(t.visible_leaves(), vec![t.node(c_id).bbox]);
    }

    #[test]
    fn capacity_exceeded_when_split_cannot_allocate() {
        // Room for the two roots plus fewer than four children.
        let mut t = OcclusionTracker::new(4);
        t.register_opaque(&Rect::new(0, 0, 100, 100)).unwrap();
        let res = t.register_opaque(&Rect::new(25, 25, 75, 75));
        assert_eq!(res, Err(CapacityExceeded));

        // After the forced reset the same call goes through.
        t.reset();
        assert!(t.register_opaque(&Rect::new(25, 25, 75, 75)).is_ok());
    }

    #[test]
    fn deleted_nodes_are_delinked_on_next_walk() {
        let mut t = tracker();
        t.register_opaque(&Rect::new(0, 0, 10, 10)).unwrap();
        t.register_opaque(&Rect::new(0, 0, 10, 10)).unwrap();
        // The walk for this registration delinks the deleted first box.
        t.register_opaque(&Rect::new(50, 50, 60, 60)).unwrap();

        let leaves = t.visible_leaves();
        assert_eq!(leaves.len(), 2);
        assert!(leaves.contains(&Rect::new(0, 0, 10, 10)));
        assert!(leaves.contains(&Rect::new(50, 50, 60, 60)));
    }

    #[test]
    fn reset_clears_forest() {
        let mut t = tracker();
        t.register_opaque(&Rect::new(0, 0, 10, 10)).unwrap();
        t.reset();
        assert!(t.is_empty());
        assert!(t.visible_leaves().is_empty());
    }
}
