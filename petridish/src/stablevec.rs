use rayon::prelude::*;
use serde_derive::Serialize;

/// refers to one element of a [`StableVec`].
/// the epoch is bumped every time the slot is emptied, so a handle to a removed
/// element never resolves to whatever moved in afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Handle {
    index: u32,
    epoch: u32,
}

impl Handle {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    epoch: u32,
    value: Option<T>,
}

/// a vec-like structure where removes do not disturb the indices of other elements
/// basically Vec<Option<T>> with a generation counter per slot
#[derive(Debug, Clone)]
pub struct StableVec<T> {
    inner: Vec<Slot<T>>,
    // empty slots, reused last-freed first
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for StableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StableVec<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    pub fn with_capacity(c: usize) -> Self {
        Self {
            inner: Vec::with_capacity(c),
            free: Vec::new(),
            len: 0,
        }
    }
    /// adds a new element, reusing a dead slot before appending.
    /// returns its handle
    pub fn add(&mut self, e: T) -> Handle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.inner[index as usize];
            slot.value = Some(e);
            return Handle {
                index,
                epoch: slot.epoch,
            };
        }
        let index = self.inner.len() as u32;
        self.inner.push(Slot {
            epoch: 0,
            value: Some(e),
        });
        Handle { index, epoch: 0 }
    }
    /// returns the element if the handle was still live.
    /// removing twice is fine, the second call returns None
    pub fn remove(&mut self, h: Handle) -> Option<T> {
        let slot = self.inner.get_mut(h.index())?;
        if slot.epoch != h.epoch {
            return None;
        }
        let out = slot.value.take()?;
        slot.epoch = slot.epoch.wrapping_add(1);
        self.free.push(h.index);
        self.len -= 1;
        Some(out)
    }

    pub fn get(&self, h: Handle) -> Option<&T> {
        self.inner
            .get(h.index())
            .filter(|s| s.epoch == h.epoch)
            .and_then(|s| s.value.as_ref())
    }
    pub fn get_mut(&mut self, h: Handle) -> Option<&mut T> {
        self.inner
            .get_mut(h.index())
            .filter(|s| s.epoch == h.epoch)
            .and_then(|s| s.value.as_mut())
    }
    pub fn contains(&self, h: Handle) -> bool {
        self.get(h).is_some()
    }

    /// two distinct live elements at once.
    /// None if either is dead or both handles are the same
    pub fn pair_mut(&mut self, a: Handle, b: Handle) -> Option<(&mut T, &mut T)> {
        if a.index == b.index || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (lo, hi, swapped) = if a.index < b.index {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        let (head, tail) = self.inner.split_at_mut(hi);
        let lo = head[lo].value.as_mut()?;
        let hi = tail[0].value.as_mut()?;
        if swapped { Some((hi, lo)) } else { Some((lo, hi)) }
    }

    /// live handles in slot order
    pub fn handles(&self) -> Vec<Handle> {
        self.iter().map(|(h, _)| h).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.inner.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|v| {
                (
                    Handle {
                        index: i as u32,
                        epoch: s.epoch,
                    },
                    v,
                )
            })
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.inner.iter().filter_map(|s| s.value.as_ref())
    }

    /// removes every element, all outstanding handles go stale
    pub fn clear(&mut self) {
        for (i, slot) in self.inner.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.epoch = slot.epoch.wrapping_add(1);
                self.free.push(i as u32);
            }
        }
        self.len = 0;
    }

    /// this is O(1)
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Send> StableVec<T> {
    /// parallel mutable access to all live elements
    pub fn par_iter_mut(&mut self) -> impl ParallelIterator<Item = (Handle, &mut T)> {
        self.inner
            .par_iter_mut()
            .enumerate()
            .filter_map(|(i, s)| {
                let epoch = s.epoch;
                s.value.as_mut().map(|v| {
                    (
                        Handle {
                            index: i as u32,
                            epoch,
                        },
                        v,
                    )
                })
            })
    }
}

impl<T> std::iter::Extend<T> for StableVec<T> {
    /// fills empty slots first, then appends
    fn extend<I>(&mut self, new: I)
    where
        I: IntoIterator<Item = T>,
    {
        for e in new {
            self.add(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn stale_handles() {
        let mut v = StableVec::new();
        let a = v.add('a');
        let b = v.add('b');
        assert_eq!(v.remove(a), Some('a'));
        assert_eq!(v.remove(a), None);
        // reuses the slot of a, but a does not see it
        let c = v.add('c');
        assert_eq!(c.index(), a.index());
        assert_eq!(v.get(a), None);
        assert_eq!(v.get(c), Some(&'c'));
        assert_eq!(v.get(b), Some(&'b'));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn pairs() {
        let mut v = StableVec::new();
        let a = v.add(1);
        let b = v.add(2);
        assert!(v.pair_mut(a, a).is_none());
        {
            let (x, y) = v.pair_mut(b, a).unwrap();
            assert_eq!((*x, *y), (2, 1));
            *x += 10;
        }
        assert_eq!(v.get(b), Some(&12));
        v.remove(b);
        assert!(v.pair_mut(a, b).is_none());
    }

    #[test]
    fn clear_invalidates() {
        let mut v = StableVec::new();
        let hs: Vec<_> = (0..5).map(|i| v.add(i)).collect();
        v.clear();
        assert!(v.is_empty());
        assert!(hs.iter().all(|h| !v.contains(*h)));
        v.extend(10..13);
        assert_eq!(v.values().copied().collect::<Vec<_>>().len(), 3);
        assert!(hs.iter().all(|h| v.get(*h).is_none()));
    }

    #[test]
    fn par_iter_sees_live_only() {
        let mut v = StableVec::new();
        let hs: Vec<_> = (0..100).map(|i| v.add(i)).collect();
        for h in hs.iter().step_by(3) {
            v.remove(*h);
        }
        v.par_iter_mut().for_each(|(_h, e)| *e *= 2);
        for (h, e) in v.iter() {
            assert_eq!(*e, h.index() as i32 * 2);
        }
        assert_eq!(v.par_iter_mut().count(), v.len());
    }

    #[quickcheck]
    /// replays a sequence of adds (Some) and removes (None, removes the oldest live handle)
    /// and checks the bookkeeping against a plain list.
    fn len_matches_live_handles(ops: Vec<Option<u8>>) -> bool {
        let mut v = StableVec::new();
        let mut live: Vec<(Handle, u8)> = Vec::new();
        let mut dead: Vec<Handle> = Vec::new();
        for op in ops {
            match op {
                Some(e) => live.push((v.add(e), e)),
                None => {
                    if !live.is_empty() {
                        let (h, e) = live.remove(0);
                        if v.remove(h) != Some(e) {
                            return false;
                        }
                        dead.push(h);
                    }
                }
            }
        }
        v.len() == live.len()
            && v.handles().len() == live.len()
            && live.iter().all(|(h, e)| v.get(*h) == Some(e))
            && dead.iter().all(|h| !v.contains(*h))
    }
}
