//! Partitioning of lane groups into batches handed to workers.
//!
//! A [Batcher] splits `group_count` lane groups into contiguous [Batch]es of
//! `grain` groups. Output buffers are cut with `par_chunks_mut(grain)`, so
//! chunk `n` always belongs to batch `n`, whichever worker runs it.

use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Multithreaded,
    Monothreaded,
}

/// A contiguous range of lane groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub start: usize,
    pub end: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
    pub fn groups(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    pub group_count: usize,
    pub grain: usize,
}

impl Batcher {
    pub fn new(group_count: usize, grain: usize) -> Self {
        Self {
            group_count,
            grain: grain.max(1),
        }
    }

    pub fn batch_count(&self) -> usize {
        self.group_count.div_ceil(self.grain)
    }

    pub fn batch(&self, idx: usize) -> Option<Batch> {
        (idx < self.batch_count()).then(|| self.span(idx))
    }

    pub fn batches(&self) -> impl ExactSizeIterator<Item = Batch> + '_ {
        (0..self.batch_count()).map(|idx| self.span(idx))
    }

    fn span(&self, idx: usize) -> Batch {
        Batch {
            start: idx * self.grain,
            end: usize::min(self.group_count, (idx + 1) * self.grain),
        }
    }

    /// Runs `f` on every batch with the matching chunk of `data`, then returns.
    ///
    /// `data` must hold exactly one element per lane group.
    pub fn run<T, F>(&self, mode: ExecutionMode, data: &mut [T], f: F)
    where
        T: Send,
        F: Fn(Batch, &mut [T]) + Sync + Send,
    {
        debug_assert_eq!(data.len(), self.group_count);
        match mode {
            ExecutionMode::Multithreaded => data
                .par_chunks_mut(self.grain)
                .enumerate()
                .for_each(|(n, chunk)| f(self.span(n), chunk)),
            ExecutionMode::Monothreaded => data
                .chunks_mut(self.grain)
                .enumerate()
                .for_each(|(n, chunk)| f(self.span(n), chunk)),
        }
    }

    /// Same as [Batcher::run] with two outputs written side by side.
    pub fn run2<A, B, F>(&self, mode: ExecutionMode, a: &mut [A], b: &mut [B], f: F)
    where
        A: Send,
        B: Send,
        F: Fn(Batch, &mut [A], &mut [B]) + Sync + Send,
    {
        debug_assert_eq!(a.len(), self.group_count);
        debug_assert_eq!(b.len(), self.group_count);
        match mode {
            ExecutionMode::Multithreaded => a
                .par_chunks_mut(self.grain)
                .zip(b.par_chunks_mut(self.grain))
                .enumerate()
                .for_each(|(n, (a, b))| f(self.span(n), a, b)),
            ExecutionMode::Monothreaded => a
                .chunks_mut(self.grain)
                .zip(b.chunks_mut(self.grain))
                .enumerate()
                .for_each(|(n, (a, b))| f(self.span(n), a, b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Batch, Batcher, ExecutionMode};

    #[test]
    fn batches_cover_groups_once() {
        let batcher = Batcher::new(10, 3);
        let batches: Vec<_> = batcher.batches().collect();
        assert_eq!(batches.len(), 4);
        assert_eq!(batches[0], Batch { start: 0, end: 3 });
        assert_eq!(batches[3], Batch { start: 9, end: 10 });
        assert_eq!(batches.iter().map(Batch::len).sum::<usize>(), 10);
        assert_eq!(batcher.batch(3), Some(batches[3]));
        assert_eq!(batcher.batch(4), None);
    }

    #[test]
    fn chunk_index_matches_batch_in_both_modes() {
        let batcher = Batcher::new(1000, 7);
        let expected: Vec<_> = batcher.batches().collect();
        for mode in [ExecutionMode::Multithreaded, ExecutionMode::Monothreaded] {
            let mut seen = vec![None; 1000];
            let mut lens = vec![0usize; 1000];
            batcher.run2(mode, &mut seen, &mut lens, |batch, seen, lens| {
                seen[0] = Some(batch);
                lens.fill(batch.len());
            });
            let got: Vec<_> = seen.chunks(7).map(|c| c[0]).collect();
            assert_eq!(got, expected.iter().copied().map(Some).collect::<Vec<_>>());
            assert!(seen.chunks(7).zip(lens.chunks(7)).all(|(s, l)| {
                let batch = s[0].unwrap();
                l.iter().all(|&len| len == batch.len())
            }));
        }
    }

    #[test]
    fn run_writes_every_slot_with_its_own_index() {
        for mode in [ExecutionMode::Multithreaded, ExecutionMode::Monothreaded] {
            let batcher = Batcher::new(101, 8);
            let mut data = vec![usize::MAX; 101];
            batcher.run(mode, &mut data, |batch, chunk| {
                assert_eq!(batch.len(), chunk.len());
                for (slot, group) in chunk.iter_mut().zip(batch.groups()) {
                    *slot = group;
                }
            });
            assert!(data.iter().enumerate().all(|(i, &g)| i == g));
        }
    }

    #[test]
    fn zero_grain_is_clamped() {
        let batcher = Batcher::new(4, 0);
        assert_eq!(batcher.batch_count(), 4);
    }
}
