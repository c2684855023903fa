use std::cell::Cell;

use crate::error::{Error, Result};

/// Weighted quick-union with path compression over elements `0..n`.
///
/// Parent pointers live in `Cell`s so lookups can compress paths through a shared
/// reference. Each instance is owned by a single trial.
#[derive(Clone, Debug)]
pub struct UnionFind {
    boss: Vec<Cell<usize>>,
    weight: Vec<usize>,
    components: usize,
}

impl UnionFind {
    pub fn new(n: usize) -> UnionFind {
        UnionFind {
            boss: (0..n).map(Cell::new).collect(),
            weight: vec![1; n],
            components: n,
        }
    }

    pub fn len(&self) -> usize {
        self.boss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boss.is_empty()
    }

    /// Number of disjoint components.
    pub fn count(&self) -> usize {
        self.components
    }

    pub fn find(&self, p: usize) -> Result<usize> {
        self.check(p)?;
        Ok(self.root(p))
    }

    pub fn connected(&self, p: usize, q: usize) -> Result<bool> {
        Ok(self.find(p)? == self.find(q)?)
    }

    /// Size of the component containing `p`.
    pub fn size_of(&self, p: usize) -> Result<usize> {
        let root = self.find(p)?;
        Ok(self.weight[root])
    }

    /// Merges the components of `p` and `q`. Returns false if they were already one.
    ///
    /// The lighter tree goes under the heavier one; on equal weight `q`'s root goes
    /// under `p`'s root.
    pub fn union(&mut self, p: usize, q: usize) -> Result<bool> {
        self.check(p)?;
        self.check(q)?;
        let root_p = self.root(p);
        let root_q = self.root(q);
        if root_p == root_q {
            return Ok(false);
        }

        let (big, small) = if self.weight[root_p] < self.weight[root_q] {
            (root_q, root_p)
        } else {
            (root_p, root_q)
        };
        self.boss[small].set(big);
        self.weight[big] += self.weight[small];
        self.components -= 1;
        Ok(true)
    }

    fn check(&self, p: usize) -> Result<()> {
        if p >= self.boss.len() {
            Err(Error::IndexError { index: p, len: self.boss.len() })
        } else {
            Ok(())
        }
    }

    /// Root of `p`, which must be in range.
    pub(crate) fn root(&self, p: usize) -> usize {
        let mut boss = p;
        while self.boss[boss].get() != boss {
            boss = self.boss[boss].get();
        }

        let mut cur = p;
        while cur != boss {
            let next = self.boss[cur].get();
            self.boss[cur].set(boss);
            cur = next;
        }
        boss
    }
}
